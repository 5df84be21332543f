use std::collections::hash_map::{DefaultHasher, Entry};
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::state::manager::Catalog;
use crate::state::persistence::catalog_from_bytes;

#[derive(Debug)]
struct CachedCatalog {
    fingerprint: u64,
    catalog: Catalog,
}

/// Load-once catalog cache owned by the caller.
///
/// Entries are keyed by canonical path and invalidated when the file
/// content changes.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: HashMap<PathBuf, CachedCatalog>,
    loads: usize,
}

fn fingerprint(content: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the catalog for `path`, normalizing it only if the file is
    /// new to the cache or its content changed.
    pub fn get_or_load<P: AsRef<Path>>(&mut self, path: P) -> Result<&Catalog> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let fingerprint = fingerprint(&content);
        let key = fs::canonicalize(path)?;

        let entry = match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().fingerprint == fingerprint {
                    debug!("Catalog cache hit for {}", path.display());
                } else {
                    info!("Catalog {} changed on disk; reloading", path.display());
                    occupied.insert(CachedCatalog {
                        fingerprint,
                        catalog: catalog_from_bytes(path, &content)?,
                    });
                    self.loads += 1;
                }
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => {
                let catalog = catalog_from_bytes(path, &content)?;
                self.loads += 1;
                vacant.insert(CachedCatalog {
                    fingerprint,
                    catalog,
                })
            }
        };

        Ok(&entry.catalog)
    }

    /// Number of times a catalog was actually parsed and normalized.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
