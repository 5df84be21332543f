mod cache;
mod columns;
mod manager;
mod persistence;

pub use cache::CatalogCache;
pub use columns::{reconcile_headers, ColumnRole};
pub use manager::{densities, Catalog};
pub use persistence::{
    catalog_from_bytes, export_record, format_amount, load_catalog, parse_catalog, write_meal_csv, write_report_json, CatalogFormat,
    EXPORT_HEADER,
};
