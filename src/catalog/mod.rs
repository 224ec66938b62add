//! Plan catalogs and loading from data-layer exports

mod data;
pub mod loader;

pub use data::{PlanCatalog, PlanRecord};
pub use loader::{
    load_catalog, load_catalog_from_json_reader, load_catalog_from_reader, load_default_catalog,
    CatalogError,
};
