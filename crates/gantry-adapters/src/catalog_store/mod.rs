//! Catalog storage adapters and the `catalog` component registry.

mod memory;

use std::sync::Arc;

use gantry_core::{
    application::{ComponentRegistry, ports::CatalogRepository},
    domain::AppConfig,
};

pub use memory::MemoryCatalog;

/// Component id under which the catalog is configured.
pub const CATALOG_COMPONENT: &str = "catalog";

/// Implementations selectable through `CATALOG_COMPONENT`.
pub fn catalog_components() -> ComponentRegistry<Arc<dyn CatalogRepository>> {
    ComponentRegistry::new(CATALOG_COMPONENT).register("memory", memory_catalog)
}

fn memory_catalog(_config: &AppConfig) -> Arc<dyn CatalogRepository> {
    Arc::new(MemoryCatalog::with_demo_data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::{application::ConfigAssembler, domain::EnvironmentMap};

    #[test]
    fn memory_component_starts_with_demo_data() {
        let env = EnvironmentMap::parse(
            "APP_ID=shop\nAPP_NAME=Shop\nDB_DRIVER=mysql\nDB_HOST=localhost\n\
             DB_PORT=3306\nDB_NAME=shop\nDB_USER=shop\nDB_PASSWORD=\n",
        );
        let config = ConfigAssembler::build_web(&env).unwrap();

        let catalog = catalog_components().build(&config).unwrap();

        assert_eq!(catalog.categories().unwrap().len(), 3);
        assert!(!catalog.products(None).unwrap().is_empty());
    }
}
