//! Driven (output) ports - implemented by infrastructure.

use std::path::{Path, PathBuf};

use crate::domain::{
    AppConfig, Category, CategoryDeletion, CategoryDraft, ConfigError, ErrorResponse, Product,
    ProductDraft, ProductWrite,
};
use crate::error::GantryResult;

/// Port for reading the environment file.
///
/// Implemented by:
/// - `gantry_adapters::env_source::LocalEnvSource` (production)
/// - `gantry_adapters::env_source::MemoryEnvSource` (testing)
pub trait EnvSource: Send + Sync {
    /// Read the whole file as text.
    ///
    /// A path that does not exist must fail with [`ConfigError::MissingFile`].
    fn read(&self, path: &Path) -> Result<String, ConfigError>;

    /// Path recorded as the map's origin. Sources may canonicalise it.
    fn locate(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Port for demo catalog storage.
///
/// Implemented by:
/// - `gantry_adapters::catalog_store::MemoryCatalog`
///
/// Lookups return `Ok(None)` for a missing row; `Err` is reserved for the
/// store itself failing.
///
/// Referential integrity belongs to the store: a product never points at a
/// missing category, and each check runs atomically with its write.
pub trait CatalogRepository: Send + Sync {
    fn categories(&self) -> GantryResult<Vec<Category>>;

    fn category(&self, id: i64) -> GantryResult<Option<Category>>;

    fn insert_category(&self, draft: CategoryDraft) -> GantryResult<Category>;

    fn update_category(&self, id: i64, draft: CategoryDraft) -> GantryResult<Option<Category>>;

    /// Refused with [`CategoryDeletion::InUse`] while products reference it.
    fn delete_category(&self, id: i64) -> GantryResult<CategoryDeletion>;

    /// All products, or those filed under one category. Ordered by id.
    fn products(&self, category_id: Option<i64>) -> GantryResult<Vec<Product>>;

    fn product(&self, id: i64) -> GantryResult<Option<Product>>;

    /// Never [`ProductWrite::Missing`].
    fn insert_product(&self, draft: ProductDraft) -> GantryResult<ProductWrite>;

    fn update_product(&self, id: i64, draft: ProductDraft) -> GantryResult<ProductWrite>;

    fn delete_product(&self, id: i64) -> GantryResult<bool>;
}

/// Port for rendering an error page when no error action handles it.
pub trait ErrorRenderer: Send + Sync {
    fn render(&self, error: &ErrorResponse, config: &AppConfig) -> String;
}
