//! In-memory catalog store with demo data.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use chrono::{DateTime, TimeZone, Utc};
use gantry_core::{
    application::{ApplicationError, ports::CatalogRepository},
    domain::{Category, CategoryDeletion, CategoryDraft, Product, ProductDraft, ProductWrite},
    error::GantryResult,
};

/// Thread-safe in-memory catalog.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    inner: Arc<RwLock<CatalogInner>>,
}

#[derive(Debug, Default)]
struct CatalogInner {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    next_category_id: i64,
    next_product_id: i64,
}

impl CatalogInner {
    fn seed(&mut self, now: DateTime<Utc>) {
        for name in ["Books", "Tools", "Garden"] {
            let id = self.next_category_id();
            self.categories.insert(
                id,
                Category {
                    id,
                    name: name.to_string(),
                },
            );
        }
        let products = [
            ("The Rust Book", "Paperback edition.", 3999, 1),
            ("Claw Hammer", "16 oz, fibreglass handle.", 1450, 2),
            ("Torque Wrench", "3/8\" drive.", 8900, 2),
        ];
        for (name, description, price_cents, category_id) in products {
            let id = self.next_product_id();
            self.products.insert(
                id,
                Product {
                    id,
                    name: name.to_string(),
                    description: description.to_string(),
                    price_cents,
                    category_id,
                    created_at: now,
                    updated_at: now,
                },
            );
        }
    }

    fn next_category_id(&mut self) -> i64 {
        self.next_category_id += 1;
        self.next_category_id
    }

    fn next_product_id(&mut self) -> i64 {
        self.next_product_id += 1;
        self.next_product_id
    }
}

impl MemoryCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with a few categories and products.
    pub fn with_demo_data() -> Self {
        let mut inner = CatalogInner::default();
        inner.seed(seed_time());
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Number of products.
    pub fn product_count(&self) -> usize {
        self.read().map(|inner| inner.products.len()).unwrap_or(0)
    }

    fn read(&self) -> GantryResult<RwLockReadGuard<'_, CatalogInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write(&self) -> GantryResult<RwLockWriteGuard<'_, CatalogInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

/// Fixed timestamp for seeded rows so listings are stable.
fn seed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

impl CatalogRepository for MemoryCatalog {
    fn categories(&self) -> GantryResult<Vec<Category>> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    fn category(&self, id: i64) -> GantryResult<Option<Category>> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    fn insert_category(&self, draft: CategoryDraft) -> GantryResult<Category> {
        let mut inner = self.write()?;
        let id = inner.next_category_id();
        let category = Category {
            id,
            name: draft.name,
        };
        inner.categories.insert(id, category.clone());
        Ok(category)
    }

    fn update_category(&self, id: i64, draft: CategoryDraft) -> GantryResult<Option<Category>> {
        let mut inner = self.write()?;
        Ok(inner.categories.get_mut(&id).map(|category| {
            category.name = draft.name;
            category.clone()
        }))
    }

    fn delete_category(&self, id: i64) -> GantryResult<CategoryDeletion> {
        let mut inner = self.write()?;
        if !inner.categories.contains_key(&id) {
            return Ok(CategoryDeletion::Missing);
        }
        let products = inner
            .products
            .values()
            .filter(|p| p.category_id == id)
            .count();
        if products > 0 {
            return Ok(CategoryDeletion::InUse { products });
        }
        inner.categories.remove(&id);
        Ok(CategoryDeletion::Deleted)
    }

    fn products(&self, category_id: Option<i64>) -> GantryResult<Vec<Product>> {
        let inner = self.read()?;
        Ok(inner
            .products
            .values()
            .filter(|p| category_id.is_none_or(|c| p.category_id == c))
            .cloned()
            .collect())
    }

    fn product(&self, id: i64) -> GantryResult<Option<Product>> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    fn insert_product(&self, draft: ProductDraft) -> GantryResult<ProductWrite> {
        let mut inner = self.write()?;
        if !inner.categories.contains_key(&draft.category_id) {
            return Ok(ProductWrite::UnknownCategory);
        }
        let id = inner.next_product_id();
        let now = Utc::now();
        let product = Product {
            id,
            name: draft.name,
            description: draft.description,
            price_cents: draft.price_cents,
            category_id: draft.category_id,
            created_at: now,
            updated_at: now,
        };
        inner.products.insert(id, product.clone());
        Ok(ProductWrite::Saved(product))
    }

    fn update_product(&self, id: i64, draft: ProductDraft) -> GantryResult<ProductWrite> {
        let mut inner = self.write()?;
        let category_exists = inner.categories.contains_key(&draft.category_id);
        let Some(product) = inner.products.get_mut(&id) else {
            return Ok(ProductWrite::Missing);
        };
        if !category_exists {
            return Ok(ProductWrite::UnknownCategory);
        }
        product.name = draft.name;
        product.description = draft.description;
        product.price_cents = draft.price_cents;
        product.category_id = draft.category_id;
        product.updated_at = Utc::now();
        Ok(ProductWrite::Saved(product.clone()))
    }

    fn delete_product(&self, id: i64) -> GantryResult<bool> {
        Ok(self.write()?.products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_data_is_seeded() {
        let catalog = MemoryCatalog::with_demo_data();
        assert_eq!(catalog.categories().unwrap().len(), 3);
        assert_eq!(catalog.product_count(), 3);
        assert_eq!(catalog.products(Some(2)).unwrap().len(), 2);
        assert!(catalog.products(Some(3)).unwrap().is_empty());
    }

    fn draft(name: &str, category_id: i64) -> ProductDraft {
        ProductDraft {
            name: name.into(),
            description: String::new(),
            price_cents: 1200,
            category_id,
        }
    }

    fn saved(write: ProductWrite) -> Product {
        match write {
            ProductWrite::Saved(product) => product,
            other => panic!("expected a saved product, got {other:?}"),
        }
    }

    #[test]
    fn ids_keep_increasing_after_delete() {
        let catalog = MemoryCatalog::with_demo_data();
        assert!(catalog.delete_product(3).unwrap());
        assert!(!catalog.delete_product(3).unwrap());
        let product = saved(catalog.insert_product(draft("Rake", 3)).unwrap());
        assert_eq!(product.id, 4);
    }

    #[test]
    fn product_writes_require_an_existing_category() {
        let catalog = MemoryCatalog::with_demo_data();
        assert_eq!(
            catalog.insert_product(draft("Orphan", 9)).unwrap(),
            ProductWrite::UnknownCategory
        );
        assert_eq!(catalog.product_count(), 3);

        assert_eq!(
            catalog.update_product(1, draft("Moved", 9)).unwrap(),
            ProductWrite::UnknownCategory
        );
        assert_eq!(catalog.product(1).unwrap().unwrap().category_id, 1);

        assert_eq!(
            catalog.update_product(42, draft("Ghost", 1)).unwrap(),
            ProductWrite::Missing
        );
        assert_eq!(saved(catalog.update_product(1, draft("Moved", 3)).unwrap()).category_id, 3);
    }

    #[test]
    fn category_delete_refused_while_referenced() {
        let catalog = MemoryCatalog::with_demo_data();
        assert_eq!(
            catalog.delete_category(2).unwrap(),
            CategoryDeletion::InUse { products: 2 }
        );
        assert_eq!(catalog.delete_category(3).unwrap(), CategoryDeletion::Deleted);
        assert_eq!(catalog.delete_category(3).unwrap(), CategoryDeletion::Missing);
        assert_eq!(catalog.categories().unwrap().len(), 2);
    }

    #[test]
    fn concurrent_insert_and_delete_never_orphan_products() {
        for _ in 0..50 {
            let catalog = MemoryCatalog::with_demo_data();
            let writer = catalog.clone();
            let deleter = catalog.clone();

            let insert = std::thread::spawn(move || writer.insert_product(draft("Rake", 3)).unwrap());
            let delete = std::thread::spawn(move || deleter.delete_category(3).unwrap());
            let inserted = insert.join().unwrap();
            let deleted = delete.join().unwrap();

            match (inserted, deleted) {
                (ProductWrite::Saved(_), CategoryDeletion::InUse { products: 1 }) => {
                    assert!(catalog.category(3).unwrap().is_some());
                }
                (ProductWrite::UnknownCategory, CategoryDeletion::Deleted) => {
                    assert_eq!(catalog.product_count(), 3);
                }
                other => panic!("inconsistent outcome: {other:?}"),
            }
            let categories = catalog.categories().unwrap();
            for product in catalog.products(None).unwrap() {
                assert!(categories.iter().any(|c| c.id == product.category_id));
            }
        }
    }

    #[test]
    fn update_missing_row_is_none() {
        let catalog = MemoryCatalog::new();
        let updated = catalog
            .update_category(
                7,
                CategoryDraft {
                    name: "Nope".into(),
                },
            )
            .unwrap();
        assert!(updated.is_none());
    }

    #[test]
    fn clones_share_state() {
        let a = MemoryCatalog::new();
        let b = a.clone();
        a.insert_category(CategoryDraft {
            name: "Shared".into(),
        })
        .unwrap();
        assert_eq!(b.categories().unwrap().len(), 1);
    }
}
