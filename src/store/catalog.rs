use crate::models::{Product, ProductId, DEFAULT_CATEGORY};

/// In-memory mirror of the upstream product catalog.
///
/// Insertion order is preserved; rankings that produce ties fall back to this
/// order, which keeps them deterministic. Absent-field defaults ("Others"
/// category) are applied here, at the store boundary, so the scoring code can
/// assume fully populated records.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All products in insertion order.
    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Adds a product, normalizing a blank category to the default label.
    pub fn add(&mut self, mut product: Product) {
        if product.category.trim().is_empty() {
            product.category = DEFAULT_CATEGORY.to_string();
        }
        self.products.push(product);
    }

    /// Replaces the whole catalog, as a sync from upstream does.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products.clear();
        for product in products {
            self.add(product);
        }
    }

    /// Removes a product by id; returns false when no such product exists.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() < before
    }

    /// Successor of the largest numeric id, for locally added products.
    /// Non-numeric ids (upstream database ids) are ignored.
    pub fn next_numeric_id(&self) -> ProductId {
        let max = self
            .products
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        (max + 1).to_string()
    }
}
