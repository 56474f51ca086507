//! Catalog products.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::Price;

/// A purchasable product. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(alias = "nombre")]
    pub name: String,
    #[serde(alias = "precio")]
    pub price: Price,
}

impl Product {
    /// Create a new product.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }
}

/// Reasons a product list cannot be used as a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogViolation {
    /// Product ids must be positive.
    #[error("product id must be positive")]
    ZeroId,
    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// The list of purchasable products available at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, checking that ids are positive and unique.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogViolation`] found.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogViolation> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.as_u32() == 0 {
                return Err(CatalogViolation::ZeroId);
            }
            if !seen.insert(product.id) {
                return Err(CatalogViolation::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// An empty catalog.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: u32, price: u64) -> Product {
        Product::new(ProductId::new(id), format!("p{id}"), Price::new(price))
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(vec![product(1, 5000), product(2, 12000)]).unwrap();
        assert_eq!(catalog.get(ProductId::new(2)).unwrap().price, Price::new(12000));
        assert!(catalog.get(ProductId::new(9)).is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let err = Catalog::new(vec![product(1, 1), product(1, 2)]).unwrap_err();
        assert_eq!(err, CatalogViolation::DuplicateId(ProductId::new(1)));
    }

    #[test]
    fn test_catalog_rejects_zero_id() {
        assert_eq!(
            Catalog::new(vec![product(0, 1)]).unwrap_err(),
            CatalogViolation::ZeroId
        );
    }

    #[test]
    fn test_product_accepts_legacy_field_names() {
        let p: Product = serde_json::from_str(r#"{"id":1,"nombre":"Remera","precio":5000}"#).unwrap();
        assert_eq!(p, Product::new(ProductId::new(1), "Remera", Price::new(5000)));
    }
}
