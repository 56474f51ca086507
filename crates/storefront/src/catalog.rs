//! Catalog source.
//!
//! The catalog is fetched once at startup. [`SimulatedCatalog`] stands in
//! for a remote product API by answering after a delay; [`load_catalog`]
//! wraps any [`CatalogSource`] with a per-attempt timeout and bounded
//! retries, and falls back to an empty catalog when every attempt fails.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use tienda_core::{Catalog, CatalogViolation, Price, Product, ProductId};

use crate::config::CatalogConfig;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source did not answer within the timeout.
    #[error("catalog fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The source could not be reached.
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with no products.
    #[error("catalog source returned no products")]
    Empty,

    /// The products do not form a valid catalog.
    #[error("invalid catalog: {0}")]
    Invalid(#[from] CatalogViolation),
}

impl CatalogError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

/// Something that supplies the product list.
pub trait CatalogSource: Send + Sync {
    /// Fetch every purchasable product.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Catalog source answering with a fixed product list after `delay`.
#[derive(Debug, Clone)]
pub struct SimulatedCatalog {
    delay: Duration,
    products: Vec<Product>,
}

impl SimulatedCatalog {
    /// The demo store's four products.
    #[must_use]
    pub fn demo(delay: Duration) -> Self {
        Self::with_products(delay, demo_products())
    }

    #[must_use]
    pub const fn with_products(delay: Duration, products: Vec<Product>) -> Self {
        Self { delay, products }
    }
}

impl CatalogSource for SimulatedCatalog {
    async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.products.clone())
    }
}

/// Products offered by the demo store.
#[must_use]
pub fn demo_products() -> Vec<Product> {
    vec![
        Product::new(ProductId::new(1), "Remera", Price::new(5_000)),
        Product::new(ProductId::new(2), "Pantalón", Price::new(12_000)),
        Product::new(ProductId::new(3), "Zapatillas", Price::new(25_000)),
        Product::new(ProductId::new(4), "Campera", Price::new(30_000)),
    ]
}

/// Fetch and validate the catalog once.
///
/// # Errors
///
/// Returns `CatalogError` on timeout, source failure, an empty answer, or
/// products that violate catalog invariants.
pub async fn fetch_catalog<S: CatalogSource>(
    source: &S,
    timeout: Duration,
) -> Result<Catalog, CatalogError> {
    let products = tokio::time::timeout(timeout, source.fetch())
        .await
        .map_err(|_| CatalogError::Timeout(timeout))??;
    if products.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(Catalog::new(products)?)
}

/// Fetch the catalog with retries, falling back to an empty catalog.
///
/// Never fails: the storefront stays usable (with nothing to buy) when the
/// source is down.
#[instrument(skip(source))]
pub async fn load_catalog<S: CatalogSource>(source: &S, config: &CatalogConfig) -> Catalog {
    let attempts = config.attempts.max(1);
    for attempt in 1..=attempts {
        match fetch_catalog(source, config.timeout).await {
            Ok(catalog) => {
                tracing::info!(products = catalog.len(), attempt, "Catalog loaded");
                return catalog;
            }
            Err(e) if e.is_retryable() && attempt < attempts => {
                tracing::warn!(error = %e, attempt, "Catalog fetch failed, retrying");
            }
            Err(e) => {
                tracing::warn!(error = %e, attempt, "Catalog unavailable, showing empty catalog");
                break;
            }
        }
    }
    Catalog::empty()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn config(attempts: u32) -> CatalogConfig {
        CatalogConfig {
            delay: Duration::ZERO,
            timeout: Duration::from_millis(100),
            attempts,
        }
    }

    /// Fails a fixed number of times, then serves the demo products.
    struct FlakyCatalog {
        failures: u32,
        calls: AtomicU32,
    }

    impl CatalogSource for FlakyCatalog {
        async fn fetch(&self) -> Result<Vec<Product>, CatalogError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(CatalogError::Unavailable("connection reset".to_string()))
            } else {
                Ok(demo_products())
            }
        }
    }

    #[tokio::test]
    async fn test_demo_catalog() {
        let catalog = load_catalog(&SimulatedCatalog::demo(Duration::ZERO), &config(1)).await;
        assert_eq!(catalog.len(), 4);
        assert_eq!(
            catalog.get(ProductId::new(3)).unwrap().price,
            Price::new(25_000)
        );
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let source = FlakyCatalog {
            failures: 2,
            calls: AtomicU32::new(0),
        };
        let catalog = load_catalog(&source, &config(3)).await;
        assert_eq!(catalog.len(), 4);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_falls_back_to_empty() {
        let source = FlakyCatalog {
            failures: 5,
            calls: AtomicU32::new(0),
        };
        let catalog = load_catalog(&source, &config(2)).await;
        assert!(catalog.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_answer_is_error() {
        let source = SimulatedCatalog::with_products(Duration::ZERO, Vec::new());
        let err = fetch_catalog(&source, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[tokio::test]
    async fn test_invalid_catalog_is_not_retried() {
        let dup = Product::new(ProductId::new(1), "Remera", Price::new(1));
        let source = SimulatedCatalog::with_products(Duration::ZERO, vec![dup.clone(), dup]);
        let err = fetch_catalog(&source, Duration::from_secs(1)).await.unwrap_err();
        assert!(!err.is_retryable());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let source = SimulatedCatalog::demo(Duration::from_secs(60));
        let err = fetch_catalog(&source, Duration::from_millis(350))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Timeout(_)));
    }
}
