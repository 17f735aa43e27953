use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::order::{CatalogItem, Price};
use crate::domain::ports::OrderStore;

/// Product catalog. Items are immutable once created and keyed by their
/// unique name.
pub struct Catalog<S> {
    store: S,
}

impl<S: OrderStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create a new catalog item. The price is validated up front; an
    /// already-taken name fails with [`DomainError::DuplicateName`].
    pub fn add_item(
        &self,
        name: &str,
        amount: BigDecimal,
        currency: &str,
    ) -> Result<CatalogItem, DomainError> {
        let price = Price::new(amount, currency)?;
        self.store
            .transaction(|tx| tx.insert_catalog_item(name, &price))
    }

    pub fn get(&self, name: &str) -> Result<CatalogItem, DomainError> {
        self.store
            .transaction(|tx| tx.catalog_item_by_name(name))?
            .ok_or_else(|| DomainError::NotFound(format!("catalog item '{name}'")))
    }

    /// All items in deterministic ascending name order.
    pub fn list_all(&self) -> Result<Vec<CatalogItem>, DomainError> {
        self.store.transaction(|tx| tx.catalog_sorted_by_name())
    }
}
