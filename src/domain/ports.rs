use super::errors::DomainError;
use super::order::{CatalogItem, Order, OrderState, Price};

/// Operations available inside a storage transaction.
///
/// All reads have fully specified orderings so that results are
/// deterministic: catalog listings sort by name, per-customer and per-item
/// order listings sort by ascending id, and the recency query sorts by
/// `(update_time DESC, id ASC)`.
pub trait StoreTx {
    /// Insert a new catalog item; fails with [`DomainError::DuplicateName`]
    /// if the name is already taken.
    fn insert_catalog_item(&mut self, name: &str, price: &Price)
        -> Result<CatalogItem, DomainError>;

    /// Insert-or-replace keyed by name. Used by idempotent seeding.
    fn upsert_catalog_item(&mut self, name: &str, price: &Price)
        -> Result<CatalogItem, DomainError>;

    fn catalog_item_by_name(&mut self, name: &str) -> Result<Option<CatalogItem>, DomainError>;

    fn catalog_sorted_by_name(&mut self) -> Result<Vec<CatalogItem>, DomainError>;

    /// Persist a new order in state `INIT` with fresh timestamps. The item
    /// ids must reference existing catalog rows and keep their given order.
    fn insert_order(
        &mut self,
        customer: &str,
        item_ids: &[i64],
        external_ref: Option<&str>,
    ) -> Result<Order, DomainError>;

    fn order_by_external_ref(&mut self, external_ref: &str) -> Result<Option<Order>, DomainError>;

    fn order_by_id(&mut self, id: i64) -> Result<Option<Order>, DomainError>;

    /// Set the order's state and bump its `update_time`. The caller is
    /// responsible for having validated the transition.
    fn update_order_state(&mut self, id: i64, state: OrderState) -> Result<Order, DomainError>;

    fn top_orders_by_recency(&mut self, n: i64) -> Result<Vec<Order>, DomainError>;

    fn orders_by_customer(&mut self, customer: &str) -> Result<Vec<Order>, DomainError>;

    /// Orders containing at least one item with the given name, each exactly
    /// once no matter how many of its items match.
    fn orders_by_item_name(&mut self, name: &str) -> Result<Vec<Order>, DomainError>;
}

/// Durable keyed storage for catalog items and orders.
///
/// The single entry point is a scoped transaction: the closure's work is
/// committed if it returns `Ok` and fully rolled back if it returns `Err`,
/// so no partial state from a failed unit of work is ever observable.
pub trait OrderStore: Send + Sync + 'static {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>;
}
