use crate::domain::errors::DomainError;
use crate::domain::order::{CatalogItem, Order};
use crate::domain::ports::OrderStore;

/// The fixed set of demonstration reads. All four are pure: they mutate
/// nothing and reflect the latest committed state at call time.
pub struct QueryRunner<S> {
    store: S,
}

impl<S: OrderStore> QueryRunner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The `n` most recently updated orders: `update_time` descending, ties
    /// broken by ascending id.
    pub fn top_n_by_recency(&self, n: i64) -> Result<Vec<Order>, DomainError> {
        self.store.transaction(|tx| tx.top_orders_by_recency(n))
    }

    /// All orders for one customer, oldest first (ascending id).
    pub fn by_customer(&self, customer: &str) -> Result<Vec<Order>, DomainError> {
        self.store.transaction(|tx| tx.orders_by_customer(customer))
    }

    /// Orders containing at least one item with the given name, in ascending
    /// id order, each order exactly once.
    pub fn by_item_name(&self, name: &str) -> Result<Vec<Order>, DomainError> {
        self.store.transaction(|tx| tx.orders_by_item_name(name))
    }

    pub fn all_catalog_sorted_by_name(&self) -> Result<Vec<CatalogItem>, DomainError> {
        self.store.transaction(|tx| tx.catalog_sorted_by_name())
    }

    /// Run all four demo queries and log the results.
    pub fn report(&self) -> Result<(), DomainError> {
        for item in self.all_catalog_sorted_by_name()? {
            log::info!("loading {item}");
        }

        let top = self.top_n_by_recency(3)?;
        log::info!("top 3 by update time desc, id asc: {}", joined_ids(&top));

        let by_customer = self.by_customer("Zhang San")?;
        log::info!("orders for Zhang San by id: {}", joined_ids(&by_customer));
        for order in &by_customer {
            log::info!("order {}", order.id);
            for item in &order.items {
                log::info!("  item {item}");
            }
        }

        let with_latte = self.by_item_name("latte")?;
        log::info!("orders containing latte: {}", joined_ids(&with_latte));

        Ok(())
    }
}

fn joined_ids(orders: &[Order]) -> String {
    orders
        .iter()
        .map(|o| o.id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
