use crate::domain::errors::DomainError;
use crate::domain::order::{CatalogItem, Order, OrderState};
use crate::domain::ports::OrderStore;

/// Order lifecycle operations: placing new orders and moving them through
/// the forward-only state machine.
pub struct OrderService<S> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Place an order for `customer` in state `INIT`. The customer is an
    /// opaque identifier; the item list must be non-empty.
    pub fn place(&self, customer: &str, items: &[CatalogItem]) -> Result<Order, DomainError> {
        if items.is_empty() {
            return Err(DomainError::EmptyOrder);
        }
        let item_ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        self.store
            .transaction(|tx| tx.insert_order(customer, &item_ids, None))
    }

    /// Advance an order to `next`, bumping its `update_time`.
    ///
    /// The load-check-update runs in one store transaction, so the state
    /// read by the transition check is the state the update is applied to.
    pub fn advance(&self, order_id: i64, next: OrderState) -> Result<Order, DomainError> {
        self.store.transaction(|tx| {
            let order = tx
                .order_by_id(order_id)?
                .ok_or_else(|| DomainError::NotFound(format!("order {order_id}")))?;
            if !order.state.can_transition_to(next) {
                return Err(DomainError::InvalidTransition {
                    from: order.state,
                    to: next,
                });
            }
            tx.update_order_state(order_id, next)
        })
    }
}
