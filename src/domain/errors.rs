use thiserror::Error;

use super::order::OrderState;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("duplicate catalog item name '{0}'")]
    DuplicateName(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("an order must contain at least one item")]
    EmptyOrder,
    #[error("illegal order state transition {from} -> {to}")]
    InvalidTransition { from: OrderState, to: OrderState },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage error: {0}")]
    Storage(String),
}
