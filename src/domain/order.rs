use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::errors::DomainError;

/// Lifecycle state of an order. Transitions only move forward:
///
/// ```text
/// INIT -> PAID -> PREPARING -> COMPLETED
///   \       \        \
///    `-------`--------`-----> CANCELLED
/// ```
///
/// `COMPLETED` and `CANCELLED` are terminal; nothing leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    Init,
    Paid,
    Preparing,
    Completed,
    Cancelled,
}

impl OrderState {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderState::Completed | OrderState::Cancelled)
    }

    /// Whether `next` is reachable from `self` in one step.
    pub fn can_transition_to(self, next: OrderState) -> bool {
        use OrderState::*;
        match (self, next) {
            (Init, Paid) | (Paid, Preparing) | (Preparing, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Uppercase form used in the `orders.state` column.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderState::Init => "INIT",
            OrderState::Paid => "PAID",
            OrderState::Preparing => "PREPARING",
            OrderState::Completed => "COMPLETED",
            OrderState::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderState {
    type Err = DomainError;

    // An unknown stored state means the row was written by something that
    // does not understand the lifecycle; treat it as a data-integrity error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INIT" => Ok(OrderState::Init),
            "PAID" => Ok(OrderState::Paid),
            "PREPARING" => Ok(OrderState::Preparing),
            "COMPLETED" => Ok(OrderState::Completed),
            "CANCELLED" => Ok(OrderState::Cancelled),
            other => Err(DomainError::Storage(format!(
                "unknown order state '{other}'"
            ))),
        }
    }
}

/// A currency-tagged decimal amount, e.g. `30.00 CNY`.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: BigDecimal,
    pub currency: String,
}

impl Price {
    pub fn new(amount: BigDecimal, currency: &str) -> Result<Self, DomainError> {
        if amount < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(format!(
                "price amount must be non-negative, got {amount}"
            )));
        }
        if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(DomainError::InvalidInput(format!(
                "currency must be a three-letter uppercase code, got '{currency}'"
            )));
        }
        Ok(Price {
            amount,
            currency: currency.to_string(),
        })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price: Price,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price)
    }
}

/// An order aggregate with its item references resolved to catalog items.
/// The items are shared, immutable catalog values; the order only owns the
/// ordered list of references.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i64,
    pub customer: String,
    pub items: Vec<CatalogItem>,
    pub state: OrderState,
    pub external_ref: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}
