use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::order::{CatalogItem, Order, OrderState, Price};
use crate::schema::{catalog_items, order_items, orders};

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = catalog_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CatalogItemRow {
    pub id: i64,
    pub name: String,
    pub price_amount: BigDecimal,
    pub currency: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl CatalogItemRow {
    pub fn into_domain(self) -> Result<CatalogItem, DomainError> {
        // A stored price that fails validation is a data-integrity problem.
        let price = Price::new(self.price_amount, &self.currency)
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        Ok(CatalogItem {
            id: self.id,
            name: self.name,
            price,
            create_time: self.create_time,
            update_time: self.update_time,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = catalog_items)]
pub struct NewCatalogItemRow {
    pub name: String,
    pub price_amount: BigDecimal,
    pub currency: String,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub customer: String,
    pub state: String,
    pub external_ref: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_domain(self, items: Vec<CatalogItem>) -> Result<Order, DomainError> {
        Ok(Order {
            id: self.id,
            customer: self.customer,
            items,
            state: OrderState::from_str(&self.state)?,
            external_ref: self.external_ref,
            create_time: self.create_time,
            update_time: self.update_time,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub customer: String,
    pub state: String,
    pub external_ref: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable, Associations,
)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub catalog_item_id: i64,
    pub seq_no: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow {
    pub order_id: i64,
    pub catalog_item_id: i64,
    pub seq_no: i32,
}
