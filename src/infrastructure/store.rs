use chrono::Utc;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{CatalogItem, Order, OrderState, Price};
use crate::domain::ports::{OrderStore, StoreTx};
use crate::schema::{catalog_items, order_items, orders};

use super::models::{
    CatalogItemRow, NewCatalogItemRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow,
};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}

// ── Store ────────────────────────────────────────────────────────────────────

/// Postgres-backed [`OrderStore`]. Each `transaction` call checks out a
/// pooled connection and wraps the closure in one database transaction.
pub struct DieselOrderStore {
    pool: DbPool,
}

impl DieselOrderStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for DieselOrderStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        let mut conn = self.pool.get()?;
        conn.transaction::<T, DomainError, _>(|conn| f(&mut DieselTx { conn }))
    }
}

struct DieselTx<'a> {
    conn: &'a mut PgConnection,
}

impl DieselTx<'_> {
    /// Resolve an order's item references in declaration order. A reference
    /// to a missing catalog row is surfaced as a data-integrity error, never
    /// silently skipped.
    fn load_items(&mut self, order_id: i64) -> Result<Vec<CatalogItem>, DomainError> {
        let rows: Vec<(OrderItemRow, Option<CatalogItemRow>)> = order_items::table
            .left_join(catalog_items::table)
            .filter(order_items::order_id.eq(order_id))
            .order(order_items::seq_no.asc())
            .select((OrderItemRow::as_select(), Option::<CatalogItemRow>::as_select()))
            .load(self.conn)?;

        rows.into_iter()
            .map(|(link, item)| {
                let item = item.ok_or_else(|| {
                    DomainError::Storage(format!(
                        "order {} references missing catalog item {}",
                        order_id, link.catalog_item_id
                    ))
                })?;
                item.into_domain()
            })
            .collect()
    }

    fn hydrate(&mut self, row: OrderRow) -> Result<Order, DomainError> {
        let items = self.load_items(row.id)?;
        row.into_domain(items)
    }

    fn hydrate_all(&mut self, rows: Vec<OrderRow>) -> Result<Vec<Order>, DomainError> {
        rows.into_iter().map(|row| self.hydrate(row)).collect()
    }
}

impl StoreTx for DieselTx<'_> {
    fn insert_catalog_item(
        &mut self,
        name: &str,
        price: &Price,
    ) -> Result<CatalogItem, DomainError> {
        let now = Utc::now();
        let result = diesel::insert_into(catalog_items::table)
            .values(&NewCatalogItemRow {
                name: name.to_string(),
                price_amount: price.amount.clone(),
                currency: price.currency.clone(),
                create_time: now,
                update_time: now,
            })
            .returning(CatalogItemRow::as_returning())
            .get_result(self.conn);

        match result {
            Ok(row) => row.into_domain(),
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(DomainError::DuplicateName(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn upsert_catalog_item(
        &mut self,
        name: &str,
        price: &Price,
    ) -> Result<CatalogItem, DomainError> {
        let now = Utc::now();
        let row: CatalogItemRow = diesel::insert_into(catalog_items::table)
            .values(&NewCatalogItemRow {
                name: name.to_string(),
                price_amount: price.amount.clone(),
                currency: price.currency.clone(),
                create_time: now,
                update_time: now,
            })
            .on_conflict(catalog_items::name)
            .do_update()
            .set((
                catalog_items::price_amount.eq(price.amount.clone()),
                catalog_items::currency.eq(price.currency.clone()),
                catalog_items::update_time.eq(now),
            ))
            .returning(CatalogItemRow::as_returning())
            .get_result(self.conn)?;

        row.into_domain()
    }

    fn catalog_item_by_name(&mut self, name: &str) -> Result<Option<CatalogItem>, DomainError> {
        let row = catalog_items::table
            .filter(catalog_items::name.eq(name))
            .select(CatalogItemRow::as_select())
            .first(self.conn)
            .optional()?;

        row.map(CatalogItemRow::into_domain).transpose()
    }

    fn catalog_sorted_by_name(&mut self) -> Result<Vec<CatalogItem>, DomainError> {
        let rows = catalog_items::table
            .order(catalog_items::name.asc())
            .select(CatalogItemRow::as_select())
            .load(self.conn)?;

        rows.into_iter().map(CatalogItemRow::into_domain).collect()
    }

    fn insert_order(
        &mut self,
        customer: &str,
        item_ids: &[i64],
        external_ref: Option<&str>,
    ) -> Result<Order, DomainError> {
        let now = Utc::now();
        let row: OrderRow = diesel::insert_into(orders::table)
            .values(&NewOrderRow {
                customer: customer.to_string(),
                state: OrderState::Init.as_str().to_string(),
                external_ref: external_ref.map(str::to_string),
                create_time: now,
                update_time: now,
            })
            .returning(OrderRow::as_returning())
            .get_result(self.conn)?;

        let links: Vec<NewOrderItemRow> = item_ids
            .iter()
            .enumerate()
            .map(|(i, &catalog_item_id)| NewOrderItemRow {
                order_id: row.id,
                catalog_item_id,
                seq_no: i as i32,
            })
            .collect();
        diesel::insert_into(order_items::table)
            .values(&links)
            .execute(self.conn)?;

        self.hydrate(row)
    }

    fn order_by_external_ref(&mut self, external_ref: &str) -> Result<Option<Order>, DomainError> {
        let row = orders::table
            .filter(orders::external_ref.eq(external_ref))
            .select(OrderRow::as_select())
            .first(self.conn)
            .optional()?;

        row.map(|row| self.hydrate(row)).transpose()
    }

    fn order_by_id(&mut self, id: i64) -> Result<Option<Order>, DomainError> {
        let row = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(self.conn)
            .optional()?;

        row.map(|row| self.hydrate(row)).transpose()
    }

    fn update_order_state(&mut self, id: i64, state: OrderState) -> Result<Order, DomainError> {
        let row: Option<OrderRow> = diesel::update(orders::table.find(id))
            .set((
                orders::state.eq(state.as_str()),
                orders::update_time.eq(Utc::now()),
            ))
            .returning(OrderRow::as_returning())
            .get_result(self.conn)
            .optional()?;

        let row = row.ok_or_else(|| DomainError::NotFound(format!("order {id}")))?;
        self.hydrate(row)
    }

    fn top_orders_by_recency(&mut self, n: i64) -> Result<Vec<Order>, DomainError> {
        let rows = orders::table
            .order((orders::update_time.desc(), orders::id.asc()))
            .limit(n)
            .select(OrderRow::as_select())
            .load(self.conn)?;

        self.hydrate_all(rows)
    }

    fn orders_by_customer(&mut self, customer: &str) -> Result<Vec<Order>, DomainError> {
        let rows = orders::table
            .filter(orders::customer.eq(customer))
            .order(orders::id.asc())
            .select(OrderRow::as_select())
            .load(self.conn)?;

        self.hydrate_all(rows)
    }

    fn orders_by_item_name(&mut self, name: &str) -> Result<Vec<Order>, DomainError> {
        // Distinct order ids first, so an order with several matching items
        // still appears exactly once.
        let ids: Vec<i64> = order_items::table
            .inner_join(catalog_items::table)
            .filter(catalog_items::name.eq(name))
            .select(order_items::order_id)
            .distinct()
            .load(self.conn)?;

        let rows = orders::table
            .filter(orders::id.eq_any(ids))
            .order(orders::id.asc())
            .select(OrderRow::as_select())
            .load(self.conn)?;

        self.hydrate_all(rows)
    }
}
