//! In-memory [`OrderStore`] used by the application-layer unit tests.
//!
//! Transactions are modelled as copy-on-begin: the closure works on a clone
//! of the state which replaces the shared state only on `Ok`, so rollback
//! semantics match the real store.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::errors::DomainError;
use crate::domain::order::{CatalogItem, Order, OrderState, Price};
use crate::domain::ports::{OrderStore, StoreTx};

#[derive(Debug, Clone)]
struct MemOrder {
    id: i64,
    customer: String,
    item_ids: Vec<i64>,
    state: OrderState,
    external_ref: Option<String>,
    create_time: DateTime<Utc>,
    update_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct MemState {
    catalog: Vec<CatalogItem>,
    orders: Vec<MemOrder>,
    next_catalog_id: i64,
    next_order_id: i64,
}

#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Mutex<MemState>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collapse every order's `update_time` to one instant so tests can
    /// exercise the ascending-id tie-break of the recency query.
    pub fn freeze_update_times(&self, at: DateTime<Utc>) {
        let mut state = self.inner.lock().unwrap();
        for order in &mut state.orders {
            order.update_time = at;
        }
    }
}

impl OrderStore for MemStore {
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreTx) -> Result<T, DomainError>,
    {
        let mut guard = self.inner.lock().unwrap();
        let mut work = guard.clone();
        match f(&mut MemTx { state: &mut work }) {
            Ok(value) => {
                *guard = work;
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }
}

struct MemTx<'a> {
    state: &'a mut MemState,
}

impl MemTx<'_> {
    fn resolve_items(&self, order: &MemOrder) -> Result<Vec<CatalogItem>, DomainError> {
        order
            .item_ids
            .iter()
            .map(|id| {
                self.state
                    .catalog
                    .iter()
                    .find(|c| c.id == *id)
                    .cloned()
                    .ok_or_else(|| {
                        DomainError::Storage(format!(
                            "order {} references missing catalog item {id}",
                            order.id
                        ))
                    })
            })
            .collect()
    }

    fn to_order(&self, mem: &MemOrder) -> Result<Order, DomainError> {
        Ok(Order {
            id: mem.id,
            customer: mem.customer.clone(),
            items: self.resolve_items(mem)?,
            state: mem.state,
            external_ref: mem.external_ref.clone(),
            create_time: mem.create_time,
            update_time: mem.update_time,
        })
    }

    fn item_name(&self, id: i64) -> Option<&str> {
        self.state
            .catalog
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}

impl StoreTx for MemTx<'_> {
    fn insert_catalog_item(
        &mut self,
        name: &str,
        price: &Price,
    ) -> Result<CatalogItem, DomainError> {
        if self.state.catalog.iter().any(|c| c.name == name) {
            return Err(DomainError::DuplicateName(name.to_string()));
        }
        self.state.next_catalog_id += 1;
        let now = Utc::now();
        let item = CatalogItem {
            id: self.state.next_catalog_id,
            name: name.to_string(),
            price: price.clone(),
            create_time: now,
            update_time: now,
        };
        self.state.catalog.push(item.clone());
        Ok(item)
    }

    fn upsert_catalog_item(
        &mut self,
        name: &str,
        price: &Price,
    ) -> Result<CatalogItem, DomainError> {
        if let Some(existing) = self.state.catalog.iter_mut().find(|c| c.name == name) {
            existing.price = price.clone();
            existing.update_time = Utc::now();
            return Ok(existing.clone());
        }
        self.insert_catalog_item(name, price)
    }

    fn catalog_item_by_name(&mut self, name: &str) -> Result<Option<CatalogItem>, DomainError> {
        Ok(self.state.catalog.iter().find(|c| c.name == name).cloned())
    }

    fn catalog_sorted_by_name(&mut self) -> Result<Vec<CatalogItem>, DomainError> {
        let mut items = self.state.catalog.clone();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }

    fn insert_order(
        &mut self,
        customer: &str,
        item_ids: &[i64],
        external_ref: Option<&str>,
    ) -> Result<Order, DomainError> {
        self.state.next_order_id += 1;
        let now = Utc::now();
        let mem = MemOrder {
            id: self.state.next_order_id,
            customer: customer.to_string(),
            item_ids: item_ids.to_vec(),
            state: OrderState::Init,
            external_ref: external_ref.map(str::to_string),
            create_time: now,
            update_time: now,
        };
        let order = self.to_order(&mem)?;
        self.state.orders.push(mem);
        Ok(order)
    }

    fn order_by_external_ref(&mut self, external_ref: &str) -> Result<Option<Order>, DomainError> {
        self.state
            .orders
            .iter()
            .find(|o| o.external_ref.as_deref() == Some(external_ref))
            .cloned()
            .map(|mem| self.to_order(&mem))
            .transpose()
    }

    fn order_by_id(&mut self, id: i64) -> Result<Option<Order>, DomainError> {
        self.state
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .map(|mem| self.to_order(&mem))
            .transpose()
    }

    fn update_order_state(&mut self, id: i64, state: OrderState) -> Result<Order, DomainError> {
        let mem = self
            .state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DomainError::NotFound(format!("order {id}")))?;
        mem.state = state;
        mem.update_time = Utc::now();
        let mem = mem.clone();
        self.to_order(&mem)
    }

    fn top_orders_by_recency(&mut self, n: i64) -> Result<Vec<Order>, DomainError> {
        let mut mems: Vec<MemOrder> = self.state.orders.clone();
        mems.sort_by(|a, b| b.update_time.cmp(&a.update_time).then(a.id.cmp(&b.id)));
        mems.truncate(n.max(0) as usize);
        mems.iter().map(|mem| self.to_order(mem)).collect()
    }

    fn orders_by_customer(&mut self, customer: &str) -> Result<Vec<Order>, DomainError> {
        let mut mems: Vec<MemOrder> = self
            .state
            .orders
            .iter()
            .filter(|o| o.customer == customer)
            .cloned()
            .collect();
        mems.sort_by_key(|o| o.id);
        mems.iter().map(|mem| self.to_order(mem)).collect()
    }

    fn orders_by_item_name(&mut self, name: &str) -> Result<Vec<Order>, DomainError> {
        let mut mems: Vec<MemOrder> = self
            .state
            .orders
            .iter()
            .filter(|o| {
                o.item_ids
                    .iter()
                    .any(|&id| self.item_name(id) == Some(name))
            })
            .cloned()
            .collect();
        mems.sort_by_key(|o| o.id);
        mems.iter().map(|mem| self.to_order(mem)).collect()
    }
}
