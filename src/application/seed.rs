use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::order::Price;
use crate::domain::ports::{OrderStore, StoreTx};

/// Idempotency keys for the two demo orders. Seeding skips any order whose
/// key is already present, so reruns insert nothing.
const ORDER_REF_ESPRESSO: &str = "demo-order-espresso";
const ORDER_REF_ESPRESSO_LATTE: &str = "demo-order-espresso-latte";

/// Populates the store with the fixed demo dataset: two catalog items
/// (`latte`, `espresso`) and two orders for "Zhang San".
///
/// The whole seed runs inside one store transaction. Catalog items are
/// upserted by name and orders are keyed by a fixed external reference, so
/// running the seed N times leaves exactly the same rows as running it
/// once. Any storage error rolls the entire seed back.
pub struct SeedRunner<S> {
    store: S,
}

impl<S: OrderStore> SeedRunner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn run(&self) -> Result<(), DomainError> {
        self.store.transaction(|tx| {
            let latte = tx.upsert_catalog_item("latte", &demo_price("30.00")?)?;
            log::info!("seeded coffee: {latte}");

            let espresso = tx.upsert_catalog_item("espresso", &demo_price("20.00")?)?;
            log::info!("seeded coffee: {espresso}");

            seed_order(tx, "Zhang San", &[espresso.id], ORDER_REF_ESPRESSO)?;
            seed_order(
                tx,
                "Zhang San",
                &[espresso.id, latte.id],
                ORDER_REF_ESPRESSO_LATTE,
            )?;

            Ok(())
        })
    }
}

fn seed_order(
    tx: &mut dyn StoreTx,
    customer: &str,
    item_ids: &[i64],
    external_ref: &str,
) -> Result<(), DomainError> {
    if tx.order_by_external_ref(external_ref)?.is_some() {
        log::debug!("order '{external_ref}' already seeded, skipping");
        return Ok(());
    }
    let order = tx.insert_order(customer, item_ids, Some(external_ref))?;
    log::info!("seeded order {} for {}", order.id, order.customer);
    Ok(())
}

fn demo_price(amount: &str) -> Result<Price, DomainError> {
    let amount = BigDecimal::from_str(amount)
        .map_err(|e| DomainError::InvalidInput(format!("invalid amount '{amount}': {e}")))?;
    Price::new(amount, "CNY")
}
