//! Implements the `Source` trait using in-memory JSON.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! pipeline, top-to-bottom, without downloading anything.

use crate::api::Source;
use crate::model::{parse_records, Record};
use crate::Result;
use anyhow::Context;

/// A `Source` that parses a JSON document held in memory. By default it is seeded with a small
/// sales dataset.
pub struct SeedSource {
    json: String,
}

impl SeedSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl Default for SeedSource {
    fn default() -> Self {
        Self::new(SEED_DATA)
    }
}

#[async_trait::async_trait]
impl Source for SeedSource {
    async fn fetch(&mut self) -> Result<Vec<Record>> {
        let json: serde_json::Value =
            serde_json::from_str(&self.json).context("Seed data is not valid JSON")?;
        parse_records(json)
    }
}

/// Seed sales data.
pub(crate) const SEED_DATA: &str = r##"[
  {"id": 1, "date_opened": "2019-01-01T12:10:00", "date_closed": "2019-01-01T13:40:00", "table": 4, "zone": "Terraza", "waiter": "Pedro", "cashier": "Ana", "diners": 2, "total": 45.5, "products": [{"name": "Pizza", "quantity": 1, "price": 30}, {"name": "Cerveza", "quantity": 2, "price": 7.75}], "payments": [{"type": "Efectivo", "amount": 45.5}]},
  {"id": 2, "date_opened": "2019-01-01T19:00:00", "date_closed": "2019-01-01T21:15:00", "table": 9, "zone": "Salón", "waiter": "María", "cashier": "Ana", "diners": 4, "total": 120, "products": [{"name": "Parrillada", "quantity": 1, "price": 120}], "payments": [{"type": "Tarjeta", "amount": 100}, {"type": "Efectivo", "amount": 20}]},
  {"id": 3, "date_opened": "2019-01-02T13:05:00", "date_closed": "2019-01-02T14:00:00", "table": 2, "zone": "Terraza", "waiter": "Pedro", "cashier": "Luis", "diners": 1, "total": 18.25, "products": [{"name": "Ensalada", "quantity": 1, "price": 18.25}], "payments": [{"type": "Efectivo", "amount": 18}]},
  {"id": 4, "date_opened": "2019-01-15T20:30:00", "date_closed": "2019-01-15T22:45:00", "table": 11, "zone": "Salón", "waiter": "Pedro", "cashier": "Luis", "diners": 3, "total": 76.8, "products": [{"name": "Pasta", "quantity": 3, "price": 25.6}], "payments": [{"type": "Tarjeta", "amount": 76.8}]},
  {"id": 5, "date_opened": "2019-02-03T14:00:00", "date_closed": "2019-02-03T15:30:00", "table": 1, "zone": "Barra", "waiter": "Juan", "cashier": "Ana", "diners": 2, "total": 32, "products": [{"name": "Tapas", "quantity": 4, "price": 8}], "payments": []},
  {"id": 6, "date_opened": "2019-02-03T20:10:00", "date_closed": "2019-02-03T22:00:00", "table": 9, "zone": "Salón", "waiter": "María", "cashier": "Luis", "diners": 6, "total": 210.4, "products": [{"name": "Parrillada", "quantity": 1, "price": 180}, {"name": "Vino", "quantity": 1, "price": 30.4}], "payments": [{"type": "Tarjeta", "amount": 110.4}, {"type": "Tarjeta"}, {"type": "Efectivo", "amount": 100}]},
  {"id": 7, "date_opened": "2019-02-14T21:00:00", "date_closed": "2019-02-14T23:20:00", "table": 5, "zone": "Terraza", "waiter": "María", "cashier": "Ana", "diners": 2, "total": 95, "products": [{"name": "Menú degustación", "quantity": 2, "price": 47.5}], "payments": [{"type": "Efectivo", "amount": 95}]},
  {"id": 8, "date_opened": "2019-03-01T12:45:00", "date_closed": "2019-03-01T13:30:00", "table": 1, "zone": "Barra", "waiter": "Juan", "cashier": "Luis", "diners": 1, "total": 12.5, "products": [{"name": "Café", "quantity": 2, "price": 6.25}], "payments": [{"type": "Efectivo", "amount": 12.5}]}
]"##;
