//! Mock database fixtures shared by repository tests.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
use uuid::Uuid;

/// Session user stamped into actor columns.
pub const ACTOR: Uuid = Uuid::from_u128(0xA1);

/// Fixed creation timestamp for fixture rows.
pub fn stamp() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .unwrap()
        .fixed_offset()
}

/// Row returned by a `COUNT(*)` query.
pub fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}

/// Postgres-flavoured mock.
pub fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Every statement the connection ran, rendered for substring checks.
pub fn sql_log(db: DatabaseConnection) -> String {
    format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"")
}
