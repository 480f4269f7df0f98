//! Cross-resource use cases composed from two or three repositories.
//!
//! Paginated joins run the link query first and then fetch the referenced
//! rows, keeping the link page's counters. Multi-row creates run in one
//! transaction so a failed second insert rolls back the first.

pub mod accounts;
pub mod entities;

pub use accounts::{AccountEntity, AccountOrchestrator};
pub use entities::{CreatedChild, CreatedEntity, EntityOrchestrator, NewEntityAccount};

use std::collections::HashMap;

use uuid::Uuid;

use crate::audit::Audited;

/// Orders fetched rows by the link keys that referenced them.
///
/// A key whose row is gone (soft-deleted since it was linked) is skipped.
fn stitch<E: Audited>(keys: &[Uuid], rows: Vec<E::Model>) -> Vec<E::Model> {
    let mut by_uuid: HashMap<Uuid, E::Model> =
        rows.into_iter().map(|row| (E::uuid_of(&row), row)).collect();
    keys.iter().filter_map(|key| by_uuid.remove(key)).collect()
}
