//! Input and update types for entity mutations.
//!
//! Update structs have `Option` fields; only `Some` fields generate SET clauses
//! in the dynamic UPDATE SQL. Nullable columns use `Option<Option<T>>` so a
//! caller can distinguish "leave unchanged" from "clear".

pub mod item;

use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including `null`) as `Some(..)`.
///
/// Paired with `#[serde(default)]`, a missing field stays `None`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
