//! Serde helpers for patch payloads

use serde::{Deserialize, Deserializer};

/// Keep an explicit `null` apart from a missing field
///
/// Use with `#[serde(default, deserialize_with = "...")]`: a missing key
/// stays `None`, `null` becomes `Some(None)` and a value `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
