//! Helpers for partial-update request bodies.

use serde::{Deserialize, Deserializer};

/// Deserializes a present field into `Some(value)`, where `value` may itself
/// be `None` for an explicit JSON `null`.
///
/// Combined with `#[serde(default)]` this yields three states:
/// absent (`None`), cleared (`Some(None)`) and set (`Some(Some(v))`).
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims `value` and rejects it when nothing is left.
pub fn required_text(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(trimmed.to_string())
}
