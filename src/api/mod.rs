pub mod alerts;
pub mod auth;
pub mod education;
pub mod error;
pub mod marks;
pub mod middleware;
pub mod profile;
pub mod schools;
pub mod students;

pub use error::{ApiError, ApiResult};
pub use middleware::CurrentUser;

use serde::{Deserialize, Deserializer};

/// Lets `Option<Option<T>>` tell an absent field (`None`) apart from an
/// explicit `null` (`Some(None)`). Pair with `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Trimmed value of a text field, `None` when absent or blank.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query-string id that treats an empty value as absent.
pub(crate) fn optional_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match non_blank(Option::<String>::deserialize(deserializer)?) {
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Query-string flag; only the literal `true` switches it on.
pub(crate) fn true_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(String::deserialize(deserializer)? == "true")
}
