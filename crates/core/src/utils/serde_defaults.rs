//! Deserialization helpers for loosely-typed upstream payloads.

use serde::{Deserialize, Deserializer};

/// Deserialize a field that may be `null`, falling back to `T::default()`.
///
/// Pair with `#[serde(default)]` so a missing field behaves the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Tagged {
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    #[test]
    fn null_missing_and_present_values() {
        let null: Tagged = serde_json::from_str(r#"{"tags":null}"#).unwrap();
        assert!(null.tags.is_empty());

        let missing: Tagged = serde_json::from_str("{}").unwrap();
        assert!(missing.tags.is_empty());

        let present: Tagged = serde_json::from_str(r#"{"tags":["vip"]}"#).unwrap();
        assert_eq!(present.tags, vec!["vip".to_string()]);
    }
}
