//! The persisted form of a [`StateStore`](super::StateStore): a flat JSON
//! object mapping parameter name to a boolean, number or string. There is no
//! version tag; missing keys fall back to control defaults.

use indexmap::IndexMap;
use serde_json::Value;

use super::store::Overrides;
use crate::control::ControlValue;
use crate::core::prelude::*;

pub fn serialize_overrides(
    overrides: &Overrides,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(overrides)
}

/// Never fails. Malformed JSON yields an empty map; entries that are not
/// scalars (including the `null` a NaN number serializes to) are dropped so
/// they read through to defaults.
pub fn deserialize_overrides(json: &str) -> Overrides {
    let raw: IndexMap<String, Value> = match serde_json::from_str(json) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("Discarding malformed persisted state: {}", err);
            return Overrides::default();
        }
    };

    raw.into_iter()
        .filter_map(|(name, value)| {
            let value = match value {
                Value::Bool(b) => ControlValue::Bool(b),
                Value::Number(n) => ControlValue::Float(n.as_f64()? as f32),
                Value::String(s) => ControlValue::String(s),
                other => {
                    warn!(
                        "Dropping persisted `{}`: unsupported {}",
                        name, other
                    );
                    return None;
                }
            };
            Some((name, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> Overrides {
        let mut overrides = Overrides::default();
        overrides.insert("thickness".into(), ControlValue::Float(7.0));
        overrides.insert("gap".into(), ControlValue::Float(-12.5));
        overrides.insert("sharp".into(), ControlValue::Bool(false));
        overrides.insert("colour".into(), ControlValue::from("#ff00aa"));
        overrides.insert("aspect ratio".into(), ControlValue::from("4:3"));
        overrides
    }

    #[test]
    fn test_round_trip() {
        let json = serialize_overrides(&overrides()).unwrap();
        assert_eq!(deserialize_overrides(&json), overrides());
    }

    #[test]
    fn test_flat_object_format() {
        let mut overrides = Overrides::default();
        overrides.insert("zoom".into(), ControlValue::Float(2.0));
        overrides.insert("sharp".into(), ControlValue::Bool(true));

        assert_eq!(
            serialize_overrides(&overrides).unwrap(),
            r#"{"zoom":2.0,"sharp":true}"#
        );
    }

    #[test]
    fn test_malformed_yields_empty() {
        assert!(deserialize_overrides("{").is_empty());
        assert!(deserialize_overrides("[1, 2]").is_empty());
        assert!(deserialize_overrides("null").is_empty());
    }

    #[test]
    fn test_non_scalar_entries_are_dropped() {
        let loaded = deserialize_overrides(
            r#"{"gap": null, "length": [1], "zoom": 3, "x": {"y": 1}}"#,
        );
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["zoom"], ControlValue::Float(3.0));
    }

    #[test]
    fn test_nan_is_dropped_on_reload() {
        let mut overrides = Overrides::default();
        overrides.insert("gap".into(), ControlValue::Float(f32::NAN));

        let json = serialize_overrides(&overrides).unwrap();
        assert_eq!(json, r#"{"gap":null}"#);
        assert!(deserialize_overrides(&json).is_empty());
    }
}
