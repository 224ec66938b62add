//! Boundary decoding for contribution sub-fields
//!
//! The data layer hands over `pricing_matrix`, `msa_structure` and
//! `threshold_structure` either as native JSON or as JSON text. Everything
//! past this module sees plain `Value`s, and numeric leaves are read leniently.

use crate::notice::EngineNotice;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a sub-field that may be JSON text, returning `None` when absent or malformed
pub(crate) fn decode_field(
    field: &str,
    raw: &Value,
    notices: &mut Vec<EngineNotice>,
) -> Option<Value> {
    match raw {
        Value::Null => None,
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Null) => None,
            Ok(decoded) => Some(decoded),
            Err(err) => {
                log::warn!("{} is not valid JSON ({}), treating as absent", field, err);
                notices.push(EngineNotice::MalformedEncoding {
                    field: field.to_string(),
                });
                None
            }
        },
        other => Some(other.clone()),
    }
}

/// Read a JSON leaf as a finite number; numeric strings count, anything else does not
pub(crate) fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Serde adapter: optional numeric field, non-numeric values become `None`
pub(crate) fn lenient_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_number))
}

/// Serde adapter: numeric field coerced to 0 when missing or non-numeric
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_option(deserializer)?.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_native_and_encoded() {
        let mut notices = Vec::new();

        let native = json!({"main": 2000});
        assert_eq!(decode_field("pricing_matrix", &native, &mut notices), Some(native.clone()));

        let encoded = Value::String(r#"{"main": 2000}"#.to_string());
        assert_eq!(decode_field("pricing_matrix", &encoded, &mut notices), Some(native));

        assert!(notices.is_empty());
    }

    #[test]
    fn test_decode_absent_and_malformed() {
        let mut notices = Vec::new();

        assert_eq!(decode_field("msa_structure", &Value::Null, &mut notices), None);
        assert_eq!(
            decode_field("msa_structure", &Value::String("null".to_string()), &mut notices),
            None
        );
        assert!(notices.is_empty());

        let broken = Value::String("{main: 2000".to_string());
        assert_eq!(decode_field("threshold_structure", &broken, &mut notices), None);
        assert_eq!(
            notices,
            vec![EngineNotice::MalformedEncoding {
                field: "threshold_structure".to_string()
            }]
        );
    }

    #[test]
    fn test_lenient_number() {
        assert_eq!(lenient_number(&json!(450)), Some(450.0));
        assert_eq!(lenient_number(&json!(" 1200.5 ")), Some(1200.5));
        assert_eq!(lenient_number(&json!("R450")), None);
        assert_eq!(lenient_number(&json!(true)), None);
        assert_eq!(lenient_number(&json!("NaN")), None);
        assert_eq!(lenient_number(&Value::Null), None);
    }
}
