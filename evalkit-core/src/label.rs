//! Class identifiers shared by predictions and references.
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A class identifier.
///
/// Labels are either integers or strings. JSON numbers that are integral (`1`, `1.0`) become
/// [`Label::Integer`] so that a pipeline emitting `1.0` compares equal to a reference of `1`.
/// Booleans map to `0` and `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "Value")]
pub enum Label {
    Integer(i64),
    Text(String),
}

impl Label {
    /// Parses a label from a JSON value, returning `None` for values that cannot identify a
    /// class (nulls, arrays, objects and non-integral floats).
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn from_value(value: &Value) -> Option<Label> {
        match value {
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    return Some(Label::Integer(int));
                }

                let float = number.as_f64()?;
                if float.fract() == 0.0 && float >= i64::MIN as f64 && float <= i64::MAX as f64 {
                    Some(Label::Integer(float as i64))
                } else {
                    None
                }
            }
            Value::Bool(flag) => Some(Label::Integer(i64::from(*flag))),
            Value::String(text) => Some(Label::Text(text.clone())),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Label::Integer(int) => Some(*int),
            Label::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Label::Text(text) => Some(text),
            Label::Integer(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Integer(int) => write!(f, "{int}"),
            Label::Text(text) => f.write_str(text),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Label::Integer(int) => serializer.serialize_i64(*int),
            Label::Text(text) => serializer.serialize_str(text),
        }
    }
}

impl TryFrom<Value> for Label {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Label::from_value(&value).ok_or_else(|| format!("{value} is not a valid label"))
    }
}

impl From<i64> for Label {
    fn from(value: i64) -> Self {
        Label::Integer(value)
    }
}

impl From<i32> for Label {
    fn from(value: i32) -> Self {
        Label::Integer(i64::from(value))
    }
}

impl From<bool> for Label {
    fn from(value: bool) -> Self {
        Label::Integer(i64::from(value))
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Text(value.to_string())
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label::Text(value)
    }
}

impl From<Label> for Value {
    fn from(label: Label) -> Self {
        match label {
            Label::Integer(int) => Value::from(int),
            Label::Text(text) => Value::from(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!(1), Some(Label::Integer(1)); "integer")]
    #[test_case(json!(1.0), Some(Label::Integer(1)); "integral float")]
    #[test_case(json!(-3), Some(Label::Integer(-3)); "negative")]
    #[test_case(json!(true), Some(Label::Integer(1)); "boolean")]
    #[test_case(json!("POSITIVE"), Some(Label::Text("POSITIVE".into())); "text")]
    #[test_case(json!(0.5), None; "fractional float")]
    #[test_case(json!(null), None; "null")]
    #[test_case(json!([1]), None; "array")]
    #[test_case(json!({"label": 1}), None; "object")]
    fn test_from_value(value: Value, expected: Option<Label>) {
        assert_eq!(Label::from_value(&value), expected);
    }

    #[test]
    fn test_deserialize_mapping_values() {
        let mapping: std::collections::BTreeMap<String, Label> =
            serde_json::from_value(json!({"NEGATIVE": 0.0, "POSITIVE": 1.0, "NEUTRAL": "n"}))
                .unwrap();

        assert_eq!(mapping["NEGATIVE"], Label::Integer(0));
        assert_eq!(mapping["POSITIVE"], Label::Integer(1));
        assert_eq!(mapping["NEUTRAL"], Label::Text("n".into()));
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let result: Result<Label, _> = serde_json::from_value(json!(0.25));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_untagged() {
        assert_eq!(serde_json::to_value(Label::Integer(2)).unwrap(), json!(2));
        assert_eq!(
            serde_json::to_value(Label::from("yurt")).unwrap(),
            json!("yurt")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Label::Integer(7).to_string(), "7");
        assert_eq!(Label::from("LABEL_1").to_string(), "LABEL_1");
    }
}
