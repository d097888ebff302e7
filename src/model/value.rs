use crate::model::Amount;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt;

/// A single field of a Sale Record. The upstream feed has no fixed schema, so fields are held in
/// this small tagged union rather than in a fixed struct.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    /// Kept as the JSON number. Only the fields that are summed need to fit an `Amount`.
    Number(serde_json::Number),
    Text(String),
    /// Produced by the normalizer when it parses `date_closed`. JSON never yields this variant.
    Timestamp(NaiveDateTime),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Converts a JSON value, keeping nested objects and arrays intact.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// `None` for anything that is not a number, and for numbers that do not fit an `Amount`.
    pub fn as_amount(&self) -> Option<Amount> {
        match self {
            Value::Number(n) => Amount::from_json(n).ok(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// A grouping label. Text is used as-is; numbers and booleans are rendered as text.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Number(_) | Value::Bool(_) => Some(self.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => match Amount::from_json(n) {
                Ok(a) => write!(f, "{a}"),
                Err(_) => write!(f, "{n}"),
            },
            Value::Text(s) => write!(f, "{s}"),
            Value::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Value::List(items) => write!(f, "[{} items]", items.len()),
            Value::Map(map) => write!(f, "{{{} fields}}", map.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_nested() {
        let value = Value::from_json(json!({
            "payments": [{"amount": 60}, {"method": "cash"}],
            "zone": "A",
            "open": true,
            "note": null
        }));

        let map = value.as_map().unwrap();
        assert_eq!(map["zone"], Value::Text("A".into()));
        assert_eq!(map["open"], Value::Bool(true));
        assert!(map["note"].is_null());

        let payments = map["payments"].as_list().unwrap();
        assert_eq!(payments.len(), 2);
        let first = payments[0].as_map().unwrap();
        assert_eq!(first["amount"].as_amount(), Some(Amount::from(60)));
    }

    #[test]
    fn test_numbers_outside_decimal_range_are_kept() {
        let huge = Value::from_json(json!(1e300));
        assert_eq!(huge.as_amount(), None);
        assert_eq!(huge.to_string(), "1e300");

        let tiny = Value::from_json(json!(1.5e-30));
        assert_eq!(tiny.as_amount(), None);
    }

    #[test]
    fn test_as_label() {
        assert_eq!(Value::Text("B".into()).as_label().as_deref(), Some("B"));
        assert_eq!(Value::from_json(json!(3)).as_label().as_deref(), Some("3"));
        assert_eq!(Value::from_json(json!(2.50)).as_label().as_deref(), Some("2.5"));
        assert_eq!(Value::Null.as_label(), None);
        assert_eq!(Value::List(vec![]).as_label(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Text("x".into()).to_string(), "x");
        assert_eq!(Value::List(vec![Value::Null]).to_string(), "[1 items]");
    }
}
