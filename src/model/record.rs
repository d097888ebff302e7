use crate::model::Value;
use crate::Result;
use anyhow::bail;
use std::collections::BTreeMap;

/// One Sale Record: a flattened mapping from column name to `Value`.
///
/// Nested objects are flattened into dotted column names, so `{"customer": {"name": "Ann"}}`
/// becomes the column `customer.name`. Arrays are never flattened; `payments` keeps its original
/// sequence of mappings.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Builds a record from one element of the downloaded JSON array. `row` is only used to
    /// describe the failure when the element is not an object.
    pub fn from_json(row: usize, json: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = json else {
            bail!("Record {row} is not a JSON object");
        };
        let mut fields = BTreeMap::new();
        for (key, value) in map {
            flatten_into(&mut fields, key, Value::from_json(value));
        }
        Ok(Self { fields })
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    /// Overwrites (or adds) a column.
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.fields.insert(column.into(), value);
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

fn flatten_into(fields: &mut BTreeMap<String, Value>, prefix: String, value: Value) {
    match value {
        Value::Map(map) if !map.is_empty() => {
            for (key, inner) in map {
                flatten_into(fields, format!("{prefix}.{key}"), inner);
            }
        }
        other => {
            fields.insert(prefix, other);
        }
    }
}

/// Parses a downloaded document into records. The top level must be a JSON array of objects.
pub fn parse_records(json: serde_json::Value) -> Result<Vec<Record>> {
    let serde_json::Value::Array(items) = json else {
        bail!("Expected the sales document to be a JSON array of records");
    };
    items
        .into_iter()
        .enumerate()
        .map(|(row, item)| Record::from_json(row, item))
        .collect()
}
