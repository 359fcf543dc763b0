use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub schema: Vec<ColumnInfo>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(schema: Vec<ColumnInfo>, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: Vec<ColumnInfo>) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// One column, one row: the shape of EXISTS, CHECK and SHOW CREATE.
    pub fn single(name: &str, data_type: &str, value: Value) -> Self {
        Self::new(vec![ColumnInfo::new(name, data_type)], vec![vec![value]])
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn get_by_name(&self, row: usize, col_name: &str) -> Option<&Value> {
        let col_idx = self.schema.iter().position(|c| c.name == col_name)?;
        self.get(row, col_idx)
    }

    pub fn first_row(&self) -> Option<&Vec<Value>> {
        self.rows.first()
    }

    pub fn first_value(&self) -> Option<&Value> {
        self.rows.first().and_then(|r| r.first())
    }

    pub fn to_json_rows(&self) -> Vec<Vec<JsonValue>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_json()).collect())
            .collect()
    }

    /// Shape of the `JSON` output format: `meta`, `data` and `rows`.
    pub fn to_json(&self) -> JsonValue {
        let data: Vec<JsonValue> = self
            .rows
            .iter()
            .map(|row| {
                let object: serde_json::Map<String, JsonValue> = self
                    .schema
                    .iter()
                    .zip(row.iter())
                    .map(|(col, v)| (col.name.clone(), v.to_json()))
                    .collect();
                JsonValue::Object(object)
            })
            .collect();

        serde_json::json!({
            "meta": self.schema,
            "data": data,
            "rows": self.rows.len()
        })
    }
}
