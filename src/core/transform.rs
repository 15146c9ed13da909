use crate::domain::model::{RawRecord, Row};
use serde_json::Value;

/// Flattens one upstream record into a table row. Never fails: missing or
/// oddly typed fields come out as empty strings.
pub fn to_row(record: &RawRecord) -> Row {
    Row {
        deployment_name: text_field(record.get(RawRecord::DEPLOYMENT_NAME)),
        namespace: text_field(record.get(RawRecord::NAMESPACE)),
        main_container_images: text_field(record.get(RawRecord::MAIN_CONTAINER_IMAGES)),
        side_container_images: text_field(record.get(RawRecord::INIT_CONTAINER_IMAGES)),
    }
}

pub fn to_rows(records: &[RawRecord]) -> Vec<Row> {
    records.iter().map(to_row).collect()
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(list_item)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

fn list_item(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
