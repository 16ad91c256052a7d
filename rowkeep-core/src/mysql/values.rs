//! Conversions between rowkeep values and the MySQL driver.

use crate::executor::Row;
use crate::sql::SqlValue;
use base64::Engine;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySql, MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Row as _, TypeInfo};

/// Binds `value` as the next positional parameter.
pub(super) fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q SqlValue,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::UInt(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.as_str()),
        SqlValue::Bytes(v) => query.bind(v.as_slice()),
    }
}

/// Converts a result row to a column-name to JSON map in select-list order.
pub(super) fn row_to_json(row: &MySqlRow) -> Row {
    let mut map = Row::new();
    for column in row.columns() {
        let value = extract_column_value(row, column.ordinal(), column.type_info().name());
        map.insert(column.name().to_string(), value);
    }
    map
}

/// Extracts a column value as JSON, trying the likeliest types first.
///
/// DECIMAL, JSON and text columns with a binary collation have no checked
/// `String` mapping in the driver but arrive as text on both protocols, so
/// they are read unchecked. Only bytes that are not UTF-8 fall through to
/// base64.
fn extract_column_value(row: &MySqlRow, index: usize, type_name: &str) -> JsonValue {
    if let Ok(v) = row.try_get::<Option<String>, _>(index) {
        return v.map_or(JsonValue::Null, JsonValue::String);
    }
    if let Ok(v) = row.try_get::<Option<i64>, _>(index) {
        return v.map_or(JsonValue::Null, |n| JsonValue::Number(n.into()));
    }
    if let Ok(v) = row.try_get::<Option<u64>, _>(index) {
        return v.map_or(JsonValue::Null, |n| JsonValue::Number(n.into()));
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(index) {
        return v
            .and_then(serde_json::Number::from_f64)
            .map_or(JsonValue::Null, JsonValue::Number);
    }
    if let Ok(v) = row.try_get::<Option<bool>, _>(index) {
        return v.map_or(JsonValue::Null, JsonValue::Bool);
    }
    if let Ok(v) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index) {
        return v.map_or(JsonValue::Null, |ts| JsonValue::String(ts.to_rfc3339()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDateTime>, _>(index) {
        return v.map_or(JsonValue::Null, |ts| JsonValue::String(ts.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveDate>, _>(index) {
        return v.map_or(JsonValue::Null, |d| JsonValue::String(d.to_string()));
    }
    if let Ok(v) = row.try_get::<Option<chrono::NaiveTime>, _>(index) {
        return v.map_or(JsonValue::Null, |t| JsonValue::String(t.to_string()));
    }
    if let Ok(v) = row.try_get_unchecked::<Option<String>, _>(index) {
        return v.map_or(JsonValue::Null, |text| text_value(type_name, text));
    }
    if let Ok(v) = row.try_get::<Option<Vec<u8>>, _>(index) {
        return v.map_or(JsonValue::Null, |bytes| {
            JsonValue::String(base64::engine::general_purpose::STANDARD.encode(bytes))
        });
    }

    // Default to null for unsupported types
    JsonValue::Null
}

/// JSON columns are returned as the document they hold; everything else
/// read as text stays a string.
fn text_value(type_name: &str, text: String) -> JsonValue {
    if type_name.eq_ignore_ascii_case("JSON") {
        if let Ok(document) = serde_json::from_str(&text) {
            return document;
        }
    }
    JsonValue::String(text)
}
