//! Small helpers shared by the record-normalizing services.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;

use quarterbook_airtable::Record;

use crate::errors::{ReportError, Result};

/// Deserialize a record's raw field map into a typed per-table shape.
pub(crate) fn parse_fields<T: DeserializeOwned>(record: &Record) -> Result<T> {
    serde_json::from_value(Value::Object(record.fields.clone()))
        .map_err(|e| ReportError::invalid(&record.id, "fields", e.to_string()))
}

/// Parse an ISO `YYYY-MM-DD` date carried in a record field.
pub(crate) fn parse_iso_date(record_id: &str, field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| ReportError::invalid(record_id, field, format!("'{}': {}", raw, e)))
}
