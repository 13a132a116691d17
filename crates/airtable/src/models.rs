//! Wire models for the Airtable REST API.
//!
//! One page of a table listing looks like:
//!
//! ```json
//! {
//!   "records": [
//!     { "id": "recXXX", "createdTime": "...", "fields": { ... } }
//!   ],
//!   "offset": "itrYYY/recZZZ"
//! }
//! ```
//!
//! The `offset` key is only present when another page follows. Fields
//! that are empty for a record are omitted from `fields` entirely
//! rather than sent as null, so consumers must treat every field as
//! optional at this layer.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One page of records from a table listing request.
#[derive(Debug, Deserialize)]
pub struct TableResponse {
    /// Records in this page.
    pub records: Vec<Record>,
    /// Continuation token; present only when another page follows.
    #[serde(default)]
    pub offset: Option<String>,
}

/// A single raw record. `fields` is kept as raw JSON; each table's
/// typed shape is interpreted downstream.
#[derive(Clone, Debug, Deserialize)]
pub struct Record {
    /// Record identifier (`recXXXXXXXXXXXXXX`).
    pub id: String,
    /// Raw field map. Empty fields are absent, never null.
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Record creation timestamp, as reported by the API.
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
}

/// An attachment entry as it appears inside an attachment-typed field
/// (an array of these objects).
#[derive(Clone, Debug, Deserialize)]
pub struct Attachment {
    /// Pre-signed download URL.
    pub url: String,
    /// Original file name, when the API includes it.
    #[serde(default)]
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_with_offset() {
        let json = r#"{
            "records": [
                {"id": "rec1", "createdTime": "2021-01-01T00:00:00.000Z", "fields": {"Name": "Acme"}},
                {"id": "rec2", "fields": {}}
            ],
            "offset": "itr123/rec2"
        }"#;
        let page: TableResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.offset.as_deref(), Some("itr123/rec2"));
        assert_eq!(page.records[0].fields["Name"], "Acme");
    }

    #[test]
    fn test_final_page_has_no_offset() {
        let json = r#"{"records": []}"#;
        let page: TableResponse = serde_json::from_str(json).unwrap();
        assert!(page.records.is_empty());
        assert!(page.offset.is_none());
    }

    #[test]
    fn test_record_fields_default_to_empty() {
        // A record with every field empty omits `fields` entirely.
        let json = r#"{"id": "rec9"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.fields.is_empty());
        assert!(record.created_time.is_none());
    }

    #[test]
    fn test_attachment_array_field() {
        let json = r#"[{"url": "https://dl.airtable.com/x.png", "filename": "x.png", "size": 1024}]"#;
        let attachments: Vec<Attachment> = serde_json::from_str(json).unwrap();
        assert_eq!(attachments[0].url, "https://dl.airtable.com/x.png");
        assert_eq!(attachments[0].filename.as_deref(), Some("x.png"));
    }
}
