//! Error types for report generation.
//!
//! The report is an offline batch artifact: apart from the ownership
//! aggregate (which degrades to "N/A" on the page) and optional text
//! fields (which degrade to empty strings), every failure here is
//! terminal for the run.

use thiserror::Error;

use quarterbook_airtable::AirtableError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while normalizing records, joining rounds,
/// or rendering the report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A record is missing a field the report cannot proceed without.
    #[error("Record '{record}' in '{table}' is missing required field '{field}'")]
    MissingField {
        /// The table the record came from
        table: String,
        /// The record identifier
        record: String,
        /// The field that was absent
        field: String,
    },

    /// A record field did not have the shape the table contract
    /// promises (wrong JSON type, unparsable date, ...).
    #[error("Invalid value for '{field}' on record '{record}': {details}")]
    InvalidField {
        /// The record identifier
        record: String,
        /// The offending field
        field: String,
        /// What was wrong with it
        details: String,
    },

    /// The quarter argument was not one of Q1..Q4.
    #[error("Invalid quarter '{0}' (expected Q1, Q2, Q3 or Q4)")]
    InvalidQuarter(String),

    /// The quarter/year pair did not form a valid cutoff date.
    #[error("Invalid cutoff date for {quarter} {year}")]
    InvalidCutoff {
        /// Quarter label
        quarter: String,
        /// Report year
        year: i32,
    },

    /// A downloaded logo could not be decoded as an image.
    #[error("Failed to decode image from '{url}': {details}")]
    Image {
        /// The attachment URL the bytes came from
        url: String,
        /// Decoder error text
        details: String,
    },

    /// The PDF library rejected an operation.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Failed to write the output artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table fetch itself failed.
    #[error("Airtable error: {0}")]
    Airtable(#[from] AirtableError),
}

impl ReportError {
    pub(crate) fn missing(table: &str, record: &str, field: &str) -> Self {
        Self::MissingField {
            table: table.to_string(),
            record: record.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(record: &str, field: &str, details: impl Into<String>) -> Self {
        Self::InvalidField {
            record: record.to_string(),
            field: field.to_string(),
            details: details.into(),
        }
    }
}
