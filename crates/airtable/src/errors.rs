//! Error types for the Airtable client.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, AirtableError>;

/// Errors that can occur while talking to the Airtable API.
///
/// This is an offline batch client: there is no retry policy, every
/// variant is terminal for the current run.
#[derive(Error, Debug)]
pub enum AirtableError {
    /// The API answered with a non-success HTTP status for a table
    /// request.
    #[error("Airtable returned {status} for table '{table}'")]
    Api {
        /// The table that was being fetched
        table: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// An attachment URL answered with a non-success HTTP status.
    #[error("Attachment download returned {status} for '{url}'")]
    Attachment {
        /// The attachment URL that was requested
        url: String,
        /// The HTTP status code returned
        status: u16,
    },

    /// A network error occurred, or the response body was not the
    /// JSON shape the API contract promises.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
