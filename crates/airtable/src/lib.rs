//! Quarterbook Airtable Crate
//!
//! Read-only client for the Airtable REST API, scoped to what a
//! single report run needs:
//!
//! - Fetching every record of a named table, transparently following
//!   the `offset` continuation token until the table is exhausted
//! - Downloading attachment content (company and fund logos) from the
//!   pre-signed URLs carried in record fields
//!
//! The crate deliberately stays at the wire level: records come back
//! as [`Record`] values whose `fields` map is raw JSON. Typed
//! interpretation of each table belongs to the reporting crate.

pub mod client;
pub mod errors;
pub mod models;

pub use client::{AirtableClient, DEFAULT_BASE_URL};
pub use errors::{AirtableError, Result};
pub use models::{Attachment, Record, TableResponse};
