//! HTTP client for the Airtable REST API.
//!
//! Requests are sequential and fail fast: a non-success status or a
//! malformed body aborts the run. There is no retry or backoff — the
//! caller is a single-shot batch job run by an operator.

use std::time::Duration;

use log::debug;
use reqwest::Client;

use crate::errors::{AirtableError, Result};
use crate::models::{Record, TableResponse};

/// Public Airtable API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.airtable.com/v0";

/// Read-only Airtable client, scoped to one base.
pub struct AirtableClient {
    client: Client,
    base_url: String,
    base_id: String,
    api_key: String,
}

impl AirtableClient {
    /// Create a client for the given base. `base_url` is normally
    /// [`DEFAULT_BASE_URL`]; tests and proxies may override it.
    pub fn new(
        base_url: impl Into<String>,
        base_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            base_id: base_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch every record of `table`, following the `offset`
    /// continuation token until the API stops returning one.
    pub async fn fetch_all(&self, table: &str) -> Result<Vec<Record>> {
        let url = format!("{}/{}/{}", self.base_url, self.base_id, table);
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut request = self.client.get(&url).bearer_auth(&self.api_key);
            if let Some(token) = offset.as_deref() {
                request = request.query(&[("offset", token)]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AirtableError::Api {
                    table: table.to_string(),
                    status: status.as_u16(),
                });
            }

            let page: TableResponse = response.json().await?;
            debug!(
                "Fetched {} records from '{}' (continuation: {})",
                page.records.len(),
                table,
                page.offset.is_some()
            );
            records.extend(page.records);

            match page.offset {
                Some(token) => offset = Some(token),
                None => break,
            }
        }

        debug!("Table '{}' complete: {} records", table, records.len());
        Ok(records)
    }

    /// Download attachment content from a pre-signed URL. Attachment
    /// URLs carry their own authorization, so no bearer header is
    /// attached.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AirtableError::Attachment {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}
