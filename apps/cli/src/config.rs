//! Runtime configuration, read once from the environment at startup.

use anyhow::Context;

use quarterbook_airtable::DEFAULT_BASE_URL;

/// Credentials and endpoint for the report run. `.env` files are
/// loaded by `main` before this is constructed.
pub struct Config {
    /// API endpoint; overridable for tests and proxies.
    pub api_url: String,
    /// Airtable base identifier.
    pub base_id: String,
    /// Bearer token.
    pub api_key: String,
}

impl Config {
    /// Read the configuration, failing immediately when a required
    /// key is absent.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_url: std::env::var("AIRTABLE_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            base_id: require("AIRTABLE_BASE_ID")?,
            api_key: require("AIRTABLE_API_KEY")?,
        })
    }
}

fn require(key: &str) -> anyhow::Result<String> {
    std::env::var(key).with_context(|| format!("Missing required environment variable {}", key))
}
