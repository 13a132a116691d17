//! Normalized entities built from raw table records.
//!
//! Everything here is a read-only snapshot: built once per run from
//! the fetched tables, never mutated afterwards.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Lifecycle status of a portfolio company.
///
/// Only `Active` and `Scout` carry meaning for the report: Scout
/// companies are excluded from the directory entirely, and the current
/// report edition pages only Active companies. Any other raw value is
/// kept verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompanyStatus {
    Active,
    Scout,
    Other(String),
}

impl CompanyStatus {
    /// Parse the raw status string from the Companies table.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "Active" => Self::Active,
            "Scout" => Self::Scout,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_scout(&self) -> bool {
        matches!(self, Self::Scout)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A portfolio company retained for reporting (never Scout).
#[derive(Clone, Debug)]
pub struct Company {
    /// Display name. Also the join key for summaries, see
    /// [`Summary::company_name`](crate::summary::Summary::company_name).
    pub name: String,
    /// Headquarters location.
    pub location: Option<String>,
    /// Founder record id of the CEO (first entry of the link field).
    pub ceo: Option<String>,
    /// Vehicle record ids this company belongs to.
    pub vehicles: Vec<String>,
    /// Free-text company description.
    pub description: Option<String>,
    /// Free-text operational update for the quarter.
    pub quarterly_update: Option<String>,
    /// Download URL of the first logo attachment.
    pub logo_url: Option<String>,
    /// Company website.
    pub website: Option<String>,
    /// Date of the initial investment.
    pub initial_investment: Option<NaiveDate>,
    /// Lifecycle status.
    pub status: CompanyStatus,
    /// Latest valuation, when tracked.
    pub valuation: Option<Decimal>,
}

/// An investment fund vehicle; the report's top-level grouping.
/// Only vehicles whose name contains "Fund" are retained.
#[derive(Clone, Debug)]
pub struct Vehicle {
    pub name: String,
    /// Download URL of the first logo attachment.
    pub logo_url: Option<String>,
}

/// A founder, referenced only for the CEO line on company pages.
#[derive(Clone, Debug)]
pub struct Founder {
    pub full_name: Option<String>,
}

/// The normalized lookup maps for one report run, keyed by record id.
#[derive(Debug, Default)]
pub struct Directory {
    pub companies: HashMap<String, Company>,
    pub vehicles: HashMap<String, Vehicle>,
    pub founders: HashMap<String, Founder>,
}

impl Directory {
    /// Resolve the CEO display name for a company, if both the link
    /// and the founder's name exist.
    pub fn ceo_name(&self, company: &Company) -> Option<&str> {
        let founder_id = company.ceo.as_deref()?;
        self.founders
            .get(founder_id)
            .and_then(|founder| founder.full_name.as_deref())
    }
}
