//! Builds the normalized [`Directory`] from raw table records.
//!
//! The raw API omits empty fields entirely, so every field is read
//! through an `Option` (or a defaulted collection) and filled with the
//! entity's default. The two retention filters live here, not
//! downstream: Scout companies are dropped, and only vehicles whose
//! name contains "Fund" are kept.

use std::collections::HashMap;

use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;

use quarterbook_airtable::{Attachment, Record};

use crate::directory::directory_model::{Company, CompanyStatus, Directory, Founder, Vehicle};
use crate::errors::{ReportError, Result};
use crate::util::{parse_fields, parse_iso_date};

/// Table names in the remote base.
pub const COMPANIES_TABLE: &str = "Companies";
pub const VEHICLES_TABLE: &str = "Vehicles";
pub const FOUNDERS_TABLE: &str = "Founders";
pub const ROUNDS_TABLE: &str = "Investment Rounds";

/// Substring a vehicle name must contain to be retained.
const FUND_TOKEN: &str = "Fund";

#[derive(Debug, Deserialize)]
struct CompanyFields {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Status")]
    status: Option<String>,
    #[serde(rename = "Location")]
    location: Option<String>,
    #[serde(rename = "CEO", default)]
    ceo: Vec<String>,
    #[serde(rename = "Vehicles", default)]
    vehicles: Vec<String>,
    #[serde(rename = "Company Description")]
    description: Option<String>,
    #[serde(rename = "Quarterly Update")]
    quarterly_update: Option<String>,
    #[serde(rename = "Logo", default)]
    logo: Vec<Attachment>,
    #[serde(rename = "URL")]
    url: Option<String>,
    // Rollup from the rounds table; arrives as a one-element array of
    // ISO date strings.
    #[serde(rename = "Initial Investment", default)]
    initial_investment: Vec<String>,
    #[serde(rename = "Valuation")]
    valuation: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct VehicleFields {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Logo", default)]
    logo: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
struct FounderFields {
    #[serde(rename = "Full Name")]
    full_name: Option<String>,
}

/// Build the lookup maps for one run.
pub fn build_directory(
    companies: &[Record],
    vehicles: &[Record],
    founders: &[Record],
) -> Result<Directory> {
    let directory = Directory {
        companies: build_companies(companies)?,
        vehicles: build_vehicles(vehicles)?,
        founders: build_founders(founders)?,
    };
    debug!(
        "Directory built: {} companies, {} vehicles, {} founders",
        directory.companies.len(),
        directory.vehicles.len(),
        directory.founders.len()
    );
    Ok(directory)
}

fn build_companies(records: &[Record]) -> Result<HashMap<String, Company>> {
    let mut companies = HashMap::new();
    for record in records {
        let fields: CompanyFields = parse_fields(record)?;
        let status = fields
            .status
            .as_deref()
            .map(CompanyStatus::parse)
            .ok_or_else(|| ReportError::missing(COMPANIES_TABLE, &record.id, "Status"))?;
        if status.is_scout() {
            continue;
        }
        let name = fields
            .name
            .ok_or_else(|| ReportError::missing(COMPANIES_TABLE, &record.id, "Name"))?;
        let initial_investment = fields
            .initial_investment
            .first()
            .map(|raw| parse_iso_date(&record.id, "Initial Investment", raw))
            .transpose()?;

        companies.insert(
            record.id.clone(),
            Company {
                name,
                location: fields.location,
                ceo: fields.ceo.into_iter().next(),
                vehicles: fields.vehicles,
                description: fields.description,
                quarterly_update: fields.quarterly_update,
                logo_url: fields.logo.into_iter().next().map(|a| a.url),
                website: fields.url,
                initial_investment,
                status,
                valuation: fields.valuation,
            },
        );
    }
    Ok(companies)
}

fn build_vehicles(records: &[Record]) -> Result<HashMap<String, Vehicle>> {
    let mut vehicles = HashMap::new();
    for record in records {
        let fields: VehicleFields = parse_fields(record)?;
        let name = fields
            .name
            .ok_or_else(|| ReportError::missing(VEHICLES_TABLE, &record.id, "Name"))?;
        if !name.contains(FUND_TOKEN) {
            continue;
        }
        vehicles.insert(
            record.id.clone(),
            Vehicle {
                name,
                logo_url: fields.logo.into_iter().next().map(|a| a.url),
            },
        );
    }
    Ok(vehicles)
}

fn build_founders(records: &[Record]) -> Result<HashMap<String, Founder>> {
    let mut founders = HashMap::new();
    for record in records {
        let fields: FounderFields = parse_fields(record)?;
        founders.insert(
            record.id.clone(),
            Founder {
                full_name: fields.full_name,
            },
        );
    }
    Ok(founders)
}
