//! Joins raw investment rounds against the directory and computes
//! per-company aggregates.

use std::collections::HashMap;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;

use quarterbook_airtable::Record;

use crate::directory::{Directory, Vehicle, ROUNDS_TABLE};
use crate::errors::{ReportError, Result};
use crate::summary::summary_model::{CompanyAggregates, OwnershipTotal, OwnershipValue, Summary};
use crate::util::{parse_fields, parse_iso_date};

#[derive(Debug, Deserialize)]
struct RoundFields {
    #[serde(rename = "Company", default)]
    company: Vec<String>,
    #[serde(rename = "Investment Round")]
    round_label: Option<String>,
    #[serde(rename = "Vehicle", default)]
    vehicle: Vec<String>,
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Round Size")]
    round_size: Option<Decimal>,
    #[serde(rename = "Entry Valuation (Post or Cap)")]
    entry_valuation: Option<Decimal>,
    #[serde(rename = "Root Investment Cost")]
    invested: Option<Decimal>,
    #[serde(rename = "Total Value")]
    fair_value: Option<Decimal>,
    #[serde(rename = "Root FD %")]
    ownership: Option<OwnershipValue>,
}

/// Flatten raw rounds into [`Summary`] rows, sorted ascending by date.
///
/// A round whose company link does not resolve against the directory
/// is silently dropped — it may reference an excluded Scout company.
/// A round that does resolve must carry a company link and a date;
/// anything else about it is optional.
pub fn build_summaries(rounds: &[Record], directory: &Directory) -> Result<Vec<Summary>> {
    let mut summaries = Vec::new();
    for record in rounds {
        let fields: RoundFields = parse_fields(record)?;
        let company_id = fields
            .company
            .first()
            .ok_or_else(|| ReportError::missing(ROUNDS_TABLE, &record.id, "Company"))?;
        let company = match directory.companies.get(company_id) {
            Some(company) => company,
            None => continue,
        };
        let raw_date = fields
            .date
            .as_deref()
            .ok_or_else(|| ReportError::missing(ROUNDS_TABLE, &record.id, "Date"))?;

        summaries.push(Summary {
            company_name: company.name.clone(),
            round_label: fields.round_label,
            vehicle: fields.vehicle.into_iter().next(),
            date: parse_iso_date(&record.id, "Date", raw_date)?,
            round_size: fields.round_size,
            entry_valuation: fields.entry_valuation,
            invested: fields.invested,
            fair_value: fields.fair_value,
            ownership: fields.ownership,
        });
    }
    // Stable sort: rounds sharing a date keep their input order.
    summaries.sort_by(|a, b| a.date.cmp(&b.date));
    debug!(
        "Joined {} of {} rounds into summaries",
        summaries.len(),
        rounds.len()
    );
    Ok(summaries)
}

/// The shared inclusion filter for one company's rows: name match,
/// dated on or before the cutoff, and linked to a retained vehicle.
/// Used by both the aggregates and the financing table.
pub fn qualifying<'a>(
    summaries: &'a [Summary],
    company_name: &'a str,
    cutoff: NaiveDate,
    vehicles: &'a HashMap<String, Vehicle>,
) -> impl Iterator<Item = &'a Summary> {
    summaries.iter().filter(move |summary| {
        summary.company_name == company_name
            && summary.date <= cutoff
            && summary
                .vehicle
                .as_deref()
                .is_some_and(|vehicle| vehicles.contains_key(vehicle))
    })
}

/// Compute the ownership total and financial totals for one company
/// as of the cutoff date.
pub fn aggregate_company(
    summaries: &[Summary],
    company_name: &str,
    cutoff: NaiveDate,
    vehicles: &HashMap<String, Vehicle>,
) -> CompanyAggregates {
    let mut ownership = OwnershipTotal::default();
    let mut invested = Decimal::ZERO;
    let mut fair_value = Decimal::ZERO;

    for summary in qualifying(summaries, company_name, cutoff, vehicles) {
        ownership = ownership.accumulate(summary.ownership.as_ref());
        invested += summary.invested.unwrap_or_default();
        fair_value += summary.fair_value.unwrap_or_default();
    }

    CompanyAggregates {
        ownership,
        invested,
        fair_value,
    }
}
