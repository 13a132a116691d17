//! Report options and the planned page sequence.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::{ReportError, Result};
use crate::summary::{OwnershipTotal, Summary};

/// A report quarter; maps to a fixed month-end cutoff date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    /// Quarter-end cutoff date for the given year.
    pub fn cutoff(self, year: i32) -> Result<NaiveDate> {
        let (month, day) = match self {
            Self::Q1 => (3, 31),
            Self::Q2 => (6, 30),
            Self::Q3 => (9, 30),
            Self::Q4 => (12, 31),
        };
        NaiveDate::from_ymd_opt(year, month, day).ok_or(ReportError::InvalidCutoff {
            quarter: self.to_string(),
            year,
        })
    }

    /// Output artifact name, e.g. `2022-Q2.pdf`.
    pub fn file_name(self, year: i32) -> String {
        format!("{}-{}.pdf", year, self)
    }

    /// Human label for the cover pages, e.g. `Q2 2022`.
    pub fn period_label(self, year: i32) -> String {
        format!("{} {}", self, year)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        };
        f.write_str(label)
    }
}

impl FromStr for Quarter {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "Q1" => Ok(Self::Q1),
            "Q2" => Ok(Self::Q2),
            "Q3" => Ok(Self::Q3),
            "Q4" => Ok(Self::Q4),
            other => Err(ReportError::InvalidQuarter(other.to_string())),
        }
    }
}

/// Ordering of company pages within a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompanySort {
    /// Highest valuation first (current edition); missing valuations
    /// sort as zero, ties break by name.
    ValuationDesc,
    /// Alphabetical (earlier edition).
    NameAsc,
}

/// Knobs for one report run.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    /// Rounds and companies after this date are excluded.
    pub cutoff: NaiveDate,
    /// Label printed on each vehicle cover page.
    pub period_label: String,
    pub sort: CompanySort,
    /// When set, only companies with Active status get a page
    /// (the earlier edition paged every retained company).
    pub active_only: bool,
}

/// The full page sequence, ready to render.
#[derive(Debug)]
pub struct ReportPlan {
    pub sections: Vec<VehicleSection>,
}

/// One vehicle: a cover page followed by company detail pages.
#[derive(Debug)]
pub struct VehicleSection {
    pub vehicle_name: String,
    pub logo_url: String,
    pub companies: Vec<CompanyPage>,
}

/// Everything one company detail page shows.
#[derive(Debug)]
pub struct CompanyPage {
    pub name: String,
    pub logo_url: String,
    /// Resolved CEO display name, when known.
    pub ceo: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub ownership: OwnershipTotal,
    pub description: Option<String>,
    pub update: Option<String>,
    /// Qualifying rounds, in date order.
    pub rows: Vec<FinancingRow>,
    pub invested_total: Decimal,
    pub fair_value_total: Decimal,
}

/// One row of the financing table.
#[derive(Clone, Debug)]
pub struct FinancingRow {
    pub label: Option<String>,
    pub date: NaiveDate,
    pub round_size: Option<Decimal>,
    pub entry_valuation: Option<Decimal>,
    pub invested: Option<Decimal>,
    pub fair_value: Option<Decimal>,
}

impl From<&Summary> for FinancingRow {
    fn from(summary: &Summary) -> Self {
        Self {
            label: summary.round_label.clone(),
            date: summary.date,
            round_size: summary.round_size,
            entry_valuation: summary.entry_valuation,
            invested: summary.invested,
            fair_value: summary.fair_value,
        }
    }
}
