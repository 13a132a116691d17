//! Flattened investment-round rows and the ownership aggregate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

/// The fully-diluted ownership field of a round, as the API delivers
/// it: a numeric rollup when resolved, or a raw link object when not.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum OwnershipValue {
    /// Resolved numeric rollup (a fraction, e.g. `0.1234` for 12.34%).
    Fraction(Decimal),
    /// Unresolved link object; poisons any aggregate it enters.
    Link(Value),
}

/// One investment round, flattened against the company directory.
///
/// `company_name` carries the resolved display name, not the record
/// id. Name equality is the downstream join key — preserved from the
/// legacy report even though display names are not guaranteed unique.
#[derive(Clone, Debug)]
pub struct Summary {
    pub company_name: String,
    /// Round label, e.g. "Seed" or "Series A".
    pub round_label: Option<String>,
    /// First linked vehicle record id.
    pub vehicle: Option<String>,
    pub date: NaiveDate,
    pub round_size: Option<Decimal>,
    /// Entry valuation (post-money or cap).
    pub entry_valuation: Option<Decimal>,
    /// Capital invested by the fund in this round.
    pub invested: Option<Decimal>,
    /// Current fair value of the position from this round.
    pub fair_value: Option<Decimal>,
    pub ownership: Option<OwnershipValue>,
}

/// Cumulative fully-diluted ownership across a company's qualifying
/// rounds.
///
/// A single round with an absent or unresolved ownership value makes
/// the whole total `Unknown` (rendered "N/A") rather than a partial
/// sum. That short-circuit is the defined policy, not an error state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OwnershipTotal {
    Known(Decimal),
    Unknown,
}

impl OwnershipTotal {
    /// Fold one round's ownership value into the running total.
    pub fn accumulate(self, value: Option<&OwnershipValue>) -> Self {
        match (self, value) {
            (Self::Unknown, _) => Self::Unknown,
            (Self::Known(total), Some(OwnershipValue::Fraction(p))) => Self::Known(total + *p),
            _ => Self::Unknown,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl Default for OwnershipTotal {
    fn default() -> Self {
        Self::Known(Decimal::ZERO)
    }
}

/// Per-company aggregates over the qualifying summary rows.
///
/// The financial totals are asymmetric with the ownership policy by
/// design: missing invested/fair-value inputs coerce to zero, so the
/// totals are always defined.
#[derive(Clone, Debug, PartialEq)]
pub struct CompanyAggregates {
    pub ownership: OwnershipTotal,
    pub invested: Decimal,
    pub fair_value: Decimal,
}
