//! Display formatting for report values.

use num_format::{Locale, ToFormattedString};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::summary::OwnershipTotal;

/// Format a currency amount: whole units, thousands separators, `$`
/// prefix. Missing inputs render as zero — this mirrors the
/// invested/fair-value aggregation policy, which never leaves a
/// financial cell undefined.
pub fn currency(value: Option<Decimal>) -> String {
    let whole = value
        .unwrap_or_default()
        .round()
        .to_i128()
        .unwrap_or_default();
    format!("${}", whole.to_formatted_string(&Locale::en))
}

/// Format a fully-diluted ownership total as a percentage with two
/// decimals, or "N/A" when the aggregate is poisoned.
pub fn ownership(total: &OwnershipTotal) -> String {
    match total {
        OwnershipTotal::Known(fraction) => {
            let percent = (*fraction * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or_default();
            format!("{:.2}%", percent)
        }
        OwnershipTotal::Unknown => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_currency_thousands_separators() {
        assert_eq!(currency(Some(dec!(1234567.4))), "$1,234,567");
        assert_eq!(currency(Some(dec!(950))), "$950");
    }

    #[test]
    fn test_currency_missing_renders_zero() {
        assert_eq!(currency(None), "$0");
    }

    #[test]
    fn test_currency_rounds_to_whole_units() {
        assert_eq!(currency(Some(dec!(99.9))), "$100");
    }

    #[test]
    fn test_ownership_known() {
        assert_eq!(ownership(&OwnershipTotal::Known(dec!(0.1234))), "12.34%");
        assert_eq!(ownership(&OwnershipTotal::Known(dec!(0.1))), "10.00%");
    }

    #[test]
    fn test_ownership_unknown_is_na() {
        assert_eq!(ownership(&OwnershipTotal::Unknown), "N/A");
    }
}
