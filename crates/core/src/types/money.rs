//! Money amounts and their display formatting.
//!
//! The backend sends amounts as JSON numbers next to an ISO 4217 code. The
//! admin panel never does arithmetic on them beyond display rounding.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency used when the backend omits one.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// An amount with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    /// Create a new money value.
    #[must_use]
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Create a money value in the store's default currency.
    #[must_use]
    pub fn ngn(amount: Decimal) -> Self {
        Self::new(amount, DEFAULT_CURRENCY)
    }

    /// Format for display, e.g. `₦12,500.00` or `-$3.10`.
    #[must_use]
    pub fn format(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let digits = format!("{:.2}", rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        format!(
            "{sign}{}{}.{fraction}",
            currency_symbol(&self.currency),
            group_thousands(whole)
        )
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

/// Display prefix for a currency code.
///
/// Unknown codes render as the code followed by a space.
#[must_use]
pub fn currency_symbol(code: &str) -> String {
    match code.to_ascii_uppercase().as_str() {
        "NGN" => "₦".to_string(),
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{other} "),
    }
}

/// Dashboard tile format: thousands with one decimal, e.g. `₦12.3K`.
#[must_use]
pub fn format_compact_thousands(amount: Decimal) -> String {
    let thousands = (amount / Decimal::ONE_THOUSAND)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("₦{thousands:.1}K")
}

/// Period-over-period change, e.g. `+4.2%`, `0%` or `-1%`.
#[must_use]
pub fn format_percent_change(change: f64) -> String {
    let rounded = (change * 100.0).round() / 100.0;
    if rounded.abs() < f64::EPSILON {
        "0%".to_string()
    } else if rounded > 0.0 {
        format!("+{rounded}%")
    } else {
        format!("{rounded}%")
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap_or_default()
    }

    #[test]
    fn test_format_naira_with_grouping() {
        assert_eq!(Money::ngn(dec("1234567.5")).format(), "₦1,234,567.50");
        assert_eq!(Money::ngn(dec("999")).format(), "₦999.00");
        assert_eq!(Money::ngn(dec("1000")).format(), "₦1,000.00");
    }

    #[test]
    fn test_format_rounds_half_away_from_zero() {
        assert_eq!(Money::new(dec("2.005"), "USD").format(), "$2.01");
        assert_eq!(Money::new(dec("-3.1"), "usd").format(), "-$3.10");
    }

    #[test]
    fn test_format_unknown_currency_uses_code() {
        assert_eq!(Money::new(dec("5"), "KES").format(), "KES 5.00");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(Money::ngn(dec("-0.001")).format(), "₦0.00");
    }

    #[test]
    fn test_compact_thousands() {
        assert_eq!(format_compact_thousands(dec("12345")), "₦12.3K");
        assert_eq!(format_compact_thousands(dec("0")), "₦0.0K");
        assert_eq!(format_compact_thousands(dec("950")), "₦1.0K");
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(format_percent_change(4.2), "+4.2%");
        assert_eq!(format_percent_change(0.0), "0%");
        assert_eq!(format_percent_change(-1.0), "-1%");
        assert_eq!(format_percent_change(12.3456), "+12.35%");
    }
}
