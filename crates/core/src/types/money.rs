//! Money amounts and en-US style currency formatting.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes the console knows how to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Symbol used by an en-US currency formatter.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::CAD => "CA$",
            Self::AUD => "A$",
        }
    }

    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

/// An amount of money in a given currency.
///
/// Amounts are kept in the currency's standard unit (dollars, not cents)
/// because that is what the backend sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Money {
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format for display: symbol, thousands separators, two decimals.
    ///
    /// ```
    /// use orderdesk_core::{CurrencyCode, Money};
    /// use rust_decimal::Decimal;
    ///
    /// let money = Money::new(Decimal::new(123_450, 2), CurrencyCode::USD);
    /// assert_eq!(money.display(), "$1,234.50");
    /// ```
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = format!("{:.2}", rounded.abs());
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let sign = if negative { "-" } else { "" };
        format!(
            "{sign}{}{}.{fraction}",
            self.currency.symbol(),
            group_thousands(whole)
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Insert `,` every three digits from the right.
fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(s: &str) -> String {
        Money::usd(s.parse().unwrap()).display()
    }

    #[test]
    fn test_display_basic() {
        assert_eq!(usd("0"), "$0.00");
        assert_eq!(usd("5"), "$5.00");
        assert_eq!(usd("19.9"), "$19.90");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(usd("1234.5"), "$1,234.50");
        assert_eq!(usd("1000000"), "$1,000,000.00");
        assert_eq!(usd("999.99"), "$999.99");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(usd("2.345"), "$2.35");
        assert_eq!(usd("-2.345"), "-$2.35");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(usd("-5"), "-$5.00");
        assert_eq!(usd("-0.001"), "$0.00");
    }

    #[test]
    fn test_display_other_currencies() {
        let eur = Money::new(Decimal::new(1000, 2), CurrencyCode::EUR);
        assert_eq!(eur.display(), "€10.00");
        let cad = Money::new(Decimal::new(310, 2), CurrencyCode::CAD);
        assert_eq!(cad.display(), "CA$3.10");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert!("XYZ".parse::<CurrencyCode>().is_err());
    }
}
