//! Lossless decimal money type backed by rust_decimal.
//!
//! Every money mutation in the parser and finalizer goes through `round2` so
//! street sums never drift the way binary floats do.

use rust_decimal::RoundingStrategy;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Decimal money/ratio value.
///
/// Serializes to a JSON number (not string) so chart consumers can read it
/// directly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a plain numeric string.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Canonical string form (no exponent, trailing zeros removed). Used for
    /// storage columns.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    pub fn hundred() -> Self {
        Decimal(RustDecimal::ONE_HUNDRED)
    }

    pub fn from_count(n: usize) -> Self {
        Decimal(RustDecimal::from(n as u64))
    }

    /// `n / 10`, exact.
    pub fn from_tenths(n: i64) -> Self {
        Decimal(RustDecimal::new(n, 1))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Round half away from zero to `dp` places.
    pub fn round_dp(&self, dp: u32) -> Self {
        Decimal(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Money precision.
    pub fn round2(&self) -> Self {
        self.round_dp(2)
    }

    /// Percentage precision.
    pub fn round1(&self) -> Self {
        self.round_dp(1)
    }

    /// Division that yields zero instead of panicking on a zero divisor.
    pub fn div_or_zero(self, rhs: Decimal) -> Decimal {
        if rhs.is_zero() {
            return Decimal::zero();
        }
        self.0.checked_div(rhs.0).map(Decimal).unwrap_or_default()
    }

    /// `part / whole * 100`, or zero when `whole` is zero.
    pub fn percent_of(part: usize, whole: usize) -> Decimal {
        if whole == 0 {
            return Decimal::zero();
        }
        (Decimal::from_count(part) * Decimal::hundred()).div_or_zero(Decimal::from_count(whole))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::SubAssign for Decimal {
    fn sub_assign(&mut self, rhs: Decimal) {
        self.0 -= rhs.0;
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + d)
    }
}

impl<'a> Sum<&'a Decimal> for Decimal {
    fn sum<I: Iterator<Item = &'a Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::zero(), |acc, d| acc + *d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(d("0.125").round2(), d("0.13"));
        assert_eq!(d("-0.125").round2(), d("-0.13"));
        assert_eq!(d("1.004").round2(), d("1.00"));
    }

    #[test]
    fn test_round1() {
        assert_eq!(d("33.333").round1(), d("33.3"));
        assert_eq!(d("66.666").round1(), d("66.7"));
    }

    #[test]
    fn test_no_float_drift_on_repeated_addition() {
        let mut total = Decimal::zero();
        for _ in 0..10 {
            total += d("0.1");
        }
        assert_eq!(total, d("1"));
    }

    #[test]
    fn test_div_or_zero() {
        assert_eq!(d("10").div_or_zero(Decimal::zero()), Decimal::zero());
        assert_eq!(d("10").div_or_zero(d("4")), d("2.5"));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(Decimal::percent_of(1, 4), d("25"));
        assert_eq!(Decimal::percent_of(3, 0), Decimal::zero());
    }

    #[test]
    fn test_from_tenths() {
        assert_eq!(Decimal::from_tenths(333), d("33.3"));
        assert_eq!(Decimal::from_tenths(1000), d("100"));
    }

    #[test]
    fn test_canonical_string_strips_trailing_zeros() {
        assert_eq!(d("1.50").to_canonical_string(), "1.5");
        assert_eq!(d("-3.00").to_canonical_string(), "-3");
    }

    #[test]
    fn test_json_serialization_is_number() {
        let json = serde_json::to_value(d("3.6")).unwrap();
        assert!(json.is_number());
    }

    #[test]
    fn test_sign_helpers() {
        assert!(d("0.01").is_positive());
        assert!(d("-0.01").is_negative());
        assert!(!Decimal::zero().is_positive());
        assert!(!Decimal::zero().is_negative());
    }

    #[test]
    fn test_sum() {
        let values = vec![d("1.10"), d("2.20"), d("-0.30")];
        let total: Decimal = values.iter().sum();
        assert_eq!(total, d("3.00"));
    }
}
