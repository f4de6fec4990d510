//! Exact decimal money type.
//!
//! Uses `rust_decimal` internally so that balances never pick up binary
//! floating-point drift. Intermediate values keep their full precision;
//! only [`Money::round_cents`] and the `Display`/`Serialize` impls fix the
//! scale at two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A monetary amount backed by an exact decimal.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use moim_ledger::Money;
///
/// let share = Money::from_str("100").unwrap().split_evenly(3);
/// assert_eq!(share.round_cents().to_string(), "33.33");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Number of decimal places kept by rounding and display.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest amount one transaction may carry, 10^15.
    pub const MAX_AMOUNT: Self = Money(Decimal::from_parts(0xA4C6_8000, 0x3_8D7E, 0, false, 0));

    /// Wraps a raw decimal without changing its scale.
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Rounds to cents, midpoint to even.
    ///
    /// A result of zero is always returned as positive zero so that no
    /// `-0.00` leaks into reports.
    pub fn round_cents(self) -> Self {
        let rounded = self
            .0
            .round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven);
        if rounded.is_zero() {
            Money::ZERO
        } else {
            Money(rounded)
        }
    }

    /// Divides the amount into `parts` equal shares.
    ///
    /// Returns zero when `parts` is zero instead of failing.
    pub fn split_evenly(self, parts: usize) -> Self {
        if parts == 0 {
            return Money::ZERO;
        }
        Money(self.0 / Decimal::from(parts))
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Returns `true` if this value is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Absolute value.
    pub fn abs(self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `true` if the fractional part is zero.
    pub fn is_whole(&self) -> bool {
        self.0.fract().is_zero()
    }

    /// Compares against zero.
    pub fn signum(&self) -> Ordering {
        self.0.cmp(&Decimal::ZERO)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Money(Decimal::from(value))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Money(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_cents().0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}
