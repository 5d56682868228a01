//! Fixed-point price with exactly two fractional digits

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A decimal amount stored as a whole number of cents.
///
/// Mirrors a `DECIMAL(10,2)` column: inputs with more than two fractional digits
/// are rounded half away from zero. Serializes as a JSON number (`19.99`) and
/// accepts either a number or a decimal string on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

/// Error returned when a string is not a valid decimal amount
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal amount '{input}'")]
pub struct PriceParseError {
    input: String,
}

impl Price {
    /// Largest amount a `DECIMAL(10,2)` column holds
    pub const MAX: Price = Price(9_999_999_999);

    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Round a float to the nearest cent. Returns `None` for NaN, infinities
    /// and values outside the `i64` cent range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Self(cents as i64))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PriceParseError {
            input: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(err());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(err());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| err())?
        };

        let digits: Vec<i64> = fraction.bytes().map(|b| i64::from(b - b'0')).collect();
        let mut fraction_cents =
            digits.first().copied().unwrap_or(0) * 10 + digits.get(1).copied().unwrap_or(0);
        if digits.get(2).is_some_and(|d| *d >= 5) {
            fraction_cents += 1;
        }

        let cents = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(fraction_cents))
            .ok_or_else(err)?;

        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal number or a decimal string")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                v.checked_mul(100)
                    .map(Price)
                    .ok_or_else(|| E::custom("price out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(Price)
                    .ok_or_else(|| E::custom("price out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Price::from_f64(v).ok_or_else(|| E::custom("price out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}
