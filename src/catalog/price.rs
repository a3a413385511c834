//! Fixed-point price type
//!
//! Prices are stored as a count of hundredths and round-trip byte-exact
//! through the document and CSV. Parsing is locale-invariant:
//! `.` is the only decimal separator and no digit grouping is accepted.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Number of hundredths in one unit
const SCALE: u64 = 100;

/// Error returned when a price string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceParseError {
    input: String,
}

impl PriceParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

impl fmt::Display for PriceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid price: '{}'", self.input)
    }
}

impl std::error::Error for PriceParseError {}

/// A non-negative decimal price with two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(u64);

impl Price {
    /// The zero price
    pub const ZERO: Price = Price(0);

    /// Creates a price from a count of hundredths.
    pub const fn from_cents(cents: u64) -> Self {
        Price(cents)
    }

    /// Returns the price as a count of hundredths.
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns true if the price is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parses a locale-invariant decimal string.
    ///
    /// Accepts an optional leading `+`, an integer part, and an optional
    /// fractional part after `.`. Surrounding whitespace is ignored. More than
    /// two fractional digits are rounded half-up.
    ///
    /// # Errors
    ///
    /// Returns `PriceParseError` for empty input, negative values, grouping
    /// separators, or values that overflow.
    pub fn parse(input: &str) -> Result<Self, PriceParseError> {
        let trimmed = input.trim();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(PriceParseError::new(input));
        }
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(PriceParseError::new(input));
        }

        let mut units: u64 = 0;
        for b in int_part.bytes() {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(u64::from(b - b'0')))
                .ok_or_else(|| PriceParseError::new(input))?;
        }

        let frac = frac_part.as_bytes();
        let digit = |i: usize| frac.get(i).map_or(0, |b| u64::from(b - b'0'));
        let mut cents = digit(0) * 10 + digit(1);
        if digit(2) >= 5 {
            cents += 1;
        }

        units
            .checked_mul(SCALE)
            .and_then(|u| u.checked_add(cents))
            .map(Price)
            .ok_or_else(|| PriceParseError::new(input))
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Price::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / SCALE, self.0 % SCALE)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

/// Accepts either a decimal string or a JSON number.
struct PriceVisitor;

impl<'de> Visitor<'de> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal price")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        Price::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        v.checked_mul(SCALE)
            .map(Price)
            .ok_or_else(|| E::custom(format!("price out of range: {}", v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        let unsigned = u64::try_from(v).map_err(|_| E::custom(format!("negative price: {}", v)))?;
        self.visit_u64(unsigned)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        // Shortest round-trip formatting keeps 9.99 as "9.99"
        Price::parse(&v.to_string()).map_err(E::custom)
    }
}
