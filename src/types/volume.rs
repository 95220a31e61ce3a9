//! Integer volume type.
//!
//! ## Overview
//!
//! Every quantity handled by the matcher is a whole number of units stored as
//! `u128`. Energy volumes are often metered in Wh, so 64 bits is not enough
//! headroom.
//!
//! ## No Floating Point
//!
//! Volumes never pass through `f32`/`f64`. Text input that is not a plain
//! digit string is classified with `rust_decimal`, so `"-5"` and `"10.5"` are
//! rejected with a precise reason rather than being rounded.
//!
//! ## Examples
//!
//! ```
//! use spread_matcher::types::Volume;
//!
//! let v: Volume = "1000000000000000000000".parse().unwrap();
//! assert_eq!(v.get(), 1_000_000_000_000_000_000_000u128);
//!
//! // Whole-valued decimals are accepted
//! assert_eq!("10.0".parse::<Volume>().unwrap(), Volume::new(10));
//!
//! // Fractions and negatives are not
//! assert!("10.5".parse::<Volume>().is_err());
//! assert!("-1".parse::<Volume>().is_err());
//! ```

use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::de::{self, MapAccess, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::VolumeError;

/// A non-negative integer quantity.
///
/// Serialises as a decimal string. Deserialises from a string or a JSON
/// number of any width up to `u128::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(into = "String")]
pub struct Volume(u128);

impl Volume {
    /// Zero units
    pub const ZERO: Volume = Volume(0);

    /// Largest representable volume
    pub const MAX: Volume = Volume(u128::MAX);

    /// Wrap a raw unit count
    #[inline]
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// Raw unit count
    #[inline]
    pub const fn get(self) -> u128 {
        self.0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `self + other`, or `None` on overflow
    #[inline]
    pub fn checked_add(self, other: Volume) -> Option<Volume> {
        self.0.checked_add(other.0).map(Volume)
    }

    #[inline]
    pub fn saturating_add(self, other: Volume) -> Volume {
        Volume(self.0.saturating_add(other.0))
    }

    #[inline]
    pub fn saturating_sub(self, other: Volume) -> Volume {
        Volume(self.0.saturating_sub(other.0))
    }

    /// Little-endian bytes, used for digests
    #[inline]
    pub fn to_le_bytes(self) -> [u8; 16] {
        self.0.to_le_bytes()
    }

    fn from_decimal(d: Decimal, input: &str) -> Result<Self, VolumeError> {
        if d.is_zero() {
            return Ok(Volume::ZERO);
        }
        if d.is_sign_negative() {
            return Err(VolumeError::Negative(input.to_string()));
        }
        if !d.fract().is_zero() {
            return Err(VolumeError::Fractional(input.to_string()));
        }
        d.trunc()
            .to_u128()
            .map(Volume)
            .ok_or_else(|| VolumeError::Overflow(input.to_string()))
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<u64> for Volume {
    fn from(units: u64) -> Self {
        Volume(units as u128)
    }
}

impl From<u128> for Volume {
    fn from(units: u128) -> Self {
        Volume(units)
    }
}

impl From<Volume> for u128 {
    fn from(v: Volume) -> Self {
        v.0
    }
}

impl From<Volume> for String {
    fn from(v: Volume) -> Self {
        v.0.to_string()
    }
}

impl TryFrom<i64> for Volume {
    type Error = VolumeError;

    fn try_from(units: i64) -> Result<Self, Self::Error> {
        if units < 0 {
            return Err(VolumeError::Negative(units.to_string()));
        }
        Ok(Volume(units as u128))
    }
}

impl TryFrom<Decimal> for Volume {
    type Error = VolumeError;

    fn try_from(d: Decimal) -> Result<Self, Self::Error> {
        Volume::from_decimal(d, &d.to_string())
    }
}

impl FromStr for Volume {
    type Err = VolumeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Plain digit strings go straight to u128 so values above Decimal::MAX survive
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u128>()
                .map(Volume)
                .map_err(|_| VolumeError::Overflow(s.to_string()));
        }

        let decimal =
            Decimal::from_str(trimmed).map_err(|_| VolumeError::Malformed(s.to_string()))?;
        Volume::from_decimal(decimal, s)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Saturating sum; totals are reporting values, never fed back into the engine.
impl Sum for Volume {
    fn sum<I: Iterator<Item = Volume>>(iter: I) -> Self {
        iter.fold(Volume::ZERO, Volume::saturating_add)
    }
}

impl<'a> Sum<&'a Volume> for Volume {
    fn sum<I: Iterator<Item = &'a Volume>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// ============================================================================
// Serde input representation
// ============================================================================

/// Map key serde_json uses to hand over a number as text when built with
/// `arbitrary_precision`.
const JSON_NUMBER_TOKEN: &str = "$serde_json::private::Number";

/// A volume token exactly as it appeared in the input, not yet validated.
///
/// Integers of any width, decimals and strings all end up as text, so
/// [`Volume::from_str`] is the single place that accepts or rejects them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VolumeText(pub(crate) String);

impl<'de> Deserialize<'de> for VolumeText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(VolumeTextVisitor).map(VolumeText)
    }
}

struct VolumeTextVisitor;

impl<'de> Visitor<'de> for VolumeTextVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
        Ok(v.to_string())
    }

    // Whole floats print without a fraction; wide ones overflow in `from_str`
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_map<A>(self, mut map: A) -> Result<String, A::Error>
    where
        A: MapAccess<'de>,
    {
        match map.next_key::<String>()? {
            Some(key) if key == JSON_NUMBER_TOKEN => map.next_value::<String>(),
            Some(key) => Err(de::Error::unknown_field(&key, &[JSON_NUMBER_TOKEN])),
            None => Err(de::Error::invalid_type(Unexpected::Map, &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Volume {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let VolumeText(text) = VolumeText::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
