//! Monetary amounts as banks expect them on the wire.

use crate::QrisError;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// An amount in minor units (sen), rendered as a two-decimal string.
///
/// Both banks validate amounts as text such as `"5000.00"`; keeping the value
/// integral avoids the rounding a float round-trip would introduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    minor: u64,
}

impl Amount {
    #[must_use]
    pub const fn from_minor_units(minor: u64) -> Self {
        Self { minor }
    }

    /// Whole rupiah, e.g. `Amount::from_major_units(5000)` is `"5000.00"`.
    #[must_use]
    pub const fn from_major_units(major: u64) -> Self {
        Self {
            minor: major.saturating_mul(100),
        }
    }

    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.minor
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.minor / 100, self.minor % 100)
    }
}

impl FromStr for Amount {
    type Err = QrisError;

    /// Accepts `"5000"`, `"5000.5"` and `"5000.00"`; rejects signs, exponents,
    /// a trailing point and more than two fraction digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QrisError::InvalidAmount(s.to_string());
        let (int, frac) = match s.split_once('.') {
            Some((_, "")) => return Err(invalid()),
            Some(parts) => parts,
            None => (s, ""),
        };
        if int.is_empty()
            || frac.len() > 2
            || !int.bytes().all(|b| b.is_ascii_digit())
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let major: u64 = int.parse().map_err(|_| invalid())?;
        let minor: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .map(Self::from_minor_units)
            .ok_or_else(invalid)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_fraction_digits() {
        assert_eq!(Amount::from_major_units(5000).to_string(), "5000.00");
        assert_eq!(Amount::from_minor_units(1_500_105).to_string(), "15001.05");
        assert_eq!(Amount::from_minor_units(7).to_string(), "0.07");
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("5000".parse::<Amount>().unwrap().to_string(), "5000.00");
        assert_eq!("5000.5".parse::<Amount>().unwrap().to_string(), "5000.50");
        assert_eq!("15001.00".parse::<Amount>().unwrap().minor_units(), 1_500_100);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", ".50", "-1.00", "1e3", "10.001", "12,50", "abc", "5000."] {
            assert!(bad.parse::<Amount>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Amount::from_major_units(100)).unwrap();
        assert_eq!(json, "\"100.00\"");
    }
}
