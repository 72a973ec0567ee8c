//! `#RRGGBB` filament colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Reasons a hex color string is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,

    #[error("color must start with '#'")]
    MissingHash,

    #[error("expected 6 hex digits")]
    InvalidLength,

    #[error("invalid hex digits")]
    InvalidHex,
}

/// An RGB color parsed from a `#RRGGBB` string.
///
/// Only the six-digit form is accepted; three-digit shorthand and alpha
/// channels are rejected so that every stored value round-trips exactly.
///
/// # Examples
///
/// ```
/// use swapforge_core::HexColor;
///
/// let red: HexColor = "#FF0000".parse().unwrap();
/// assert_eq!(red.to_string(), "#FF0000");
/// assert!("#F00".parse::<HexColor>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a string matching `^#[0-9A-Fa-f]{6}$`.
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        use ColorParseError::*;

        if s.is_empty() {
            return Err(Empty);
        }
        let digits = s.strip_prefix('#').ok_or(MissingHash)?;
        let bytes = digits.as_bytes();
        if bytes.len() != 6 {
            return Err(InvalidLength);
        }

        let nibble = |c: u8| -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        };
        let byte = |i: usize| -> Result<u8, ColorParseError> {
            let hi = nibble(bytes[i]).ok_or(InvalidHex)?;
            let lo = nibble(bytes[i + 1]).ok_or(InvalidHex)?;
            Ok((hi << 4) | lo)
        };

        Ok(Self {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
        })
    }

    pub fn r(&self) -> u8 {
        self.r
    }

    pub fn g(&self) -> u8 {
        self.g
    }

    pub fn b(&self) -> u8 {
        self.b
    }

    /// Perceptual distance between two colors.
    ///
    /// Uses the "red-mean" weighted Euclidean approximation: cheap, symmetric
    /// and close enough to CIE distances for ranking filament pairs. Identical
    /// colors have distance 0; black to white is roughly 765.
    pub fn distance(&self, other: &HexColor) -> f64 {
        let r_mean = (f64::from(self.r) + f64::from(other.r)) / 2.0;
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);

        ((2.0 + r_mean / 256.0) * dr * dr
            + 4.0 * dg * dg
            + (2.0 + (255.0 - r_mean) / 256.0) * db * db)
            .sqrt()
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HexColor::parse(&s).map_err(serde::de::Error::custom)
    }
}
