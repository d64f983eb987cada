//! Branch colors.
//!
//! Well-known branch names map to fixed colors so a branch keeps its color
//! across rebuilds. Everything else shares the "other" color, except the
//! primary branch which always takes the main color.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An invalid color literal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid color `{value}`: expected #rrggbb")]
pub struct ColorError {
    pub value: String,
}

/// A 24-bit RGB color, written as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn r(self) -> u8 {
        self.0
    }

    pub const fn g(self) -> u8 {
        self.1
    }

    pub const fn b(self) -> u8 {
        self.2
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorError {
            value: s.to_owned(),
        };
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Branch and merge-edge colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub main: Rgb,
    pub dev: Rgb,
    pub feature: Rgb,
    pub bugfix: Rgb,
    pub other: Rgb,
    pub merge: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            main: Rgb(0x2e, 0xcc, 0x71),
            dev: Rgb(0x34, 0x98, 0xdb),
            feature: Rgb(0xf3, 0x9c, 0x12),
            bugfix: Rgb(0xe7, 0x4c, 0x3c),
            other: Rgb(0x9b, 0x59, 0xb6),
            merge: Rgb(0xff, 0xfa, 0x65),
        }
    }
}

impl Palette {
    /// Color for a well-known branch name (case-insensitive), if any.
    pub fn named(&self, branch: &str) -> Option<Rgb> {
        match branch.to_lowercase().as_str() {
            "main" => Some(self.main),
            "dev" => Some(self.dev),
            "feature" => Some(self.feature),
            "bugfix" => Some(self.bugfix),
            _ => None,
        }
    }

    /// Color of a branch lane. A well-known name wins, then the primary
    /// falls back to main, and everything else is "other".
    pub fn branch_color(&self, branch: &str, is_primary: bool) -> Rgb {
        self.named(branch).unwrap_or(if is_primary { self.main } else { self.other })
    }
}
