//! Display units and size formatting.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::ScanError;

/// Largest unit a size may be displayed in.
///
/// Each step is a factor of 1024. Parsing is case-insensitive on the unit
/// letter (`B`, `K`, `M`, `G`, `T`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[strum(ascii_case_insensitive)]
pub enum Unit {
    #[strum(serialize = "B")]
    Bytes,
    #[strum(serialize = "K")]
    Kilo,
    #[default]
    #[strum(serialize = "M")]
    Mega,
    #[strum(serialize = "G")]
    Giga,
    #[strum(serialize = "T")]
    Tera,
}

impl Unit {
    /// Parse a unit letter, reporting a configuration error on bad input.
    pub fn parse(value: &str) -> Result<Self, ScanError> {
        Self::from_str(value.trim()).map_err(|_| {
            ScanError::config(format!(
                "invalid unit '{value}', expected one of {}",
                Self::VARIANTS.join(", ")
            ))
        })
    }

    /// Position in the B..T ladder.
    pub fn rank(self) -> u32 {
        self as u32
    }

    /// Number of bytes in one of this unit.
    pub fn factor(self) -> u64 {
        1 << (10 * self.rank())
    }

    /// The next smaller unit, if any.
    pub fn smaller(self) -> Option<Self> {
        match self {
            Unit::Bytes => None,
            Unit::Kilo => Some(Unit::Bytes),
            Unit::Mega => Some(Unit::Kilo),
            Unit::Giga => Some(Unit::Mega),
            Unit::Tera => Some(Unit::Giga),
        }
    }

    /// Scale `bytes` for display, never above `self`.
    ///
    /// Steps down while the value would show as zero in its first decimal
    /// digit, so a single byte requested in terabytes still reads `1.0B`.
    pub fn reduce(self, bytes: u64) -> (f64, Unit) {
        let mut unit = self;
        while let Some(smaller) = unit.smaller() {
            if (scaled(bytes, unit) * 10.0) as u64 > 0 {
                break;
            }
            unit = smaller;
        }
        (scaled(bytes, unit), unit)
    }

    /// Format `bytes` with one decimal place and the unit letter.
    pub fn format(self, bytes: u64) -> String {
        let (value, unit) = self.reduce(bytes);
        format!("{value:.1}{unit}")
    }
}

fn scaled(bytes: u64, unit: Unit) -> f64 {
    bytes as f64 / unit.factor() as f64
}
