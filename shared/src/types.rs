//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Units a medication can be dosed and displayed in.
///
/// `Std` is the internal fixed-point representation; the other three are the
/// preferred units humans enter and read. Volume (milliliters) is not a unit
/// here: mass converts to volume through a medication's concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Std,
    Mcg,
    Mg,
    G,
}

impl Unit {
    /// Decimal exponent relative to the standard unit.
    ///
    /// One preferred-unit amount equals `10^exponent` standard units, so the
    /// standard unit keeps two decimal places of sub-microgram headroom while
    /// storing integers: 1 mcg = 100, 1 mg = 100,000, 1 g = 100,000,000.
    pub const fn exponent(self) -> u32 {
        match self {
            Unit::Std => 0,
            Unit::Mcg => 2,
            Unit::Mg => 5,
            Unit::G => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Std => "std",
            Unit::Mcg => "mcg",
            Unit::Mg => "mg",
            Unit::G => "g",
        }
    }

    /// Look up a unit by its code. Returns `None` for anything outside the
    /// four supported codes; callers decide how loudly to fail.
    pub fn from_code(code: &str) -> Option<Unit> {
        match code {
            "std" => Some(Unit::Std),
            "mcg" => Some(Unit::Mcg),
            "mg" => Some(Unit::Mg),
            "g" => Some(Unit::G),
            _ => None,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponent_table() {
        assert_eq!(Unit::Std.exponent(), 0);
        assert_eq!(Unit::Mcg.exponent(), 2);
        assert_eq!(Unit::Mg.exponent(), 5);
        assert_eq!(Unit::G.exponent(), 8);
    }

    #[test]
    fn test_from_code_known() {
        assert_eq!(Unit::from_code("std"), Some(Unit::Std));
        assert_eq!(Unit::from_code("mcg"), Some(Unit::Mcg));
        assert_eq!(Unit::from_code("mg"), Some(Unit::Mg));
        assert_eq!(Unit::from_code("g"), Some(Unit::G));
    }

    #[test]
    fn test_from_code_unknown() {
        assert_eq!(Unit::from_code("kg"), None);
        assert_eq!(Unit::from_code("ML"), None);
        assert_eq!(Unit::from_code(""), None);
    }

    #[test]
    fn test_code_round_trip() {
        for unit in [Unit::Std, Unit::Mcg, Unit::Mg, Unit::G] {
            assert_eq!(Unit::from_code(unit.as_str()), Some(unit));
        }
    }
}
