//! Unit conversion between preferred units, the standard unit, and volume
//!
//! All mass-like quantities are persisted in the fixed-point standard unit
//! (see [`Unit::exponent`]). Every conversion boundary rounds to two decimal
//! places so repeated round-trips are idempotent at reporting precision;
//! deferring the rounding would let floating drift accumulate across a
//! period's worth of adjustments.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::Unit;

/// Decimal places kept at every conversion boundary.
pub const REPORT_PRECISION: u32 = 2;

/// Errors from the conversion service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("unknown unit code: {0}")]
    UnknownUnit(String),

    #[error("concentration must be positive, got {0}")]
    NonPositiveConcentration(Decimal),
}

/// Parse a unit code, failing loudly on anything outside {std, mcg, mg, g}.
pub fn parse_unit(code: &str) -> Result<Unit, ConversionError> {
    Unit::from_code(code).ok_or_else(|| ConversionError::UnknownUnit(code.to_string()))
}

fn scale(unit: Unit) -> Decimal {
    Decimal::from(10u64.pow(unit.exponent()))
}

/// Convert a preferred-unit amount to standard units.
///
/// Sign is preserved; zero maps to zero.
pub fn to_standard(amount: Decimal, unit: Unit) -> Decimal {
    (amount * scale(unit)).round_dp(REPORT_PRECISION)
}

/// Convert a standard-unit amount back to the preferred unit.
pub fn to_preferred(amount: Decimal, unit: Unit) -> Decimal {
    (amount / scale(unit)).round_dp(REPORT_PRECISION)
}

/// Convert a standard-unit amount to milliliters via a medication's
/// concentration (mass per milliliter, in the preferred unit).
pub fn to_milliliters(
    amount: Decimal,
    unit: Unit,
    concentration: Decimal,
) -> Result<Decimal, ConversionError> {
    if concentration <= Decimal::ZERO {
        return Err(ConversionError::NonPositiveConcentration(concentration));
    }
    Ok((to_preferred(amount, unit) / concentration).round_dp(REPORT_PRECISION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_scale_table() {
        assert_eq!(to_standard(Decimal::ONE, Unit::Mcg), dec("100"));
        assert_eq!(to_standard(Decimal::ONE, Unit::Mg), dec("100000"));
        assert_eq!(to_standard(Decimal::ONE, Unit::G), dec("100000000"));
        assert_eq!(to_standard(Decimal::ONE, Unit::Std), dec("1"));
    }

    #[test]
    fn test_to_preferred_inverse() {
        assert_eq!(to_preferred(dec("100"), Unit::Mcg), dec("1.00"));
        assert_eq!(to_preferred(dec("100000"), Unit::Mg), dec("1.00"));
        assert_eq!(to_preferred(dec("100000000"), Unit::G), dec("1.00"));
    }

    #[test]
    fn test_zero_converts_to_zero() {
        for unit in [Unit::Std, Unit::Mcg, Unit::Mg, Unit::G] {
            assert_eq!(to_standard(Decimal::ZERO, unit), Decimal::ZERO);
            assert_eq!(to_preferred(Decimal::ZERO, unit), Decimal::ZERO);
            assert_eq!(
                to_milliliters(Decimal::ZERO, unit, dec("5")).unwrap(),
                Decimal::ZERO
            );
        }
    }

    #[test]
    fn test_negative_amounts_convert_linearly() {
        assert_eq!(to_standard(dec("-4.2"), Unit::Mcg), dec("-420.00"));
        assert_eq!(to_preferred(dec("-420"), Unit::Mcg), dec("-4.20"));
        assert_eq!(
            to_milliliters(dec("-42000"), Unit::Mcg, dec("50")).unwrap(),
            dec("-8.40")
        );
    }

    #[test]
    fn test_volume_conversion() {
        // 10 mg at 5 mg/ml is 2 ml
        let standard = to_standard(dec("10"), Unit::Mg);
        assert_eq!(
            to_milliliters(standard, Unit::Mg, dec("5")).unwrap(),
            dec("2.00")
        );
    }

    #[test]
    fn test_rounding_at_boundary() {
        // 1.005 mcg -> 100.5 standard units, kept exactly at 2 dp
        assert_eq!(to_standard(dec("1.005"), Unit::Mcg), dec("100.50"));
        // sub-precision dust is rounded away
        assert_eq!(to_standard(dec("1.00001"), Unit::Mcg), dec("100.00"));
    }

    #[test]
    fn test_non_positive_concentration_rejected() {
        assert_eq!(
            to_milliliters(dec("100"), Unit::Mcg, Decimal::ZERO),
            Err(ConversionError::NonPositiveConcentration(Decimal::ZERO))
        );
        assert!(to_milliliters(dec("100"), Unit::Mcg, dec("-1")).is_err());
    }

    #[test]
    fn test_parse_unit_unknown_fails() {
        assert_eq!(
            parse_unit("kg"),
            Err(ConversionError::UnknownUnit("kg".to_string()))
        );
        assert!(parse_unit("mg").is_ok());
    }
}
