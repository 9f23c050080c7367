//! Validation rules for controlled-substance records

use rust_decimal::Decimal;

/// Validate medication code format (3-32 chars, uppercase alphanumeric with
/// dashes, e.g., "FENTANYL-100")
pub fn validate_medication_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Medication code must be at least 3 characters");
    }
    if code.len() > 32 {
        return Err("Medication code must be at most 32 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Medication code must be uppercase alphanumeric with dashes");
    }
    Ok(())
}

/// Validate a quantity entered by a human is positive; the sign of a ledger
/// amount comes from the event modifier, never from the operator.
pub fn validate_positive_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive");
    }
    Ok(())
}

/// Validate concentration is usable as a divisor in volume conversion
pub fn validate_concentration(concentration: Decimal) -> Result<(), &'static str> {
    if concentration <= Decimal::ZERO {
        return Err("Concentration must be positive and non-zero");
    }
    Ok(())
}

/// Validate fill amount (solvent volume per container)
pub fn validate_fill_amount(fill_amount: Decimal) -> Result<(), &'static str> {
    if fill_amount <= Decimal::ZERO {
        return Err("Fill amount must be positive");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_medication_code_valid() {
        assert!(validate_medication_code("FENTANYL-100").is_ok());
        assert!(validate_medication_code("MORPHINE").is_ok());
        assert!(validate_medication_code("KET").is_ok());
    }

    #[test]
    fn test_validate_medication_code_invalid() {
        assert!(validate_medication_code("FE").is_err()); // Too short
        assert!(validate_medication_code("fentanyl").is_err()); // Lowercase
        assert!(validate_medication_code("FENTANYL 100").is_err()); // Space
        assert!(validate_medication_code(&"A".repeat(33)).is_err()); // Too long
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(dec("0.01")).is_ok());
        assert!(validate_positive_amount(Decimal::ZERO).is_err());
        assert!(validate_positive_amount(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_concentration() {
        assert!(validate_concentration(dec("50")).is_ok());
        assert!(validate_concentration(Decimal::ZERO).is_err());
        assert!(validate_concentration(dec("-0.5")).is_err());
    }

    #[test]
    fn test_validate_fill_amount() {
        assert!(validate_fill_amount(dec("2")).is_ok());
        assert!(validate_fill_amount(Decimal::ZERO).is_err());
    }
}
