//! Password strength policy shared by signup and password reset.
//!
//! The rule order is part of the contract: the message shown for a given
//! failing password is deterministic, so callers can rely on it.

use std::fmt;

/// Punctuation accepted for the symbol requirement.
const SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

const MIN_LENGTH: usize = 8;

pub const STRONG_PASSWORD_MESSAGE: &str = "Password is strong";

/// First rule a password failed, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordViolation {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
    MissingSymbol,
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordViolation::TooShort => {
                write!(f, "Password must be at least {} characters long", MIN_LENGTH)
            }
            PasswordViolation::MissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            PasswordViolation::MissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            PasswordViolation::MissingDigit => {
                write!(f, "Password must contain at least one number")
            }
            PasswordViolation::MissingSymbol => {
                write!(f, "Password must contain at least one special character")
            }
        }
    }
}

impl std::error::Error for PasswordViolation {}

/// Outcome of a strength check, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    pub is_valid: bool,
    pub message: String,
}

/// Password policy validation.
#[derive(Debug, Clone)]
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Validate a password against the platform policy.
    ///
    /// Rules run in a fixed order and the first violation wins.
    pub fn validate(password: &str) -> Result<(), PasswordViolation> {
        if password.len() < MIN_LENGTH {
            return Err(PasswordViolation::TooShort);
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PasswordViolation::MissingUppercase);
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PasswordViolation::MissingLowercase);
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordViolation::MissingDigit);
        }

        if !password.chars().any(|c| SYMBOLS.contains(c)) {
            return Err(PasswordViolation::MissingSymbol);
        }

        Ok(())
    }

    /// Validate and package the displayable outcome.
    pub fn check(password: &str) -> PasswordStrength {
        match Self::validate(password) {
            Ok(()) => PasswordStrength {
                is_valid: true,
                message: STRONG_PASSWORD_MESSAGE.to_string(),
            },
            Err(violation) => PasswordStrength {
                is_valid: false,
                message: violation.to_string(),
            },
        }
    }
}
