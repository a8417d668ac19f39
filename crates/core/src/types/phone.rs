//! Phone number type for order contact details.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input contains characters other than digits, spaces, `+`, `-`, `(`, `)`.
    #[error("phone may only contain digits, spaces, '+', '-', '(' and ')'")]
    InvalidCharacter,
    /// A `+` appears anywhere but the first position.
    #[error("'+' is only allowed at the start of a phone number")]
    MisplacedPlus,
    /// Too few or too many digits.
    #[error("phone must contain between {min} and {max} digits")]
    DigitCount {
        /// Minimum digits.
        min: usize,
        /// Maximum digits.
        max: usize,
    },
}

/// A loosely formatted phone number.
///
/// Keeps the customer's formatting (spaces, dashes, parentheses) but requires
/// 7-15 digits, the E.164 upper bound.
///
/// ```
/// use petal_core::Phone;
///
/// assert!(Phone::parse("+52 (55) 1234-5678").is_ok());
/// assert!(Phone::parse("12345").is_err());
/// assert!(Phone::parse("call me").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    /// Fewest digits accepted.
    pub const MIN_DIGITS: usize = 7;
    /// Most digits accepted.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] describing the first constraint violated.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let mut digits = 0;
        for (i, c) in s.char_indices() {
            match c {
                '0'..='9' => digits += 1,
                '+' if i == 0 => {}
                '+' => return Err(PhoneError::MisplacedPlus),
                ' ' | '-' | '(' | ')' => {}
                _ => return Err(PhoneError::InvalidCharacter),
            }
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits) {
            return Err(PhoneError::DigitCount {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as entered (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Phone {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_formats() {
        assert!(Phone::parse("5551234567").is_ok());
        assert!(Phone::parse("+1 555-123-4567").is_ok());
        assert!(Phone::parse("(55) 1234 5678").is_ok());
    }

    #[test]
    fn test_parse_rejects_letters() {
        assert_eq!(Phone::parse("555-FLOWERS"), Err(PhoneError::InvalidCharacter));
    }

    #[test]
    fn test_parse_rejects_inner_plus() {
        assert_eq!(Phone::parse("555+1234567"), Err(PhoneError::MisplacedPlus));
    }

    #[test]
    fn test_parse_digit_bounds() {
        assert!(matches!(
            Phone::parse("123-456"),
            Err(PhoneError::DigitCount { .. })
        ));
        assert!(matches!(
            Phone::parse("1234567890123456"),
            Err(PhoneError::DigitCount { .. })
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse("  "), Err(PhoneError::Empty));
    }
}
