//! WhatsApp phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneNumberError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains something other than digits.
    #[error("phone number may only contain digits (found {0:?})")]
    InvalidCharacter(char),
    /// The number has too few or too many digits.
    #[error("phone number must have {min}-{max} digits (got {len})")]
    InvalidLength {
        /// Number of digits supplied.
        len: usize,
        /// Minimum allowed digits.
        min: usize,
        /// Maximum allowed digits.
        max: usize,
    },
}

/// An E.164 phone number stored as bare digits (country code first, no `+`).
///
/// This is the form WhatsApp expects in `phone=` and `wa.me/` links.
///
/// ## Constraints
///
/// - An optional leading `+` is accepted and dropped
/// - Spaces are ignored
/// - Remaining characters must be ASCII digits
/// - 8-15 digits (E.164 allows at most 15)
///
/// ## Examples
///
/// ```
/// use queens_beauty_core::PhoneNumber;
///
/// assert_eq!(PhoneNumber::parse("+254 714 137554").unwrap().as_str(), "254714137554");
/// assert!(PhoneNumber::parse("0714-137-554").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 8;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains non-digit
    /// characters, or has the wrong number of digits.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut digits = String::with_capacity(body.len());
        for ch in body.chars().filter(|c| *c != ' ') {
            if !ch.is_ascii_digit() {
                return Err(PhoneNumberError::InvalidCharacter(ch));
            }
            digits.push(ch);
        }

        if digits.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneNumberError::InvalidLength {
                len: digits.len(),
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
