//! Human-readable order numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`TrackerNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerNumberError {
    /// The input string is empty.
    #[error("tracker number cannot be empty")]
    Empty,
    /// The input does not start with the `TR` prefix.
    #[error("tracker number must start with TR")]
    MissingPrefix,
    /// The input is not exactly `TR` followed by eight digits.
    #[error("tracker number must be TR followed by 8 digits")]
    InvalidLength,
    /// A non-digit appears after the prefix.
    #[error("tracker number must contain only digits after TR")]
    NonDigit,
    /// The month component is not between 01 and 12.
    #[error("tracker number month must be 01-12 (got {0:02})")]
    InvalidMonth(u32),
}

/// A tracker number of the form `TR<YY><MM><NNNN>`.
///
/// The upstream API assigns these when an order is first saved. The panel
/// never generates them; it only parses them for display (year, month and
/// running counter).
///
/// ## Examples
///
/// ```
/// use cephas_core::TrackerNumber;
///
/// let number = TrackerNumber::parse("TR25040012").unwrap();
/// assert_eq!(number.year(), 2025);
/// assert_eq!(number.month(), 4);
/// assert_eq!(number.sequence(), 12);
///
/// assert!(TrackerNumber::parse("TR2504").is_err());
/// assert!(TrackerNumber::parse("XX25040012").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct TrackerNumber(String);

impl TrackerNumber {
    /// Prefix shared by every tracker number.
    pub const PREFIX: &'static str = "TR";

    /// Number of digits after the prefix.
    const DIGITS: usize = 8;

    /// Parse a `TrackerNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, lacks the `TR` prefix, is not
    /// followed by exactly eight digits, or carries a month outside 01-12.
    pub fn parse(s: &str) -> Result<Self, TrackerNumberError> {
        if s.is_empty() {
            return Err(TrackerNumberError::Empty);
        }

        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or(TrackerNumberError::MissingPrefix)?;

        if digits.len() != Self::DIGITS {
            return Err(TrackerNumberError::InvalidLength);
        }

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TrackerNumberError::NonDigit);
        }

        let month = digits
            .get(2..4)
            .and_then(|m| m.parse::<u32>().ok())
            .unwrap_or(0);
        if !(1..=12).contains(&month) {
            return Err(TrackerNumberError::InvalidMonth(month));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the tracker number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn digits(&self, range: core::ops::Range<usize>) -> u32 {
        self.0
            .get(Self::PREFIX.len()..)
            .and_then(|d| d.get(range))
            .and_then(|d| d.parse().ok())
            .unwrap_or(0)
    }

    /// Four-digit year the order was created in.
    #[must_use]
    pub fn year(&self) -> i32 {
        2000 + i32::try_from(self.digits(0..2)).unwrap_or(0)
    }

    /// Month (1-12) the order was created in.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.digits(2..4)
    }

    /// Running counter within the month.
    #[must_use]
    pub fn sequence(&self) -> u32 {
        self.digits(4..8)
    }
}

impl fmt::Display for TrackerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TrackerNumber {
    type Err = TrackerNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TrackerNumber {
    type Error = TrackerNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TrackerNumber> for String {
    fn from(value: TrackerNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for TrackerNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(TrackerNumber::parse("TR25010001").is_ok());
        assert!(TrackerNumber::parse("TR99129999").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(TrackerNumber::parse(""), Err(TrackerNumberError::Empty));
    }

    #[test]
    fn test_parse_missing_prefix() {
        assert_eq!(
            TrackerNumber::parse("25040012"),
            Err(TrackerNumberError::MissingPrefix)
        );
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            TrackerNumber::parse("TR250400123"),
            Err(TrackerNumberError::InvalidLength)
        );
    }

    #[test]
    fn test_parse_non_digit() {
        assert_eq!(
            TrackerNumber::parse("TR2504A012"),
            Err(TrackerNumberError::NonDigit)
        );
    }

    #[test]
    fn test_parse_invalid_month() {
        assert_eq!(
            TrackerNumber::parse("TR25130001"),
            Err(TrackerNumberError::InvalidMonth(13))
        );
    }

    #[test]
    fn test_components() {
        let number = TrackerNumber::parse("TR24110305").unwrap();
        assert_eq!(number.year(), 2024);
        assert_eq!(number.month(), 11);
        assert_eq!(number.sequence(), 305);
    }

    #[test]
    fn test_serde_rejects_malformed() {
        assert!(serde_json::from_str::<TrackerNumber>("\"TR1\"").is_err());
        let parsed: TrackerNumber = serde_json::from_str("\"TR25040012\"").unwrap();
        assert_eq!(parsed.as_str(), "TR25040012");
    }
}
