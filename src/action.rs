//! Order action: Buy or Sell

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Direction of a trade instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Action {
    Buy,
    Sell,
}

impl FromStr for Action {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("BUY") {
            Ok(Action::Buy)
        } else if trimmed.eq_ignore_ascii_case("SELL") {
            Ok(Action::Sell)
        } else {
            Err(ValidationError::InvalidAction(trimmed.to_string()))
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}
