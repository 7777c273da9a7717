//! Lifecycle status enums and vote categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status of a game session. At most one session is `Active` at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// Status of a participant. The transition `Active -> Eliminated` is one-way:
/// no participant ever returns to `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Active,
    Eliminated,
}

/// Category of a vote. Each voter may cast at most one vote per category
/// per round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteCategory {
    Mvp,
    Eliminate,
}

impl VoteCategory {
    /// All categories, in their canonical order.
    pub const ALL: [VoteCategory; 2] = [VoteCategory::Mvp, VoteCategory::Eliminate];

    /// Stable single-byte discriminant used in storage keys.
    pub fn as_byte(&self) -> u8 {
        match self {
            VoteCategory::Mvp => 0,
            VoteCategory::Eliminate => 1,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(VoteCategory::Mvp),
            1 => Some(VoteCategory::Eliminate),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteCategory::Mvp => "mvp",
            VoteCategory::Eliminate => "eliminate",
        }
    }
}

impl fmt::Display for VoteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown vote category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown vote category: {0}")]
pub struct ParseCategoryError(String);

impl FromStr for VoteCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mvp" => Ok(VoteCategory::Mvp),
            "eliminate" => Ok(VoteCategory::Eliminate),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_byte_roundtrip() {
        for cat in VoteCategory::ALL {
            assert_eq!(VoteCategory::from_byte(cat.as_byte()), Some(cat));
        }
        assert_eq!(VoteCategory::from_byte(7), None);
    }

    #[test]
    fn category_parse() {
        assert_eq!("mvp".parse(), Ok(VoteCategory::Mvp));
        assert_eq!("eliminate".parse(), Ok(VoteCategory::Eliminate));
        assert!("MVP".parse::<VoteCategory>().is_err());
        assert!("banana".parse::<VoteCategory>().is_err());
    }

    #[test]
    fn status_serde_lowercase() {
        let json = serde_json::to_string(&SessionStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
        let json = serde_json::to_string(&ParticipantStatus::Eliminated).unwrap();
        assert_eq!(json, "\"eliminated\"");
    }
}
