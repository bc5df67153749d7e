//! Academic term codes.
//!
//! `TermType` serializes as the upper-case code (`"SPRING"`), which is also the
//! value stored in SQL.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// TermType
// ---------------------------------------------------------------------------

/// One of the four fixed yearly periods.
///
/// Variant order is the in-year precedence used for "latest term" decisions:
///
/// ```text
/// SPRING (1) < SUMMER (2) < FALL (3) < WINTER (4)
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TermType {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl TermType {
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Fall, Self::Winter];

    /// Fixed in-year precedence, 1-based.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Spring => 1,
            Self::Summer => 2,
            Self::Fall => 3,
            Self::Winter => 4,
        }
    }

    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
            Self::Winter => "WINTER",
        }
    }

    /// Find a term code anywhere in free text (`"Fall 2023 count"` → `Fall`).
    ///
    /// Codes are checked in declaration order, so text naming two terms
    /// resolves to the earlier code.
    #[must_use]
    pub fn find_in(text: &str) -> Option<Self> {
        let upper = text.to_uppercase();
        Self::ALL.into_iter().find(|t| upper.contains(t.as_str()))
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "unknown term '{s}' (expected SPRING, SUMMER, FALL or WINTER)"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn rank_matches_variant_order() {
        let mut sorted = TermType::ALL;
        sorted.sort();
        assert_eq!(sorted, TermType::ALL);
        for pair in TermType::ALL.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
        }
    }

    #[test]
    fn serializes_as_upper_case_code() {
        let json = serde_json::to_string(&TermType::Fall).unwrap();
        assert_eq!(json, "\"FALL\"");
        let back: TermType = serde_json::from_str("\"WINTER\"").unwrap();
        assert_eq!(back, TermType::Winter);
    }

    #[rstest]
    #[case("spring", TermType::Spring)]
    #[case(" Summer ", TermType::Summer)]
    #[case("FALL", TermType::Fall)]
    #[case("winter", TermType::Winter)]
    fn parses_case_insensitively(#[case] input: &str, #[case] expected: TermType) {
        assert_eq!(input.parse::<TermType>().unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_code() {
        assert!("autumn".parse::<TermType>().is_err());
    }

    #[test]
    fn find_in_free_text() {
        assert_eq!(TermType::find_in("Fall 2023"), Some(TermType::Fall));
        assert_eq!(TermType::find_in("count: summer '24"), Some(TermType::Summer));
        assert_eq!(TermType::find_in("2024"), None);
    }
}
