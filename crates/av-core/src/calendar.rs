//! Academic calendar: which term a date falls in, and term labels in free text.
//!
//! Boundaries (inclusive):
//!
//! ```text
//! SPRING  Jan 16 – May 5
//! SUMMER  May 6  – Aug 19
//! FALL    Aug 20 – Dec 15
//! WINTER  Dec 16 – Jan 15   (January dates keep the calendar year of the date)
//! ```

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::TermKey;
use crate::enums::TermType;

/// The term a given date falls in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CurrentTerm {
    pub term: TermType,
    pub year: i32,
    pub name: String,
}

impl CurrentTerm {
    #[must_use]
    pub const fn key(&self) -> TermKey {
        TermKey::new(self.term, self.year)
    }
}

/// Determine the academic term for `date`.
#[must_use]
pub fn current_term(date: NaiveDate) -> CurrentTerm {
    let (month, day, year) = (date.month(), date.day(), date.year());

    let term = match (month, day) {
        (1, 1..=15) | (12, 16..=31) => TermType::Winter,
        (1, _) | (2..=4, _) | (5, 1..=5) => TermType::Spring,
        (5, _) | (6..=7, _) | (8, 1..=19) => TermType::Summer,
        _ => TermType::Fall,
    };

    CurrentTerm {
        term,
        year,
        name: TermKey::new(term, year).display_name(),
    }
}

/// Parse a free-text period label such as `"Fall 2023"` or `"SPRING-2024 count"`.
///
/// The year must be a standalone 4-digit token starting with `19` or `20`.
#[must_use]
pub fn parse_term_label(label: &str) -> Option<TermKey> {
    let year = label
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()))
        .find(|token| token.starts_with("19") || token.starts_with("20"))
        .and_then(|token| token.parse::<i32>().ok())?;
    let term = TermType::find_in(label)?;
    Some(TermKey::new(term, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[rstest]
    #[case(d(2024, 1, 15), TermType::Winter)]
    #[case(d(2024, 1, 16), TermType::Spring)]
    #[case(d(2024, 5, 5), TermType::Spring)]
    #[case(d(2024, 5, 6), TermType::Summer)]
    #[case(d(2024, 8, 19), TermType::Summer)]
    #[case(d(2024, 8, 20), TermType::Fall)]
    #[case(d(2024, 12, 15), TermType::Fall)]
    #[case(d(2024, 12, 16), TermType::Winter)]
    #[case(d(2024, 10, 1), TermType::Fall)]
    fn boundaries(#[case] date: NaiveDate, #[case] expected: TermType) {
        let current = current_term(date);
        assert_eq!(current.term, expected);
        assert_eq!(current.year, 2024);
    }

    #[test]
    fn name_is_code_and_year() {
        assert_eq!(current_term(d(2025, 3, 1)).name, "SPRING 2025");
    }

    #[rstest]
    #[case("Fall 2023", Some(TermKey::new(TermType::Fall, 2023)))]
    #[case("SPRING-2024", Some(TermKey::new(TermType::Spring, 2024)))]
    #[case("summer 1999 recount", Some(TermKey::new(TermType::Summer, 1999)))]
    #[case("Fall", None)]
    #[case("2024", None)]
    #[case("Fall 12024", None)]
    fn term_labels(#[case] label: &str, #[case] expected: Option<TermKey>) {
        assert_eq!(parse_term_label(label), expected);
    }
}
