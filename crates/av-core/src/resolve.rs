//! Latest-count resolution.
//!
//! Three stores can hold a quantity for the same item: the live counts of the
//! most recently created session, and historical counts recorded per academic
//! term (from imports or from completed sessions). Every view that shows a
//! "current" or "previous" quantity goes through [`CountResolver`], so the
//! precedence below is decided in exactly one place.
//!
//! Precedence, highest first:
//!
//! 1. The live count of the most recent session. Historical rows written by that
//!    session, or recorded under its term, are superseded and dropped.
//! 2. Historical counts whose term is known, by `(year, term rank)` descending,
//!    then `imported_at` descending.
//! 3. Historical counts whose term id is dangling, by `imported_at` descending.
//!
//! `latest` is the first element of that ordering and `previous` the second.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{AcademicTerm, HistoricalCount, InventorySession, SessionCount, TermKey};

/// Where a resolved quantity came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CountSource {
    Session {
        session_id: String,
        count_id: String,
        term: TermKey,
        quantity: i64,
        counted_at: DateTime<Utc>,
    },
    Historical {
        count_id: String,
        academic_term_id: String,
        /// `None` when the term id does not match any stored term.
        term: Option<TermKey>,
        quantity: i64,
        imported_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    DanglingTerm,
    Historical,
    Live,
}

/// Sort key; the derived `Ord` compares fields in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Precedence {
    tier: Tier,
    term: Option<TermKey>,
    at: DateTime<Utc>,
}

impl CountSource {
    #[must_use]
    pub const fn quantity(&self) -> i64 {
        match self {
            Self::Session { quantity, .. } | Self::Historical { quantity, .. } => *quantity,
        }
    }

    #[must_use]
    pub fn count_id(&self) -> &str {
        match self {
            Self::Session { count_id, .. } | Self::Historical { count_id, .. } => count_id,
        }
    }

    /// Term the quantity belongs to, if known.
    #[must_use]
    pub const fn term(&self) -> Option<TermKey> {
        match self {
            Self::Session { term, .. } => Some(*term),
            Self::Historical { term, .. } => *term,
        }
    }

    #[must_use]
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Session { .. })
    }

    fn precedence(&self) -> Precedence {
        match self {
            Self::Session {
                term, counted_at, ..
            } => Precedence {
                tier: Tier::Live,
                term: Some(*term),
                at: *counted_at,
            },
            Self::Historical {
                term, imported_at, ..
            } => Precedence {
                tier: if term.is_some() {
                    Tier::Historical
                } else {
                    Tier::DanglingTerm
                },
                term: *term,
                at: *imported_at,
            },
        }
    }
}

/// Descending precedence, count id ascending as the final tie-break.
fn compare_sources(a: &CountSource, b: &CountSource) -> Ordering {
    b.precedence()
        .cmp(&a.precedence())
        .then_with(|| a.count_id().cmp(b.count_id()))
}

/// The two most authoritative quantities for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCount {
    pub latest: Option<CountSource>,
    pub previous: Option<CountSource>,
}

impl ResolvedCount {
    /// Latest quantity; an item that was never counted reports 0.
    #[must_use]
    pub fn latest_quantity(&self) -> i64 {
        self.latest.as_ref().map_or(0, CountSource::quantity)
    }

    #[must_use]
    pub fn previous_quantity(&self) -> i64 {
        self.previous.as_ref().map_or(0, CountSource::quantity)
    }

    /// `latest - previous`, treating missing quantities as 0.
    #[must_use]
    pub fn change(&self) -> i64 {
        self.latest_quantity() - self.previous_quantity()
    }

    #[must_use]
    pub const fn has_count(&self) -> bool {
        self.latest.is_some()
    }
}

/// Live counts of one session, fed to the resolver.
#[derive(Debug, Clone, Copy)]
pub struct LiveSession<'a> {
    pub session: &'a InventorySession,
    pub counts: &'a [SessionCount],
}

/// Indexes the count sources once and resolves any number of items.
pub struct CountResolver<'a> {
    terms: HashMap<&'a str, TermKey>,
    history: HashMap<&'a str, Vec<&'a HistoricalCount>>,
    live_session: Option<&'a InventorySession>,
    live_counts: HashMap<&'a str, &'a SessionCount>,
}

impl<'a> CountResolver<'a> {
    #[must_use]
    pub fn new(
        history: &'a [HistoricalCount],
        terms: &'a [AcademicTerm],
        live: Option<LiveSession<'a>>,
    ) -> Self {
        let terms = terms.iter().map(|t| (t.id.as_str(), t.key())).collect();

        let mut by_item: HashMap<&str, Vec<&HistoricalCount>> = HashMap::new();
        for count in history {
            by_item.entry(count.item_id.as_str()).or_default().push(count);
        }

        let mut live_counts: HashMap<&str, &SessionCount> = HashMap::new();
        if let Some(live) = live {
            for count in live.counts.iter().filter(|c| c.session_id == live.session.id) {
                live_counts
                    .entry(count.item_id.as_str())
                    .and_modify(|existing| {
                        if count.counted_at > existing.counted_at {
                            *existing = count;
                        }
                    })
                    .or_insert(count);
            }
        }

        Self {
            terms,
            history: by_item,
            live_session: live.map(|l| l.session),
            live_counts,
        }
    }

    /// Term key for a stored term id.
    #[must_use]
    pub fn term_key(&self, academic_term_id: &str) -> Option<TermKey> {
        self.terms.get(academic_term_id).copied()
    }

    /// Every source for `item_id`, most authoritative first.
    #[must_use]
    pub fn sources(&self, item_id: &str) -> Vec<CountSource> {
        let live = self
            .live_session
            .zip(self.live_counts.get(item_id).copied());

        let mut sources: Vec<CountSource> = self
            .history
            .get(item_id)
            .into_iter()
            .flatten()
            .filter(|h| !live.is_some_and(|(session, _)| self.is_superseded_by(h, session)))
            .map(|h| CountSource::Historical {
                count_id: h.id.clone(),
                academic_term_id: h.academic_term_id.clone(),
                term: self.term_key(&h.academic_term_id),
                quantity: h.counted_quantity,
                imported_at: h.imported_at,
            })
            .collect();

        if let Some((session, count)) = live {
            sources.push(CountSource::Session {
                session_id: session.id.clone(),
                count_id: count.id.clone(),
                term: session.term_key(),
                quantity: count.counted_quantity,
                counted_at: count.counted_at,
            });
        }

        sources.sort_by(compare_sources);
        sources
    }

    /// Latest and previous quantity for `item_id`.
    #[must_use]
    pub fn resolve(&self, item_id: &str) -> ResolvedCount {
        let mut ordered = self.sources(item_id).into_iter();
        ResolvedCount {
            latest: ordered.next(),
            previous: ordered.next(),
        }
    }

    fn is_superseded_by(&self, count: &HistoricalCount, session: &InventorySession) -> bool {
        count.session_id.as_deref() == Some(session.id.as_str())
            || session.academic_term_id.as_deref() == Some(count.academic_term_id.as_str())
            || self.term_key(&count.academic_term_id) == Some(session.term_key())
    }
}

/// Resolve a single item. Prefer [`CountResolver`] when resolving many items.
#[must_use]
pub fn resolve_count(
    item_id: &str,
    history: &[HistoricalCount],
    terms: &[AcademicTerm],
    live: Option<LiveSession<'_>>,
) -> ResolvedCount {
    CountResolver::new(history, terms, live).resolve(item_id)
}

/// The most recently created session (ties: later `date`, then higher id).
#[must_use]
pub fn most_recent_session(sessions: &[InventorySession]) -> Option<&InventorySession> {
    sessions.iter().max_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.date.cmp(&b.date))
            .then_with(|| a.id.cmp(&b.id))
    })
}

/// Chronological order of two stored terms: year, then in-year rank.
#[must_use]
pub fn term_order(a: &AcademicTerm, b: &AcademicTerm) -> Ordering {
    a.key().cmp(&b.key())
}

/// The stored term with the greatest `(year, rank)`.
#[must_use]
pub fn latest_term(terms: &[AcademicTerm]) -> Option<&AcademicTerm> {
    terms
        .iter()
        .max_by(|a, b| term_order(a, b).then_with(|| a.created_at.cmp(&b.created_at)))
}

/// Terms sorted most recent first.
#[must_use]
pub fn terms_newest_first(terms: &[AcademicTerm]) -> Vec<&AcademicTerm> {
    let mut sorted: Vec<&AcademicTerm> = terms.iter().collect();
    sorted.sort_by(|a, b| term_order(b, a).then_with(|| a.id.cmp(&b.id)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::TermType;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn term(id: &str, term: TermType, year: i32) -> AcademicTerm {
        AcademicTerm {
            id: id.into(),
            name: format!("{term} {year}"),
            term,
            year,
            start_date: None,
            end_date: None,
            created_at: at(0),
        }
    }

    fn hist(id: &str, item: &str, term_id: &str, qty: i64, imported: i64) -> HistoricalCount {
        HistoricalCount {
            id: id.into(),
            item_id: item.into(),
            academic_term_id: term_id.into(),
            counted_quantity: qty,
            imported_at: at(imported),
            session_id: None,
            counted_by_uid: None,
            notes: None,
        }
    }

    fn session(id: &str, t: TermType, year: i32, term_id: Option<&str>) -> InventorySession {
        InventorySession {
            id: id.into(),
            name: "count".into(),
            academic_term_id: term_id.map(String::from),
            term: t,
            term_year: year,
            date: at(100),
            is_complete: term_id.is_some(),
            conducted_by_uid: None,
            notes: None,
            created_at: at(100),
        }
    }

    fn live(id: &str, item: &str, session_id: &str, qty: i64) -> SessionCount {
        SessionCount {
            id: id.into(),
            item_id: item.into(),
            session_id: session_id.into(),
            counted_quantity: qty,
            counted_by_uid: None,
            counted_at: at(200),
            notes: None,
        }
    }

    #[test]
    fn no_counts_resolves_to_zero() {
        let resolved = resolve_count("itm-1", &[], &[], None);
        assert_eq!(resolved.latest_quantity(), 0);
        assert_eq!(resolved.previous_quantity(), 0);
        assert!(!resolved.has_count());
    }

    #[test]
    fn spring_after_fall_of_previous_year() {
        let terms = vec![
            term("trm-f23", TermType::Fall, 2023),
            term("trm-s24", TermType::Spring, 2024),
        ];
        let history = vec![
            hist("hct-1", "itm-1", "trm-f23", 10, 0),
            hist("hct-2", "itm-1", "trm-s24", 7, 0),
        ];
        let resolved = resolve_count("itm-1", &history, &terms, None);
        assert_eq!(resolved.latest_quantity(), 7);
        assert_eq!(resolved.previous_quantity(), 10);
        assert_eq!(
            resolved.latest.unwrap().term(),
            Some(TermKey::new(TermType::Spring, 2024))
        );
    }

    #[test]
    fn rank_orders_terms_within_a_year() {
        let terms = vec![
            term("trm-w", TermType::Winter, 2024),
            term("trm-sp", TermType::Spring, 2024),
            term("trm-su", TermType::Summer, 2024),
            term("trm-f", TermType::Fall, 2024),
        ];
        let history = vec![
            hist("hct-1", "itm-1", "trm-sp", 1, 0),
            hist("hct-2", "itm-1", "trm-w", 4, 0),
            hist("hct-3", "itm-1", "trm-su", 2, 0),
            hist("hct-4", "itm-1", "trm-f", 3, 0),
        ];
        let resolver = CountResolver::new(&history, &terms, None);
        let quantities: Vec<i64> = resolver
            .sources("itm-1")
            .iter()
            .map(CountSource::quantity)
            .collect();
        assert_eq!(quantities, vec![4, 3, 2, 1]);
    }

    #[test]
    fn zero_is_a_real_count() {
        let terms = vec![
            term("trm-a", TermType::Fall, 2023),
            term("trm-b", TermType::Spring, 2024),
        ];
        let history = vec![
            hist("hct-1", "itm-1", "trm-a", 5, 0),
            hist("hct-2", "itm-1", "trm-b", 0, 0),
        ];
        let resolved = resolve_count("itm-1", &history, &terms, None);
        assert!(resolved.has_count());
        assert_eq!(resolved.latest_quantity(), 0);
        assert_eq!(resolved.previous_quantity(), 5);
        assert_eq!(resolved.change(), -5);
    }

    #[test]
    fn same_term_ties_break_on_import_time() {
        // Duplicate rows for one (item, term) can exist in imported data.
        let terms = vec![term("trm-a", TermType::Fall, 2023)];
        let history = vec![
            hist("hct-old", "itm-1", "trm-a", 3, 10),
            hist("hct-new", "itm-1", "trm-a", 9, 20),
        ];
        let resolved = resolve_count("itm-1", &history, &terms, None);
        assert_eq!(resolved.latest_quantity(), 9);
        assert_eq!(resolved.previous_quantity(), 3);
    }

    #[test]
    fn dangling_terms_fall_back_to_import_time_after_known_terms() {
        let terms = vec![term("trm-a", TermType::Spring, 2020)];
        let history = vec![
            hist("hct-1", "itm-1", "trm-missing-1", 11, 50),
            hist("hct-2", "itm-1", "trm-a", 4, 0),
            hist("hct-3", "itm-1", "trm-missing-2", 12, 60),
        ];
        let resolver = CountResolver::new(&history, &terms, None);
        let quantities: Vec<i64> = resolver
            .sources("itm-1")
            .iter()
            .map(CountSource::quantity)
            .collect();
        assert_eq!(quantities, vec![4, 12, 11]);
    }

    #[test]
    fn only_dangling_terms_use_newest_import() {
        let history = vec![
            hist("hct-1", "itm-1", "trm-x", 1, 5),
            hist("hct-2", "itm-1", "trm-y", 2, 9),
        ];
        let resolved = resolve_count("itm-1", &history, &[], None);
        assert_eq!(resolved.latest_quantity(), 2);
        assert_eq!(resolved.previous_quantity(), 1);
    }

    #[test]
    fn live_session_count_wins_over_history() {
        let terms = vec![term("trm-f23", TermType::Fall, 2023)];
        let history = vec![hist("hct-1", "itm-1", "trm-f23", 10, 0)];
        let ses = session("ses-1", TermType::Spring, 2024, None);
        let counts = vec![live("cnt-1", "itm-1", "ses-1", 8)];
        let resolved = resolve_count(
            "itm-1",
            &history,
            &terms,
            Some(LiveSession {
                session: &ses,
                counts: &counts,
            }),
        );
        assert!(resolved.latest.as_ref().unwrap().is_live());
        assert_eq!(resolved.latest_quantity(), 8);
        assert_eq!(resolved.previous_quantity(), 10);
    }

    #[test]
    fn live_count_supersedes_history_of_same_term() {
        let terms = vec![
            term("trm-f23", TermType::Fall, 2023),
            term("trm-s24", TermType::Spring, 2024),
        ];
        let mut synced = hist("hct-2", "itm-1", "trm-s24", 6, 0);
        synced.session_id = Some("ses-1".into());
        let history = vec![hist("hct-1", "itm-1", "trm-f23", 10, 0), synced];
        let ses = session("ses-1", TermType::Spring, 2024, Some("trm-s24"));
        let counts = vec![live("cnt-1", "itm-1", "ses-1", 8)];
        let resolved = resolve_count(
            "itm-1",
            &history,
            &terms,
            Some(LiveSession {
                session: &ses,
                counts: &counts,
            }),
        );
        assert_eq!(resolved.latest_quantity(), 8);
        assert_eq!(resolved.previous_quantity(), 10);
    }

    #[test]
    fn item_without_live_count_ignores_session() {
        let terms = vec![term("trm-f23", TermType::Fall, 2023)];
        let history = vec![hist("hct-1", "itm-1", "trm-f23", 10, 0)];
        let ses = session("ses-1", TermType::Fall, 2023, None);
        let counts = vec![live("cnt-1", "itm-2", "ses-1", 8)];
        let resolved = resolve_count(
            "itm-1",
            &history,
            &terms,
            Some(LiveSession {
                session: &ses,
                counts: &counts,
            }),
        );
        assert!(!resolved.latest.as_ref().unwrap().is_live());
        assert_eq!(resolved.latest_quantity(), 10);
    }

    #[test]
    fn counts_of_other_sessions_are_not_live() {
        let ses = session("ses-1", TermType::Fall, 2023, None);
        let counts = vec![live("cnt-1", "itm-1", "ses-other", 8)];
        let resolved = resolve_count(
            "itm-1",
            &[],
            &[],
            Some(LiveSession {
                session: &ses,
                counts: &counts,
            }),
        );
        assert!(!resolved.has_count());
    }

    #[test]
    fn most_recent_session_uses_creation_time() {
        let mut older = session("ses-a", TermType::Fall, 2023, None);
        older.created_at = at(1);
        let mut newer = session("ses-b", TermType::Fall, 2023, None);
        newer.created_at = at(2);
        let sessions = vec![newer.clone(), older];
        assert_eq!(most_recent_session(&sessions).unwrap().id, "ses-b");
        assert!(most_recent_session(&[]).is_none());
    }

    #[test]
    fn latest_term_is_greatest_key_not_insertion_order() {
        let terms = vec![
            term("trm-1", TermType::Winter, 2023),
            term("trm-2", TermType::Spring, 2024),
            term("trm-3", TermType::Fall, 2023),
        ];
        assert_eq!(latest_term(&terms).unwrap().id, "trm-2");
        let ids: Vec<&str> = terms_newest_first(&terms)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["trm-2", "trm-1", "trm-3"]);
    }
}
