//! Derived inventory views: dashboard, trends, stale items, semester history.
//!
//! Everything here is a pure function over an [`InventoryView`] snapshot; the
//! store layer loads the rows and the CLI renders the result.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{CurrentTerm, current_term};
use crate::entities::{
    AcademicTerm, Category, HistoricalCount, InventorySession, Item, SessionCount,
};
use crate::resolve::{CountResolver, LiveSession, latest_term, most_recent_session};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const DEFAULT_TREND_LIMIT: usize = 20;

/// Borrowed snapshot of every table a report reads.
///
/// `session_counts` may hold counts for any session; only those belonging to
/// the most recent session take part in resolution.
#[derive(Debug, Clone, Copy)]
pub struct InventoryView<'a> {
    pub categories: &'a [Category],
    pub items: &'a [Item],
    pub terms: &'a [AcademicTerm],
    pub history: &'a [HistoricalCount],
    pub sessions: &'a [InventorySession],
    pub session_counts: &'a [SessionCount],
}

impl<'a> InventoryView<'a> {
    #[must_use]
    pub fn resolver(&self) -> CountResolver<'a> {
        let live = most_recent_session(self.sessions).map(|session| LiveSession {
            session,
            counts: self.session_counts,
        });
        CountResolver::new(self.history, self.terms, live)
    }

    fn category_names(&self) -> HashMap<&'a str, &'a str> {
        self.categories
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect()
    }

    /// Display names of every stored term, keyed by id.
    #[must_use]
    pub fn term_names(&self) -> HashMap<&'a str, String> {
        self.terms
            .iter()
            .map(|t| (t.id.as_str(), t.key().display_name()))
            .collect()
    }
}

fn category_name<'a>(names: &HashMap<&'a str, &'a str>, id: &str) -> &'a str {
    names.get(id).copied().unwrap_or(UNCATEGORIZED)
}

/// Sorts named categories alphabetically, ignoring case, and "Uncategorized"
/// last. `tiebreak` keeps categories whose names differ only in case apart.
fn group_order(name: &str, tiebreak: &str) -> (bool, String, String) {
    (name == UNCATEGORIZED, name.to_lowercase(), tiebreak.to_string())
}

/// Group key and display name for an item's category. Every dangling
/// reference lands in the single "Uncategorized" group.
fn category_group<'a>(
    names: &HashMap<&'a str, &'a str>,
    category_id: &str,
) -> ((bool, String, String), &'a str) {
    match names.get(category_id) {
        Some(&name) => (group_order(name, category_id), name),
        None => (group_order(UNCATEGORIZED, ""), UNCATEGORIZED),
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Optional narrowing applied to item listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub search: Option<String>,
    pub category_id: Option<String>,
}

impl ItemFilter {
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        self.category_id
            .as_deref()
            .is_none_or(|id| item.category_id == id)
            && self.search.as_deref().is_none_or(|q| item.matches_search(q))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    pub term_name: String,
    pub is_complete: bool,
}

impl From<&InventorySession> for SessionSummary {
    fn from(s: &InventorySession) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            date: s.date,
            term_name: s.term_key().display_name(),
            is_complete: s.is_complete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRow {
    pub item_id: String,
    pub name: String,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub serial_frequency: Option<String>,
    pub latest_quantity: i64,
    pub has_count: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub name: String,
    pub items: Vec<ItemRow>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_items: usize,
    pub category_count: usize,
    pub current_term: CurrentTerm,
    pub last_updated_term: Option<String>,
    pub latest_session: Option<SessionSummary>,
    pub groups: Vec<CategoryGroup>,
}

/// Build the dashboard for `today`. Totals count the whole inventory; the
/// filter only narrows the grouped rows.
#[must_use]
pub fn dashboard(view: &InventoryView<'_>, filter: &ItemFilter, today: NaiveDate) -> Dashboard {
    let resolver = view.resolver();
    let names = view.category_names();

    let mut groups: BTreeMap<(bool, String, String), CategoryGroup> = BTreeMap::new();
    for item in view.items.iter().filter(|i| filter.matches(i)) {
        let (key, name) = category_group(&names, &item.category_id);
        let resolved = resolver.resolve(&item.id);
        let group = groups
            .entry(key)
            .or_insert_with(|| CategoryGroup {
                name: name.to_string(),
                items: Vec::new(),
                total: 0,
            });
        group.total += resolved.latest_quantity();
        group.items.push(ItemRow {
            item_id: item.id.clone(),
            name: item.name.clone(),
            location: item.location.clone(),
            condition: item.condition.clone(),
            serial_frequency: item.serial_frequency.clone(),
            latest_quantity: resolved.latest_quantity(),
            has_count: resolved.has_count(),
        });
    }

    let groups = groups
        .into_values()
        .map(|mut g| {
            g.items.sort_by_key(|r| r.name.to_lowercase());
            g
        })
        .collect();

    Dashboard {
        total_items: view.items.len(),
        category_count: view.categories.len(),
        current_term: current_term(today),
        last_updated_term: latest_term(view.terms).map(|t| t.key().display_name()),
        latest_session: most_recent_session(view.sessions).map(SessionSummary::from),
        groups,
    }
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRow {
    pub item_id: String,
    pub name: String,
    pub category: String,
    pub previous: i64,
    pub latest: i64,
    pub change: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trends {
    pub decreases: Vec<TrendRow>,
    pub increases: Vec<TrendRow>,
}

/// Items whose latest quantity moved since the previous count.
#[must_use]
pub fn trends(view: &InventoryView<'_>, limit: usize) -> Trends {
    let resolver = view.resolver();
    let names = view.category_names();

    let rows: Vec<TrendRow> = view
        .items
        .iter()
        .map(|item| {
            let resolved = resolver.resolve(&item.id);
            TrendRow {
                item_id: item.id.clone(),
                name: item.name.clone(),
                category: category_name(&names, &item.category_id).to_string(),
                previous: resolved.previous_quantity(),
                latest: resolved.latest_quantity(),
                change: resolved.change(),
            }
        })
        .filter(|r| r.change != 0)
        .collect();

    let (mut decreases, mut increases): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|r| r.change < 0);
    decreases.sort_by(|a, b| a.change.cmp(&b.change).then_with(|| a.name.cmp(&b.name)));
    increases.sort_by(|a, b| b.change.cmp(&a.change).then_with(|| a.name.cmp(&b.name)));
    decreases.truncate(limit);
    increases.truncate(limit);

    Trends {
        decreases,
        increases,
    }
}

// ---------------------------------------------------------------------------
// Stale items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleItem {
    pub item_id: String,
    pub name: String,
    pub category: String,
    /// Most recent term with a historical count, if any.
    pub last_counted_term: Option<String>,
}

/// Items with no historical count at all, or none in the latest term.
#[must_use]
pub fn stale_items(view: &InventoryView<'_>) -> Vec<StaleItem> {
    let names = view.category_names();
    let latest = latest_term(view.terms);
    let term_keys: HashMap<&str, _> = view.terms.iter().map(|t| (t.id.as_str(), t.key())).collect();

    let mut by_item: HashMap<&str, Vec<&HistoricalCount>> = HashMap::new();
    for count in view.history {
        by_item.entry(count.item_id.as_str()).or_default().push(count);
    }

    let mut stale: Vec<StaleItem> = view
        .items
        .iter()
        .filter_map(|item| {
            let counts = by_item.get(item.id.as_str()).map_or(&[][..], Vec::as_slice);
            let in_latest = latest.is_some_and(|t| counts.iter().any(|c| c.academic_term_id == t.id));
            let fresh = !counts.is_empty() && (latest.is_none() || in_latest);
            if fresh {
                return None;
            }
            let last_counted_term = counts
                .iter()
                .filter_map(|c| term_keys.get(c.academic_term_id.as_str()))
                .max()
                .map(|k| k.display_name());
            Some(StaleItem {
                item_id: item.id.clone(),
                name: item.name.clone(),
                category: category_name(&names, &item.category_id).to_string(),
                last_counted_term,
            })
        })
        .collect();

    stale.sort_by(|a, b| {
        group_order(&a.category, &a.category)
            .cmp(&group_order(&b.category, &b.category))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    stale
}

// ---------------------------------------------------------------------------
// Semester history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub item_id: String,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryGroup {
    pub name: String,
    pub rows: Vec<HistoryRow>,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterHistory {
    pub academic_term_id: String,
    pub term_name: String,
    pub groups: Vec<HistoryGroup>,
    pub grand_total: i64,
}

/// Historical counts for one term grouped by category. `term_id` defaults to
/// the latest stored term; `None` is returned when there is no such term.
#[must_use]
pub fn semester_history(view: &InventoryView<'_>, term_id: Option<&str>) -> Option<SemesterHistory> {
    let term = match term_id {
        Some(id) => view.terms.iter().find(|t| t.id == id)?,
        None => latest_term(view.terms)?,
    };
    let names = view.category_names();
    let items: HashMap<&str, &Item> = view.items.iter().map(|i| (i.id.as_str(), i)).collect();

    // One row per item; the unique (item, term) key makes duplicates unusual,
    // but the newest import wins if they occur.
    let mut per_item: HashMap<&str, &HistoricalCount> = HashMap::new();
    for count in view.history.iter().filter(|c| c.academic_term_id == term.id) {
        per_item
            .entry(count.item_id.as_str())
            .and_modify(|existing| {
                if count.imported_at > existing.imported_at {
                    *existing = count;
                }
            })
            .or_insert(count);
    }

    let mut groups: BTreeMap<(bool, String, String), HistoryGroup> = BTreeMap::new();
    for (item_id, count) in per_item {
        let Some(item) = items.get(item_id) else {
            continue;
        };
        let (key, name) = category_group(&names, &item.category_id);
        let group = groups.entry(key).or_insert_with(|| HistoryGroup {
            name: name.to_string(),
            rows: Vec::new(),
            total: 0,
        });
        group.total += count.counted_quantity;
        group.rows.push(HistoryRow {
            item_id: item.id.clone(),
            name: item.name.clone(),
            quantity: count.counted_quantity,
        });
    }

    let groups: Vec<HistoryGroup> = groups
        .into_values()
        .map(|mut g| {
            g.rows.sort_by_key(|r| r.name.to_lowercase());
            g
        })
        .collect();
    let grand_total = groups.iter().map(|g| g.total).sum();

    Some(SemesterHistory {
        academic_term_id: term.id.clone(),
        term_name: term.key().display_name(),
        groups,
        grand_total,
    })
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

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.into(),
            name: name.into(),
            created_at: at(0),
        }
    }

    fn item(id: &str, name: &str, category_id: &str) -> Item {
        Item {
            id: id.into(),
            name: name.into(),
            category_id: category_id.into(),
            location: None,
            condition: None,
            serial_frequency: None,
            notes: None,
            created_at: at(0),
        }
    }

    fn term(id: &str, term: TermType, year: i32) -> AcademicTerm {
        AcademicTerm {
            id: id.into(),
            name: crate::entities::TermKey::new(term, year).display_name(),
            term,
            year,
            start_date: None,
            end_date: None,
            created_at: at(0),
        }
    }

    fn hist(id: &str, item_id: &str, term_id: &str, qty: i64, minute: i64) -> HistoricalCount {
        HistoricalCount {
            id: id.into(),
            item_id: item_id.into(),
            academic_term_id: term_id.into(),
            counted_quantity: qty,
            imported_at: at(minute),
            session_id: None,
            counted_by_uid: None,
            notes: None,
        }
    }

    struct Fixture {
        categories: Vec<Category>,
        items: Vec<Item>,
        terms: Vec<AcademicTerm>,
        history: Vec<HistoricalCount>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                categories: vec![category("cat-1", "Wired Mics"), category("cat-2", "Cables")],
                items: vec![
                    item("itm-1", "SM58", "cat-1"),
                    item("itm-2", "XLR 25ft", "cat-2"),
                    item("itm-3", "Orphan DI", "cat-gone"),
                    item("itm-4", "Beta 87", "cat-1"),
                ],
                terms: vec![
                    term("trm-f23", TermType::Fall, 2023),
                    term("trm-s24", TermType::Spring, 2024),
                ],
                history: vec![
                    hist("h1", "itm-1", "trm-f23", 10, 1),
                    hist("h2", "itm-1", "trm-s24", 7, 2),
                    hist("h3", "itm-2", "trm-f23", 20, 1),
                    hist("h4", "itm-2", "trm-s24", 25, 2),
                    hist("h5", "itm-3", "trm-f23", 2, 1),
                ],
            }
        }

        fn view(&self) -> InventoryView<'_> {
            InventoryView {
                categories: &self.categories,
                items: &self.items,
                terms: &self.terms,
                history: &self.history,
                sessions: &[],
                session_counts: &[],
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
    }

    #[test]
    fn dashboard_groups_and_totals() {
        let fx = Fixture::new();
        let dash = dashboard(&fx.view(), &ItemFilter::default(), today());

        assert_eq!(dash.total_items, 4);
        assert_eq!(dash.category_count, 2);
        assert_eq!(dash.current_term.term, TermType::Fall);
        assert_eq!(dash.last_updated_term.as_deref(), Some("SPRING 2024"));
        assert!(dash.latest_session.is_none());

        let names: Vec<&str> = dash.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Cables", "Wired Mics", UNCATEGORIZED]);

        let mics = &dash.groups[1];
        assert_eq!(mics.total, 7);
        assert_eq!(mics.items[0].name, "Beta 87");
        assert_eq!(mics.items[0].latest_quantity, 0);
        assert!(!mics.items[0].has_count);
    }

    #[test]
    fn dashboard_filter_narrows_rows_only() {
        let fx = Fixture::new();
        let filter = ItemFilter {
            search: Some("xlr".into()),
            category_id: None,
        };
        let dash = dashboard(&fx.view(), &filter, today());
        assert_eq!(dash.total_items, 4);
        assert_eq!(dash.groups.len(), 1);
        assert_eq!(dash.groups[0].items[0].item_id, "itm-2");

        let filter = ItemFilter {
            search: None,
            category_id: Some("cat-1".into()),
        };
        let dash = dashboard(&fx.view(), &filter, today());
        assert_eq!(dash.groups.len(), 1);
        assert_eq!(dash.groups[0].items.len(), 2);
    }

    #[test]
    fn trends_split_and_sort() {
        let mut fx = Fixture::new();
        fx.items.push(item("itm-5", "Stand", "cat-2"));
        fx.history.push(hist("h6", "itm-5", "trm-f23", 9, 1));
        fx.history.push(hist("h7", "itm-5", "trm-s24", 1, 2));

        let t = trends(&fx.view(), DEFAULT_TREND_LIMIT);
        let dec: Vec<(&str, i64)> = t.decreases.iter().map(|r| (r.item_id.as_str(), r.change)).collect();
        assert_eq!(dec, vec![("itm-5", -8), ("itm-1", -3)]);
        let inc: Vec<(&str, i64)> = t.increases.iter().map(|r| (r.item_id.as_str(), r.change)).collect();
        assert_eq!(inc, vec![("itm-2", 5), ("itm-3", 2)]);
        assert_eq!(t.increases[0].previous, 20);

        let single = trends(&fx.view(), 1);
        assert_eq!(single.decreases.len(), 1);
    }

    #[test]
    fn single_count_counts_as_increase() {
        let fx = Fixture::new();
        let mut history = fx.history.clone();
        history.retain(|h| h.item_id != "itm-2");
        let view = InventoryView {
            history: &history,
            ..fx.view()
        };
        let t = trends(&view, DEFAULT_TREND_LIMIT);
        let inc: Vec<(&str, i64)> = t.increases.iter().map(|r| (r.item_id.as_str(), r.change)).collect();
        assert_eq!(inc, vec![("itm-3", 2)]);
    }

    #[test]
    fn stale_items_missing_latest_term() {
        let fx = Fixture::new();
        let stale = stale_items(&fx.view());
        let ids: Vec<(&str, Option<&str>)> = stale
            .iter()
            .map(|s| (s.item_id.as_str(), s.last_counted_term.as_deref()))
            .collect();
        assert_eq!(ids, vec![("itm-4", None), ("itm-3", Some("FALL 2023"))]);
    }

    #[test]
    fn semester_history_defaults_to_latest_term() {
        let fx = Fixture::new();
        let h = semester_history(&fx.view(), None).unwrap();
        assert_eq!(h.term_name, "SPRING 2024");
        assert_eq!(h.grand_total, 32);
        assert_eq!(h.groups.len(), 2);

        let older = semester_history(&fx.view(), Some("trm-f23")).unwrap();
        assert_eq!(older.grand_total, 32);
        assert_eq!(older.groups.last().unwrap().name, UNCATEGORIZED);

        assert!(semester_history(&fx.view(), Some("trm-missing")).is_none());
    }

    #[test]
    fn categories_differing_only_in_case_stay_separate() {
        let mut fx = Fixture::new();
        fx.categories = vec![category("cat-a", "Mics"), category("cat-b", "MICS")];
        fx.items = vec![item("itm-a", "SM58", "cat-a"), item("itm-b", "Beta 58A", "cat-b")];
        fx.history = vec![
            hist("h1", "itm-a", "trm-s24", 4, 1),
            hist("h2", "itm-b", "trm-s24", 6, 1),
        ];

        let dash = dashboard(&fx.view(), &ItemFilter::default(), today());
        let groups: Vec<(&str, usize, i64)> = dash
            .groups
            .iter()
            .map(|g| (g.name.as_str(), g.items.len(), g.total))
            .collect();
        assert_eq!(groups, vec![("Mics", 1, 4), ("MICS", 1, 6)]);

        let h = semester_history(&fx.view(), None).unwrap();
        let names: Vec<&str> = h.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Mics", "MICS"]);
        assert_eq!(h.grand_total, 10);
    }
}
