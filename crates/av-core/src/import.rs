//! Shape of the JSON inventory document accepted by `avault import`.
//!
//! ```json
//! {
//!   "metadata": { "title": "...", "as_of": "...", "inventory_periods": ["Fall 2023"] },
//!   "categories": [
//!     { "name": "WIRED MICS",
//!       "items": [ { "name": "SM58", "inventory_counts": { "Fall 2023": 12 } } ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::parse_term_label;
use crate::entities::TermKey;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryDocument {
    pub metadata: ImportMetadata,
    #[serde(default)]
    pub categories: Vec<ImportCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub as_of: String,
    #[serde(default)]
    pub inventory_periods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportCategory {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ImportItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportItem {
    pub name: String,
    /// Period label → quantity. Values are kept raw so one bad cell does not
    /// reject the document; see [`ImportItem::count_cells`].
    #[serde(default)]
    pub inventory_counts: BTreeMap<String, Value>,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub serial_number_frequency: Option<String>,
}

/// One `inventory_counts` entry after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountCell<'a> {
    /// A whole, non-negative quantity.
    Quantity(i64),
    /// Null or absent: nothing was recorded for the period.
    Blank,
    /// Anything else, such as `"N/A"` or `1.5`.
    Unusable(&'a Value),
}

impl<'a> CountCell<'a> {
    fn parse(value: &'a Value) -> Self {
        match value {
            Value::Null => Self::Blank,
            Value::Number(n) => match n.as_i64() {
                Some(qty) if qty >= 0 => Self::Quantity(qty),
                Some(_) => Self::Unusable(value),
                None => n
                    .as_f64()
                    .filter(|qty| qty.is_finite() && *qty >= 0.0 && qty.fract() == 0.0)
                    .map_or(Self::Unusable(value), |qty| {
                        #[allow(clippy::cast_possible_truncation)]
                        let qty = qty as i64;
                        Self::Quantity(qty)
                    }),
            },
            _ => Self::Unusable(value),
        }
    }
}

impl ImportItem {
    /// Every count cell with its period label.
    pub fn count_cells(&self) -> impl Iterator<Item = (&str, CountCell<'_>)> {
        self.inventory_counts
            .iter()
            .map(|(period, value)| (period.as_str(), CountCell::parse(value)))
    }

    /// Counts that carry a usable whole, non-negative quantity.
    pub fn valid_counts(&self) -> impl Iterator<Item = (&str, i64)> {
        self.count_cells().filter_map(|(period, cell)| match cell {
            CountCell::Quantity(qty) => Some((period, qty)),
            CountCell::Blank | CountCell::Unusable(_) => None,
        })
    }
}

impl InventoryDocument {
    /// Split declared periods into parseable terms and skipped labels.
    #[must_use]
    pub fn periods(&self) -> (Vec<(String, TermKey)>, Vec<String>) {
        let mut parsed = Vec::new();
        let mut skipped = Vec::new();
        for label in &self.metadata.inventory_periods {
            match parse_term_label(label) {
                Some(key) => parsed.push((label.clone(), key)),
                None => skipped.push(label.clone()),
            }
        }
        (parsed, skipped)
    }
}
