use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error} (expected YYYY-MM-DD)"))
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let date = parse_date(raw, field)?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Parse repeated `ITEM=CATEGORY` pairs into an assignment map.
pub fn parse_assignments(pairs: &[String]) -> anyhow::Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| -> anyhow::Result<(String, String)> {
            let (item, category) = pair.split_once('=').ok_or_else(|| {
                anyhow::anyhow!("invalid reassignment '{pair}' (expected ITEM=CATEGORY)")
            })?;
            let (item, category) = (item.trim(), category.trim());
            if item.is_empty() || category.is_empty() {
                anyhow::bail!("invalid reassignment '{pair}' (expected ITEM=CATEGORY)");
            }
            Ok((item.to_string(), category.to_string()))
        })
        .collect()
}

/// Map a CLI value onto a clearable field: absent leaves it alone, an empty
/// string clears it.
#[must_use]
pub fn clearable(raw: Option<&str>) -> Option<Option<String>> {
    raw.map(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
