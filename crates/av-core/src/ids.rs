//! ID prefixes for every stored entity.
//!
//! IDs are `{prefix}-{8 hex}` and generated by the store (`AvDb::generate_id`).
//! Users are the exception: their ID is the identity provider's UID.

pub const PREFIX_CATEGORY: &str = "cat";
pub const PREFIX_ITEM: &str = "itm";
pub const PREFIX_TERM: &str = "trm";
pub const PREFIX_SESSION: &str = "ses";
pub const PREFIX_SESSION_COUNT: &str = "cnt";
pub const PREFIX_HISTORICAL_COUNT: &str = "hct";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_CATEGORY,
    PREFIX_ITEM,
    PREFIX_TERM,
    PREFIX_SESSION,
    PREFIX_SESSION_COUNT,
    PREFIX_HISTORICAL_COUNT,
];
