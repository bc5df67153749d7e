//! Repository modules implementing store operations for every AVault table.
//!
//! Each module adds methods to `AvService` via `impl AvService` blocks.

pub mod category;
pub mod count;
pub mod import;
pub mod item;
pub mod report;
pub mod session;
pub mod term;
pub mod user;
