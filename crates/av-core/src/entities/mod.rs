//! Entity structs for all AVault domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `av-db/migrations`).
//! Field names serialize in camelCase, which is the shape the HTTP items
//! resource and the import document use.

mod category;
mod count;
mod item;
mod session;
mod term;
mod user;

pub use category::Category;
pub use count::{HistoricalCount, SessionCount};
pub use item::Item;
pub use session::InventorySession;
pub use term::{AcademicTerm, TermKey};
pub use user::User;
