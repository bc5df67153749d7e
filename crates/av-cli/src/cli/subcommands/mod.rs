mod category;
mod item;
mod report;
mod session;
mod term;
mod user;

pub use category::CategoryCommands;
pub use item::ItemCommands;
pub use report::ReportCommands;
pub use session::SessionCommands;
pub use term::TermCommands;
pub use user::UserCommands;
