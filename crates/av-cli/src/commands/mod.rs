pub mod category;
pub mod dispatch;
pub mod import;
pub mod init;
pub mod item;
pub mod migrate;
pub mod report;
pub mod serve;
pub mod session;
pub mod shared;
pub mod term;
pub mod user;
