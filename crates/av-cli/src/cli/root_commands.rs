use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    CategoryCommands, ItemCommands, ReportCommands, SessionCommands, TermCommands, UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Create the project store and register the configured identity as admin.
    Init,
    /// Equipment categories.
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Inventory items.
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },
    /// Academic terms.
    Term {
        #[command(subcommand)]
        action: TermCommands,
    },
    /// Count sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Derived inventory reports.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// User access management.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Copy completed sessions' live counts into historical counts.
    MigrateCounts,
    /// Import a JSON inventory document.
    Import(ImportArgs),
    /// Serve the HTTP items resource.
    Serve(ServeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Path to the inventory JSON file.
    pub file: String,
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Address to bind (defaults to server.bind).
    #[arg(long)]
    pub bind: Option<String>,
}
