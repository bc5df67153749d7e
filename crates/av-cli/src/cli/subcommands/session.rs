use clap::Subcommand;

/// Count session commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SessionCommands {
    /// Start a count session.
    Create {
        #[arg(long)]
        name: String,
        /// Session date (YYYY-MM-DD or RFC 3339); defaults to now.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List sessions, most recent first.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a session.
    Get { id: String },
    /// Record (or overwrite) the count for one item.
    Count {
        session: String,
        item: String,
        quantity: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List a session's live counts.
    Counts { session: String },
    /// Show how many items a session has counted.
    Progress { session: String },
    /// Complete a session and copy its counts into the term history.
    Complete { session: String },
    /// Reopen a completed session for editing.
    Reopen { session: String },
    /// Delete a session and every count it produced.
    Delete { session: String },
}
