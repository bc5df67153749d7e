use clap::Subcommand;

/// Report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// Totals, latest session and per-category latest quantities.
    Dashboard {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Largest decreases and increases between the two latest counts.
    Trends {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Items not counted in the latest term.
    Stale,
    /// Counts for one term grouped by category (defaults to the latest term).
    History {
        #[arg(long)]
        term: Option<String>,
    },
}
