use clap::Subcommand;

/// Academic term commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TermCommands {
    /// List known terms, newest first.
    List,
    /// Show the term a date falls in (defaults to today).
    Current {
        #[arg(long)]
        date: Option<String>,
    },
    /// Find or create a term, optionally setting its date range.
    Ensure {
        /// SPRING, SUMMER, FALL or WINTER.
        term: String,
        year: i32,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
}
