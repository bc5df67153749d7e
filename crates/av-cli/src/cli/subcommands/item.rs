use clap::Subcommand;

/// Item commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ItemCommands {
    /// Create an item.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        serial_frequency: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List items sorted by name.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get an item with its resolved latest and previous counts.
    Get { id: String },
    /// Update an item. Pass an empty string to clear an optional field.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        condition: Option<String>,
        #[arg(long)]
        serial_frequency: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an item and its counts.
    Delete { id: String },
}
