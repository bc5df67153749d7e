use clap::Subcommand;

/// Category commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CategoryCommands {
    /// Create a category.
    Create { name: String },
    /// List categories with their item counts.
    List,
    /// Rename a category.
    Rename { id: String, name: String },
    /// Delete a category.
    ///
    /// Fails while items still use it unless every item is reassigned with
    /// `--reassign <item-id>=<category-id>`.
    Delete {
        id: String,
        #[arg(long, value_name = "ITEM=CATEGORY")]
        reassign: Vec<String>,
    },
}
