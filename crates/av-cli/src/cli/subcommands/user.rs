use clap::Subcommand;

/// User access commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Record a sign-in for the configured identity.
    Login {
        #[arg(long)]
        photo_url: Option<String>,
    },
    /// List users, newest first.
    List,
    /// Grant access.
    Authorize { uid: String },
    /// Revoke access.
    Revoke { uid: String },
    /// Grant or remove admin rights.
    Admin {
        uid: String,
        #[arg(long)]
        revoke: bool,
    },
    /// Delete a user record.
    Delete { uid: String },
}
