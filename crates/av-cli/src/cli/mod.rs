use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `avault` binary.
#[derive(Debug, Parser)]
#[command(
    name = "avault",
    version,
    about = "AVault - audio-visual equipment inventory"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to auto-detect via .avault)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::subcommands::{CategoryCommands, ReportCommands, SessionCommands, UserCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "avault",
            "--format",
            "table",
            "--limit",
            "10",
            "--verbose",
            "migrate-counts",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::MigrateCounts));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["avault", "report", "stale", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Report {
                action: ReportCommands::Stale
            }
        ));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["avault", "--format", "xml", "init"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["avault", "--project", "/tmp/demo", "init"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }

    #[test]
    fn session_count_takes_positional_quantity() {
        let cli = Cli::try_parse_from(["avault", "session", "count", "ses-1", "itm-2", "7"])
            .expect("cli should parse");
        let Commands::Session {
            action:
                SessionCommands::Count {
                    session,
                    item,
                    quantity,
                    notes,
                },
        } = cli.command
        else {
            panic!("expected session count");
        };
        assert_eq!(session, "ses-1");
        assert_eq!(item, "itm-2");
        assert_eq!(quantity, 7);
        assert!(notes.is_none());
    }

    #[test]
    fn category_delete_collects_reassignments() {
        let cli = Cli::try_parse_from([
            "avault",
            "category",
            "delete",
            "cat-1",
            "--reassign",
            "itm-1=cat-2",
            "--reassign",
            "itm-2=cat-3",
        ])
        .expect("cli should parse");
        let Commands::Category {
            action: CategoryCommands::Delete { id, reassign },
        } = cli.command
        else {
            panic!("expected category delete");
        };
        assert_eq!(id, "cat-1");
        assert_eq!(reassign, vec!["itm-1=cat-2", "itm-2=cat-3"]);
    }

    #[test]
    fn user_admin_revoke_flag() {
        let cli = Cli::try_parse_from(["avault", "user", "admin", "u-2", "--revoke"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::User {
                action: UserCommands::Admin { revoke: true, .. }
            }
        ));
    }

    #[test]
    fn serve_bind_is_optional() {
        let cli = Cli::try_parse_from(["avault", "serve"]).expect("cli should parse");
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert!(args.bind.is_none());
    }
}
