use std::path::{Path, PathBuf};

use anyhow::Context;
use av_config::{AvConfig, PROJECT_DIR};

use crate::cli::GlobalFlags;

/// Resolve the project root and load its configuration.
///
/// The root is `--project` when given, otherwise the nearest ancestor holding
/// a `.avault` directory, otherwise the current directory (a fresh project
/// that `avault init` has not touched yet).
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<(PathBuf, AvConfig)> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let root = resolve_project_root(flags.project.as_deref(), &cwd)?;

    if root != cwd {
        load_dotenv(&cwd)?;
    }

    let config = AvConfig::load_for_project(&root)
        .with_context(|| format!("failed to load configuration for {}", root.display()))?;
    Ok((root, config))
}

fn load_dotenv(dir: &Path) -> anyhow::Result<()> {
    let env_path = dir.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

fn resolve_project_root(project_override: Option<&str>, cwd: &Path) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = PathBuf::from(path);

        if explicit
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name == PROJECT_DIR)
        {
            return explicit
                .parent()
                .map(Path::to_path_buf)
                .context("invalid --project path: '.avault' directory has no parent");
        }

        if explicit.is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': directory does not exist",
            explicit.display()
        );
    }

    Ok(crate::context::find_project_root(cwd).unwrap_or_else(|| cwd.to_path_buf()))
}
