//! Shared fixtures for handler tests.

use std::path::PathBuf;

use av_config::{AvConfig, IdentityConfig};
use av_db::service::AvService;

use super::AppContext;
use crate::cli::{GlobalFlags, OutputFormat};

/// In-memory context operating as `identity`.
pub async fn test_context(identity: IdentityConfig) -> AppContext {
    let service = AvService::new_local(":memory:")
        .await
        .expect("in-memory service should open");
    AppContext {
        service,
        config: AvConfig {
            identity,
            ..Default::default()
        },
        project_root: PathBuf::from("."),
    }
}

pub fn operator() -> IdentityConfig {
    IdentityConfig {
        uid: "u-tech".to_string(),
        email: "tech@example.edu".to_string(),
        display_name: "AV Tech".to_string(),
    }
}

/// Context whose operator is the bootstrapped administrator.
pub async fn admin_context() -> AppContext {
    let ctx = test_context(operator()).await;
    ctx.service
        .bootstrap_admin("u-tech", "tech@example.edu", Some("AV Tech"))
        .await
        .expect("bootstrap should work");
    ctx
}

pub fn json_flags() -> GlobalFlags {
    GlobalFlags {
        format: OutputFormat::Json,
        limit: None,
        quiet: true,
        verbose: false,
        project: None,
    }
}
