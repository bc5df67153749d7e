//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use std::path::Path;

use av_config::AvConfig;

#[test]
fn loads_store_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
url = "libsql://avault-umc.turso.io"
auth_token = "store-token"
local_replica_path = "./replica.db"
read_your_writes = false
"#,
        )?;

        let config: AvConfig = Figment::from(Serialized::defaults(AvConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.store.url, "libsql://avault-umc.turso.io");
        assert_eq!(config.store.auth_token, "store-token");
        assert_eq!(config.store.local_replica_path, "./replica.db");
        assert_eq!(config.store.db_path, ".avault/avault.db");
        assert!(!config.store.read_your_writes);
        assert!(config.store.is_configured());
        Ok(())
    });
}

#[test]
fn loads_identity_and_server_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[identity]
uid = "u-42"
email = "tech@example.edu"
display_name = "AV Tech"

[server]
bind = "0.0.0.0:9000"

[general]
default_limit = 50
"#,
        )?;

        let config: AvConfig = Figment::from(Serialized::defaults(AvConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.identity.is_configured());
        assert_eq!(config.identity.display_name(), Some("AV Tech"));
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.general.default_limit, 50);
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[store]
db_path = "from-toml.db"
"#,
        )?;
        jail.set_env("AVAULT_STORE__DB_PATH", "from-env.db");

        let config: AvConfig = Figment::from(Serialized::defaults(AvConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("AVAULT_").split("__"))
            .extract()?;

        assert_eq!(config.store.db_path, "from-env.db");
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".avault")?;
        jail.create_file(
            ".avault/config.toml",
            r#"
[identity]
uid = "u-project"
email = "project@example.edu"
"#,
        )?;

        let config: AvConfig = AvConfig::figment_at(Path::new(".")).extract()?;
        assert_eq!(config.identity.uid, "u-project");
        Ok(())
    });
}

#[test]
fn load_for_project_resolves_db_path() {
    Jail::expect_with(|jail| {
        let root = jail.directory().to_path_buf();
        let config = AvConfig::load_for_project(&root).expect("config loads");
        assert!(Path::new(&config.store.db_path).starts_with(&root));
        assert!(config.store.db_path.ends_with("avault.db"));
        Ok(())
    });
}
