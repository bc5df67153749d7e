use av_config::AvConfig;

/// Emit warnings for degraded configuration and likely mistyped env var keys.
pub fn warn_unconfigured(config: &AvConfig) {
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }
    for warning in collect_env_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_env_warnings<I>(config: &AvConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.store.is_configured() && has_single_underscore(&env_keys, "AVAULT_STORE") {
        warnings.push(
            "Store config appears default while AVAULT_STORE* env vars exist. Use double underscores (example: AVAULT_STORE__URL)."
                .to_string(),
        );
    }

    if !config.identity.is_configured() && has_single_underscore(&env_keys, "AVAULT_IDENTITY") {
        warnings.push(
            "Identity config appears default while AVAULT_IDENTITY* env vars exist. Use double underscores (example: AVAULT_IDENTITY__UID)."
                .to_string(),
        );
    }

    warnings
}

fn has_single_underscore(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}
