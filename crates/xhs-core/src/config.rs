use std::path::PathBuf;

use thiserror::Error;

use crate::app_config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load collaborator configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var fails to parse.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load configuration from environment variables already in the process.
///
/// Unlike [`load_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var fails to parse.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// The parsing logic is decoupled from the actual environment so it can be
/// tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| lookup(var).ok().filter(|value| !value.is_empty());

    let or_default =
        |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    Ok(AppConfig {
        sync_url: optional("XHS_SYNC_URL"),
        sync_timeout_secs: parse_u64("XHS_SYNC_TIMEOUT_SECS", "10")?,
        store_path: PathBuf::from(or_default("XHS_STORE_PATH", "xhs-authors.json")),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, std::env::VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(std::env::VarError::NotPresent)
        }
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let env = HashMap::new();
        let config = build_config(lookup_from(&env)).unwrap();
        assert_eq!(config.sync_url, None);
        assert_eq!(config.sync_timeout_secs, 10);
        assert_eq!(config.store_path, PathBuf::from("xhs-authors.json"));
    }

    #[test]
    fn reads_all_values() {
        let env = HashMap::from([
            ("XHS_SYNC_URL", "https://n8n.example.com/webhook/xhs"),
            ("XHS_SYNC_TIMEOUT_SECS", "30"),
            ("XHS_STORE_PATH", "/var/lib/xhs/authors.json"),
        ]);
        let config = build_config(lookup_from(&env)).unwrap();
        assert_eq!(
            config.sync_url.as_deref(),
            Some("https://n8n.example.com/webhook/xhs")
        );
        assert_eq!(config.sync_timeout_secs, 30);
        assert_eq!(config.store_path, PathBuf::from("/var/lib/xhs/authors.json"));
    }

    #[test]
    fn empty_sync_url_means_disabled() {
        let env = HashMap::from([("XHS_SYNC_URL", "")]);
        let config = build_config(lookup_from(&env)).unwrap();
        assert_eq!(config.sync_url, None);
    }

    #[test]
    fn invalid_timeout_is_an_error() {
        let env = HashMap::from([("XHS_SYNC_TIMEOUT_SECS", "soon")]);
        let err = build_config(lookup_from(&env)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar { ref var, .. } if var == "XHS_SYNC_TIMEOUT_SECS"
        ));
    }

    #[test]
    fn debug_redacts_sync_url() {
        let env = HashMap::from([("XHS_SYNC_URL", "https://n8n.example.com/hook?token=s3cret")]);
        let config = build_config(lookup_from(&env)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("[redacted]"));
    }
}
