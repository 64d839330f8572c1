//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.persona/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_API_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PersonaConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub health_check: Option<bool>,
}

/// Values taken from command-line flags. `None`/`false` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub skip_health_check: bool,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_url: String,
    /// `None` waits on the backend indefinitely.
    pub timeout: Option<Duration>,
    pub health_check: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.persona/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".persona").join("config.toml"))
}

/// Load config from `~/.persona/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PersonaConfig::default()`.
pub fn load_config() -> Result<PersonaConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(PersonaConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PersonaConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<PersonaConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PersonaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Persona Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [api]
# base_url = "http://localhost:8000"   # Or set PERSONA_API_URL
# timeout_secs = 60                    # Or set PERSONA_TIMEOUT_SECS; unset = wait forever
# health_check = true                  # Probe the backend on startup
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &PersonaConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &PersonaConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // API URL: CLI → env → config → default
    let api_url = cli
        .api_url
        .clone()
        .or_else(|| env("PERSONA_API_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    // Timeout: CLI → env → config → none
    let timeout_secs = cli.timeout_secs.or_else(|| {
        env("PERSONA_TIMEOUT_SECS").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!("Ignoring PERSONA_TIMEOUT_SECS={:?}: {}", raw, e);
                None
            }
        })
    });
    let timeout = timeout_secs
        .or(config.api.timeout_secs)
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs);

    let health_check = !cli.skip_health_check && config.api.health_check.unwrap_or(true);

    ResolvedConfig {
        api_url,
        timeout,
        health_check,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&PersonaConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.api_url, DEFAULT_API_URL);
        assert_eq!(resolved.timeout, None);
        assert!(resolved.health_check);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = PersonaConfig {
            api: ApiConfig {
                base_url: Some("http://10.0.0.5:9000".to_string()),
                timeout_secs: Some(30),
                health_check: Some(false),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.api_url, "http://10.0.0.5:9000");
        assert_eq!(resolved.timeout, Some(Duration::from_secs(30)));
        assert!(!resolved.health_check);
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = PersonaConfig {
            api: ApiConfig {
                base_url: Some("http://from-config".to_string()),
                ..Default::default()
            },
        };
        let env = |key: &str| match key {
            "PERSONA_API_URL" => Some("http://from-env".to_string()),
            "PERSONA_TIMEOUT_SECS" => Some("12".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.api_url, "http://from-env");
        assert_eq!(resolved.timeout, Some(Duration::from_secs(12)));

        let cli = CliOverrides {
            api_url: Some("http://from-cli".to_string()),
            timeout_secs: Some(5),
            skip_health_check: true,
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.api_url, "http://from-cli");
        assert_eq!(resolved.timeout, Some(Duration::from_secs(5)));
        assert!(!resolved.health_check);
    }

    #[test]
    fn test_zero_or_garbage_timeout_means_none() {
        let env = |key: &str| (key == "PERSONA_TIMEOUT_SECS").then(|| "soon".to_string());
        let resolved = resolve_with_env(&PersonaConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.timeout, None);

        let cli = CliOverrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        let resolved = resolve_with_env(&PersonaConfig::default(), &cli, no_env);
        assert_eq!(resolved.timeout, None);
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: PersonaConfig = toml::from_str(
            r#"
[api]
base_url = "http://localhost:8080"
"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:8080"));
        assert!(config.api.timeout_secs.is_none());
        assert!(config.api.health_check.is_none());
    }

    #[test]
    fn test_empty_toml_parses() {
        let config: PersonaConfig = toml::from_str("").unwrap();
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("persona-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
