//! Configuration and durable session storage for shopsync clients.
//!
//! TOML config with environment overrides (figment), resolved at the
//! platform config path, plus the keyring-backed implementation of the
//! core [`TokenStore`] slot. UI binaries depend on this crate; the store
//! and api layers never read the environment themselves.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use shopsync_api::ApiTransport;
use shopsync_core::TokenStore;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Client configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the backend API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Page size for the public catalog view.
    #[serde(default = "default_catalog_page_size")]
    pub catalog_page_size: u32,

    /// Page size for the admin product list.
    #[serde(default = "default_admin_page_size")]
    pub admin_page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            catalog_page_size: default_catalog_page_size(),
            admin_page_size: default_admin_page_size(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:3000".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_catalog_page_size() -> u32 {
    12
}
fn default_admin_page_size() -> u32 {
    20
}

impl Config {
    /// Build the shared HTTP transport from this config.
    pub fn build_transport(&self) -> Result<ApiTransport, ConfigError> {
        ApiTransport::with_timeout(&self.api_url, Duration::from_secs(self.timeout_secs)).map_err(
            |e| ConfigError::Validation {
                field: "api_url".into(),
                reason: e.to_string(),
            },
        )
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "shopsync", "shopsync").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("shopsync");
    p
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the config from file + environment (`SHOPSYNC_*` overrides).
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("SHOPSYNC_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning the defaults if nothing is configured.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Durable token slot ──────────────────────────────────────────────

const KEYRING_SERVICE: &str = "shopsync";
const KEYRING_ENTRY: &str = "session-token";

/// System-keyring implementation of the durable session-token slot.
///
/// Best-effort by contract: a keyring that refuses to cooperate is
/// logged and treated as an empty slot, which simply means the next run
/// starts logged out.
pub struct KeyringTokenStore {
    service: String,
    entry: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self {
            service: KEYRING_SERVICE.into(),
            entry: KEYRING_ENTRY.into(),
        }
    }

    /// A slot under a non-default service name, for side-by-side
    /// deployments against different backends.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            entry: KEYRING_ENTRY.into(),
        }
    }

    fn entry(&self) -> Option<keyring::Entry> {
        match keyring::Entry::new(&self.service, &self.entry) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("keyring unavailable: {e}");
                None
            }
        }
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Option<SecretString> {
        self.entry()?.get_password().ok().map(SecretString::from)
    }

    fn save(&self, token: &SecretString) {
        if let Some(entry) = self.entry() {
            if let Err(e) = entry.set_password(token.expose_secret()) {
                warn!("failed to persist session token: {e}");
            }
        }
    }

    fn clear(&self) {
        if let Some(entry) = self.entry() {
            // NoEntry just means there was nothing to clear.
            if let Err(e) = entry.delete_credential() {
                if !matches!(e, keyring::Error::NoEntry) {
                    warn!("failed to clear session token: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_store_page_sizes() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url, "http://localhost:3000");
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.catalog_page_size, 12);
        assert_eq!(cfg.admin_page_size, 20);
    }

    #[test]
    fn toml_roundtrip_preserves_fields() {
        let cfg = Config {
            api_url: "https://shop.example.com/api".into(),
            timeout_secs: 10,
            catalog_page_size: 24,
            admin_page_size: 50,
        };

        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.api_url, cfg.api_url);
        assert_eq!(back.timeout_secs, 10);
        assert_eq!(back.admin_page_size, 50);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(r#"api_url = "http://10.0.0.2:3000""#).unwrap();
        assert_eq!(cfg.api_url, "http://10.0.0.2:3000");
        assert_eq!(cfg.catalog_page_size, 12);
    }

    #[test]
    fn bad_api_url_is_a_validation_error() {
        let cfg = Config {
            api_url: "not a url".into(),
            ..Config::default()
        };
        let err = cfg.build_transport().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }
}
