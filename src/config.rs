//! Runtime configuration.
//!
//! Settings come from a JSON file (every field optional, missing ones take
//! their defaults) and are then overridden by command-line flags.  The file
//! lives at `<config_dir>/posts-view/config.json` unless `--config` names
//! another path.  A missing file is not an error; a malformed one is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::User;

const APP_DIR: &str = "posts-view";

/// Command-line flags.  Each one overrides the matching config file field.
#[derive(Debug, Default, Parser)]
#[command(name = "posts-view", version, about)]
pub struct Cli {
    /// Path to a JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Server root, e.g. http://localhost:3000.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Simulate a slow, unreliable server.
    #[arg(long)]
    pub flaky: bool,

    /// Where to write logs (stdout belongs to the UI).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub users: Vec<User>,
    pub flaky: FlakyConfig,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlakyConfig {
    pub enabled: bool,
    pub delay_ms: u64,
    /// Percent chance that a call fails before reaching the server.
    pub transport_failure_pct: f64,
    /// Percent chance (same roll, so inclusive of the above) that a reply
    /// is replaced by a `500 Server Error`.
    pub server_error_pct: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".into(),
            request_timeout_secs: 10,
            users: default_users(),
            flaky: FlakyConfig::default(),
            log_file: None,
        }
    }
}

impl Default for FlakyConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 1_000,
            transport_failure_pct: 16.0,
            server_error_pct: 32.0,
        }
    }
}

fn default_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Leanne Graham".into(),
            email: "Sincere@april.biz".into(),
        },
        User {
            id: 2,
            name: "Ervin Howell".into(),
            email: "Shanna@melissa.tv".into(),
        },
        User {
            id: 3,
            name: "Clementine Bauch".into(),
            email: "Nathan@yesenia.net".into(),
        },
    ]
}

impl Config {
    /// Resolve the effective configuration for `cli`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let path = match &cli.config {
            Some(path) => Some(path.clone()),
            None => default_config_path(),
        };

        let mut config = match path {
            Some(path) if path.exists() || cli.config.is_some() => Self::from_file(&path)?,
            _ => {
                debug!("no config file found; using defaults");
                Self::default()
            }
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if cli.flaky {
            self.flaky.enabled = true;
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(log_file.clone());
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The configured log file, or `<cache_dir>/posts-view/posts-view.log`.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("posts-view.log")
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "posts_view_{name}_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let path = temp_file("partial", r#"{ "base_url": "http://api.test" }"#);
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.base_url, "http://api.test");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.users, default_users());
        assert!(!config.flaky.enabled);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn nested_flaky_section_is_partial_too() {
        let path = temp_file("flaky", r#"{ "flaky": { "enabled": true, "delay_ms": 5 } }"#);
        let config = Config::from_file(&path).unwrap();
        assert!(config.flaky.enabled);
        assert_eq!(config.flaky.delay_ms, 5);
        assert_eq!(config.flaky.transport_failure_pct, 16.0);
        assert_eq!(config.flaky.server_error_pct, 32.0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_file("broken", "{ not json");
        let cli = Cli {
            config: Some(path.clone()),
            ..Cli::default()
        };
        assert!(Config::load(&cli).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/definitely/not/here/config.json")),
            ..Cli::default()
        };
        assert!(Config::load(&cli).is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let path = temp_file("override", r#"{ "base_url": "http://from-file" }"#);
        let cli = Cli {
            config: Some(path.clone()),
            base_url: Some("http://from-cli".into()),
            flaky: true,
            log_file: Some(PathBuf::from("/tmp/x.log")),
        };
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.base_url, "http://from-cli");
        assert!(config.flaky.enabled);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/x.log"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn cli_flags_parse() {
        let cli = Cli::parse_from(["posts-view", "--base-url", "http://h:1", "--flaky"]);
        assert_eq!(cli.base_url.as_deref(), Some("http://h:1"));
        assert!(cli.flaky);
        assert!(cli.config.is_none());
    }
}
