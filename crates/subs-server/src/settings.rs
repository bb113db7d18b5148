//! Runtime configuration, read once at startup and passed down explicitly.
//!
//! Sources, later ones winning: the TOML file given with `--config` (optional),
//! then `SUBS__<SECTION>__<KEY>` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use serde::Deserialize;

// ─── Sections ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub server_http: HttpConfig,
  pub database:    DatabaseConfig,
  pub logger:      LoggerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
  pub address:      String,
  /// Seconds in-flight requests may take to drain on shutdown.
  pub idle_timeout: u64,
}

impl Default for HttpConfig {
  fn default() -> Self {
    Self {
      address:      "0.0.0.0:8080".to_owned(),
      idle_timeout: 10,
    }
  }
}

impl HttpConfig {
  pub fn idle_timeout(&self) -> Duration { Duration::from_secs(self.idle_timeout) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
  pub path:             PathBuf,
  pub query_timeout_ms: u64,
}

impl Default for DatabaseConfig {
  fn default() -> Self {
    Self {
      path:             PathBuf::from("subs.db"),
      query_timeout_ms: 5000,
    }
  }
}

impl DatabaseConfig {
  pub fn query_timeout(&self) -> Duration {
    Duration::from_millis(self.query_timeout_ms)
  }

  /// `path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_path(&self) -> PathBuf {
    let s = self.path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/")
      && let Ok(home) = std::env::var("HOME")
    {
      return PathBuf::from(home).join(rest);
    }
    self.path.clone()
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
  pub log_level: String,
  pub format:    LogFormat,
}

impl Default for LoggerConfig {
  fn default() -> Self {
    Self {
      log_level: "info".to_owned(),
      format:    LogFormat::default(),
    }
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

impl ServerConfig {
  /// Layer the optional file at `path` under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SUBS").separator("__"))
      .build()
      .with_context(|| format!("failed to read config file {path:?}"))?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let cfg = ServerConfig::load(Path::new("definitely-not-here.toml")).unwrap();
    assert_eq!(cfg.server_http.idle_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.database.query_timeout(), Duration::from_millis(5000));
    assert_eq!(cfg.logger.format, LogFormat::Pretty);
  }

  #[test]
  fn partial_toml_keeps_other_defaults() {
    let toml = r#"
      [server_http]
      address = "127.0.0.1:9000"

      [logger]
      format = "json"
    "#;
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.server_http.address, "127.0.0.1:9000");
    assert_eq!(cfg.server_http.idle_timeout, 10);
    assert_eq!(cfg.database.path, PathBuf::from("subs.db"));
    assert_eq!(cfg.logger.log_level, "info");
    assert_eq!(cfg.logger.format, LogFormat::Json);
  }

  #[test]
  fn relative_path_is_left_alone() {
    let db = DatabaseConfig::default();
    assert_eq!(db.resolved_path(), PathBuf::from("subs.db"));
  }
}
