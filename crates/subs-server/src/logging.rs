//! Tracing subscriber setup.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LoggerConfig};

/// Map a configured level name to a filter; `fatal` and `panic` clamp to
/// `error`, unknown names mean `info`.
pub fn level_filter(name: &str) -> LevelFilter {
  match name.trim().to_ascii_lowercase().as_str() {
    "trace" => LevelFilter::TRACE,
    "debug" => LevelFilter::DEBUG,
    "warn" => LevelFilter::WARN,
    "error" | "fatal" | "panic" => LevelFilter::ERROR,
    "off" => LevelFilter::OFF,
    _ => LevelFilter::INFO,
  }
}

/// Install the global subscriber. `RUST_LOG` still takes precedence over the
/// configured level.
pub fn init(cfg: &LoggerConfig) {
  let filter = EnvFilter::builder()
    .with_default_directive(level_filter(&cfg.log_level).into())
    .from_env_lossy();

  let builder = tracing_subscriber::fmt().with_env_filter(filter);
  match cfg.format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_levels_parse() {
    assert_eq!(level_filter("trace"), LevelFilter::TRACE);
    assert_eq!(level_filter("DEBUG"), LevelFilter::DEBUG);
    assert_eq!(level_filter(" warn "), LevelFilter::WARN);
    assert_eq!(level_filter("error"), LevelFilter::ERROR);
  }

  #[test]
  fn fatal_and_panic_are_as_quiet_as_error() {
    assert_eq!(level_filter("fatal"), LevelFilter::ERROR);
    assert_eq!(level_filter("PANIC"), LevelFilter::ERROR);
  }

  #[test]
  fn unknown_level_falls_back_to_info() {
    assert_eq!(level_filter(""), LevelFilter::INFO);
    assert_eq!(level_filter("verbose"), LevelFilter::INFO);
  }
}
