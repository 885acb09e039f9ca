//! Runtime settings: an optional TOML file layered under `ATTEST_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use attest_core::payload::PayloadFormat;
use serde::Deserialize;

/// Where records live and which UTC offset timestamps are entered and shown
/// in.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file; a leading `~/` is expanded.
  pub store_path:         PathBuf,
  /// Minutes east of UTC. Defaults to Paris winter time.
  pub utc_offset_minutes: i32,
}

impl Settings {
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings: Settings = config::Config::builder()
      .set_default("store_path", "~/.local/share/attest/attestations.db")?
      .set_default("utc_offset_minutes", 60_i64)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ATTEST"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise settings")?;
    Ok(settings)
  }

  pub fn payload_format(&self) -> anyhow::Result<PayloadFormat> {
    PayloadFormat::with_offset_minutes(self.utc_offset_minutes).with_context(|| {
      format!("utc_offset_minutes out of range: {}", self.utc_offset_minutes)
    })
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let settings = Settings::load(Path::new("/nonexistent/attest.toml")).unwrap();
    assert_eq!(settings.utc_offset_minutes, 60);
    assert!(settings.store_path.ends_with("attestations.db"));
  }

  #[test]
  fn offset_out_of_range_is_an_error() {
    let settings = Settings {
      store_path:         PathBuf::from("x.db"),
      utc_offset_minutes: 48 * 60,
    };
    assert!(settings.payload_format().is_err());
  }

  #[test]
  fn relative_paths_are_untouched() {
    assert_eq!(expand_tilde(Path::new("data/a.db")), PathBuf::from("data/a.db"));
  }
}
