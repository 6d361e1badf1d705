//! Layered pipeline configuration.
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file,
//! `ALARMDB_*` environment variables, command-line overrides.

use std::path::{Path, PathBuf};

use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_INPUT: &str = "Alarms.xml";
pub const DEFAULT_STORE: &str = "alarms.db";
pub const DEFAULT_EVENT_LABEL: &str = "Alarm import completed";

// ─── Report format ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
  /// Header line per table, one tuple per row.
  #[default]
  Text,
  /// A JSON array of `{ table, columns, rows }` objects.
  Json,
}

impl ReportFormat {
  fn as_str(self) -> &'static str {
    match self {
      ReportFormat::Text => "text",
      ReportFormat::Json => "json",
    }
  }
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Everything a run needs, passed explicitly into [`crate::pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
  /// XML file with `<trigger>` and `<message>` elements.
  pub input:       PathBuf,
  /// SQLite file; created if missing.
  pub store:       PathBuf,
  /// Drop and recreate every table before loading. When off, tables are only
  /// created if missing and existing rows stay.
  pub reset:       bool,
  pub event_label: String,
  /// Read `tags` and `events` back after the load.
  pub report:      bool,
  pub format:      ReportFormat,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      input:       PathBuf::from(DEFAULT_INPUT),
      store:       PathBuf::from(DEFAULT_STORE),
      reset:       true,
      event_label: DEFAULT_EVENT_LABEL.to_owned(),
      report:      true,
      format:      ReportFormat::Text,
    }
  }
}

/// Values that win over every other source, typically from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  pub input:       Option<PathBuf>,
  pub store:       Option<PathBuf>,
  pub reset:       Option<bool>,
  pub event_label: Option<String>,
  pub report:      Option<bool>,
  pub format:      Option<ReportFormat>,
}

impl PipelineConfig {
  /// Build the configuration from all layers. A missing `file` is not an
  /// error.
  pub fn load(file: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let mut builder = Config::builder()
      .set_default("input", path_value(&defaults.input))?
      .set_default("store", path_value(&defaults.store))?
      .set_default("reset", defaults.reset)?
      .set_default("event_label", defaults.event_label)?
      .set_default("report", defaults.report)?
      .set_default("format", defaults.format.as_str())?;

    if let Some(file) = file {
      builder = builder.add_source(File::from(file).required(false));
    }

    let settings = builder
      .add_source(Environment::with_prefix("ALARMDB").try_parsing(true))
      .set_override_option("input", overrides.input.as_deref().map(path_value))?
      .set_override_option("store", overrides.store.as_deref().map(path_value))?
      .set_override_option("reset", overrides.reset)?
      .set_override_option("event_label", overrides.event_label)?
      .set_override_option("report", overrides.report)?
      .set_override_option("format", overrides.format.map(ReportFormat::as_str))?
      .build()?;

    let mut config: Self = settings.try_deserialize()?;
    config.input = expand_tilde(&config.input);
    config.store = expand_tilde(&config.store);
    Ok(config)
  }
}

fn path_value(path: &Path) -> String { path.to_string_lossy().into_owned() }

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
  fn defaults_without_file() {
    let config = PipelineConfig::load(None, Overrides::default()).unwrap();
    assert_eq!(config, PipelineConfig::default());
  }

  #[test]
  fn missing_file_is_ignored() {
    let config = PipelineConfig::load(
      Some(Path::new("/nonexistent/alarmdb.toml")),
      Overrides::default(),
    )
    .unwrap();
    assert_eq!(config.store, PathBuf::from(DEFAULT_STORE));
  }

  #[test]
  fn file_then_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("alarmdb.toml");
    std::fs::write(
      &path,
      "input = \"plant.xml\"\nstore = \"plant.db\"\nreset = false\nformat = \"json\"\n",
    )
    .unwrap();

    let config = PipelineConfig::load(Some(path.as_path()), Overrides {
      store: Some(PathBuf::from("override.db")),
      event_label: Some("nightly".into()),
      ..Default::default()
    })
    .unwrap();

    assert_eq!(config.input, PathBuf::from("plant.xml"));
    assert_eq!(config.store, PathBuf::from("override.db"));
    assert!(!config.reset);
    assert_eq!(config.format, ReportFormat::Json);
    assert_eq!(config.event_label, "nightly");
    assert!(config.report);
  }

  #[test]
  fn tilde_expansion_only_touches_home_prefix() {
    assert_eq!(expand_tilde(Path::new("data/a.db")), PathBuf::from("data/a.db"));
    assert_eq!(expand_tilde(Path::new("~user/a.db")), PathBuf::from("~user/a.db"));
  }
}
