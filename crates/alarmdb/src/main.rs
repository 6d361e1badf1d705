//! `alarmdb` — load alarm triggers and messages from XML into SQLite.
//!
//! # Usage
//!
//! ```
//! alarmdb --input Alarms.xml --store alarms.db
//! alarmdb --config plant.toml --no-reset --format json
//! ```

use std::{io::Write as _, path::PathBuf};

use alarmdb::{
  Overrides, PipelineConfig, ReportFormat,
  pipeline::{self, render_report},
};
use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about = "Load alarm definitions from XML into SQLite")]
struct Cli {
  /// Path to an optional TOML configuration file.
  #[arg(short, long, default_value = "alarmdb.toml")]
  config: PathBuf,

  /// XML file with <trigger> and <message> elements.
  #[arg(short, long, value_name = "FILE")]
  input: Option<PathBuf>,

  /// SQLite file to write.
  #[arg(short, long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// Keep existing tables and rows instead of recreating them.
  #[arg(long)]
  no_reset: bool,

  /// Label of the event row logged for this run.
  #[arg(long)]
  event_label: Option<String>,

  /// Skip reading the tables back after the load.
  #[arg(long)]
  no_report: bool,

  /// Report output format.
  #[arg(long, value_enum)]
  format: Option<ReportFormat>,
}

impl Cli {
  fn overrides(&self) -> Overrides {
    Overrides {
      input:       self.input.clone(),
      store:       self.store.clone(),
      reset:       self.no_reset.then_some(false),
      event_label: self.event_label.clone(),
      report:      self.no_report.then_some(false),
      format:      self.format,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let config = PipelineConfig::load(Some(cli.config.as_path()), cli.overrides())
    .context("failed to load configuration")?;

  let outcome = pipeline::run(&config).with_context(|| {
    format!(
      "failed to import {} into {}",
      config.input.display(),
      config.store.display()
    )
  })?;

  tracing::info!(
    triggers = outcome.summary.triggers,
    messages = outcome.summary.messages,
    tags = outcome.summary.tags,
    "import finished"
  );

  if let Some(dumps) = outcome.report {
    let rendered =
      render_report(&dumps, config.format).context("failed to render report")?;
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{rendered}").context("failed to write report")?;
  }

  Ok(())
}
