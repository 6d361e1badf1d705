//! The import run: parse → load → commit → report.
//!
//! The store is acquired twice, once for the load and once for the report.
//! Each acquisition is closed before the next step starts.

use std::path::Path;

use alarmdb_core::{
  derive::{MessageIndex, derive_tag},
  model::Event,
};
use chrono::{Local, NaiveDateTime};
use alarmdb_store_sqlite::{AlarmStore, EVENTS, MESSAGES, TAGS, TRIGGERS, TableDump};
use alarmdb_xml::{Document, load_messages, load_triggers};

use crate::{
  config::{PipelineConfig, ReportFormat},
  error::{Error, Failure, Result, RunState},
};

// ─── Outcome ──────────────────────────────────────────────────────────────────

/// Row counts written by a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
  pub triggers: usize,
  pub messages: usize,
  pub tags:     usize,
  /// Row id of the event logged for this run.
  pub event_id: i64,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
  pub summary: LoadSummary,
  /// `tags` then `events`; `None` when reporting is disabled.
  pub report:  Option<Vec<TableDump>>,
}

// ─── State tracking ───────────────────────────────────────────────────────────

struct Progress {
  state: RunState,
}

impl Progress {
  fn at(state: RunState) -> Self { Self { state } }

  fn advance(&mut self, next: RunState) {
    tracing::debug!(from = %self.state, to = %next, "run state");
    self.state = next;
  }

  fn fail<E: Into<Failure>>(&self) -> impl FnOnce(E) -> Error {
    let reached = self.state;
    move |e| Error::new(reached, e)
  }
}

// ─── Run ──────────────────────────────────────────────────────────────────────

/// Run the whole import described by `config`.
pub fn run(config: &PipelineConfig) -> Result<RunOutcome> {
  let mut progress = Progress::at(RunState::Start);

  tracing::info!(input = %config.input.display(), "parsing alarm definitions");
  let doc = Document::from_path(&config.input).map_err(progress.fail())?;
  progress.advance(RunState::Parsed);

  let summary = {
    let mut store = AlarmStore::open(&config.store).map_err(progress.fail())?;
    let summary = import(&mut store, &doc, config.reset, &config.event_label)?;
    progress.advance(RunState::Committed);
    store.close().map_err(progress.fail())?;
    summary
  };

  let report = if config.report {
    let dumps = read_report(&config.store).map_err(progress.fail())?;
    progress.advance(RunState::Reported);
    Some(dumps)
  } else {
    None
  };

  progress.advance(RunState::Done);
  Ok(RunOutcome { summary, report })
}

/// Load a parsed document into `store` inside one transaction.
///
/// Tables are recreated when `reset` is set, otherwise only created if
/// missing. Triggers are processed in document order; the first trigger
/// without a message, or the first duplicate key, aborts the load.
///
/// A failed load commits nothing: the drops and creates roll back with the
/// inserts, so the store keeps the previous run's tables. Committing each
/// table's DDL on its own would instead leave the tables created before the
/// failure behind, empty.
///
/// The event row is stamped with the local time at which it is inserted.
pub fn import(
  store:       &mut AlarmStore,
  doc:         &Document,
  reset:       bool,
  event_label: &str,
) -> Result<LoadSummary> {
  import_with_clock(store, doc, reset, event_label, || {
    Local::now().naive_local()
  })
}

/// [`import`] with the event time taken from `clock`, which is called once,
/// after every tag has been inserted.
pub fn import_with_clock(
  store:       &mut AlarmStore,
  doc:         &Document,
  reset:       bool,
  event_label: &str,
  clock:       impl FnOnce() -> NaiveDateTime,
) -> Result<LoadSummary> {
  let mut progress = Progress::at(RunState::Parsed);
  let session = store.begin_load().map_err(progress.fail())?;

  let triggers = load_triggers(doc);
  session.prepare_table(&TRIGGERS, reset).map_err(progress.fail())?;
  for trigger in &triggers {
    session.insert_trigger(trigger).map_err(progress.fail())?;
  }
  progress.advance(RunState::TriggersLoaded);
  tracing::info!(count = triggers.len(), "triggers loaded");

  let messages = load_messages(doc);
  session.prepare_table(&MESSAGES, reset).map_err(progress.fail())?;
  for message in &messages {
    session.insert_message(message).map_err(progress.fail())?;
  }
  progress.advance(RunState::MessagesLoaded);
  tracing::info!(count = messages.len(), "messages loaded");

  session.prepare_table(&TAGS, reset).map_err(progress.fail())?;
  let index = MessageIndex::new(&messages);
  for (position, trigger) in triggers.iter().enumerate() {
    let tag = derive_tag(position, trigger, &index).map_err(progress.fail())?;
    session.insert_tag(&tag).map_err(progress.fail())?;
  }
  progress.advance(RunState::TagsLoaded);
  tracing::info!(count = triggers.len(), "tags derived");

  session.prepare_table(&EVENTS, reset).map_err(progress.fail())?;
  let event = Event::at(clock(), event_label);
  let event_id = session.log_event(&event).map_err(progress.fail())?;
  progress.advance(RunState::EventLogged);

  session.commit().map_err(progress.fail())?;
  tracing::info!(event_id, datetime = %event.datetime, "load committed");

  Ok(LoadSummary {
    triggers: triggers.len(),
    messages: messages.len(),
    tags: triggers.len(),
    event_id,
  })
}

/// Reopen the store at `path` and dump `tags` then `events`.
pub fn read_report(path: &Path) -> alarmdb_store_sqlite::Result<Vec<TableDump>> {
  let store = AlarmStore::open(path)?;
  let dumps = vec![store.dump_table(&TAGS)?, store.dump_table(&EVENTS)?];
  store.close()?;
  Ok(dumps)
}

/// Render report dumps for the console.
pub fn render_report(
  dumps:  &[TableDump],
  format: ReportFormat,
) -> serde_json::Result<String> {
  match format {
    ReportFormat::Text => Ok(
      dumps
        .iter()
        .map(|dump| format!("\n{dump}"))
        .collect::<String>(),
    ),
    ReportFormat::Json => serde_json::to_string_pretty(dumps).map(|s| s + "\n"),
  }
}

#[cfg(test)]
mod tests {
  use alarmdb_store_sqlite::Cell;

  use super::*;

  #[test]
  fn text_report_has_blank_line_before_each_table() {
    let dumps = vec![
      TableDump {
        table:   "tags".into(),
        columns: vec!["tag".into()],
        rows:    vec![vec![Cell::Text("Level".into())]],
      },
      TableDump {
        table:   "events".into(),
        columns: vec!["id".into()],
        rows:    vec![],
      },
    ];
    assert_eq!(
      render_report(&dumps, ReportFormat::Text).unwrap(),
      "\nContents of table 'tags':\n('Level',)\n\nContents of table 'events':\n"
    );
  }

  #[test]
  fn json_report_is_an_array() {
    let dumps = vec![TableDump {
      table:   "events".into(),
      columns: vec!["id".into(), "event".into()],
      rows:    vec![vec![Cell::Integer(1), Cell::Null]],
    }];
    let json: serde_json::Value =
      serde_json::from_str(&render_report(&dumps, ReportFormat::Json).unwrap())
        .unwrap();
    assert_eq!(json[0]["table"], "events");
    assert_eq!(json[0]["rows"][0], serde_json::json!([1, null]));
  }
}
