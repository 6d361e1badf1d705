//! Run-level error type.
//!
//! Every failure is fatal. The error records the last [`RunState`] the run
//! reached so the diagnostic points at the step that broke.

use std::fmt;

use thiserror::Error;

// ─── Run state ────────────────────────────────────────────────────────────────

/// Progress of a run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
  Start,
  Parsed,
  TriggersLoaded,
  MessagesLoaded,
  TagsLoaded,
  EventLogged,
  Committed,
  Reported,
  Done,
}

impl fmt::Display for RunState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      RunState::Start => "start",
      RunState::Parsed => "parsed",
      RunState::TriggersLoaded => "triggers loaded",
      RunState::MessagesLoaded => "messages loaded",
      RunState::TagsLoaded => "tags loaded",
      RunState::EventLogged => "event logged",
      RunState::Committed => "committed",
      RunState::Reported => "reported",
      RunState::Done => "done",
    })
  }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

/// The four failure classes a run can end with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Missing, unreadable or malformed XML.
  Parse,
  /// A trigger without a correlated message.
  Lookup,
  /// A duplicate `id` or `tag`.
  Constraint,
  /// Any other SQLite failure.
  Storage,
}

#[derive(Debug, Error)]
pub enum Failure {
  #[error(transparent)]
  Parse(#[from] alarmdb_xml::Error),

  #[error(transparent)]
  Lookup(#[from] alarmdb_core::Error),

  #[error(transparent)]
  Store(#[from] alarmdb_store_sqlite::Error),
}

#[derive(Debug, Error)]
#[error("import aborted after state '{reached}': {failure}")]
pub struct Error {
  pub reached: RunState,
  #[source]
  pub failure: Failure,
}

impl Error {
  pub fn new(reached: RunState, failure: impl Into<Failure>) -> Self {
    Self {
      reached,
      failure: failure.into(),
    }
  }

  pub fn kind(&self) -> ErrorKind {
    match &self.failure {
      Failure::Parse(_) => ErrorKind::Parse,
      Failure::Lookup(_) => ErrorKind::Lookup,
      Failure::Store(alarmdb_store_sqlite::Error::Constraint { .. }) => {
        ErrorKind::Constraint
      }
      Failure::Store(_) => ErrorKind::Storage,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
