//! Error types for `alarmdb-core`.

use thiserror::Error;

/// Failures while correlating triggers with messages.
#[derive(Debug, Error)]
pub enum Error {
  /// A `<trigger>` element carried no `id` attribute, so no message id can
  /// be constructed for it.
  #[error("trigger #{position} has no id attribute")]
  MissingTriggerId { position: usize },

  #[error("no message {message_id:?} for trigger {trigger_id:?}")]
  MessageNotFound {
    trigger_id: String,
    message_id: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
