//! Table definitions for the alarm store.
//!
//! Every load drops and recreates these tables, so there is no versioning and
//! no migration path.

use alarmdb_core::model::{Event, Message, Tag, Trigger};

/// A table name plus the column list used in its `CREATE TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
  pub name:    &'static str,
  pub columns: &'static str,
}

pub const TRIGGERS: TableSchema = TableSchema {
  name:    Trigger::TABLE,
  columns: "
    id     TEXT PRIMARY KEY,
    type   TEXT,
    exp    TEXT,
    label  TEXT",
};

// `trigger` is a keyword, hence the quotes.
pub const MESSAGES: TableSchema = TableSchema {
  name:    Message::TABLE,
  columns: "
    id            TEXT PRIMARY KEY,
    trigger_value TEXT,
    identifier    TEXT,
    \"trigger\"     TEXT,
    text          TEXT",
};

/// `tag` is extracted from `exp`; two triggers with the same tag abort the
/// load.
pub const TAGS: TableSchema = TableSchema {
  name:    Tag::TABLE,
  columns: "
    tag         TEXT PRIMARY KEY,
    exp         TEXT,
    identifier  TEXT,
    text        TEXT",
};

pub const EVENTS: TableSchema = TableSchema {
  name:    Event::TABLE,
  columns: "
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    datetime  TEXT,
    event     TEXT",
};

impl TableSchema {
  pub(crate) fn drop_sql(&self) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(self.name))
  }

  pub(crate) fn create_sql(&self, if_not_exists: bool) -> String {
    let guard = if if_not_exists { "IF NOT EXISTS " } else { "" };
    format!(
      "CREATE TABLE {guard}{} ({}\n)",
      quote_ident(self.name),
      self.columns
    )
  }
}

/// Double-quote an SQL identifier.
pub(crate) fn quote_ident(ident: &str) -> String {
  format!("\"{}\"", ident.replace('"', "\"\""))
}
