//! [`AlarmStore`] — a single SQLite file holding one import run.

use std::path::Path;

use alarmdb_core::{
  model::{Event, Message, Tag, Trigger},
  record::Record,
};
use rusqlite::{Connection, Transaction, types::ToSql};

use crate::{
  Error, Result,
  report::{Cell, TableDump},
  schema::{TableSchema, quote_ident},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An exclusively owned connection to the alarm store.
///
/// Open one for the load, [`close`](Self::close) it, and open another to read
/// the results back.
pub struct AlarmStore {
  conn: Connection,
}

impl AlarmStore {
  /// Open (or create) the store file at `path`.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = Connection::open(path)?;
    Ok(Self { conn })
  }

  /// Open an in-memory store — useful for testing.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()?;
    Ok(Self { conn })
  }

  /// Start a load. Nothing written through the session is visible to other
  /// connections until [`LoadSession::commit`]; dropping the session rolls
  /// everything back, including dropped and recreated tables.
  pub fn begin_load(&mut self) -> Result<LoadSession<'_>> {
    let tx = self.conn.transaction()?;
    Ok(LoadSession { tx })
  }

  /// Every row of `table` in storage order (`SELECT *`).
  pub fn dump_table(&self, table: &TableSchema) -> Result<TableDump> {
    let mut stmt = self
      .conn
      .prepare(&format!("SELECT * FROM {}", quote_ident(table.name)))?;

    let columns: Vec<String> =
      stmt.column_names().into_iter().map(str::to_owned).collect();
    let width = columns.len();

    let rows = stmt
      .query_map([], |row| {
        (0..width)
          .map(|i| row.get_ref(i).map(Cell::from))
          .collect::<rusqlite::Result<Vec<_>>>()
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(TableDump {
      table: table.name.to_owned(),
      columns,
      rows,
    })
  }

  pub fn row_count(&self, table: &TableSchema) -> Result<u64> {
    let count: i64 = self.conn.query_row(
      &format!("SELECT COUNT(*) FROM {}", quote_ident(table.name)),
      [],
      |r| r.get(0),
    )?;
    Ok(count.max(0) as u64)
  }

  /// Close the connection, surfacing any error SQLite reports on close.
  pub fn close(self) -> Result<()> {
    self.conn.close().map_err(|(_, e)| Error::Database(e))
  }
}

// ─── Load session ────────────────────────────────────────────────────────────

/// The write side of a load, wrapping one transaction.
pub struct LoadSession<'a> {
  tx: Transaction<'a>,
}

impl LoadSession<'_> {
  /// Drop `table` if it exists and create it fresh.
  pub fn reset_table(&self, table: &TableSchema) -> Result<()> {
    self.tx.execute(&table.drop_sql(), [])?;
    self.tx.execute(&table.create_sql(false), [])?;
    tracing::debug!(table = table.name, "table recreated");
    Ok(())
  }

  /// Create `table` only if it does not exist yet; existing rows are kept.
  pub fn ensure_table(&self, table: &TableSchema) -> Result<()> {
    self.tx.execute(&table.create_sql(true), [])?;
    Ok(())
  }

  /// [`reset_table`](Self::reset_table) or
  /// [`ensure_table`](Self::ensure_table) depending on `reset`.
  pub fn prepare_table(&self, table: &TableSchema, reset: bool) -> Result<()> {
    if reset {
      self.reset_table(table)
    } else {
      self.ensure_table(table)
    }
  }

  /// Insert one row, binding each record value to a `:column` parameter.
  pub fn insert_record(&self, table: &str, record: &Record) -> Result<()> {
    if record.is_empty() {
      let sql = format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table));
      self
        .tx
        .execute(&sql, [])
        .map_err(|e| Error::from_insert(table, e))?;
      return Ok(());
    }

    let columns: Vec<String> = record.columns().map(quote_ident).collect();
    let names: Vec<String> = record.columns().map(|c| format!(":{c}")).collect();
    let values: Vec<Option<&str>> = record.values().collect();

    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({})",
      quote_ident(table),
      columns.join(", "),
      names.join(", "),
    );

    let params: Vec<(&str, &dyn ToSql)> = names
      .iter()
      .zip(&values)
      .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
      .collect();

    self
      .tx
      .execute(&sql, params.as_slice())
      .map_err(|e| Error::from_insert(table, e))?;
    Ok(())
  }

  pub fn insert_trigger(&self, trigger: &Trigger) -> Result<()> {
    self.insert_record(Trigger::TABLE, &trigger.to_record())
  }

  pub fn insert_message(&self, message: &Message) -> Result<()> {
    self.insert_record(Message::TABLE, &message.to_record())
  }

  pub fn insert_tag(&self, tag: &Tag) -> Result<()> {
    self.insert_record(Tag::TABLE, &tag.to_record())
  }

  /// Append `event` and return its auto-assigned id.
  pub fn log_event(&self, event: &Event) -> Result<i64> {
    self.insert_record(Event::TABLE, &event.to_record())?;
    Ok(self.tx.last_insert_rowid())
  }

  pub fn commit(self) -> Result<()> {
    self.tx.commit()?;
    Ok(())
  }
}
