//! Whole-table dumps for the post-load report.
//!
//! Rows print as Python-style tuples: text quoted the way `repr` quotes it,
//! `NULL` as `None`, numbers bare, e.g.
//! `('Tank/Level', '{[default]Tank/Level} > 90', 'TK-101', None)`.

use std::fmt;

use rusqlite::types::ValueRef;
use serde::Serialize;

/// One stored value, as returned by `SELECT *`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Cell {
  fn from(value: ValueRef<'_>) -> Self {
    match value {
      ValueRef::Null => Cell::Null,
      ValueRef::Integer(i) => Cell::Integer(i),
      ValueRef::Real(f) => Cell::Real(f),
      ValueRef::Text(t) => Cell::Text(String::from_utf8_lossy(t).into_owned()),
      ValueRef::Blob(b) => Cell::Blob(b.to_vec()),
    }
  }
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Cell::Null => f.write_str("None"),
      Cell::Integer(i) => write!(f, "{i}"),
      Cell::Real(r) => write!(f, "{r:?}"),
      Cell::Text(s) => {
        // Double quotes only when that avoids escaping a single quote.
        let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
        write!(f, "{quote}")?;
        for c in s.chars() {
          match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
          }
        }
        write!(f, "{quote}")
      }
      Cell::Blob(b) => write!(f, "b'{}'", b.escape_ascii()),
    }
  }
}

/// All rows of one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDump {
  pub table:   String,
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<Cell>>,
}

impl TableDump {
  /// Render one row as a tuple. A single column keeps its trailing comma.
  pub fn format_row(row: &[Cell]) -> String {
    let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
    match cells.as_slice() {
      [only] => format!("({only},)"),
      _ => format!("({})", cells.join(", ")),
    }
  }
}

impl fmt::Display for TableDump {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Contents of table '{}':", self.table)?;
    for row in &self.rows {
      writeln!(f, "{}", Self::format_row(row))?;
    }
    Ok(())
  }
}
