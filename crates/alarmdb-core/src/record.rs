//! [`Record`] — an ordered column → value mapping for one table row.

/// One row worth of text columns, in insertion order.
///
/// A `None` value is stored as SQL `NULL`. Column names are `'static`
/// because every record shape is fixed at compile time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
  columns: Vec<(&'static str, Option<String>)>,
}

impl Record {
  pub fn new() -> Self { Self::default() }

  /// Append a column. A repeated column name replaces the earlier value in
  /// place so the column order stays stable.
  pub fn push(&mut self, column: &'static str, value: Option<String>) {
    match self.columns.iter_mut().find(|(c, _)| *c == column) {
      Some(slot) => slot.1 = value,
      None => self.columns.push((column, value)),
    }
  }

  pub fn with(mut self, column: &'static str, value: Option<String>) -> Self {
    self.push(column, value);
    self
  }

  pub fn get(&self, column: &str) -> Option<&str> {
    self
      .columns
      .iter()
      .find(|(c, _)| *c == column)
      .and_then(|(_, v)| v.as_deref())
  }

  /// Remove a column and return its value.
  pub fn take(&mut self, column: &str) -> Option<String> {
    let pos = self.columns.iter().position(|(c, _)| *c == column)?;
    self.columns.remove(pos).1
  }

  pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.columns.iter().map(|(c, _)| *c)
  }

  pub fn values(&self) -> impl Iterator<Item = Option<&str>> + '_ {
    self.columns.iter().map(|(_, v)| v.as_deref())
  }

  pub fn len(&self) -> usize { self.columns.len() }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }
}
