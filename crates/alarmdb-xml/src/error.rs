//! Error type for `alarmdb-xml`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed XML: {0}")]
  Syntax(String),

  #[error("element <{0}> is never closed")]
  UnclosedElement(String),

  #[error("document has no root element")]
  NoRootElement,

  /// Content continued after the root element was closed.
  #[error("document has more than one root element (found <{0}>)")]
  MultipleRootElements(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
