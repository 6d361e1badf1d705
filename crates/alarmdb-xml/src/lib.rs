//! XML source loader for alarm definitions.
//!
//! Parses a whole document into a small element tree with `quick-xml`'s pull
//! reader, then maps `<trigger>` and `<message>` elements onto the row types
//! from `alarmdb-core`.

mod document;
mod mapping;

pub mod error;

pub use document::{Descendants, Document, Element};
pub use error::{Error, Result};
pub use mapping::{load_messages, load_triggers};
