//! SQLite backend for the alarm import pipeline.
//!
//! Owns the four table definitions, recreates them at the start of a load,
//! inserts rows through a single transaction and reads whole tables back for
//! the report.

mod report;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use report::{Cell, TableDump};
pub use schema::{EVENTS, MESSAGES, TAGS, TRIGGERS, TableSchema};
pub use store::{AlarmStore, LoadSession};
