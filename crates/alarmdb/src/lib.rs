//! One-shot import of alarm definitions from XML into SQLite.
//!
//! [`pipeline::run`] parses the input, recreates the `triggers`, `messages`,
//! `tags` and `events` tables, loads them in one transaction, then reopens
//! the store to read `tags` and `events` back for the report.

pub mod config;
pub mod error;
pub mod pipeline;

pub use self::config::{Overrides, PipelineConfig, ReportFormat};
pub use error::{Error, ErrorKind, Result, RunState};
