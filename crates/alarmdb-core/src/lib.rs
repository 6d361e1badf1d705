//! Core types for the alarm import pipeline.
//!
//! This crate knows nothing about XML or SQLite. It defines the four row
//! types, the column/attribute [`Record`] they travel in, and the rules that
//! correlate a trigger with its message and derive a tag from it.

pub mod derive;
pub mod error;
pub mod model;
pub mod record;

pub use error::{Error, Result};
