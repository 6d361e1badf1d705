//! Row types for the four tables written by an import run.
//!
//! `Trigger` and `Message` are read straight from XML attributes; `Tag` is
//! derived from the two (see [`crate::derive`]); `Event` is produced once per
//! run.

use chrono::{Local, NaiveDateTime};

use crate::record::Record;

/// Format of [`Event::datetime`], second precision, local wall clock.
pub const EVENT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── Trigger ─────────────────────────────────────────────────────────────────

/// An alarm condition, one per `<trigger>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trigger {
  pub id:    Option<String>,
  pub kind:  Option<String>,
  /// Expression such as `{[default]Tank/Level} > 90`.
  pub exp:   Option<String>,
  pub label: Option<String>,
}

impl Trigger {
  pub const TABLE: &'static str = "triggers";

  /// `(column, xml attribute)` pairs read from a `<trigger>` element.
  pub const ATTRIBUTES: &'static [(&'static str, &'static str)] = &[
    ("id", "id"),
    ("type", "type"),
    ("exp", "exp"),
    ("label", "label"),
  ];

  pub fn from_record(mut record: Record) -> Self {
    Self {
      id:    record.take("id"),
      kind:  record.take("type"),
      exp:   record.take("exp"),
      label: record.take("label"),
    }
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("id", self.id.clone())
      .with("type", self.kind.clone())
      .with("exp", self.exp.clone())
      .with("label", self.label.clone())
  }
}

// ─── Message ─────────────────────────────────────────────────────────────────

/// Operator-facing text for a trigger, one per `<message>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
  /// `M<n>`, paired with trigger `T<n>` by convention.
  pub id:            Option<String>,
  pub trigger_value: Option<String>,
  pub identifier:    Option<String>,
  pub trigger:       Option<String>,
  pub text:          Option<String>,
}

impl Message {
  pub const TABLE: &'static str = "messages";

  pub const ATTRIBUTES: &'static [(&'static str, &'static str)] = &[
    ("id", "id"),
    ("trigger_value", "trigger-value"),
    ("identifier", "identifier"),
    ("trigger", "trigger"),
    ("text", "text"),
  ];

  pub fn from_record(mut record: Record) -> Self {
    Self {
      id:            record.take("id"),
      trigger_value: record.take("trigger_value"),
      identifier:    record.take("identifier"),
      trigger:       record.take("trigger"),
      text:          record.take("text"),
    }
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("id", self.id.clone())
      .with("trigger_value", self.trigger_value.clone())
      .with("identifier", self.identifier.clone())
      .with("trigger", self.trigger.clone())
      .with("text", self.text.clone())
  }
}

// ─── Tag ─────────────────────────────────────────────────────────────────────

/// A trigger's expression joined with its message, keyed by the tag name
/// extracted from the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
  pub tag:        String,
  pub exp:        Option<String>,
  pub identifier: Option<String>,
  pub text:       Option<String>,
}

impl Tag {
  pub const TABLE: &'static str = "tags";

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("tag", Some(self.tag.clone()))
      .with("exp", self.exp.clone())
      .with("identifier", self.identifier.clone())
      .with("text", self.text.clone())
  }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// A run log entry. The row id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
  pub datetime: String,
  pub event:    String,
}

impl Event {
  pub const TABLE: &'static str = "events";

  pub fn at(at: NaiveDateTime, label: impl Into<String>) -> Self {
    Self {
      datetime: at.format(EVENT_DATETIME_FORMAT).to_string(),
      event:    label.into(),
    }
  }

  /// An event stamped with the current local time.
  pub fn now(label: impl Into<String>) -> Self {
    Self::at(Local::now().naive_local(), label)
  }

  pub fn to_record(&self) -> Record {
    Record::new()
      .with("datetime", Some(self.datetime.clone()))
      .with("event", Some(self.event.clone()))
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn trigger_record_uses_type_column() {
    let record = Record::new()
      .with("id", Some("T7".into()))
      .with("type", Some("digital".into()))
      .with("exp", None)
      .with("label", Some("Pump".into()));
    let trigger = Trigger::from_record(record.clone());

    assert_eq!(trigger.kind.as_deref(), Some("digital"));
    assert_eq!(trigger.exp, None);
    assert_eq!(trigger.to_record(), record);
  }

  #[test]
  fn message_columns_follow_attribute_table() {
    let columns: Vec<_> = Message::default().to_record().columns().collect();
    let expected: Vec<_> = Message::ATTRIBUTES.iter().map(|(c, _)| *c).collect();
    assert_eq!(columns, expected);
  }

  #[test]
  fn event_datetime_has_second_precision() {
    let at = NaiveDate::from_ymd_opt(2024, 3, 9)
      .unwrap()
      .and_hms_milli_opt(7, 5, 3, 999)
      .unwrap();
    let event = Event::at(at, "loaded");
    assert_eq!(event.datetime, "2024-03-09 07:05:03");
    assert_eq!(event.to_record().get("event"), Some("loaded"));
  }

  #[test]
  fn event_now_parses_back() {
    let event = Event::now("x");
    assert!(
      NaiveDateTime::parse_from_str(&event.datetime, EVENT_DATETIME_FORMAT).is_ok()
    );
  }
}
