//! `<trigger>` / `<message>` elements → row types.

use alarmdb_core::model::{Message, Trigger};

use crate::Document;

/// Every `<trigger>` below the root, in document order.
pub fn load_triggers(doc: &Document) -> Vec<Trigger> {
  doc
    .root()
    .elements("trigger")
    .map(|e| Trigger::from_record(e.record(Trigger::ATTRIBUTES)))
    .collect()
}

/// Every `<message>` below the root, in document order.
pub fn load_messages(doc: &Document) -> Vec<Message> {
  doc
    .root()
    .elements("message")
    .map(|e| Message::from_record(e.record(Message::ATTRIBUTES)))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALARMS: &[u8] = br#"<Alarms>
    <trigger id="T1" type="analog" exp="{[default]Tank/Level} &gt; 90" label="High level"/>
    <trigger id="T2" type="digital" exp="{[default]Pump/Fault} == 1"/>
    <message id="M1" trigger-value="1" identifier="TK-101" trigger="T1" text="Tank high"/>
    <message id="M2" identifier="P-7" text="Pump fault"/>
  </Alarms>"#;

  #[test]
  fn maps_trigger_attributes() {
    let doc = Document::parse(ALARMS).unwrap();
    let triggers = load_triggers(&doc);
    assert_eq!(triggers.len(), 2);
    assert_eq!(triggers[0], Trigger {
      id:    Some("T1".into()),
      kind:  Some("analog".into()),
      exp:   Some("{[default]Tank/Level} > 90".into()),
      label: Some("High level".into()),
    });
    assert_eq!(triggers[1].label, None);
  }

  #[test]
  fn maps_hyphenated_trigger_value() {
    let doc = Document::parse(ALARMS).unwrap();
    let messages = load_messages(&doc);
    assert_eq!(messages[0].trigger_value.as_deref(), Some("1"));
    assert_eq!(messages[0].trigger.as_deref(), Some("T1"));
    assert_eq!(messages[1].trigger_value, None);
    assert_eq!(messages[1].text.as_deref(), Some("Pump fault"));
  }

  #[test]
  fn root_named_trigger_is_not_loaded() {
    let doc = Document::parse(br#"<trigger id="T0"/>"#).unwrap();
    assert!(load_triggers(&doc).is_empty());
  }
}
