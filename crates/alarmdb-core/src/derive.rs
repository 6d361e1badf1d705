//! Trigger → message correlation and tag extraction.
//!
//! A trigger `T<n>` belongs to the message `M<n>`. The tag name is the part
//! of the trigger expression between the first `]` and the first `}`, e.g.
//! `{[default]Tank/Level} > 90` yields `Tank/Level`.

use std::collections::HashMap;

use crate::{
  Error, Result,
  model::{Message, Tag, Trigger},
};

// ─── Identifier correlation ──────────────────────────────────────────────────

/// Drop the leading type character of an id (`T12` → `12`).
///
/// Ids of zero or one character yield the empty string.
pub fn secondary_identifier(trigger_id: &str) -> &str {
  let mut chars = trigger_id.chars();
  chars.next();
  chars.as_str()
}

/// The message id a trigger correlates with: its id with the leading type
/// character replaced by `M` (`T12` → `M12`, `A3` → `M3`).
pub fn correlated_message_id(trigger_id: &str) -> String {
  format!("M{}", secondary_identifier(trigger_id))
}

// ─── Tag extraction ──────────────────────────────────────────────────────────

/// Extract the tag name from a trigger expression.
///
/// The tag starts right after the first `]` and ends right before the first
/// `}`. Missing delimiters fall back to fixed boundaries instead of failing:
///
/// - no `]`: the tag starts at the beginning of the expression;
/// - no `}`: the tag stops before the last character of the expression;
/// - an end at or before the start yields the empty string.
///
/// So `foo}` gives `foo`, `a]bcd` gives `bc`, `abc` gives `ab` and
/// `{x}]y` gives the empty string.
pub fn extract_tag(exp: &str) -> &str {
  let start = exp.find(']').map_or(0, |i| i + 1);
  let end = match exp.find('}') {
    Some(i) => i,
    None => exp.char_indices().next_back().map_or(0, |(i, _)| i),
  };
  if end <= start { "" } else { &exp[start..end] }
}

// ─── Message lookup ──────────────────────────────────────────────────────────

/// Messages keyed by id. When ids repeat, the first message in document
/// order wins.
#[derive(Debug, Default)]
pub struct MessageIndex<'a> {
  by_id: HashMap<&'a str, &'a Message>,
}

impl<'a> MessageIndex<'a> {
  pub fn new(messages: &'a [Message]) -> Self {
    let mut by_id = HashMap::with_capacity(messages.len());
    for message in messages {
      if let Some(id) = message.id.as_deref() {
        by_id.entry(id).or_insert(message);
      }
    }
    Self { by_id }
  }

  pub fn get(&self, id: &str) -> Option<&'a Message> {
    self.by_id.get(id).copied()
  }

  pub fn len(&self) -> usize { self.by_id.len() }

  pub fn is_empty(&self) -> bool { self.by_id.is_empty() }
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Build the [`Tag`] row for one trigger.
///
/// `position` is the trigger's zero-based index in document order and is
/// only used for error reporting.
pub fn derive_tag(
  position: usize,
  trigger:  &Trigger,
  messages: &MessageIndex<'_>,
) -> Result<Tag> {
  let trigger_id = trigger
    .id
    .as_deref()
    .ok_or(Error::MissingTriggerId { position })?;

  let message_id = correlated_message_id(trigger_id);
  let message = messages.get(&message_id).ok_or_else(|| {
    Error::MessageNotFound {
      trigger_id: trigger_id.to_owned(),
      message_id: message_id.clone(),
    }
  })?;

  let tag = extract_tag(trigger.exp.as_deref().unwrap_or_default());
  tracing::debug!(
    trigger = trigger_id,
    secondary = secondary_identifier(trigger_id),
    message = %message_id,
    tag,
    "derived tag"
  );

  Ok(Tag {
    tag:        tag.to_owned(),
    exp:        trigger.exp.clone(),
    identifier: message.identifier.clone(),
    text:       message.text.clone(),
  })
}
