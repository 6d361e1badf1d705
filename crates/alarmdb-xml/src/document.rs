//! In-memory element tree.

use std::path::Path;

use alarmdb_core::record::Record;
use quick_xml::{
  Reader,
  events::{BytesStart, Event},
};

use crate::{Error, Result};

// ─── Tree ────────────────────────────────────────────────────────────────────

/// A parsed XML document. Only elements and their attributes are kept; text,
/// comments and processing instructions are dropped.
#[derive(Debug, Clone)]
pub struct Document {
  root: Element,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
  name:       String,
  attributes: Vec<(String, String)>,
  children:   Vec<Element>,
}

impl Document {
  /// Read and parse the file at `path`.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::parse(&bytes)
  }

  /// Parse a complete document held in memory.
  pub fn parse(xml: &[u8]) -> Result<Self> {
    let mut reader = Reader::from_reader(xml);

    // Open elements, innermost last.
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
      match reader.read_event_into(&mut buf) {
        Ok(Event::Start(ref e)) => {
          let element = Element::from_start(e, &reader)?;
          if open.is_empty() && root.is_some() {
            return Err(Error::MultipleRootElements(element.name));
          }
          open.push(element);
        }
        Ok(Event::Empty(ref e)) => {
          let element = Element::from_start(e, &reader)?;
          match open.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_some() => {
              return Err(Error::MultipleRootElements(element.name));
            }
            None => root = Some(element),
          }
        }
        Ok(Event::End(_)) => {
          // quick-xml has already matched the end name against the start.
          let Some(element) = open.pop() else {
            return Err(Error::Syntax(format!(
              "unexpected end tag at byte {}",
              reader.buffer_position()
            )));
          };
          match open.last_mut() {
            Some(parent) => parent.children.push(element),
            None => root = Some(element),
          }
        }
        Ok(Event::Text(ref e)) => {
          // Entity references arrive inside text; unescaping rejects a bare
          // `&` and anything but the predefined and character entities.
          let text = e.unescape().map_err(|err| {
            Error::Syntax(format!(
              "{err} in text near byte {}",
              reader.buffer_position()
            ))
          })?;
          if open.is_empty() && !text.trim().is_empty() {
            return Err(Error::Syntax(format!(
              "text outside the root element near byte {}",
              reader.buffer_position()
            )));
          }
        }
        Ok(Event::Eof) => break,
        Err(e) => {
          return Err(Error::Syntax(format!(
            "{e} at byte {}",
            reader.error_position()
          )));
        }
        _ => {}
      }
      buf.clear();
    }

    if let Some(unclosed) = open.pop() {
      return Err(Error::UnclosedElement(unclosed.name));
    }

    root.map(|root| Self { root }).ok_or(Error::NoRootElement)
  }

  pub fn root(&self) -> &Element { &self.root }
}

impl Element {
  fn from_start(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Self> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
      let attr = attr.map_err(|e| {
        Error::Syntax(format!(
          "bad attribute on <{name}> near byte {}: {e}",
          reader.buffer_position()
        ))
      })?;
      let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
      if attr.value.contains(&b'<') {
        return Err(Error::Syntax(format!(
          "attribute {key:?} on <{name}> contains '<'"
        )));
      }
      let value = attr
        .unescape_value()
        .map_err(|e| Error::Syntax(format!("attribute {key:?} on <{name}>: {e}")))?
        .into_owned();
      attributes.push((key, value));
    }

    Ok(Self {
      name,
      attributes,
      children: Vec::new(),
    })
  }

  /// Tag name exactly as written, including any namespace prefix.
  pub fn name(&self) -> &str { &self.name }

  pub fn attribute(&self, name: &str) -> Option<&str> {
    self
      .attributes
      .iter()
      .find(|(k, _)| k == name)
      .map(|(_, v)| v.as_str())
  }

  pub fn children(&self) -> &[Element] { &self.children }

  /// Every element below this one, depth-first in document order.
  pub fn descendants(&self) -> Descendants<'_> {
    Descendants {
      stack: self.children.iter().rev().collect(),
    }
  }

  /// Descendants with tag name `name`, in document order.
  pub fn elements<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Iterator<Item = &'a Element> + 'a {
    self.descendants().filter(move |e| e.name == name)
  }

  /// First descendant `<name>` whose attribute `attr` equals `value`.
  pub fn find(&self, name: &str, attr: &str, value: &str) -> Option<&Element> {
    self
      .descendants()
      .find(|e| e.name == name && e.attribute(attr) == Some(value))
  }

  /// Extract a [`Record`] from `(column, attribute)` pairs. Attributes that
  /// are absent map to `None`.
  pub fn record(&self, mapping: &[(&'static str, &str)]) -> Record {
    let mut record = Record::new();
    for (column, attr) in mapping {
      record.push(*column, self.attribute(attr).map(str::to_owned));
    }
    record
  }
}

// ─── Traversal ───────────────────────────────────────────────────────────────

/// Pre-order iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
  stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
  type Item = &'a Element;

  fn next(&mut self) -> Option<Self::Item> {
    let next = self.stack.pop()?;
    self.stack.extend(next.children.iter().rev());
    Some(next)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  const NESTED: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
    <project>
      <!-- alarms -->
      <alarms>
        <trigger id="T1" exp="a"/>
        <group>
          <trigger id="T2" exp="b">ignored text</trigger>
        </group>
        <trigger id="T3" exp="c"/>
      </alarms>
      <messages>
        <message id="M1" text="one"/>
        <message id="M2" text="two &amp; more"/>
      </messages>
    </project>"#;

  #[test]
  fn parses_root_and_children() {
    let doc = Document::parse(NESTED).unwrap();
    assert_eq!(doc.root().name(), "project");
    let names: Vec<_> = doc.root().children().iter().map(Element::name).collect();
    assert_eq!(names, ["alarms", "messages"]);
  }

  #[test]
  fn elements_are_in_document_order_at_any_depth() {
    let doc = Document::parse(NESTED).unwrap();
    let ids: Vec<_> = doc
      .root()
      .elements("trigger")
      .filter_map(|e| e.attribute("id"))
      .collect();
    assert_eq!(ids, ["T1", "T2", "T3"]);
  }

  #[test]
  fn descendants_exclude_self() {
    let doc = Document::parse(br#"<trigger id="outer"><trigger id="inner"/></trigger>"#)
      .unwrap();
    let ids: Vec<_> = doc
      .root()
      .elements("trigger")
      .filter_map(|e| e.attribute("id"))
      .collect();
    assert_eq!(ids, ["inner"]);
  }

  #[test]
  fn find_by_attribute() {
    let doc = Document::parse(NESTED).unwrap();
    let found = doc.root().find("message", "id", "M2").unwrap();
    assert_eq!(found.attribute("text"), Some("two & more"));
    assert!(doc.root().find("message", "id", "M9").is_none());
    assert!(doc.root().find("trigger", "id", "M1").is_none());
  }

  #[test]
  fn record_maps_missing_attributes_to_none() {
    let doc = Document::parse(br#"<r><message id="M1" trigger-value="1"/></r>"#).unwrap();
    let el = doc.root().elements("message").next().unwrap();
    let record = el.record(&[
      ("id", "id"),
      ("trigger_value", "trigger-value"),
      ("text", "text"),
    ]);
    assert_eq!(record.get("id"), Some("M1"));
    assert_eq!(record.get("trigger_value"), Some("1"));
    assert_eq!(record.get("text"), None);
    assert_eq!(record.len(), 3);
  }

  #[test]
  fn empty_root_is_accepted() {
    let doc = Document::parse(b"<root/>").unwrap();
    assert_eq!(doc.root().name(), "root");
    assert_eq!(doc.root().descendants().count(), 0);
  }

  #[test]
  fn rejects_mismatched_end_tag() {
    let err = Document::parse(b"<root><a></b></root>").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
  }

  #[test]
  fn rejects_unclosed_element() {
    let err = Document::parse(b"<root><a>").unwrap_err();
    assert!(matches!(err, Error::UnclosedElement(ref n) if n == "a"), "{err:?}");
  }

  #[test]
  fn rejects_empty_input() {
    assert!(matches!(Document::parse(b"").unwrap_err(), Error::NoRootElement));
    assert!(matches!(
      Document::parse(b"<?xml version=\"1.0\"?>\n").unwrap_err(),
      Error::NoRootElement
    ));
  }

  #[test]
  fn rejects_second_root() {
    let err = Document::parse(b"<a/><b></b>").unwrap_err();
    assert!(matches!(err, Error::MultipleRootElements(ref n) if n == "b"), "{err:?}");
  }

  #[test]
  fn rejects_duplicate_attribute() {
    let err = Document::parse(br#"<root><trigger id="T1" id="T2"/></root>"#).unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
  }

  #[test]
  fn rejects_text_before_root() {
    let err = Document::parse(b"junk<root/>").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
  }

  #[test]
  fn rejects_text_after_root() {
    let err = Document::parse(b"<root/>trailing text").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
  }

  #[test]
  fn rejects_bare_ampersand_in_text() {
    let err = Document::parse(b"<root>a & b</root>").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
  }

  #[test]
  fn rejects_undefined_entity() {
    let err = Document::parse(b"<root>&undefined;</root>").unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
  }

  #[test]
  fn rejects_lt_in_attribute() {
    let err =
      Document::parse(br#"<root><trigger id="T1" exp="a<b"/></root>"#).unwrap_err();
    assert!(matches!(err, Error::Syntax(_)), "{err:?}");
  }

  #[test]
  fn accepts_entities_and_whitespace_around_root() {
    let doc = Document::parse(
      b"<?xml version=\"1.0\"?>\n<!-- head -->\n<root>&lt;&#65;&amp;</root>\n\n",
    )
    .unwrap();
    assert_eq!(doc.root().name(), "root");
  }

  #[test]
  fn missing_file_is_io_error() {
    let err = Document::from_path("/nonexistent/alarms.xml").unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "{err:?}");
  }
}
