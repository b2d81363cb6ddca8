//! Shared strings table for Excel files.
//!
//! Excel stores repeated string values once in `xl/sharedStrings.xml` and
//! references them from cells by index. This module parses the table,
//! flattening rich-text entries (multiple `<r>` runs inside one `<si>`)
//! into plain strings.

use crate::common::{Error, Result, resolve_entity_ref};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Shared strings table for efficient string storage.
#[derive(Debug, Default)]
pub struct SharedStrings {
    /// The strings in index order
    strings: Vec<String>,
}

impl SharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse shared strings from `xl/sharedStrings.xml` content.
    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = Reader::from_str(content);
        let mut strings = Vec::new();
        let mut current: Option<String> = None;
        let mut in_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => current = Some(String::new()),
                    b"t" => in_text = current.is_some(),
                    _ => {},
                },
                Ok(Event::Text(t)) if in_text => {
                    if let Some(s) = current.as_mut() {
                        let decoded = t.decode().map_err(|e| Error::Xml(e.to_string()))?;
                        let unescaped = quick_xml::escape::unescape(&decoded)
                            .map_err(|e| Error::Xml(e.to_string()))?;
                        s.push_str(&unescaped);
                    }
                },
                Ok(Event::GeneralRef(r)) if in_text => {
                    if let Some(s) = current.as_mut() {
                        s.push_str(&resolve_entity_ref(&r)?);
                    }
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"t" => in_text = false,
                    b"si" => {
                        if let Some(s) = current.take() {
                            strings.push(s);
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(Self { strings })
    }

    /// Get a string by its index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the number of strings in the table.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
