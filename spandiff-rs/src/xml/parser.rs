//! XML parser that builds document trees.
//!
//! Trees are assembled from the element scanner's events, so every element
//! carries the same positional path and line range the position index
//! records for it.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::trace;

use super::scanner::{OpenTag, ScanEvent, Scanner};
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::index::LineRange;
use crate::node::namespace::declared_prefix;
use crate::node::{NamespaceContext, XmlAttribute, XmlComment, XmlDocument, XmlElement, XmlNode};

/// Builds an `XmlDocument` from scanner events.
struct TreeBuilder {
    namespaces: NamespaceContext,
    stack: Vec<XmlElement>,
    root: Option<XmlElement>,
    prolog: Vec<XmlComment>,
    epilog: Vec<XmlComment>,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            namespaces: NamespaceContext::new(),
            stack: Vec::new(),
            root: None,
            prolog: Vec::new(),
            epilog: Vec::new(),
        }
    }

    fn open(&mut self, tag: OpenTag) {
        let mut namespace_decls = IndexMap::new();
        let mut raw_attributes = Vec::new();
        for (key, value) in tag.attributes {
            match declared_prefix(&key) {
                Some(prefix) => {
                    namespace_decls.insert(prefix.to_string(), value);
                }
                None => raw_attributes.push((key, value)),
            }
        }

        self.namespaces.enter(
            namespace_decls
                .iter()
                .map(|(prefix, uri)| (prefix.as_str(), uri.as_str())),
        );

        let name = self.namespaces.element_name(&tag.qname);
        let mut attributes = IndexMap::new();
        for (qname, value) in raw_attributes {
            let name = self.namespaces.attribute_name(&qname);
            attributes.insert(name.clone(), XmlAttribute { qname, name, value });
        }

        trace!(path = %tag.path, "open element");
        self.stack.push(XmlElement::new(
            tag.qname,
            name,
            tag.path,
            namespace_decls,
            attributes,
            tag.start_line,
        ));
    }

    fn close(&mut self, range: LineRange) {
        self.namespaces.leave();
        let Some(mut element) = self.stack.pop() else {
            return;
        };
        element.set_span(range);
        element.prune_blank_text();

        match self.stack.last_mut() {
            Some(parent) => parent.push_child(XmlNode::Element(element)),
            None => self.root = Some(element),
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(current) = self.stack.last_mut() {
            current.push_text(text);
        }
    }

    fn comment(&mut self, text: &str) {
        let comment = XmlComment::new(text);
        match self.stack.last_mut() {
            Some(current) => current.push_child(XmlNode::Comment(comment)),
            None if self.root.is_none() => self.prolog.push(comment),
            None => self.epilog.push(comment),
        }
    }

    fn finish(self) -> std::result::Result<XmlDocument, ParseError> {
        let root = self
            .root
            .ok_or_else(|| ParseError::new(ParseErrorKind::EmptyDocument, (1, 1)))?;
        Ok(XmlDocument {
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

/// Parses XML from a string.
pub fn parse_str(xml: &str) -> std::result::Result<XmlDocument, ParseError> {
    let mut scanner = Scanner::new(xml);
    let mut builder = TreeBuilder::new();

    while let Some(event) = scanner.next_event()? {
        match event {
            ScanEvent::Open(tag) => builder.open(tag),
            ScanEvent::Close(closed) => builder.close(closed.range),
            ScanEvent::Text(text) => builder.text(&text),
            ScanEvent::Comment(text) => builder.comment(&text),
        }
    }

    builder.finish()
}

/// Parses XML from a file.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<XmlDocument> {
    let xml = fs::read_to_string(path)?;
    Ok(parse_str(&xml)?)
}
