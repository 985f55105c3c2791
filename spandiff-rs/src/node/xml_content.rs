//! XML content types for tree nodes.
//!
//! This module provides `XmlNode`, which represents one node of a parsed
//! document: an element (with attributes and children), text, or a comment.

use indexmap::IndexMap;

use super::namespace::ExpandedName;
use crate::index::LineRange;
use crate::path::PositionalPath;

/// A node in the document tree.
#[derive(Debug, Clone)]
pub enum XmlNode {
    /// An XML element.
    Element(XmlElement),
    /// Non-whitespace character data (CDATA included).
    Text(XmlText),
    /// A comment. Kept for printing, ignored by comparison.
    Comment(XmlComment),
}

impl XmlNode {
    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a reference to the text, if this is a text node.
    pub fn as_text(&self) -> Option<&XmlText> {
        match self {
            XmlNode::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// A parsed document: the root element plus any top-level comments.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    pub(crate) prolog: Vec<XmlComment>,
    pub(crate) root: XmlElement,
    pub(crate) epilog: Vec<XmlComment>,
}

impl XmlDocument {
    /// Returns the document element.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Comments before the document element.
    pub fn prolog(&self) -> &[XmlComment] {
        &self.prolog
    }

    /// Comments after the document element.
    pub fn epilog(&self) -> &[XmlComment] {
        &self.epilog
    }

    /// Iterates over all elements in document order (depth first).
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: vec![&self.root],
        }
    }
}

/// Depth-first iterator over elements, see [`XmlDocument::elements`].
pub struct Elements<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let children: Vec<&XmlElement> = element.child_elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(element)
    }
}

/// An attribute with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Name as written in the source (`rdf:about`).
    pub qname: String,
    /// Namespace-resolved name.
    pub name: ExpandedName,
    /// Unescaped value.
    pub value: String,
}

/// An XML element.
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// Qualified name as written in the source.
    qname: String,
    /// Namespace-resolved name.
    name: ExpandedName,
    /// Positional address within its own document.
    path: PositionalPath,
    /// Source lines covered by the element.
    span: LineRange,
    /// Namespace declarations (prefix -> URI, empty prefix for the default).
    namespace_decls: IndexMap<String, String>,
    /// Ordinary attributes keyed by resolved name, in source order.
    attributes: IndexMap<ExpandedName, XmlAttribute>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub(crate) fn new(
        qname: String,
        name: ExpandedName,
        path: PositionalPath,
        namespace_decls: IndexMap<String, String>,
        attributes: IndexMap<ExpandedName, XmlAttribute>,
        start_line: usize,
    ) -> Self {
        XmlElement {
            qname,
            name,
            path,
            span: LineRange::single(start_line),
            namespace_decls,
            attributes,
            children: Vec::new(),
        }
    }

    /// Returns the qualified name of the element (e.g. `owl:Class`).
    pub fn qname(&self) -> &str {
        &self.qname
    }

    /// Returns the namespace-resolved name.
    pub fn name(&self) -> &ExpandedName {
        &self.name
    }

    /// Returns the local name (prefix stripped).
    pub fn local_name(&self) -> &str {
        &self.name.local_name
    }

    /// Returns the element's positional path.
    pub fn path(&self) -> &PositionalPath {
        &self.path
    }

    /// Returns the source lines covered by the element.
    pub fn span(&self) -> LineRange {
        self.span
    }

    pub(crate) fn set_span(&mut self, span: LineRange) {
        self.span = span;
    }

    /// Returns namespace declarations made on this element.
    pub fn namespace_decls(&self) -> &IndexMap<String, String> {
        &self.namespace_decls
    }

    /// Returns the ordinary (non-`xmlns`) attributes.
    pub fn attributes(&self) -> &IndexMap<ExpandedName, XmlAttribute> {
        &self.attributes
    }

    /// Looks up an attribute by resolved name.
    pub fn attribute(&self, name: &ExpandedName) -> Option<&XmlAttribute> {
        self.attributes.get(name)
    }

    /// Returns all child nodes.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Iterates over child elements only.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// Appends character data, merging with a preceding text node.
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.text.push_str(text);
        } else {
            self.children.push(XmlNode::Text(XmlText::new(text)));
        }
    }

    pub(crate) fn push_child(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Drops text children that hold only whitespace.
    pub(crate) fn prune_blank_text(&mut self) {
        self.children.retain(|child| match child {
            XmlNode::Text(t) => !t.text.trim().is_empty(),
            _ => true,
        });
    }

    /// Comparable text: direct text children concatenated, whitespace
    /// collapsed and trimmed. `None` when the element has no text.
    pub fn text_content(&self) -> Option<String> {
        let raw: String = self
            .children
            .iter()
            .filter_map(XmlNode::as_text)
            .map(XmlText::text)
            .collect();
        normalize_whitespace(&raw)
    }
}

/// XML character data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlText {
    text: String,
}

impl XmlText {
    /// Creates a text node from unescaped character data.
    pub fn new(text: &str) -> Self {
        XmlText {
            text: text.to_string(),
        }
    }

    /// Returns the unescaped text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// XML comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlComment {
    text: String,
}

impl XmlComment {
    /// Creates a comment node.
    pub fn new(text: &str) -> Self {
        XmlComment {
            text: text.to_string(),
        }
    }

    /// Returns the comment body.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Collapses whitespace runs to a single space and trims both ends.
///
/// Returns `None` for empty or whitespace-only input.
pub fn normalize_whitespace(text: &str) -> Option<String> {
    let mut result = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(word);
    }
    if result.is_empty() {
        None
    } else {
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("  hello \n\t  world  "),
            Some("hello world".to_string())
        );
        assert_eq!(normalize_whitespace(" \n\t "), None);
        assert_eq!(normalize_whitespace(""), None);
    }

    #[test]
    fn test_text_merging() {
        let mut element = XmlElement::new(
            "a".to_string(),
            ExpandedName::no_namespace("a"),
            PositionalPath::document().child("a", 1),
            IndexMap::new(),
            IndexMap::new(),
            1,
        );
        element.push_text("one ");
        element.push_text(" two");
        assert_eq!(element.children().len(), 1);
        assert_eq!(element.text_content(), Some("one two".to_string()));
    }
}
