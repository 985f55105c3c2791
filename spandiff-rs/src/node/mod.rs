//! Node structures for XML tree representation.
//!
//! Documents are parsed into an owned tree of `XmlNode`s. Every element
//! carries its positional path and source line range so that a node found by
//! comparison can be traced back to the text it came from.

pub mod namespace;
mod xml_content;

pub use namespace::{ExpandedName, NamespaceContext};
pub use xml_content::{
    normalize_whitespace, Elements, XmlAttribute, XmlComment, XmlDocument, XmlElement, XmlNode,
    XmlText,
};
