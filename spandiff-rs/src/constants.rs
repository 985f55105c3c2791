//! Constants used throughout spandiff.

/// Name reported as the parent of the document element.
pub const DOCUMENT_NODE_NAME: &str = "#document";

/// Rendering of a missing value on either side of a difference.
pub const NULL_VALUE: &str = "null";

/// URI permanently bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Attribute name (or prefix) that declares namespaces.
pub const XMLNS: &str = "xmlns";

/// Declaration written at the top of formatted documents.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Spaces per nesting level in formatted output.
pub const DEFAULT_INDENT: usize = 2;
