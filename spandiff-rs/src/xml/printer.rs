//! XML printer that re-indents document trees.
//!
//! Output is one element per line: empty elements self-close, text-only
//! elements stay on a single line, everything else nests its children one
//! indent level deeper. Whitespace-only text is not reproduced.

use std::io::Write;

use quick_xml::escape::{escape, partial_escape};

use crate::constants::{DEFAULT_INDENT, XMLNS, XML_DECLARATION};
use crate::error::Result;
use crate::node::{XmlComment, XmlDocument, XmlElement, XmlNode};
use crate::xml::parse_str;

/// Options for XML formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Put each namespace declaration on its own line.
    pub namespaces_on_new_line: bool,
    /// Emit the `<?xml ...?>` declaration.
    pub xml_declaration: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent: DEFAULT_INDENT,
            namespaces_on_new_line: false,
            xml_declaration: true,
        }
    }
}

/// XML printer that writes document trees.
pub struct XmlPrinter<W: Write> {
    writer: W,
    options: FormatOptions,
}

impl<W: Write> XmlPrinter<W> {
    /// Creates a printer with default options.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, FormatOptions::default())
    }

    /// Creates a printer with the given options.
    pub fn with_options(writer: W, options: FormatOptions) -> Self {
        XmlPrinter { writer, options }
    }

    /// Prints a whole document.
    pub fn print(&mut self, doc: &XmlDocument) -> std::io::Result<()> {
        if self.options.xml_declaration {
            writeln!(self.writer, "{}", XML_DECLARATION)?;
        }
        for comment in doc.prolog() {
            self.print_comment(comment, 0)?;
        }
        self.print_element(doc.root(), 0)?;
        for comment in doc.epilog() {
            self.print_comment(comment, 0)?;
        }
        self.writer.flush()
    }

    fn print_element(&mut self, element: &XmlElement, depth: usize) -> std::io::Result<()> {
        let indent = self.indent_str(depth);
        write!(self.writer, "{}<{}", indent, element.qname())?;

        for (prefix, uri) in element.namespace_decls() {
            let name = if prefix.is_empty() {
                XMLNS.to_string()
            } else {
                format!("{}:{}", XMLNS, prefix)
            };
            if self.options.namespaces_on_new_line {
                let inner = self.indent_str(depth + 1);
                write!(self.writer, "\n{}{}=\"{}\"", inner, name, escape(uri.as_str()))?;
            } else {
                write!(self.writer, " {}=\"{}\"", name, escape(uri.as_str()))?;
            }
        }
        for attr in element.attributes().values() {
            write!(self.writer, " {}=\"{}\"", attr.qname, escape(attr.value.as_str()))?;
        }

        let children = element.children();
        if children.is_empty() {
            return writeln!(self.writer, "/>");
        }

        if children.iter().all(|child| matches!(child, XmlNode::Text(_))) {
            let text: String = children
                .iter()
                .filter_map(XmlNode::as_text)
                .map(|t| t.text())
                .collect();
            return writeln!(
                self.writer,
                ">{}</{}>",
                partial_escape(text.trim()),
                element.qname()
            );
        }

        writeln!(self.writer, ">")?;
        for child in children {
            match child {
                XmlNode::Element(e) => self.print_element(e, depth + 1)?,
                XmlNode::Text(t) => {
                    let inner = self.indent_str(depth + 1);
                    writeln!(self.writer, "{}{}", inner, partial_escape(t.text().trim()))?;
                }
                XmlNode::Comment(c) => self.print_comment(c, depth + 1)?,
            }
        }
        writeln!(self.writer, "{}</{}>", indent, element.qname())
    }

    fn print_comment(&mut self, comment: &XmlComment, depth: usize) -> std::io::Result<()> {
        let indent = self.indent_str(depth);
        writeln!(self.writer, "{}<!--{}-->", indent, comment.text())
    }

    fn indent_str(&self, depth: usize) -> String {
        " ".repeat(self.options.indent * depth)
    }
}

/// Prints a document tree to a string.
pub fn print_to_string(doc: &XmlDocument, options: &FormatOptions) -> std::io::Result<String> {
    let mut output = Vec::new();
    {
        let mut printer = XmlPrinter::with_options(&mut output, options.clone());
        printer.print(doc)?;
    }
    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Parses `xml` and prints it re-indented.
pub fn format_document(xml: &str, options: &FormatOptions) -> Result<String> {
    let doc = parse_str(xml)?;
    Ok(print_to_string(&doc, options)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_nested() {
        let xml = r#"<r xmlns:a="urn:a" id="1"><a:x>t</a:x><y/><!--c--></r>"#;
        let output = format_document(xml, &FormatOptions::default()).unwrap();
        assert_eq!(
            output,
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<r xmlns:a=\"urn:a\" id=\"1\">\n",
                "  <a:x>t</a:x>\n",
                "  <y/>\n",
                "  <!--c-->\n",
                "</r>\n",
            )
        );
    }

    #[test]
    fn test_namespaces_on_new_line() {
        let xml = r#"<r xmlns="urn:d" xmlns:a="urn:a"><a:x/></r>"#;
        let options = FormatOptions {
            indent: 4,
            namespaces_on_new_line: true,
            xml_declaration: false,
        };
        let output = format_document(xml, &options).unwrap();
        assert_eq!(
            output,
            "<r\n    xmlns=\"urn:d\"\n    xmlns:a=\"urn:a\">\n    <a:x/>\n</r>\n"
        );
    }

    #[test]
    fn test_entity_encoding() {
        let xml = r#"<root attr="&amp;&lt;&quot;">a &amp; &lt;b&gt;</root>"#;
        let output = format_document(xml, &FormatOptions::default()).unwrap();
        assert!(output.contains(r#"attr="&amp;&lt;&quot;""#));
        assert!(output.contains("a &amp; &lt;b&gt;"));
    }

    #[test]
    fn test_mixed_content() {
        let xml = "<p>one<b>two</b>three</p>";
        let options = FormatOptions {
            xml_declaration: false,
            ..FormatOptions::default()
        };
        let output = format_document(xml, &options).unwrap();
        assert_eq!(output, "<p>\n  one\n  <b>two</b>\n  three\n</p>\n");
    }

    #[test]
    fn test_formatting_is_stable() {
        let xml = "<!--top-->\n<doc><s id=\"s1\">\n\n<p>First.</p>     <p>Second.</p></s></doc>";
        let once = format_document(xml, &FormatOptions::default()).unwrap();
        let twice = format_document(&once, &FormatOptions::default()).unwrap();
        assert_eq!(once, twice);
        assert!(once.contains("<!--top-->\n<doc>"));
    }

    #[test]
    fn test_malformed_input_rejected() {
        assert!(format_document("<a><b></a>", &FormatOptions::default()).is_err());
    }
}
