//! XML parsing and output.
//!
//! Parsing goes through a single streaming scanner that assigns positional
//! paths and line ranges; the tree parser and the position index both
//! consume it.

mod lines;
mod parser;
mod printer;
pub(crate) mod scanner;

pub use lines::LineIndex;
pub use parser::{parse_file, parse_str};
pub use printer::{format_document, print_to_string, FormatOptions, XmlPrinter};
