//! Error types for spandiff.

use thiserror::Error;

/// Result type alias for spandiff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during spandiff operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not well-formed XML.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A line edit addressed lines outside the document.
    #[error("line range {start}-{end} is outside a document of {lines} lines")]
    LineRange {
        start: usize,
        end: usize,
        lines: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A well-formedness failure with its 1-based source location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("XML parse error: {kind} at line {line}, column {column}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Line of the offending input.
    pub line: usize,
    /// Column (in bytes) of the offending input.
    pub column: usize,
}

/// Kinds of well-formedness failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Syntax error reported by the XML reader.
    #[error("{0}")]
    Syntax(String),

    /// End of input reached while an element was still open.
    #[error("unclosed element <{0}>")]
    UnclosedElement(String),

    /// The document has no root element.
    #[error("no root element")]
    EmptyDocument,

    /// A second top-level element follows the root.
    #[error("multiple root elements")]
    MultipleRoots,

    /// Non-whitespace character data outside the root element.
    #[error("text outside the root element")]
    TextOutsideRoot,

    /// Undecodable name, attribute or entity reference.
    #[error("{0}")]
    Encoding(String),
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, (line, column): (usize, usize)) -> Self {
        ParseError { kind, line, column }
    }
}
