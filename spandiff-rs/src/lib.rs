//! spandiff - structural XML diff with source line attribution
//!
//! This library compares two XML documents structurally and maps every
//! difference back to the lines of the control document it came from.
//!
//! # Overview
//!
//! Three pieces work together:
//!
//! - a positional indexer that maps `/tag[n]/...` paths to line ranges,
//! - a diff engine that compares a control and a test document while
//!   ignoring whitespace, comments, attribute order and namespace prefixes,
//! - a projector that turns differences into deduplicated [`ErrorInfo`]
//!   records addressed by control-document lines.
//!
//! Both the indexer and the diff tree are built from the same streaming
//! scanner, so a path reported by the diff always resolves against an index
//! built from the same text.
//!
//! # Example
//!
//! ```
//! use xml_spandiff::{report, Verdict};
//!
//! let control = "<r>\n  <a>1</a>\n</r>\n";
//! let test = "<r><a>2</a></r>";
//!
//! match report(control, test) {
//!     Verdict::Invalid(errors) => {
//!         assert_eq!(errors[0].start_line, 2);
//!         assert_eq!(errors[0].message, "2");
//!     }
//!     other => panic!("unexpected verdict: {:?}", other),
//! }
//! ```

pub mod constants;
pub mod diff;
pub mod edit;
pub mod error;
pub mod index;
pub mod matching;
pub mod node;
pub mod path;
pub mod report;
pub mod xml;

// Re-export commonly used types
pub use constants::*;
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use index::{LineRange, PositionIndex};
pub use path::{InvalidPath, PositionalPath, Step};

pub use diff::{
    diff, DiffContext, DiffEngine, DiffOutcome, Difference, DifferenceKind, MalformedInput, Side,
};
pub use matching::{ByName, ByNameAndText, ElementSelector, NodeMatcher};
pub use node::{ExpandedName, XmlAttribute, XmlComment, XmlDocument, XmlElement, XmlNode, XmlText};
pub use report::{project, report, ErrorInfo, Snapshot, Verdict};
pub use xml::{format_document, parse_file, parse_str, FormatOptions, XmlPrinter};

pub use edit::{group_blocks, remove_lines, replace_lines, Block};
