//! Structural comparison of two XML documents.
//!
//! A *control* document is compared against a *test* document. The result is
//! a list of [`Difference`]s, each addressed by the positional path of the
//! control-side node, or a parse failure naming the side that could not be
//! read.

mod engine;

pub use engine::{diff, DiffEngine};

use std::fmt;

use thiserror::Error;

use crate::constants::NULL_VALUE;
use crate::error::ParseError;
use crate::path::PositionalPath;

/// What kind of mismatch a difference describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DifferenceKind {
    /// Paired elements have different names.
    ElementName,
    /// An attribute present on both sides has different values.
    AttributeValue,
    /// An attribute is present on one side only.
    AttributeLookup,
    /// Normalized text content differs.
    TextValue,
    /// Paired elements have a different number of child elements.
    ChildCount,
    /// A child element has no counterpart on the other side.
    ChildLookup,
}

impl fmt::Display for DifferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifferenceKind::ElementName => "element name",
            DifferenceKind::AttributeValue => "attribute value",
            DifferenceKind::AttributeLookup => "attribute lookup",
            DifferenceKind::TextValue => "text value",
            DifferenceKind::ChildCount => "child count",
            DifferenceKind::ChildLookup => "child lookup",
        };
        f.write_str(name)
    }
}

/// Human-readable location of a difference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiffContext {
    /// Qualified name of the enclosing element (`#document` above the root).
    pub parent_tag: String,
    /// Qualified name of the element or attribute that differs.
    pub property_tag: String,
}

impl DiffContext {
    pub fn new(parent_tag: impl Into<String>, property_tag: impl Into<String>) -> Self {
        DiffContext {
            parent_tag: parent_tag.into(),
            property_tag: property_tag.into(),
        }
    }
}

/// One structural mismatch between control and test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    pub kind: DifferenceKind,
    /// Control-side value, `None` when the control side has nothing there.
    pub control_value: Option<String>,
    /// Test-side value, `None` when the test side has nothing there.
    pub test_value: Option<String>,
    /// Positional path of the control-side node.
    pub path: PositionalPath,
    pub context: DiffContext,
}

impl Difference {
    /// Control value as rendered in reports.
    pub fn control_display(&self) -> &str {
        self.control_value.as_deref().unwrap_or(NULL_VALUE)
    }

    /// Test value as rendered in reports.
    pub fn test_display(&self) -> &str {
        self.test_value.as_deref().unwrap_or(NULL_VALUE)
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: Control: {} => Test: {} ({} / {})",
            self.kind,
            self.path,
            self.control_display(),
            self.test_display(),
            self.context.parent_tag,
            self.context.property_tag
        )
    }
}

/// Which of the two compared documents an outcome refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Control,
    Test,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Control => f.write_str("control"),
            Side::Test => f.write_str("test"),
        }
    }
}

/// One of the two inputs is not well-formed XML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{side} document is malformed: {error}")]
pub struct MalformedInput {
    pub side: Side,
    #[source]
    pub error: ParseError,
}

/// Result of comparing two documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Both documents parsed and compare as similar (or one was empty).
    NoDifferences,
    /// Both documents parsed and differ; never empty.
    Differences(Vec<Difference>),
    /// One of the documents could not be parsed.
    Malformed(MalformedInput),
}

impl DiffOutcome {
    /// Returns the differences found, empty unless `Differences`.
    pub fn differences(&self) -> &[Difference] {
        match self {
            DiffOutcome::Differences(differences) => differences,
            _ => &[],
        }
    }

    /// True if a document could not be parsed.
    pub fn is_malformed(&self) -> bool {
        matches!(self, DiffOutcome::Malformed(_))
    }
}
