//! Verification reports.
//!
//! Joins the diff engine and the position index: differences found against
//! a control document are projected onto the control text's line ranges as
//! [`ErrorInfo`] records.

mod projector;

pub use projector::project;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::diff::{DiffEngine, DiffOutcome, MalformedInput, Side};
use crate::error::ParseError;
use crate::index::{LineRange, PositionIndex};

/// One highlighted block of control text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorInfo {
    /// First line of the block (1-based).
    pub start_line: usize,
    /// Last line of the block, inclusive.
    pub end_line: usize,
    /// What the block should become: the test-side value.
    pub message: String,
    /// Identity string, also used for deduplication.
    pub details: String,
}

impl ErrorInfo {
    pub fn range(&self) -> LineRange {
        LineRange::new(self.start_line, self.end_line)
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines {}-{}: {} ({})",
            self.start_line, self.end_line, self.message, self.details
        )
    }
}

/// Result of verifying a test document against a control document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No actionable differences.
    Valid,
    /// Actionable differences, in comparison order. Never empty.
    Invalid(Vec<ErrorInfo>),
    /// One of the documents is not well-formed.
    Malformed(MalformedInput),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// Returns the error records, empty unless `Invalid`.
    pub fn errors(&self) -> &[ErrorInfo] {
        match self {
            Verdict::Invalid(errors) => errors,
            _ => &[],
        }
    }
}

/// A control document together with the index built from its exact text.
///
/// Keeping both in one immutable value guarantees that paths produced by
/// comparing against this text resolve against the matching index.
#[derive(Debug, Clone)]
pub struct Snapshot {
    text: Arc<str>,
    index: PositionIndex,
}

impl Snapshot {
    /// Indexes `text`; fails if it is not well-formed.
    pub fn new(text: impl Into<Arc<str>>) -> Result<Self, ParseError> {
        let text = text.into();
        let index = PositionIndex::build(&text)?;
        Ok(Snapshot { text, index })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Compares `test` against this snapshot with the default engine.
    pub fn report(&self, test: &str) -> Verdict {
        self.report_with(&DiffEngine::default(), test)
    }

    /// Compares `test` against this snapshot with `engine`.
    pub fn report_with(&self, engine: &DiffEngine, test: &str) -> Verdict {
        match engine.diff(&self.text, test) {
            DiffOutcome::NoDifferences => Verdict::Valid,
            DiffOutcome::Malformed(malformed) => Verdict::Malformed(malformed),
            DiffOutcome::Differences(differences) => {
                let errors = project(&differences, &self.index);
                debug!(
                    differences = differences.len(),
                    errors = errors.len(),
                    "projected differences"
                );
                if errors.is_empty() {
                    Verdict::Valid
                } else {
                    Verdict::Invalid(errors)
                }
            }
        }
    }
}

/// Verifies `test` against `control`.
///
/// Empty input on either side is valid: there is nothing to compare yet.
pub fn report(control: &str, test: &str) -> Verdict {
    if control.trim().is_empty() || test.trim().is_empty() {
        info!("empty document, nothing to verify");
        return Verdict::Valid;
    }
    match Snapshot::new(control) {
        Ok(snapshot) => snapshot.report(test),
        Err(error) => Verdict::Malformed(MalformedInput {
            side: Side::Control,
            error,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_and_invalid() {
        let snapshot = Snapshot::new("<r>\n<a>1</a>\n</r>").unwrap();
        assert_eq!(snapshot.report("<r><a>1</a></r>"), Verdict::Valid);

        let verdict = snapshot.report("<r><a>2</a></r>");
        assert_eq!(verdict.errors().len(), 1);
        assert_eq!(verdict.errors()[0].range(), LineRange::single(2));
        assert!(!verdict.is_valid());
    }

    #[test]
    fn test_only_root_difference_is_valid() {
        // A text change on the document element is the one suppressed path.
        assert_eq!(report("<r>a</r>", "<r>b</r>"), Verdict::Valid);
    }

    #[test]
    fn test_malformed() {
        match report("<r>", "<r/>") {
            Verdict::Malformed(m) => assert_eq!(m.side, Side::Control),
            other => panic!("expected malformed control, got {:?}", other),
        }
        match report("<r/>", "<r><a></r>") {
            Verdict::Malformed(m) => assert_eq!(m.side, Side::Test),
            other => panic!("expected malformed test, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_documents() {
        assert_eq!(report("", ""), Verdict::Valid);
        assert_eq!(report("<r/>", ""), Verdict::Valid);
    }

    #[test]
    fn test_error_info_display() {
        let info = ErrorInfo {
            start_line: 4,
            end_line: 7,
            message: "null".to_string(),
            details: "Control: X => Test: null | Context: Class: r, Property: X".to_string(),
        };
        assert_eq!(
            info.to_string(),
            "lines 4-7: null (Control: X => Test: null | Context: Class: r, Property: X)"
        );
    }
}
