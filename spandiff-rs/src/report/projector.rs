//! Projection of differences onto source lines.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::ErrorInfo;
use crate::diff::{Difference, DifferenceKind};
use crate::index::PositionIndex;

/// Turns differences into line-addressed error records.
///
/// `index` must be built from the control text the differences came from.
/// Differences addressed at the document element are dropped, since one is
/// raised whenever any descendant differs. Child count differences are
/// dropped as well: every added or removed child already has its own
/// `ChildLookup`. Differences whose path does not resolve are dropped too. Records are deduplicated by their details string
/// and keep the order of `differences`.
pub fn project(differences: &[Difference], index: &PositionIndex) -> Vec<ErrorInfo> {
    let mut seen = FxHashSet::default();
    let mut errors = Vec::new();

    for difference in differences {
        if difference.kind == DifferenceKind::ChildCount {
            continue;
        }
        if difference.path.is_document_element() {
            continue;
        }

        let Some(range) = index.get(&difference.path) else {
            debug!(path = %difference.path, "difference does not resolve to source lines");
            continue;
        };

        let details = format!(
            "Control: {} => Test: {} | Context: Class: {}, Property: {}",
            difference.control_display(),
            difference.test_display(),
            difference.context.parent_tag,
            difference.context.property_tag
        );
        if !seen.insert(details.clone()) {
            continue;
        }

        errors.push(ErrorInfo {
            start_line: range.start(),
            end_line: range.end(),
            message: difference.test_display().to_string(),
            details,
        });
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DiffContext, DifferenceKind};
    use crate::path::PositionalPath;

    const CONTROL: &str = "<r>\n  <a>1</a>\n  <b>\n    <c/>\n  </b>\n</r>\n";

    fn difference(path: &str, control: Option<&str>, test: Option<&str>) -> Difference {
        Difference {
            kind: DifferenceKind::TextValue,
            control_value: control.map(str::to_string),
            test_value: test.map(str::to_string),
            path: path.parse::<PositionalPath>().unwrap(),
            context: DiffContext::new("r", "a"),
        }
    }

    #[test]
    fn test_record_fields() {
        let index = PositionIndex::build(CONTROL).unwrap();
        let errors = project(&[difference("/r[1]/b[1]", Some("x"), None)], &index);
        assert_eq!(
            errors,
            vec![ErrorInfo {
                start_line: 3,
                end_line: 5,
                message: "null".to_string(),
                details: "Control: x => Test: null | Context: Class: r, Property: a".to_string(),
            }]
        );
    }

    #[test]
    fn test_document_element_suppressed() {
        let index = PositionIndex::build(CONTROL).unwrap();
        let errors = project(
            &[
                difference("/r[1]", Some("2"), Some("3")),
                difference("/r[1]/a[1]", Some("1"), Some("2")),
            ],
            &index,
        );
        assert_eq!(errors.len(), 1);
        assert_eq!((errors[0].start_line, errors[0].end_line), (2, 2));
    }

    #[test]
    fn test_child_count_not_projected() {
        let index = PositionIndex::build(CONTROL).unwrap();
        let count = Difference {
            kind: DifferenceKind::ChildCount,
            ..difference("/r[1]/b[1]", Some("1"), Some("0"))
        };
        let lookup = Difference {
            kind: DifferenceKind::ChildLookup,
            ..difference("/r[1]/b[1]/c[1]", Some("c"), None)
        };
        let errors = project(&[count, lookup], &index);
        assert_eq!(errors.len(), 1);
        assert_eq!((errors[0].start_line, errors[0].end_line), (4, 4));
        assert_eq!(errors[0].message, "null");
    }

    #[test]
    fn test_unresolvable_paths_skipped() {
        let index = PositionIndex::build(CONTROL).unwrap();
        let errors = project(&[difference("/r[1]/zzz[1]", Some("1"), Some("2"))], &index);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_duplicates_removed_in_order() {
        let index = PositionIndex::build(CONTROL).unwrap();
        let errors = project(
            &[
                difference("/r[1]/b[1]/c[1]", Some("1"), Some("2")),
                difference("/r[1]/a[1]", Some("1"), Some("2")),
                difference("/r[1]/a[1]", Some("5"), Some("6")),
            ],
            &index,
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].start_line, 4);
        assert_eq!(errors[1].message, "6");
    }
}
