//! The comparison walk.

use tracing::debug;

use super::{DiffContext, DiffOutcome, Difference, DifferenceKind, MalformedInput, Side};
use crate::constants::DOCUMENT_NODE_NAME;
use crate::matching::{ChildMatching, ElementSelector, NodeMatcher};
use crate::node::{XmlDocument, XmlElement};
use crate::path::PositionalPath;
use crate::xml::parse_str;

/// Compares documents in "similar" mode.
///
/// Element and attribute names compare by namespace URI and local name, so
/// prefixes, `xmlns` declarations, attribute order, comments and
/// whitespace-only text never produce differences.
#[derive(Default)]
pub struct DiffEngine {
    matcher: NodeMatcher,
}

impl DiffEngine {
    /// Creates an engine that pairs siblings with `selectors`, tried in order.
    pub fn with_selectors(selectors: Vec<Box<dyn ElementSelector>>) -> Self {
        DiffEngine {
            matcher: NodeMatcher::new(selectors),
        }
    }

    /// Parses and compares two documents.
    ///
    /// Empty or whitespace-only input on either side compares as equal.
    pub fn diff(&self, control: &str, test: &str) -> DiffOutcome {
        if control.trim().is_empty() || test.trim().is_empty() {
            debug!("empty input, nothing to compare");
            return DiffOutcome::NoDifferences;
        }

        let control_doc = match parse_str(control) {
            Ok(doc) => doc,
            Err(error) => {
                return DiffOutcome::Malformed(MalformedInput {
                    side: Side::Control,
                    error,
                })
            }
        };
        let test_doc = match parse_str(test) {
            Ok(doc) => doc,
            Err(error) => {
                return DiffOutcome::Malformed(MalformedInput {
                    side: Side::Test,
                    error,
                })
            }
        };

        let differences = self.diff_documents(&control_doc, &test_doc);
        debug!(count = differences.len(), "compared documents");
        if differences.is_empty() {
            DiffOutcome::NoDifferences
        } else {
            DiffOutcome::Differences(differences)
        }
    }

    /// Compares two parsed documents. Document elements are always paired.
    pub fn diff_documents(&self, control: &XmlDocument, test: &XmlDocument) -> Vec<Difference> {
        let mut differences = Vec::new();
        self.compare_elements(control.root(), test.root(), DOCUMENT_NODE_NAME, &mut differences);
        differences
    }

    fn compare_elements(
        &self,
        control: &XmlElement,
        test: &XmlElement,
        parent_tag: &str,
        out: &mut Vec<Difference>,
    ) {
        let path = control.path();

        if control.name() != test.name() {
            out.push(difference(
                DifferenceKind::ElementName,
                Some(control.qname()),
                Some(test.qname()),
                path,
                DiffContext::new(parent_tag, control.qname()),
            ));
        }

        self.compare_attributes(control, test, out);

        let control_text = control.text_content();
        let test_text = test.text_content();
        if control_text != test_text {
            out.push(difference(
                DifferenceKind::TextValue,
                control_text.as_deref(),
                test_text.as_deref(),
                path,
                DiffContext::new(parent_tag, control.qname()),
            ));
        }

        let control_children: Vec<&XmlElement> = control.child_elements().collect();
        let test_children: Vec<&XmlElement> = test.child_elements().collect();
        if control_children.len() != test_children.len() {
            out.push(difference(
                DifferenceKind::ChildCount,
                Some(&control_children.len().to_string()),
                Some(&test_children.len().to_string()),
                path,
                DiffContext::new(parent_tag, control.qname()),
            ));
        }

        let matching = self
            .matcher
            .match_children(&control_children, &test_children);

        for (ci, child) in control_children.iter().enumerate() {
            match matching.partner(ci) {
                Some(ti) => self.compare_elements(child, test_children[ti], control.qname(), out),
                None => out.push(difference(
                    DifferenceKind::ChildLookup,
                    Some(child.qname()),
                    None,
                    child.path(),
                    DiffContext::new(control.qname(), child.qname()),
                )),
            }
        }

        for &ti in matching.unmatched_test() {
            let extra = test_children[ti];
            let anchor = insertion_point(&matching, ti, &control_children).unwrap_or(path);
            out.push(difference(
                DifferenceKind::ChildLookup,
                None,
                Some(extra.qname()),
                anchor,
                DiffContext::new(control.qname(), extra.qname()),
            ));
        }
    }

    fn compare_attributes(&self, control: &XmlElement, test: &XmlElement, out: &mut Vec<Difference>) {
        let path = control.path();

        for (name, attr) in control.attributes() {
            match test.attribute(name) {
                Some(other) if other.value == attr.value => {}
                Some(other) => out.push(difference(
                    DifferenceKind::AttributeValue,
                    Some(&attr.value),
                    Some(&other.value),
                    path,
                    DiffContext::new(control.qname(), &attr.qname),
                )),
                None => out.push(difference(
                    DifferenceKind::AttributeLookup,
                    Some(&attr.qname),
                    None,
                    path,
                    DiffContext::new(control.qname(), &attr.qname),
                )),
            }
        }

        for (name, attr) in test.attributes() {
            if control.attribute(name).is_none() {
                out.push(difference(
                    DifferenceKind::AttributeLookup,
                    None,
                    Some(&attr.qname),
                    path,
                    DiffContext::new(control.qname(), &attr.qname),
                ));
            }
        }
    }
}

/// Control sibling an extra test child would sit next to: the partner of the
/// nearest preceding matched test sibling, else of the nearest following one.
fn insertion_point<'a>(
    matching: &ChildMatching,
    test_index: usize,
    control_children: &[&'a XmlElement],
) -> Option<&'a PositionalPath> {
    let preceding = matching
        .pairs()
        .filter(|&(_, ti)| ti < test_index)
        .max_by_key(|&(_, ti)| ti);
    let following = || {
        matching
            .pairs()
            .filter(|&(_, ti)| ti > test_index)
            .min_by_key(|&(_, ti)| ti)
    };
    preceding
        .or_else(following)
        .map(|(ci, _)| control_children[ci].path())
}

fn difference(
    kind: DifferenceKind,
    control_value: Option<&str>,
    test_value: Option<&str>,
    path: &PositionalPath,
    context: DiffContext,
) -> Difference {
    Difference {
        kind,
        control_value: control_value.map(|v| v.trim().to_string()),
        test_value: test_value.map(|v| v.trim().to_string()),
        path: path.clone(),
        context,
    }
}

/// Compares two documents with the default engine.
pub fn diff(control: &str, test: &str) -> DiffOutcome {
    DiffEngine::default().diff(control, test)
}
