//! Sibling matching.
//!
//! Before two elements' children can be compared, each control child has to
//! be paired with the test child it corresponds to. Pairing is driven by an
//! ordered list of `ElementSelector`s: the first selector pairs everything it
//! accepts, later selectors only see what is still unpaired.

mod selectors;

pub use selectors::{ByName, ByNameAndText};

use tracing::trace;

use crate::node::XmlElement;

/// Decides whether two elements may be treated as counterparts.
pub trait ElementSelector {
    /// Returns true if `control` and `test` can be compared with each other.
    fn can_be_compared(&self, control: &XmlElement, test: &XmlElement) -> bool;
}

/// Pairing of two child lists, by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildMatching {
    /// For each control child, the index of its test partner.
    partners: Vec<Option<usize>>,
    /// Test children without a control partner, in document order.
    unmatched_test: Vec<usize>,
}

impl ChildMatching {
    /// Returns the test partner of the control child at `control_index`.
    pub fn partner(&self, control_index: usize) -> Option<usize> {
        self.partners.get(control_index).copied().flatten()
    }

    /// Matched `(control, test)` index pairs in control order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.partners
            .iter()
            .enumerate()
            .filter_map(|(c, t)| t.map(|t| (c, t)))
    }

    /// Test children without a control partner.
    pub fn unmatched_test(&self) -> &[usize] {
        &self.unmatched_test
    }
}

/// Pairs sibling elements using a chain of selectors.
pub struct NodeMatcher {
    selectors: Vec<Box<dyn ElementSelector>>,
}

impl Default for NodeMatcher {
    /// Pairs by name and text first, then by name alone.
    fn default() -> Self {
        NodeMatcher::new(vec![Box::new(ByNameAndText), Box::new(ByName)])
    }
}

impl NodeMatcher {
    /// Creates a matcher that tries `selectors` in order.
    pub fn new(selectors: Vec<Box<dyn ElementSelector>>) -> Self {
        NodeMatcher { selectors }
    }

    /// Pairs `control` children with `test` children.
    ///
    /// Each selector makes one pass over the still-unpaired control children
    /// in order. A control child takes the first acceptable unpaired test
    /// child, searching forward from just after the previous pairing made in
    /// that pass and wrapping around, so siblings that keep their relative
    /// order pair up positionally.
    pub fn match_children(&self, control: &[&XmlElement], test: &[&XmlElement]) -> ChildMatching {
        let mut partners: Vec<Option<usize>> = vec![None; control.len()];
        let mut taken = vec![false; test.len()];

        for selector in &self.selectors {
            let mut cursor = 0;
            for (ci, control_child) in control.iter().enumerate() {
                if partners[ci].is_some() {
                    continue;
                }
                let found = (0..test.len())
                    .map(|k| (cursor + k) % test.len())
                    .find(|&ti| !taken[ti] && selector.can_be_compared(control_child, test[ti]));
                if let Some(ti) = found {
                    trace!(
                        control = %control_child.path(),
                        test = %test[ti].path(),
                        "paired elements"
                    );
                    partners[ci] = Some(ti);
                    taken[ti] = true;
                    cursor = ti + 1;
                }
            }
        }

        let unmatched_test = taken
            .iter()
            .enumerate()
            .filter_map(|(ti, &t)| (!t).then_some(ti))
            .collect();

        ChildMatching {
            partners,
            unmatched_test,
        }
    }
}
