//! Positional paths.
//!
//! A positional path addresses an element by the chain of `name[ordinal]`
//! steps leading to it from the document element, e.g. `/RDF[1]/Class[2]`.
//! Names are local names (any namespace prefix is stripped) and ordinals are
//! 1-based, counted among the siblings under the same parent that share the
//! same local name.

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;

/// Strips a namespace prefix from a qualified name (`rdf:RDF` -> `RDF`).
pub fn local_name(qname: &str) -> &str {
    qname.split_once(':').map_or(qname, |(_, local)| local)
}

/// One `name[ordinal]` step of a positional path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Step {
    name: String,
    ordinal: usize,
}

impl Step {
    /// Creates a step from a local name and a 1-based ordinal.
    pub fn new(name: impl Into<String>, ordinal: usize) -> Self {
        Step {
            name: name.into(),
            ordinal,
        }
    }

    /// Returns the local element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the 1-based ordinal among same-named siblings.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.ordinal)
    }
}

/// Root-relative address of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionalPath {
    steps: Vec<Step>,
}

impl PositionalPath {
    /// The empty path (the document itself).
    pub fn document() -> Self {
        PositionalPath::default()
    }

    /// Returns the path of a child of this element.
    pub fn child(&self, name: &str, ordinal: usize) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step::new(local_name(name), ordinal));
        PositionalPath { steps }
    }

    /// Returns the parent path, or `None` for the document path.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.steps.split_last()?;
        Some(PositionalPath {
            steps: init.to_vec(),
        })
    }

    /// Returns the steps from the document element downwards.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// True for the path of the document element, `/name[1]`.
    pub fn is_document_element(&self) -> bool {
        matches!(self.steps.as_slice(), [only] if only.ordinal == 1)
    }
}

impl fmt::Display for PositionalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "/");
        }
        for step in &self.steps {
            write!(f, "/{}", step)?;
        }
        Ok(())
    }
}

/// Error returned when a string is not of the form `/name[n]/...`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid positional path step `{0}`")]
pub struct InvalidPath(pub String);

impl FromStr for PositionalPath {
    type Err = InvalidPath;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix('/')
            .ok_or_else(|| InvalidPath(s.to_string()))?;
        if body.is_empty() {
            return Ok(PositionalPath::document());
        }

        let mut steps = Vec::new();
        for raw in body.split('/') {
            let (name, rest) = raw
                .split_once('[')
                .ok_or_else(|| InvalidPath(raw.to_string()))?;
            let ordinal = rest
                .strip_suffix(']')
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .ok_or_else(|| InvalidPath(raw.to_string()))?;
            if name.is_empty() {
                return Err(InvalidPath(raw.to_string()));
            }
            steps.push(Step::new(local_name(name), ordinal));
        }
        Ok(PositionalPath { steps })
    }
}

/// Per-parse sibling ordinal counters.
///
/// One counter map per open element; the map at the top of the stack counts
/// the children of the innermost open element by local name. Entering an
/// element pushes a fresh map, so counts never leak between branches.
#[derive(Debug)]
pub struct SiblingOrdinals {
    frames: Vec<FxHashMap<String, usize>>,
}

impl Default for SiblingOrdinals {
    fn default() -> Self {
        Self::new()
    }
}

impl SiblingOrdinals {
    /// Creates counters with only the document level open.
    pub fn new() -> Self {
        SiblingOrdinals {
            frames: vec![FxHashMap::default()],
        }
    }

    /// Registers a new child of the innermost open element and enters it.
    ///
    /// Returns the child's ordinal among same-named siblings.
    pub fn enter(&mut self, local: &str) -> usize {
        let ordinal = match self.frames.last_mut() {
            Some(frame) => {
                let count = frame.entry(local.to_string()).or_insert(0);
                *count += 1;
                *count
            }
            None => 1,
        };
        self.frames.push(FxHashMap::default());
        ordinal
    }

    /// Leaves the innermost open element.
    pub fn leave(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("rdf:RDF"), "RDF");
        assert_eq!(local_name("Class"), "Class");
    }

    #[test]
    fn test_display_and_parse() {
        let path = PositionalPath::document()
            .child("rdf:RDF", 1)
            .child("owl:Class", 2);
        assert_eq!(path.to_string(), "/RDF[1]/Class[2]");
        assert_eq!("/RDF[1]/Class[2]".parse::<PositionalPath>().unwrap(), path);
        assert_eq!(PositionalPath::document().to_string(), "/");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("RDF[1]".parse::<PositionalPath>().is_err());
        assert!("/RDF".parse::<PositionalPath>().is_err());
        assert!("/RDF[0]".parse::<PositionalPath>().is_err());
        assert!("/[1]".parse::<PositionalPath>().is_err());
    }

    #[test]
    fn test_document_element() {
        let root = PositionalPath::document().child("r", 1);
        assert!(root.is_document_element());
        assert!(!root.child("a", 1).is_document_element());
        assert!(!PositionalPath::document().is_document_element());
        assert_eq!(root.child("a", 1).parent(), Some(root.clone()));
    }

    #[test]
    fn test_ordinals_scoped_per_parent_and_name() {
        let mut ordinals = SiblingOrdinals::new();
        assert_eq!(ordinals.enter("RDF"), 1);

        assert_eq!(ordinals.enter("Class"), 1);
        assert_eq!(ordinals.enter("label"), 1);
        ordinals.leave();
        ordinals.leave();

        assert_eq!(ordinals.enter("label"), 1);
        ordinals.leave();

        // Second Class starts with fresh child counters.
        assert_eq!(ordinals.enter("Class"), 2);
        assert_eq!(ordinals.enter("label"), 1);
    }
}
