//! Positional index: element path -> source line range.
//!
//! Built once per document snapshot from a single streaming pass and never
//! mutated afterwards. A path resolves only against an index built from the
//! exact text that produced it.

mod builder;

use std::fmt;

use rustc_hash::FxHashMap;

use crate::path::PositionalPath;

/// Inclusive, 1-based range of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    /// Creates a range; `end` is raised to `start` if it lies before it.
    pub fn new(start: usize, end: usize) -> Self {
        let start = start.max(1);
        LineRange {
            start,
            end: end.max(start),
        }
    }

    /// A range covering a single line.
    pub fn single(line: usize) -> Self {
        Self::new(line, line)
    }

    /// Line of the opening tag.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Line of the closing tag (or of the opening tag when self-closing).
    pub fn end(&self) -> usize {
        self.end
    }

    /// True if `other` lies entirely within this range.
    pub fn contains(&self, other: &LineRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if `line` lies within this range.
    pub fn contains_line(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Mapping from every element's positional path to its line range.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    entries: FxHashMap<PositionalPath, LineRange>,
}

impl PositionIndex {
    /// Resolves a path to its line range.
    pub fn get(&self, path: &PositionalPath) -> Option<LineRange> {
        self.entries.get(path).copied()
    }

    /// Resolves a path given in its `/name[n]/...` text form.
    pub fn lookup(&self, path: &str) -> Option<LineRange> {
        path.parse::<PositionalPath>()
            .ok()
            .and_then(|path| self.get(&path))
    }

    /// Number of indexed elements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&PositionalPath, LineRange)> {
        self.entries.iter().map(|(path, range)| (path, *range))
    }

    /// Entries in document order (by start line, then path).
    pub fn sorted(&self) -> Vec<(&PositionalPath, LineRange)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(pa, ra), (pb, rb)| {
            ra.start()
                .cmp(&rb.start())
                .then_with(|| pa.depth().cmp(&pb.depth()))
                .then_with(|| pa.cmp(pb))
        });
        entries
    }
}
