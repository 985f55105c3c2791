//! Line-level helpers for acting on error reports.
//!
//! `group_blocks` splits a document into highlighted and plain blocks the
//! way a viewer shows them; `replace_lines` and `remove_lines` apply a fix to
//! one block. After an edit the whole text should be verified again, since
//! every line range after the edit point may have moved.

use tracing::debug;

use crate::error::{Error, Result};
use crate::report::ErrorInfo;

/// A run of consecutive document lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block<'a> {
    pub start_line: usize,
    pub end_line: usize,
    /// The error that covers this block, `None` for plain text.
    pub error: Option<&'a ErrorInfo>,
}

impl Block<'_> {
    /// Returns the block's lines of `text`.
    pub fn lines<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        text.lines()
            .skip(self.start_line.saturating_sub(1))
            .take((self.end_line + 1).saturating_sub(self.start_line))
    }
}

/// Partitions lines `1..=line_count` into blocks.
///
/// A line covered by an error starts a block that runs to that error's end
/// line; when several errors cover the line the first in `errors` wins.
/// Lines covered by no error are gathered into plain blocks. Blocks never
/// overlap and together cover every line exactly once.
pub fn group_blocks(line_count: usize, errors: &[ErrorInfo]) -> Vec<Block<'_>> {
    let covering = |line: usize| errors.iter().find(|e| e.range().contains_line(line));

    let mut blocks = Vec::new();
    let mut line = 1;
    while line <= line_count {
        if let Some(error) = covering(line) {
            let end = error.range().end().min(line_count);
            blocks.push(Block {
                start_line: line,
                end_line: end,
                error: Some(error),
            });
            line = end + 1;
        } else {
            let start = line;
            while line <= line_count && covering(line).is_none() {
                line += 1;
            }
            blocks.push(Block {
                start_line: start,
                end_line: line - 1,
                error: None,
            });
        }
    }
    blocks
}

/// Replaces lines `start..=end` (1-based) of `text` with `replacement`.
pub fn replace_lines(text: &str, start: usize, end: usize, replacement: &str) -> Result<String> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    if start == 0 || start > end || end > lines.len() {
        return Err(Error::LineRange {
            start,
            end,
            lines: lines.len(),
        });
    }

    let mut out = String::with_capacity(text.len() + replacement.len());
    for line in &lines[..start - 1] {
        out.push_str(line);
    }

    let keeps_newline = end < lines.len() || text.ends_with('\n');
    if replacement.is_empty() {
        if !keeps_newline && out.ends_with('\n') {
            out.pop();
        }
    } else {
        out.push_str(replacement);
        if keeps_newline && !replacement.ends_with('\n') {
            out.push('\n');
        }
    }

    for line in &lines[end..] {
        out.push_str(line);
    }

    debug!(start, end, "replaced lines");
    Ok(out)
}

/// Deletes lines `start..=end` (1-based) of `text`.
pub fn remove_lines(text: &str, start: usize, end: usize) -> Result<String> {
    replace_lines(text, start, end, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(start_line: usize, end_line: usize, message: &str) -> ErrorInfo {
        ErrorInfo {
            start_line,
            end_line,
            message: message.to_string(),
            details: message.to_string(),
        }
    }

    fn spans(blocks: &[Block<'_>]) -> Vec<(usize, usize, Option<String>)> {
        blocks
            .iter()
            .map(|b| (b.start_line, b.end_line, b.error.map(|e| e.message.clone())))
            .collect()
    }

    #[test]
    fn test_group_blocks() {
        let errors = vec![error(4, 7, "x"), error(9, 9, "y")];
        let blocks = group_blocks(10, &errors);
        assert_eq!(
            spans(&blocks),
            vec![
                (1, 3, None),
                (4, 7, Some("x".to_string())),
                (8, 8, None),
                (9, 9, Some("y".to_string())),
                (10, 10, None),
            ]
        );
    }

    #[test]
    fn test_group_blocks_overlap_first_wins() {
        let errors = vec![error(1, 3, "first"), error(2, 5, "second")];
        let blocks = group_blocks(5, &errors);
        assert_eq!(
            spans(&blocks),
            vec![
                (1, 3, Some("first".to_string())),
                (4, 5, Some("second".to_string())),
            ]
        );
    }

    #[test]
    fn test_group_blocks_clamps_to_document() {
        let errors = vec![error(2, 40, "x")];
        assert_eq!(
            spans(&group_blocks(3, &errors)),
            vec![(1, 1, None), (2, 3, Some("x".to_string()))]
        );
        assert!(group_blocks(0, &errors).is_empty());
    }

    #[test]
    fn test_group_blocks_inverted_range() {
        let errors = vec![error(3, 1, "x")];
        assert_eq!(
            spans(&group_blocks(4, &errors)),
            vec![(1, 2, None), (3, 3, Some("x".to_string())), (4, 4, None)]
        );

        let block = Block {
            start_line: 3,
            end_line: 1,
            error: None,
        };
        assert_eq!(block.lines("a\nb\nc\n").count(), 0);
    }

    #[test]
    fn test_block_lines() {
        let text = "a\nb\nc\nd\n";
        let block = Block {
            start_line: 2,
            end_line: 3,
            error: None,
        };
        assert_eq!(block.lines(text).collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_replace_lines() {
        let text = "<r>\n  <a>1</a>\n</r>\n";
        assert_eq!(
            replace_lines(text, 2, 2, "  <a>2</a>").unwrap(),
            "<r>\n  <a>2</a>\n</r>\n"
        );
        assert_eq!(
            replace_lines(text, 2, 2, "  <a>2</a>\n  <b/>\n").unwrap(),
            "<r>\n  <a>2</a>\n  <b/>\n</r>\n"
        );
    }

    #[test]
    fn test_replace_last_line_without_newline() {
        assert_eq!(replace_lines("a\nb", 2, 2, "c").unwrap(), "a\nc");
        assert_eq!(replace_lines("a\nb\n", 2, 2, "c").unwrap(), "a\nc\n");
    }

    #[test]
    fn test_remove_lines() {
        let text = "<r>\n  <a>\n  </a>\n</r>\n";
        assert_eq!(remove_lines(text, 2, 3).unwrap(), "<r>\n</r>\n");
        assert_eq!(remove_lines("a\nb", 2, 2).unwrap(), "a");
    }

    #[test]
    fn test_out_of_range() {
        let text = "a\nb\n";
        for (start, end) in [(0, 1), (2, 1), (1, 3)] {
            match replace_lines(text, start, end, "x") {
                Err(Error::LineRange { lines, .. }) => assert_eq!(lines, 2),
                other => panic!("expected a line range error, got {:?}", other),
            }
        }
    }
}
