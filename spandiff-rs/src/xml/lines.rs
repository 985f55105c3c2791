//! Byte offset to line/column mapping.

/// Start offsets of every line of a text, for offset -> line lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Indexes the line starts of `text`. Lines end at `\n`; a preceding
    /// `\r` stays part of its line.
    pub fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineIndex { starts }
    }

    /// Returns the 1-based line containing the byte at `offset`.
    pub fn line(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    /// Returns the 1-based `(line, column)` of `offset`; columns count bytes.
    pub fn location(&self, offset: usize) -> (usize, usize) {
        let line = self.line(offset);
        let column = offset - self.starts[line - 1] + 1;
        (line, column)
    }
}
