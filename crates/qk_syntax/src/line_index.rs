// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Maps byte offsets in the source to lines and columns.

use crate::{TextRange, TextSize};

/// Line and column of a position in the source. `line` is 1-based, as the
/// parser counts lines; `col` is a 0-based count of `char`s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineIndex {
    text: String,
    /// Offset of the first byte of each line.
    newlines: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> LineIndex {
        let mut newlines = vec![TextSize::from(0)];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                newlines.push(TextSize::from((i + 1) as u32));
            }
        }
        LineIndex {
            text: text.to_string(),
            newlines,
        }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self.newlines.partition_point(|&it| it <= offset) - 1;
        let line_start = usize::from(self.newlines[line]);
        let end = usize::from(offset).min(self.text.len());
        let col = self
            .text
            .get(line_start..end)
            .map_or(0, |s| s.chars().count());
        LineCol {
            line: line as u32 + 1,
            col: col as u32,
        }
    }

    /// Start and end of `range`. The end is exclusive.
    pub fn range_line_col(&self, range: TextRange) -> (LineCol, LineCol) {
        (self.line_col(range.start()), self.line_col(range.end()))
    }

    pub fn number_of_lines(&self) -> usize {
        self.newlines.len()
    }
}
