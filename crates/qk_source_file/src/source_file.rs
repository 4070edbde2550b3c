// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use qk_syntax::{LineIndex, Parse, TextRange};

use crate::api::inner_print_compiler_errors;

/// Convert the byte range used by the tree into the character range used by `ariadne`.
/// `ariadne` wants a non-empty span, so empty ranges (errors at synthesized layout
/// tokens) are widened by one character where the source allows it.
pub(crate) fn range_to_span(range: &TextRange, source: &str) -> std::ops::Range<usize> {
    let to_chars = |byte: usize| {
        source
            .get(..byte.min(source.len()))
            .map_or(0, |prefix| prefix.chars().count())
    };
    let r1 = to_chars(range.start().into());
    let r2 = to_chars(range.end().into());
    if r2 > r1 || r1 >= source.chars().count() {
        r1..r2
    } else {
        r1..(r1 + 1)
    }
}

pub trait ErrorTrait {
    /// Return a message describing the error.
    fn message(&self) -> String;

    /// Return the byte range in the source associated with the error.
    fn range(&self) -> TextRange;
}

impl ErrorTrait for qk_syntax::SyntaxError {
    fn message(&self) -> String {
        self.message().to_string()
    }

    fn range(&self) -> TextRange {
        self.range()
    }
}

pub trait SourceTrait {
    /// Return `true` if the source produced a lexing or parse error.
    fn any_parse_errors(&self) -> bool {
        !self.syntax_ast().errors().is_empty()
    }

    fn syntax_ast(&self) -> &Parse;
    fn source(&self) -> &str;
    fn line_index(&self) -> &LineIndex;
    fn file_path(&self) -> PathBuf;

    fn print_syntax_errors(&self) -> io::Result<()> {
        inner_print_compiler_errors(
            self.syntax_ast().errors(),
            &self.file_path(),
            self.source(),
        )
    }
}

/// Read a script from disk.
pub(crate) fn read_source_file(file_path: &Path) -> io::Result<String> {
    fs::read_to_string(file_path)
}

/// Structure for managing parsing a script from a string with no associated
/// source file. `fake_file_path` contains something like "no file" and is
/// only used when printing diagnostics.
#[derive(Clone, Debug)]
pub struct SourceString {
    pub(crate) fake_file_path: PathBuf,
    pub(crate) source: String,
    pub(crate) syntax_ast: Parse,
    pub(crate) line_index: LineIndex,
}

#[derive(Clone, Debug)]
pub struct SourceFile {
    file_path: PathBuf,
    source: String,
    syntax_ast: Parse,
    line_index: LineIndex,
}

impl SourceTrait for SourceString {
    fn syntax_ast(&self) -> &Parse {
        &self.syntax_ast
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    fn file_path(&self) -> PathBuf {
        self.fake_file_path().clone()
    }
}

impl SourceString {
    pub fn new<T: AsRef<str>, P: AsRef<Path>>(
        source: T,
        fake_file_path: P,
        syntax_ast: Parse,
    ) -> SourceString {
        let source = source.as_ref().to_owned();
        let line_index = LineIndex::new(&source);
        SourceString {
            source,
            fake_file_path: fake_file_path.as_ref().to_owned(),
            syntax_ast,
            line_index,
        }
    }

    pub fn fake_file_path(&self) -> &PathBuf {
        &self.fake_file_path
    }
}

impl SourceTrait for SourceFile {
    fn syntax_ast(&self) -> &Parse {
        &self.syntax_ast
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    fn file_path(&self) -> PathBuf {
        self.file_path.clone()
    }
}

impl SourceFile {
    pub fn new<F: AsRef<Path>>(file_path: F, source: String, syntax_ast: Parse) -> SourceFile {
        let line_index = LineIndex::new(&source);
        SourceFile {
            file_path: file_path.as_ref().to_owned(),
            source,
            syntax_ast,
            line_index,
        }
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }
}
