// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use qk_source_file::ErrorTrait;
use qk_syntax::{LineIndex, SyntaxError};

use crate::position::{Position, Token};
use crate::TextRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    UndefinedSymbol,
    UnknownMethod,
    ArityMismatch,
    ArgumentTypeMismatch,
    UnknownType,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Syntax,
    Semantic(SemanticErrorKind),
}

/// A problem found in a script, located both by line and columns (for
/// editors) and by byte range (for printing with the source).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    position: Position,
    message: String,
    kind: DiagnosticKind,
    range: TextRange,
}

impl Diagnostic {
    pub fn new<T: Into<String>>(
        kind: DiagnosticKind,
        severity: Severity,
        message: T,
        position: Position,
        range: TextRange,
    ) -> Diagnostic {
        Diagnostic {
            severity,
            position,
            message: message.into(),
            kind,
            range,
        }
    }

    /// A semantic error located at `token`.
    pub fn semantic<T: Into<String>>(kind: SemanticErrorKind, message: T, token: &Token) -> Diagnostic {
        let severity = match kind {
            SemanticErrorKind::UnknownType => Severity::Warning,
            _ => Severity::Error,
        };
        Diagnostic::new(
            DiagnosticKind::Semantic(kind),
            severity,
            message,
            token.position(),
            token.range(),
        )
    }

    /// Convert a parse or lex error. Two messages are rewritten into the
    /// wording users of the Qiskit tooling know.
    pub fn from_syntax_error(error: &SyntaxError, source: &str, line_index: &LineIndex) -> Diagnostic {
        let text = source.get(std::ops::Range::<usize>::from(error.range())).unwrap_or("");
        let message = if text == ")" {
            "Expecting arguments before symbol )".to_string()
        } else if error.message().contains("unexpected indent") {
            "Unexpected indentation".to_string()
        } else {
            error.message().to_string()
        };
        let (start, end) = line_index.range_line_col(error.range());
        let end_col = if end.line == start.line {
            end.col as usize
        } else {
            start.col as usize
        };
        let position = Position::new(
            start.line as usize - 1,
            start.col as usize,
            end_col.max(start.col as usize + 1),
        );
        Diagnostic::new(
            DiagnosticKind::Syntax,
            Severity::Error,
            message,
            position,
            error.range(),
        )
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// 0-based line.
    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn start_column(&self) -> usize {
        self.position.start
    }

    pub fn end_column(&self) -> usize {
        self.position.end
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    /// The semantic error kind, or `None` for a syntax error.
    pub fn semantic_kind(&self) -> Option<&SemanticErrorKind> {
        match &self.kind {
            DiagnosticKind::Semantic(kind) => Some(kind),
            DiagnosticKind::Syntax => None,
        }
    }

    pub fn range(&self) -> TextRange {
        self.range
    }
}

impl ErrorTrait for Diagnostic {
    fn message(&self) -> String {
        self.message.clone()
    }

    fn range(&self) -> TextRange {
        self.range
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {}: {}",
            self.severity, self.position, self.message
        )
    }
}

/// Where the argument checker and the analyzer passes send what they find.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// `DiagnosticList` stores the diagnostics for the script in `source_file_path`.
#[derive(Clone, Debug)]
pub struct DiagnosticList {
    source_file_path: PathBuf,
    list: Vec<Diagnostic>,
}

impl std::ops::Deref for DiagnosticList {
    type Target = Vec<Diagnostic>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl DiagnosticSink for DiagnosticList {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.list.push(diagnostic);
    }
}

impl DiagnosticList {
    pub fn new(source_file_path: PathBuf) -> DiagnosticList {
        DiagnosticList {
            source_file_path,
            list: Vec::new(),
        }
    }

    pub fn source_file_path(&self) -> &PathBuf {
        &self.source_file_path
    }

    pub fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, diagnostics: I) {
        self.list.extend(diagnostics);
    }

    pub fn any_errors(&self) -> bool {
        self.list.iter().any(|d| d.severity() == Severity::Error)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.list
    }

    pub fn print_errors(&self) -> io::Result<()> {
        // Nothing to print means there is no need to read the file, which may be gone.
        if self.list.is_empty() {
            return Ok(());
        }
        qk_source_file::print_compiler_errors(&self.list, &self.source_file_path)
    }

    /// Print diagnostics for a script that did not come from a file.
    pub fn print_errors_no_file(&self, fake_file_path: &Path, source: &str) -> io::Result<()> {
        qk_source_file::inner_print_compiler_errors(&self.list, fake_file_path, source)
    }
}
