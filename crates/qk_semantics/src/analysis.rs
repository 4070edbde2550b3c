// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

// Entry points running the whole pipeline on a script: parse, fold, then the
// two semantic passes.

use std::io;
use std::path::Path;

use qk_source_file::{SourceFile, SourceString, SourceTrait};
use tracing::debug;

use crate::diagnostic::{Diagnostic, DiagnosticList};
use crate::folded::Statement;
use crate::semantic_analyzer::SemanticAnalyzer;
use crate::symbol_table_generator::SymbolTableGenerator;
use crate::symbols::PersistentSymbolTable;
use crate::tree_folder::TreeFolder;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Start from a table holding the Python and Qiskit builtins. Without
    /// them, only the primitive type names resolve.
    pub builtins: bool,
    /// Name shown for a script that did not come from a file.
    pub fake_file_path: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            builtins: true,
            fake_file_path: None,
        }
    }
}

pub struct AnalysisResult<T: SourceTrait> {
    source: T,
    ast: Vec<Statement>,
    diagnostics: DiagnosticList,
    symbol_table: PersistentSymbolTable,
}

impl<T: SourceTrait> AnalysisResult<T> {
    /// The folded statements.
    pub fn ast(&self) -> &[Statement] {
        &self.ast
    }

    /// Syntax diagnostics, then those of the first pass, then those of the
    /// second pass.
    pub fn diagnostics(&self) -> &DiagnosticList {
        &self.diagnostics
    }

    /// The table as the second pass left it. Closed scopes are kept and can
    /// be queried with [`PersistentSymbolTable::lookup_at`].
    pub fn symbol_table(&self) -> &PersistentSymbolTable {
        &self.symbol_table
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    pub fn any_syntax_errors(&self) -> bool {
        self.source.any_parse_errors()
    }

    pub fn any_errors(&self) -> bool {
        self.diagnostics.any_errors()
    }

    pub fn take_symbol_table(self) -> PersistentSymbolTable {
        self.symbol_table
    }
}

impl AnalysisResult<SourceFile> {
    /// Print every diagnostic. This reads the file again.
    pub fn print_errors(&self) -> io::Result<()> {
        self.diagnostics.print_errors()
    }
}

impl AnalysisResult<SourceString> {
    pub fn print_errors(&self) -> io::Result<()> {
        self.diagnostics
            .print_errors_no_file(self.source.fake_file_path(), self.source.source())
    }
}

/// Analyze the script in `source` with the default options.
pub fn analyze_source_string<T: ToString>(source: T) -> AnalysisResult<SourceString> {
    analyze_source_string_with(source, &AnalysisOptions::default())
}

pub fn analyze_source_string_with<T: ToString>(
    source: T,
    options: &AnalysisOptions,
) -> AnalysisResult<SourceString> {
    let parsed = qk_source_file::parse_source_string(source, options.fake_file_path.as_deref());
    analyze_with(parsed, options)
}

/// Read and analyze the script at `file_path`.
pub fn analyze_source_file<P: AsRef<Path>>(
    file_path: P,
    options: &AnalysisOptions,
) -> io::Result<AnalysisResult<SourceFile>> {
    let parsed = qk_source_file::parse_source_file(file_path)?;
    Ok(analyze_with(parsed, options))
}

/// Analyze a script that is already parsed, with the default options.
pub fn analyze<T: SourceTrait>(parsed: T) -> AnalysisResult<T> {
    analyze_with(parsed, &AnalysisOptions::default())
}

pub fn analyze_with<T: SourceTrait>(parsed: T, options: &AnalysisOptions) -> AnalysisResult<T> {
    let file_path = parsed.file_path();
    debug!(path = %file_path.display(), builtins = options.builtins, "analyzing");
    let tree = parsed.syntax_ast().tree();

    let ast = TreeFolder::fold(&tree);

    let mut diagnostics = DiagnosticList::new(file_path);
    diagnostics.extend(
        parsed
            .syntax_ast()
            .errors()
            .iter()
            .map(|err| Diagnostic::from_syntax_error(err, parsed.source(), parsed.line_index())),
    );

    let table = if options.builtins {
        PersistentSymbolTable::with_builtins()
    } else {
        PersistentSymbolTable::new()
    };
    let declared = SymbolTableGenerator::symbol_table_with(&tree, table);
    diagnostics.extend(declared.errors);
    let mut symbol_table = declared.symbol_table;
    diagnostics.extend(SemanticAnalyzer::analyze(&tree, &mut symbol_table));
    debug!(
        statements = ast.len(),
        diagnostics = diagnostics.len(),
        "analysis done"
    );

    AnalysisResult {
        source: parsed,
        ast,
        diagnostics,
        symbol_table,
    }
}
