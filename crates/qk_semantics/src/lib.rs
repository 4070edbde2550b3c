// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis of Qiskit scripts.
//!
//! The analysis runs on the lossless tree built by `qk_syntax` and produces
//!   a persistent symbol table, which keeps every version of every name in
//!     every scope, so that the type of a name can be asked for at any line;
//!   diagnostics for undefined names, unknown methods and calls whose
//!     arguments do not match the signature of the callee;
//!   a folded AST, a small tree of terms describing the simple statements.
//!
//! The analysis has two passes. The first declares the top level of the
//! script, so that a name may be used above its definition. The second walks
//! everything and infers the types of assigned names.

// Organization of API
// Each stage is a module: the symbol model (types, symbols, builtins), the
// collaborators of the second pass (assignments, arguments), the passes
// themselves, and the folder. `analysis` runs them all on a source.

pub mod analysis;
pub mod arguments;
pub mod assignments;
pub mod builtins;
pub mod diagnostic;
pub mod folded;
pub mod position;
pub mod semantic_analyzer;
pub mod symbol_table_generator;
pub mod symbols;
pub mod tree_folder;
pub mod types;

mod context;
mod declarations;

pub use rowan::{TextRange, TextSize};

pub use analysis::{
    analyze, analyze_source_file, analyze_source_string, analyze_source_string_with, analyze_with,
    AnalysisOptions, AnalysisResult,
};
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticList, DiagnosticSink, SemanticErrorKind, Severity};
pub use semantic_analyzer::SemanticAnalyzer;
pub use symbol_table_generator::{SymbolTableGenerator, SymbolTableResult};
pub use symbols::{PersistentSymbolTable, Symbol, SymbolError};
pub use tree_folder::TreeFolder;
