// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use qk_syntax::ast;
use tracing::debug;

use crate::diagnostic::{Diagnostic, SemanticErrorKind};
use crate::position::{Spans, Token};
use crate::symbols::{PersistentSymbolTable, Symbol};
use crate::types::SymbolType;

/// State shared by the visits of one analysis pass.
pub(crate) struct Context<'t> {
    pub(crate) symbol_table: &'t mut PersistentSymbolTable,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) spans: Spans,
}

impl<'t> Context<'t> {
    pub(crate) fn new(symbol_table: &'t mut PersistentSymbolTable, spans: Spans) -> Context<'t> {
        Context {
            symbol_table,
            diagnostics: Vec::new(),
            spans,
        }
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn insert_error<T: Into<String>>(
        &mut self,
        error_kind: SemanticErrorKind,
        message: T,
        token: &Token,
    ) {
        self.diagnostics
            .push(Diagnostic::semantic(error_kind, message, token));
    }

    /// Look up the name in `token`, accepting names that are defined later
    /// in an enclosing scope. Possibly log an `UndefinedSymbol`.
    pub(crate) fn lookup_symbol(&mut self, token: &Token) -> Option<SymbolType> {
        let name = token.text();
        let found = self
            .symbol_table
            .lookup(name)
            .or_else(|_| self.symbol_table.lookup_declared(name))
            .map(|record| record.symbol_type().clone());
        match found {
            Ok(typ) => Some(typ),
            Err(_) => {
                self.insert_error(
                    SemanticErrorKind::UndefinedSymbol,
                    format!("Symbol {name} is not defined"),
                    token,
                );
                None
            }
        }
    }

    pub(crate) fn define<T: ToString>(&mut self, name: T, typ: SymbolType, line: usize) {
        self.symbol_table.define(Symbol::new(name, typ, line));
    }

    /// Bind the names brought in by `import` and `from .. import`. A name
    /// imported from a module gets the type of the builtin of the same name
    /// if there is one.
    pub(crate) fn define_imports(&mut self, stmt: &ast::Stmt, line: usize) {
        match stmt {
            ast::Stmt::ImportStmt(import) => {
                for alias in import.aliases() {
                    if let Some(bound) = alias.bound_name() {
                        self.define(bound, SymbolType::any(), line);
                    }
                }
            }
            ast::Stmt::FromImportStmt(import) => {
                if import.is_glob() {
                    debug!(line, "glob import binds nothing");
                    return;
                }
                for alias in import.aliases() {
                    let Some(bound) = alias.bound_name() else {
                        continue;
                    };
                    let typ = alias
                        .imported_name()
                        .and_then(|name| self.symbol_table.lookup_declared(&name).ok())
                        .map(|record| record.symbol_type().clone())
                        .unwrap_or_else(SymbolType::any);
                    self.define(bound, typ, line);
                }
            }
            _ => {}
        }
    }
}

/// What the expression being walked is part of.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WalkMode {
    Statement,
    CallArguments,
    AssignmentTarget,
    AssignmentValue,
}

impl WalkMode {
    /// Assignment targets and values report to the assignment tracker.
    pub(crate) fn is_tracked(self) -> bool {
        matches!(self, WalkMode::AssignmentTarget | WalkMode::AssignmentValue)
    }
}

/// Passed down by value through every visit of the semantic pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WalkContext {
    pub(crate) mode: WalkMode,
    /// Line of the statement being walked, as the parser counts lines.
    pub(crate) line: usize,
}

impl WalkContext {
    pub(crate) fn new(line: usize) -> WalkContext {
        WalkContext {
            mode: WalkMode::Statement,
            line,
        }
    }

    pub(crate) fn with_mode(self, mode: WalkMode) -> WalkContext {
        WalkContext { mode, ..self }
    }
}

/// Run `$code` in a new scope named `$name`, open from line `$opened`
/// through line `$closed`.
#[macro_export]
macro_rules! with_scope {
    ($ctxt:expr, $name:expr, $opened:expr, $closed:expr, $code:block) => {
        $ctxt.symbol_table.push($name, $opened);
        $code;
        if let Err(err) = $ctxt.symbol_table.pop($closed) {
            tracing::debug!(%err, "unbalanced scope");
        }
    };
}
