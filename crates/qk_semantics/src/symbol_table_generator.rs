// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! The first analysis pass. It declares what the top level of a script
//! defines, so that the second pass can resolve uses that come before the
//! definition, such as a function calling a function defined below it.

use qk_syntax::ast::{self, AstNode, Expr, Stmt};
use tracing::debug;

use crate::context::Context;
use crate::declarations::{
    class_type_of, constant_type, inherit_members, signature_of, type_name_of, Annotations,
};
use crate::diagnostic::{Diagnostic, SemanticErrorKind};
use crate::position::Spans;
use crate::symbols::PersistentSymbolTable;
use crate::types::{SymbolType, TypeName};

#[derive(Clone, Debug)]
pub struct SymbolTableResult {
    pub symbol_table: PersistentSymbolTable,
    pub errors: Vec<Diagnostic>,
}

pub struct SymbolTableGenerator;

impl SymbolTableGenerator {
    /// Declare the top level of `tree` in a table holding the builtins.
    pub fn symbol_table_for(tree: &ast::SourceFile) -> SymbolTableResult {
        SymbolTableGenerator::symbol_table_with(tree, PersistentSymbolTable::with_builtins())
    }

    /// Declare the top level of `tree` in `symbol_table`.
    pub fn symbol_table_with(
        tree: &ast::SourceFile,
        mut symbol_table: PersistentSymbolTable,
    ) -> SymbolTableResult {
        debug!("declaring top-level symbols");
        let spans = Spans::for_node(tree.syntax());
        let mut annotations = Annotations::new();
        let mut ctxt = Context::new(&mut symbol_table, spans);
        for stmt in tree.statements() {
            declare_stmt(&stmt, &mut ctxt, &mut annotations);
        }
        check_annotations(&mut ctxt, annotations);
        let errors = ctxt.into_diagnostics();
        debug!(errors = errors.len(), "declared top-level symbols");
        SymbolTableResult {
            symbol_table,
            errors,
        }
    }
}

fn declare_stmt(stmt: &Stmt, ctxt: &mut Context<'_>, annotations: &mut Annotations) {
    let line = ctxt.spans.first_line(stmt.syntax());
    match stmt {
        Stmt::ImportStmt(_) | Stmt::FromImportStmt(_) => ctxt.define_imports(stmt, line),

        Stmt::ClassDef(class) => {
            if let Some(class_type) = class_type_of(class, &ctxt.spans, annotations) {
                let bases: Vec<SymbolType> = class
                    .bases()
                    .into_iter()
                    .flat_map(|bases| bases.args())
                    .filter_map(|arg| arg.expr())
                    .filter_map(|expr| type_name_of(&expr))
                    .filter_map(|name| ctxt.symbol_table.resolve_type(&name))
                    .collect();
                let class_type = inherit_members(class_type, &bases);
                let name = class_type.name().to_string();
                ctxt.define(name, SymbolType::Class(class_type), line);
            }
        }

        Stmt::FuncDef(def) => {
            if let Some(signature) = signature_of(def, false, &ctxt.spans, annotations) {
                let name = signature.name().to_string();
                ctxt.define(name, SymbolType::Method(signature), line);
            }
        }

        Stmt::ExprStmt(expr_stmt) => declare_assignment(expr_stmt, line, ctxt, annotations),

        _ => (),
    }
}

// x = 3
// name: str = "bell"
// Only constants are typed here. Other values are bound to `object` until the
// second pass types them.
fn declare_assignment(
    expr_stmt: &ast::ExprStmt,
    line: usize,
    ctxt: &mut Context<'_>,
    annotations: &mut Annotations,
) {
    let exprs: Vec<Expr> = expr_stmt.exprs().collect();
    let annotated = expr_stmt
        .annotation()
        .and_then(|a| a.expr())
        .and_then(|expr| {
            let name = type_name_of(&expr)?;
            annotations.push((name.clone(), ctxt.spans.node_token(&expr)));
            Some(name)
        });
    let (targets, typ) = if expr_stmt.is_assignment() {
        let Some((value, targets)) = exprs.split_last() else {
            return;
        };
        let typ = match &annotated {
            Some(name) => ctxt.symbol_table.resolve_type(name),
            None => Some(constant_type(value).unwrap_or_else(SymbolType::any)),
        };
        (targets, typ)
    } else if annotated.is_some() {
        // A bare declaration, `x: int`.
        let typ = annotated.as_ref().and_then(|n| ctxt.symbol_table.resolve_type(n));
        (&exprs[..], typ)
    } else {
        return;
    };
    let Some(typ) = typ else {
        return;
    };
    for target in targets {
        if let Some(name) = target_name(target) {
            ctxt.define(name, typ.clone(), line);
        }
    }
}

fn target_name(target: &Expr) -> Option<qk_syntax::SmolStr> {
    match target {
        Expr::Name(name) => name.text(),
        _ => None,
    }
}

// Annotations are checked last, since a class may be named before it is declared.
fn check_annotations(ctxt: &mut Context<'_>, annotations: Annotations) {
    for (name, token) in annotations {
        if ctxt.symbol_table.resolve_type(&name).is_none() {
            ctxt.insert_error(
                SemanticErrorKind::UnknownType,
                unknown_type_message(&name),
                &token,
            );
        }
    }
}

fn unknown_type_message(name: &TypeName) -> String {
    format!("Type {name} is not defined")
}
