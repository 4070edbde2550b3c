// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Folding the syntax tree into the terms of [`crate::folded`].
//!
//! The folders read the tree and nothing else. A shape that a folder does not
//! recognize folds to `None`, and the caller drops it. So one malformed
//! statement costs only that statement.

use qk_syntax::ast::{self, AstNode, Expr, Stmt, Trailer};
use qk_syntax::{SyntaxKind, SyntaxToken};
use tracing::{debug, trace};

use crate::declarations::strip_quotes;
use crate::folded::{
    ArrayReference, Assignment, Boolean, Dictionary, Expression, Float, Integer, MethodReference,
    Statement, Term, Text, VariableReference,
};
use crate::position::Spans;

pub struct TreeFolder;

impl TreeFolder {
    /// Fold the simple statements at the top level of `tree`.
    pub fn fold(tree: &ast::SourceFile) -> Vec<Statement> {
        let spans = Spans::for_node(tree.syntax());
        let folder = StatementFolder::new(&spans);
        let statements: Vec<Statement> = tree
            .statements()
            .filter_map(|stmt| folder.fold(&stmt))
            .collect();
        debug!(count = statements.len(), "folded statements");
        statements
    }
}

pub struct StatementFolder<'s> {
    expressions: ExpressionFolder<'s>,
}

impl<'s> StatementFolder<'s> {
    pub(crate) fn new(spans: &'s Spans) -> StatementFolder<'s> {
        StatementFolder {
            expressions: ExpressionFolder::new(spans),
        }
    }

    /// Fold an expression statement. The expressions of a chained assignment
    /// nest from the right.
    pub fn fold(&self, stmt: &Stmt) -> Option<Statement> {
        let Stmt::ExprStmt(expr_stmt) = stmt else {
            return None;
        };
        if expr_stmt.is_aug_assignment()
            || expr_stmt
                .syntax()
                .descendants()
                .any(|node| node.kind() == SyntaxKind::ERROR)
        {
            return None;
        }
        let exprs: Vec<Expr> = expr_stmt.exprs().collect();
        let (value, targets) = exprs.split_last()?;
        let value = match self.expressions.fold(value) {
            Some(term) => term,
            // The assignment is kept even if its value does not fold.
            None if !targets.is_empty() => Term::Expression(Expression::new(Vec::new())),
            None => return None,
        };
        let folded = targets.iter().rev().try_fold(value, |value, target| {
            let target = self.expressions.fold(target)?;
            Some(Term::Assignment(Assignment::new(target, value)))
        })?;
        Some(Statement::new(folded))
    }
}

pub struct ExpressionFolder<'s> {
    spans: &'s Spans,
    terminals: TerminalFolder<'s>,
}

impl<'s> ExpressionFolder<'s> {
    pub(crate) fn new(spans: &'s Spans) -> ExpressionFolder<'s> {
        ExpressionFolder {
            spans,
            terminals: TerminalFolder::new(spans),
        }
    }

    pub fn fold(&self, expr: &Expr) -> Option<Term> {
        match expr {
            Expr::Name(_) | Expr::Literal(_) | Expr::DictExpr(_) => self.terminals.fold(expr),
            Expr::Power(power) => self.fold_power(power),
            Expr::ParenExpr(paren) => self.fold(&paren.expr()?),
            Expr::PrefixExpr(prefix) => self.fold_prefix(prefix),
            Expr::BinExpr(bin) => {
                let mut terms = Vec::new();
                self.fold_operands(bin, &mut terms);
                collapse(terms)
            }
            Expr::ListExpr(list) => Some(Term::Expression(Expression::new(
                list.items().filter_map(|e| self.fold(&e)).collect(),
            ))),
            Expr::Testlist(list) => Some(Term::Expression(Expression::new(
                list.items().filter_map(|e| self.fold(&e)).collect(),
            ))),
            Expr::CondExpr(_)
            | Expr::LambdaExpr(_)
            | Expr::YieldExpr(_)
            | Expr::Comprehension(_) => None,
        }
    }

    // `a + b * c` folds to the terms `a`, `b` and `c`.
    fn fold_operands(&self, bin: &ast::BinExpr, terms: &mut Vec<Term>) {
        for operand in [bin.lhs(), bin.rhs()].into_iter().flatten() {
            match &operand {
                Expr::BinExpr(inner) => self.fold_operands(inner, terms),
                _ => terms.extend(self.fold(&operand)),
            }
        }
    }

    fn fold_prefix(&self, prefix: &ast::PrefixExpr) -> Option<Term> {
        let inner = self.fold(&prefix.expr()?)?;
        let position = self.spans.node_position(prefix);
        match prefix.op_kind()? {
            SyntaxKind::MINUS => match inner {
                Term::Integer(int) => Some(Term::Integer(Integer::new(-int.value(), position))),
                Term::Float(float) => Some(Term::Float(Float::new(-float.value(), position))),
                _ => None,
            },
            SyntaxKind::PLUS => Some(inner),
            _ => None,
        }
    }

    /// An atom and its trailers become a list of terms, reduced from the
    /// left: a call on a variable is a `MethodReference`, a subscript of a
    /// variable is an `ArrayReference`.
    fn fold_power(&self, power: &ast::Power) -> Option<Term> {
        let mut terms: Vec<Term> = Vec::new();
        terms.extend(self.fold(&power.atom()?));
        for trailer in power.trailers() {
            match trailer {
                Trailer::Attribute(attr) => {
                    let Some(ident) = attr.name().and_then(|n| n.ident_token()) else {
                        continue;
                    };
                    terms.push(self.terminals.variable(&ident));
                }
                Trailer::ArgList(args) => {
                    let args: Vec<Term> = args
                        .args()
                        .filter_map(|arg| arg.expr())
                        .filter_map(|expr| self.fold(&expr))
                        .collect();
                    match terms.pop() {
                        Some(Term::VariableReference(var)) => terms.push(Term::MethodReference(
                            MethodReference::new(var.name(), args, var.position()),
                        )),
                        Some(other) => {
                            trace!("call on a value that is not a name");
                            terms.push(other);
                        }
                        None => {}
                    }
                }
                Trailer::SubscriptList(list) => {
                    let index_terms: Vec<Term> = list
                        .subscripts()
                        .flat_map(|s| s.exprs())
                        .filter_map(|expr| self.fold(&expr))
                        .collect();
                    // Only a literal index is resolved.
                    let index = first_integer(&index_terms).unwrap_or(0);
                    match terms.pop() {
                        Some(Term::VariableReference(var)) => terms.push(Term::ArrayReference(
                            ArrayReference::new(var.name(), index, var.position()),
                        )),
                        Some(other) => terms.push(other),
                        None => {}
                    }
                }
            }
        }
        collapse(terms)
    }
}

/// A single term stands for itself.
fn collapse(mut terms: Vec<Term>) -> Option<Term> {
    match terms.len() {
        0 => None,
        1 => terms.pop(),
        _ => Some(Term::Expression(Expression::new(terms))),
    }
}

// Integers inside a computed index such as `i + 1` are not an index.
fn first_integer(terms: &[Term]) -> Option<i64> {
    terms.iter().find_map(|term| match term {
        Term::Integer(int) => Some(*int.value()),
        _ => None,
    })
}

/// Folds names, literals and dict displays.
pub struct TerminalFolder<'s> {
    spans: &'s Spans,
}

impl<'s> TerminalFolder<'s> {
    pub(crate) fn new(spans: &'s Spans) -> TerminalFolder<'s> {
        TerminalFolder { spans }
    }

    pub fn fold(&self, expr: &Expr) -> Option<Term> {
        match expr {
            Expr::Name(name) => Some(self.variable(&name.ident_token()?)),
            Expr::Literal(literal) => self.literal(literal),
            Expr::DictExpr(dict) => Some(Term::Dictionary(Dictionary::new(
                self.spans.node_position(dict),
            ))),
            _ => None,
        }
    }

    fn variable(&self, ident: &SyntaxToken) -> Term {
        let position = self.spans.position(ident.text_range());
        Term::VariableReference(VariableReference::new(ident.text(), position))
    }

    fn literal(&self, literal: &ast::Literal) -> Option<Term> {
        let token = literal.token()?;
        let position = self.spans.position(token.text_range());
        let term = match token.kind() {
            SyntaxKind::INT_NUMBER => Term::Integer(Integer::new(parse_int(token.text())?, position)),
            SyntaxKind::FLOAT_NUMBER => {
                let value = token.text().replace('_', "").parse::<f64>().ok()?;
                trace!(text = token.text(), value, "folded float");
                Term::Float(Float::new(value, position))
            }
            SyntaxKind::STRING => {
                // Adjacent strings are concatenated.
                let value: String = literal
                    .string_tokens()
                    .map(|t| strip_quotes(t.text()).to_string())
                    .collect();
                Term::Text(Text::new(value, self.spans.node_position(literal)))
            }
            SyntaxKind::TRUE_KW => Term::Boolean(Boolean::new(true, position)),
            SyntaxKind::FALSE_KW => Term::Boolean(Boolean::new(false, position)),
            _ => return None,
        };
        Some(term)
    }
}

fn parse_int(text: &str) -> Option<i64> {
    let digits = text.replace('_', "").to_ascii_lowercase();
    let parsed = if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = digits.strip_prefix("0o") {
        i64::from_str_radix(oct, 8)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        i64::from_str_radix(bin, 2)
    } else {
        digits.parse::<i64>()
    };
    match parsed {
        Ok(value) => {
            trace!(text, value, "folded integer");
            Some(value)
        }
        Err(err) => {
            debug!(text, %err, "integer literal not folded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bases() {
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn first_integer_wins() {
        let p = crate::position::Position::default();
        let terms = vec![
            Term::VariableReference(VariableReference::new("i", p)),
            Term::Integer(Integer::new(2, p)),
            Term::Integer(Integer::new(3, p)),
        ];
        assert_eq!(first_integer(&terms), Some(2));
        assert_eq!(first_integer(&terms[..1]), None);

        let computed = vec![Term::Expression(Expression::new(terms[..2].to_vec()))];
        assert_eq!(first_integer(&computed), None);
    }
}
