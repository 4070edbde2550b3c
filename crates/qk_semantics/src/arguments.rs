// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Checking the arguments of a call against the signature of the callee.

use qk_syntax::SmolStr;

use crate::diagnostic::{Diagnostic, DiagnosticSink, SemanticErrorKind};
use crate::position::Token;
use crate::symbols::PersistentSymbolTable;
use crate::types::{MethodSignature, ParamSpec, SymbolType};

/// One argument of a call, reduced to what the checker needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Argument {
    keyword: Option<SmolStr>,
    typ: Option<SymbolType>,
    unpacked: bool,
    location: Token,
}

impl Argument {
    /// `typ` is `None` if the type of the argument could not be inferred.
    /// `location` spans the argument text.
    pub fn new(typ: Option<SymbolType>, location: Token) -> Argument {
        Argument {
            keyword: None,
            typ,
            unpacked: false,
            location,
        }
    }

    pub fn with_keyword<T: Into<SmolStr>>(mut self, keyword: T) -> Argument {
        self.keyword = Some(keyword.into());
        self
    }

    /// `*args` or `**kwargs` at the call site.
    pub fn unpacked(mut self) -> Argument {
        self.unpacked = true;
        self
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn symbol_type(&self) -> Option<&SymbolType> {
        self.typ.as_ref()
    }

    pub fn is_unpacked(&self) -> bool {
        self.unpacked
    }

    pub fn location(&self) -> &Token {
        &self.location
    }
}

/// A call: the token naming the callee, and the arguments.
#[derive(Clone, Copy, Debug)]
pub struct CallSite<'a> {
    pub method_name: &'a Token,
    pub arguments: &'a [Argument],
}

impl<'a> CallSite<'a> {
    pub fn new(method_name: &'a Token, arguments: &'a [Argument]) -> CallSite<'a> {
        CallSite {
            method_name,
            arguments,
        }
    }
}

/// Compares call sites with signatures. It only reads the symbol table, to
/// resolve the parameter types of signatures.
pub struct ArgumentChecker<'t> {
    symbol_table: &'t PersistentSymbolTable,
}

impl<'t> ArgumentChecker<'t> {
    pub fn new(symbol_table: &'t PersistentSymbolTable) -> ArgumentChecker<'t> {
        ArgumentChecker { symbol_table }
    }

    /// Check the number of arguments, then the type of each one. A wrong
    /// number of arguments is reported once, at the name of the callee, and
    /// the types are not checked.
    pub fn check<S: DiagnosticSink>(
        &self,
        signature: &MethodSignature,
        call_site: &CallSite<'_>,
        sink: &mut S,
    ) {
        let unpacked = call_site.arguments.iter().any(|a| a.is_unpacked());
        if !signature.is_variadic() && !unpacked {
            let given = call_site.arguments.len();
            let (min, max) = signature.arity();
            if given < min || given > max {
                sink.report(Diagnostic::semantic(
                    SemanticErrorKind::ArityMismatch,
                    arity_message(signature, given),
                    call_site.method_name,
                ));
                return;
            }
        }

        let mut positional = 0;
        for arg in call_site.arguments.iter() {
            if arg.is_unpacked() {
                continue;
            }
            let param = match arg.keyword() {
                Some(keyword) => signature.param(keyword),
                None => {
                    positional += 1;
                    signature
                        .params()
                        .get(positional - 1)
                        .map(|p| (positional - 1, p))
                }
            };
            if let Some((index, param)) = param {
                self.check_type(signature, index + 1, param, arg, sink);
            }
        }
    }

    fn check_type<S: DiagnosticSink>(
        &self,
        signature: &MethodSignature,
        position: usize,
        param: &ParamSpec,
        arg: &Argument,
        sink: &mut S,
    ) {
        let Some(found) = arg.symbol_type() else {
            return;
        };
        let Some(expected) = param
            .type_name()
            .and_then(|name| self.symbol_table.resolve_type(name))
        else {
            return;
        };
        if !found.is_compatible_with(&expected) {
            let message = format!(
                "Argument {position} of {} should be of type {expected}, found {found}",
                signature.name()
            );
            sink.report(Diagnostic::semantic(
                SemanticErrorKind::ArgumentTypeMismatch,
                message,
                arg.location(),
            ));
        }
    }
}

fn arity_message(signature: &MethodSignature, given: usize) -> String {
    let (min, max) = signature.arity();
    let expected = if min == max {
        format!("{min}")
    } else {
        format!("between {min} and {max}")
    };
    let plural = if max == 1 { "argument" } else { "arguments" };
    format!(
        "{} expects {expected} {plural}, got {given}",
        signature.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::types::{PrimitiveKind, TypeName};
    use crate::TextRange;

    fn token(text: &str, start: usize) -> Token {
        let range = TextRange::new((start as u32).into(), ((start + text.len()) as u32).into());
        Token::new(text, range, Position::new(0, start, start + text.len()))
    }

    fn int_arg(start: usize) -> Argument {
        Argument::new(Some(SymbolType::Primitive(PrimitiveKind::Int)), token("1", start))
    }

    fn bar() -> MethodSignature {
        MethodSignature::new("bar")
            .with_param(ParamSpec::new("a", None))
            .with_param(ParamSpec::new("b", None))
    }

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<SemanticErrorKind> {
        diagnostics
            .iter()
            .filter_map(|d| d.semantic_kind().cloned())
            .collect()
    }

    #[test]
    fn too_few_arguments() {
        let table = PersistentSymbolTable::new();
        let name = token("bar", 2);
        let args = vec![int_arg(6)];
        let mut sink = Vec::new();
        ArgumentChecker::new(&table).check(&bar(), &CallSite::new(&name, &args), &mut sink);
        assert_eq!(kinds(&sink), vec![SemanticErrorKind::ArityMismatch]);
        assert_eq!(sink[0].start_column(), 2);
        assert_eq!(sink[0].message(), "bar expects 2 arguments, got 1");
    }

    #[test]
    fn variadic_accepts_any_count() {
        let table = PersistentSymbolTable::new();
        let name = token("barrier", 0);
        let args = vec![int_arg(8), int_arg(10), int_arg(12)];
        let mut sink = Vec::new();
        let sig = MethodSignature::new("barrier").variadic();
        ArgumentChecker::new(&table).check(&sig, &CallSite::new(&name, &args), &mut sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn int_for_float_but_not_str() {
        let table = PersistentSymbolTable::new();
        let sig = MethodSignature::new("u2")
            .with_param(ParamSpec::new("phi", Some(TypeName::new("float"))))
            .with_param(ParamSpec::new("name", Some(TypeName::new("str"))));
        let name = token("u2", 0);
        let args = vec![int_arg(3), int_arg(6)];
        let mut sink = Vec::new();
        ArgumentChecker::new(&table).check(&sig, &CallSite::new(&name, &args), &mut sink);
        assert_eq!(kinds(&sink), vec![SemanticErrorKind::ArgumentTypeMismatch]);
        assert_eq!(
            sink[0].message(),
            "Argument 2 of u2 should be of type str, found int"
        );
        assert_eq!(sink[0].start_column(), 6);
    }

    #[test]
    fn unknown_argument_types_are_compatible() {
        let table = PersistentSymbolTable::new();
        let sig = MethodSignature::new("f").with_param(ParamSpec::new("s", Some(TypeName::new("str"))));
        let name = token("f", 0);
        let args = vec![Argument::new(None, token("x", 2))];
        let mut sink = Vec::new();
        ArgumentChecker::new(&table).check(&sig, &CallSite::new(&name, &args), &mut sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn keyword_arguments_match_by_name() {
        let table = PersistentSymbolTable::new();
        let sig = MethodSignature::new("get_counts")
            .with_param(ParamSpec::new("name", Some(TypeName::new("str"))).optional());
        let name = token("get_counts", 0);
        let args = vec![int_arg(16).with_keyword("name")];
        let mut sink = Vec::new();
        ArgumentChecker::new(&table).check(&sig, &CallSite::new(&name, &args), &mut sink);
        assert_eq!(kinds(&sink), vec![SemanticErrorKind::ArgumentTypeMismatch]);
        assert!(sink[0].message().starts_with("Argument 1 of get_counts"));
    }
}
