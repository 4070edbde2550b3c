// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

// Reading types and signatures off `def` and `class` statements.
// Both analysis passes use these.

use qk_syntax::ast::{self, Expr, Stmt, Trailer};
use qk_syntax::SyntaxKind;

use crate::position::{Spans, Token};
use crate::types::{ClassType, MethodSignature, ParamSpec, PrimitiveKind, SymbolType, TypeName};

/// Type names read from annotations, with the place they were read from,
/// so that they can be checked once every declaration is known.
pub(crate) type Annotations = Vec<(TypeName, Token)>;

/// The type named by an annotation expression.
pub(crate) fn type_name_of(expr: &Expr) -> Option<TypeName> {
    match expr {
        Expr::Name(name) => name.text().map(TypeName::new),
        Expr::Literal(literal) => match literal.kind()? {
            // A forward reference written as a string.
            SyntaxKind::STRING => {
                let text = literal.token()?.text().to_string();
                Some(TypeName::new(strip_quotes(&text)))
            }
            SyntaxKind::NONE_KW => Some(TypeName::new("None")),
            _ => None,
        },
        Expr::Power(power) => {
            let trailers: Vec<Trailer> = power.trailers().collect();
            if trailers.iter().all(|t| matches!(t, Trailer::Attribute(_))) {
                // `qiskit.QuantumCircuit`
                match trailers.last() {
                    Some(Trailer::Attribute(attr)) => attr.name()?.text().map(TypeName::new),
                    _ => None,
                }
            } else {
                // `list[int]` is a `list`
                power.atom().as_ref().and_then(type_name_of)
            }
        }
        _ => None,
    }
}

/// Remove the prefix and quotes of a string literal.
pub(crate) fn strip_quotes(text: &str) -> &str {
    let body = text.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return &body[quote.len()..body.len() - quote.len()];
        }
    }
    body
}

pub(crate) fn literal_type(literal: &ast::Literal) -> Option<SymbolType> {
    use PrimitiveKind::*;
    let kind = match literal.kind()? {
        SyntaxKind::INT_NUMBER => Int,
        SyntaxKind::FLOAT_NUMBER => Float,
        SyntaxKind::IMAG_NUMBER => Complex,
        SyntaxKind::STRING => Str,
        SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => Bool,
        SyntaxKind::NONE_KW => NoneType,
        _ => return None,
    };
    Some(SymbolType::Primitive(kind))
}

/// The type of a constant expression: a literal, a possibly negated number,
/// or a list or dict display.
pub(crate) fn constant_type(expr: &Expr) -> Option<SymbolType> {
    match expr {
        Expr::Literal(literal) => literal_type(literal),
        Expr::PrefixExpr(prefix) if prefix.op_kind() != Some(SyntaxKind::NOT_KW) => {
            constant_type(&prefix.expr()?)
        }
        Expr::ListExpr(_) => Some(SymbolType::Primitive(PrimitiveKind::List)),
        Expr::DictExpr(_) => Some(SymbolType::Primitive(PrimitiveKind::Dict)),
        _ => None,
    }
}

fn annotation_name(
    annotation: Option<ast::TypeAnnotation>,
    spans: &Spans,
    annotations: &mut Annotations,
) -> Option<TypeName> {
    let expr = annotation?.expr()?;
    let name = type_name_of(&expr)?;
    annotations.push((name.clone(), spans.node_token(&expr)));
    Some(name)
}

/// The signature of a function. For a method, the leading `self` is not a
/// parameter of the signature.
pub(crate) fn signature_of(
    def: &ast::FuncDef,
    is_method: bool,
    spans: &Spans,
    annotations: &mut Annotations,
) -> Option<MethodSignature> {
    let name = def.name()?.text()?;
    let mut signature = MethodSignature::new(name);
    let params = def.param_list().into_iter().flat_map(|list| list.params());
    for (i, param) in params.enumerate() {
        if param.is_variadic() {
            signature = signature.variadic();
            continue;
        }
        let Some(param_name) = param.name().and_then(|n| n.text()) else {
            continue;
        };
        if is_method && i == 0 && param_name == "self" {
            continue;
        }
        let type_name = annotation_name(param.annotation(), spans, annotations);
        let mut spec = ParamSpec::new(param_name, type_name);
        if param.default_value().is_some() {
            spec = spec.optional();
        }
        signature = signature.with_param(spec);
    }
    let ret = def.ret_type().and_then(|r| r.expr());
    if let Some(ret) = ret {
        if let Some(type_name) = type_name_of(&ret) {
            annotations.push((type_name.clone(), spans.node_token(&ret)));
            signature = signature.returning(type_name);
        }
    }
    Some(signature)
}

/// The class declared by `class`, with a signature for each method defined
/// directly in its body.
pub(crate) fn class_type_of(
    class: &ast::ClassDef,
    spans: &Spans,
    annotations: &mut Annotations,
) -> Option<ClassType> {
    let name = class.name()?.text()?;
    let mut class_type = ClassType::new(name);
    let methods = class.body().into_iter().flat_map(|body| body.statements());
    for stmt in methods {
        if let Stmt::FuncDef(def) = stmt {
            if let Some(signature) = signature_of(&def, true, spans, annotations) {
                class_type = class_type.with_member(signature);
            }
        }
    }
    Some(class_type)
}

/// Add the methods of `bases` that `class_type` does not override.
pub(crate) fn inherit_members(mut class_type: ClassType, bases: &[SymbolType]) -> ClassType {
    for base in bases.iter().filter_map(SymbolType::as_class) {
        for member in base.members() {
            if class_type.member(member.name()).is_none() {
                class_type = class_type.with_member(member.clone());
            }
        }
    }
    class_type
}

/// The names bound by an assignment target that is a name or a tuple or
/// list of names.
pub(crate) fn target_names(target: &Expr, spans: &Spans) -> Vec<Token> {
    let mut names = Vec::new();
    collect_names(target, spans, &mut names);
    names
}

fn collect_names(expr: &Expr, spans: &Spans, out: &mut Vec<Token>) {
    match expr {
        Expr::Name(name) => {
            if let Some(ident) = name.ident_token() {
                out.push(spans.token(&ident));
            }
        }
        Expr::Testlist(list) => list.items().for_each(|e| collect_names(&e, spans, out)),
        Expr::ListExpr(list) => list.items().for_each(|e| collect_names(&e, spans, out)),
        Expr::ParenExpr(paren) => {
            if let Some(inner) = paren.expr() {
                collect_names(&inner, spans, out);
            }
        }
        _ => {}
    }
}
