// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! The second analysis pass.
//!
//! Every statement is visited in source order. Before a statement is visited
//! the symbol table is moved to the line above it, so that a lookup sees the
//! versions bound by earlier lines. Bodies of `def` and `class` get their own
//! scopes, and so do lambdas and comprehensions. The targets of an assignment
//! are defined with the type inferred for the value, which for a method chain
//! is found by following the declared return types.
//!
//! The pass never stops early. Everything it finds is collected as a
//! [`Diagnostic`].

use qk_syntax::ast::{self, AstNode, Expr, Stmt, Trailer};
use qk_syntax::SyntaxKind;
use tracing::{debug, trace};

use crate::arguments::{Argument, ArgumentChecker, CallSite};
use crate::assignments::{
    element_type, lookup_member, resolve_chain, AssignmentsStack, MemberLookup,
};
use crate::context::{Context, WalkContext, WalkMode};
use crate::declarations::{
    class_type_of, inherit_members, literal_type, signature_of, target_names, type_name_of,
    Annotations,
};
use crate::diagnostic::{Diagnostic, SemanticErrorKind};
use crate::position::{Spans, Token};
use crate::symbols::PersistentSymbolTable;
use crate::types::{ClassType, MethodSignature, PrimitiveKind, SymbolType};
use crate::with_scope;

pub struct SemanticAnalyzer;

impl SemanticAnalyzer {
    /// Walk `tree`, defining what it binds in `symbol_table`, and return the
    /// semantic errors found. `symbol_table` is normally the table produced
    /// by [`crate::SymbolTableGenerator`] for the same tree.
    pub fn analyze(tree: &ast::SourceFile, symbol_table: &mut PersistentSymbolTable) -> Vec<Diagnostic> {
        debug!("semantic pass");
        let spans = Spans::for_node(tree.syntax());
        let mut walker = Walker {
            ctxt: Context::new(symbol_table, spans),
            tracker: AssignmentsStack::new(),
            owners: Vec::new(),
        };
        for stmt in tree.statements() {
            walker.stmt(&stmt);
        }
        // Leave the table at the end of the script.
        let end = walker.ctxt.spans.last_line(tree.syntax());
        let table = &mut walker.ctxt.symbol_table;
        table.seek(table.position().max(end));
        let diagnostics = walker.ctxt.into_diagnostics();
        debug!(errors = diagnostics.len(), "semantic pass done");
        diagnostics
    }
}

/// What a call trailer would call.
#[derive(Clone, Debug)]
enum Callee {
    /// A function or method. The token names it at the call site.
    Signature(MethodSignature, Token),
    /// A class. Calling it constructs an instance.
    Constructor(ClassType, Token),
    Unchecked,
}

struct Walker<'t> {
    ctxt: Context<'t>,
    tracker: AssignmentsStack,
    /// One entry per enclosing `def` or `class` body. A `class` body holds the
    /// class, so that a `def` directly inside it is known to be a method.
    owners: Vec<Option<ClassType>>,
}

impl Walker<'_> {
    fn stmt(&mut self, stmt: &Stmt) {
        let line = self.ctxt.spans.first_line(stmt.syntax());
        // `x = x + 1` reads the `x` bound above it.
        self.ctxt.symbol_table.seek(line.saturating_sub(1));
        let walk = WalkContext::new(line);
        match stmt {
            Stmt::ExprStmt(expr_stmt) => self.expr_stmt(expr_stmt, walk),

            Stmt::ReturnStmt(ret) => {
                if let Some(expr) = ret.expr() {
                    self.expr(&expr, walk);
                }
            }

            Stmt::ImportStmt(_) | Stmt::FromImportStmt(_) => self.ctxt.define_imports(stmt, line),

            Stmt::FuncDef(def) => self.func_def(def, walk),

            Stmt::ClassDef(class) => self.class_def(class, walk),

            Stmt::IfStmt(if_stmt) => {
                self.condition(if_stmt.condition(), walk);
                self.suite(if_stmt.body());
                for elif in if_stmt.elif_clauses() {
                    self.condition(elif.condition(), walk);
                    self.suite(elif.body());
                }
                if let Some(else_clause) = if_stmt.else_clause() {
                    self.suite(else_clause.body());
                }
            }

            Stmt::WhileStmt(while_stmt) => {
                self.condition(while_stmt.condition(), walk);
                self.suite(while_stmt.body());
                if let Some(else_clause) = while_stmt.else_clause() {
                    self.suite(else_clause.body());
                }
            }

            Stmt::ForStmt(for_stmt) => self.for_stmt(for_stmt, walk),

            Stmt::WithStmt(with) => {
                for item in with.items() {
                    self.condition(item.expr(), walk);
                    // What `__enter__` returns is not modelled.
                    if let Some(target) = item.target() {
                        self.bind_target(&target, SymbolType::any(), walk.line);
                    }
                }
                self.suite(with.body());
            }

            Stmt::TryStmt(try_stmt) => self.try_stmt(try_stmt),

            Stmt::RaiseStmt(raise) => {
                for expr in raise.exprs() {
                    self.expr(&expr, walk);
                }
            }

            Stmt::AssertStmt(assert) => {
                for expr in assert.exprs() {
                    self.expr(&expr, walk);
                }
            }

            Stmt::DelStmt(del) => self.condition(del.target(), walk),

            Stmt::GlobalStmt(global) => {
                trace!(nonlocal = global.is_nonlocal(), line, "names declared in an outer scope");
            }

            Stmt::PassStmt(_) | Stmt::BreakStmt(_) | Stmt::ContinueStmt(_) => (),
        }
    }

    fn suite(&mut self, suite: Option<ast::Suite>) {
        for stmt in suite.into_iter().flat_map(|suite| suite.statements()) {
            self.stmt(&stmt);
        }
    }

    fn condition(&mut self, condition: Option<Expr>, walk: WalkContext) {
        if let Some(expr) = condition {
            self.expr(&expr, walk);
        }
    }

    fn decorators(&mut self, decorators: ast::AstChildren<ast::Decorator>, walk: WalkContext) {
        for expr in decorators.filter_map(|d| d.expr()) {
            self.expr(&expr, walk.with_mode(WalkMode::Statement));
        }
    }

    /// Bind every name in a loop, `with` or comprehension target to `typ`.
    fn bind_target(&mut self, target: &Expr, typ: SymbolType, line: usize) {
        for token in target_names(target, &self.ctxt.spans) {
            self.ctxt.define(token.text(), typ.clone(), line);
        }
    }

    /// The type of a loop target: `int` when iterating over `range(..)`,
    /// else the element type of the iterated value for a plain name.
    fn loop_target_type(
        &self,
        target: &Expr,
        iterable: Option<&Expr>,
        iterated: Option<SymbolType>,
    ) -> SymbolType {
        match target {
            Expr::Name(_) if iterable.is_some_and(is_range_call) => {
                SymbolType::Primitive(PrimitiveKind::Int)
            }
            Expr::Name(_) => iterated
                .and_then(|typ| element_type(&typ, &*self.ctxt.symbol_table))
                .unwrap_or_else(SymbolType::any),
            _ => SymbolType::any(),
        }
    }

    fn expr_stmt(&mut self, expr_stmt: &ast::ExprStmt, walk: WalkContext) {
        let exprs: Vec<Expr> = expr_stmt.exprs().collect();
        // `x += 1` binds nothing new. Both sides are uses.
        if expr_stmt.is_aug_assignment() {
            for expr in exprs.iter() {
                self.expr(expr, walk);
            }
            return;
        }
        let annotated = expr_stmt
            .annotation()
            .and_then(|a| a.expr())
            .and_then(|expr| type_name_of(&expr))
            .and_then(|name| self.ctxt.symbol_table.resolve_type(&name));

        if !expr_stmt.is_assignment() {
            match annotated {
                // x: int
                Some(typ) => {
                    for expr in exprs.iter() {
                        for token in target_names(expr, &self.ctxt.spans) {
                            self.ctxt.define(token.text(), typ.clone(), walk.line);
                        }
                    }
                }
                None => {
                    for expr in exprs.iter() {
                        self.expr(expr, walk);
                    }
                }
            }
            return;
        }

        let Some((value, targets)) = exprs.split_last() else {
            return;
        };
        for target in targets {
            self.tracker.begin(self.ctxt.spans.first_token(target));
            self.target(target, walk.with_mode(WalkMode::AssignmentTarget));
            self.tracker.assign();
        }
        self.tracker.begin(self.ctxt.spans.first_token(value));
        let walked = self.expr(value, walk.with_mode(WalkMode::AssignmentValue));
        let Some(finished) = self.tracker.finish() else {
            return;
        };
        let typ = annotated
            .or_else(|| {
                finished
                    .value
                    .chain
                    .as_ref()
                    .and_then(|chain| resolve_chain(chain, &*self.ctxt.symbol_table))
            })
            .or(walked)
            .unwrap_or_else(SymbolType::any);
        for target in finished.targets.iter() {
            match target.plain_name() {
                Some(name) => self.ctxt.define(name, typ.clone(), walk.line),
                None => debug!(
                    target = target.target_first_token.text(),
                    line = walk.line,
                    "target is not a plain name"
                ),
            }
        }
    }

    /// A plain name is bound by the assignment and not looked up. The names in
    /// a tuple target are bound to `object`. Anything else, such as `self.x`
    /// or `counts[k]`, is a use of the names in it.
    fn target(&mut self, target: &Expr, walk: WalkContext) {
        match target {
            Expr::Name(_) => (),
            Expr::Testlist(_) | Expr::ListExpr(_) | Expr::ParenExpr(_) => {
                let names = target_names(target, &self.ctxt.spans);
                if let Some(first) = names.first() {
                    // Not a plain name, so `finish` will skip it.
                    self.tracker.variable(first.clone());
                }
                for token in names {
                    self.ctxt.define(token.text(), SymbolType::any(), walk.line);
                }
            }
            _ => {
                self.expr(target, walk);
            }
        }
    }

    fn func_def(&mut self, def: &ast::FuncDef, walk: WalkContext) {
        self.decorators(def.decorators(), walk);
        let Some(name) = def.name().and_then(|n| n.text()) else {
            return;
        };
        let params: Vec<ast::Param> = def
            .param_list()
            .into_iter()
            .flat_map(|list| list.params())
            .collect();
        // Defaults are evaluated where the function is defined.
        for default in params.iter().filter_map(|p| p.default_value()?.expr()) {
            self.expr(&default, walk.with_mode(WalkMode::Statement));
        }
        let owner = self.owners.last().cloned().flatten();
        // Unknown annotation types were reported by the first pass.
        let mut annotations = Annotations::new();
        if let Some(signature) = signature_of(def, owner.is_some(), &self.ctxt.spans, &mut annotations) {
            self.ctxt
                .define(name.clone(), SymbolType::Method(signature), walk.line);
        }
        let closed = self.ctxt.spans.last_line(def.syntax());
        with_scope!(self.ctxt, name, walk.line, closed, {
            for (i, param) in params.iter().enumerate() {
                let Some(param_name) = param.name().and_then(|n| n.text()) else {
                    continue;
                };
                let typ = match &owner {
                    Some(class) if i == 0 && !param.is_variadic() => SymbolType::Class(class.clone()),
                    _ => param
                        .annotation()
                        .and_then(|a| a.expr())
                        .and_then(|expr| type_name_of(&expr))
                        .and_then(|name| self.ctxt.symbol_table.resolve_type(&name))
                        .unwrap_or_else(SymbolType::any),
                };
                self.ctxt.define(param_name, typ, walk.line);
            }
            self.owners.push(None);
            self.suite(def.body());
            self.owners.pop();
        });
    }

    fn class_def(&mut self, class: &ast::ClassDef, walk: WalkContext) {
        self.decorators(class.decorators(), walk);
        let bases: Vec<SymbolType> = class
            .bases()
            .into_iter()
            .flat_map(|bases| bases.args())
            .filter_map(|arg| arg.expr())
            .filter_map(|expr| self.expr(&expr, walk.with_mode(WalkMode::Statement)))
            .collect();
        let mut annotations = Annotations::new();
        let Some(class_type) = class_type_of(class, &self.ctxt.spans, &mut annotations) else {
            return;
        };
        let class_type = inherit_members(class_type, &bases);
        let name = class_type.name().to_string();
        self.ctxt
            .define(name.clone(), SymbolType::Class(class_type.clone()), walk.line);
        let closed = self.ctxt.spans.last_line(class.syntax());
        self.owners.push(Some(class_type));
        with_scope!(self.ctxt, name, walk.line, closed, {
            self.suite(class.body());
        });
        self.owners.pop();
    }

    // for i in range(3):
    //     qc.h(q[i])
    fn for_stmt(&mut self, for_stmt: &ast::ForStmt, walk: WalkContext) {
        let iterable = for_stmt.iterable();
        let iterated = iterable
            .as_ref()
            .and_then(|expr| self.expr(expr, walk.with_mode(WalkMode::Statement)));
        if let Some(target) = for_stmt.target() {
            let typ = self.loop_target_type(&target, iterable.as_ref(), iterated);
            self.bind_target(&target, typ, walk.line);
        }
        self.suite(for_stmt.body());
        if let Some(else_clause) = for_stmt.else_clause() {
            self.suite(else_clause.body());
        }
    }

    // try:
    //     result = qp.execute(["bell"])
    // except KeyError as err:
    //     print(err)
    fn try_stmt(&mut self, try_stmt: &ast::TryStmt) {
        self.suite(try_stmt.body());
        for handler in try_stmt.except_clauses() {
            let line = self.ctxt.spans.first_line(handler.syntax());
            self.ctxt.symbol_table.seek(line.saturating_sub(1));
            let caught = handler
                .type_expr()
                .and_then(|expr| self.expr(&expr, WalkContext::new(line)));
            if let Some(name) = handler.name().and_then(|n| n.text()) {
                let typ = match caught {
                    Some(class @ SymbolType::Class(_)) => class,
                    _ => SymbolType::any(),
                };
                self.ctxt.define(name, typ, line);
            }
            self.suite(handler.body());
        }
        if let Some(else_clause) = try_stmt.else_clause() {
            self.suite(else_clause.body());
        }
        if let Some(finally) = try_stmt.finally_clause() {
            self.suite(finally.body());
        }
    }

    // [q[i] for i in range(n) if i % 2]
    // The targets are bound in a scope of their own, which ends with the
    // comprehension.
    fn comprehension(&mut self, comp: &ast::Comprehension, walk: WalkContext) -> Option<SymbolType> {
        let nested = walk.with_mode(WalkMode::Statement);
        let resume = self.ctxt.symbol_table.position();
        with_scope!(self.ctxt, "<comprehension>", walk.line, walk.line, {
            for clause in comp.clauses() {
                match clause {
                    ast::CompClause::CompFor(comp_for) => {
                        let iterable = comp_for.iterable();
                        let iterated = iterable.as_ref().and_then(|expr| self.expr(expr, nested));
                        if let Some(target) = comp_for.target() {
                            let typ = self.loop_target_type(&target, iterable.as_ref(), iterated);
                            self.bind_target(&target, typ, walk.line);
                        }
                    }
                    ast::CompClause::CompIf(comp_if) => self.condition(comp_if.condition(), nested),
                }
            }
            for element in comp.elements() {
                self.expr(&element, nested);
            }
        });
        self.ctxt.symbol_table.seek(resume);
        match comp.bracket() {
            Some(SyntaxKind::L_BRACK) => Some(SymbolType::Primitive(PrimitiveKind::List)),
            Some(SyntaxKind::L_CURLY) if comp.is_dict() => {
                Some(SymbolType::Primitive(PrimitiveKind::Dict))
            }
            _ => None,
        }
    }

    // lambda item, n=1: item[n]
    fn lambda(&mut self, lambda: &ast::LambdaExpr, walk: WalkContext) {
        let nested = walk.with_mode(WalkMode::Statement);
        let params: Vec<ast::Param> = lambda
            .param_list()
            .into_iter()
            .flat_map(|list| list.params())
            .collect();
        for default in params.iter().filter_map(|p| p.default_value()?.expr()) {
            self.expr(&default, nested);
        }
        let resume = self.ctxt.symbol_table.position();
        with_scope!(self.ctxt, "<lambda>", walk.line, walk.line, {
            for name in params.iter().filter_map(|p| p.name()?.text()) {
                self.ctxt.define(name, SymbolType::any(), walk.line);
            }
            self.condition(lambda.body(), nested);
        });
        self.ctxt.symbol_table.seek(resume);
    }

    /// Walk `expr`, returning its type if it can be inferred.
    fn expr(&mut self, expr: &Expr, walk: WalkContext) -> Option<SymbolType> {
        let nested = walk.with_mode(WalkMode::Statement);
        match expr {
            Expr::Name(name) => {
                let token = self.ctxt.spans.token(&name.ident_token()?);
                if walk.mode.is_tracked() {
                    self.tracker.variable(token.clone());
                }
                self.ctxt.lookup_symbol(&token)
            }

            Expr::Literal(literal) => literal_type(literal),

            Expr::Power(power) => self.power(power, walk),

            Expr::BinExpr(bin) => {
                let lhs = bin.lhs().and_then(|e| self.expr(&e, nested));
                let rhs = bin.rhs().and_then(|e| self.expr(&e, nested));
                binary_type(bin.op_kind()?, lhs?, rhs?)
            }

            Expr::PrefixExpr(prefix) => {
                let inner = prefix.expr().and_then(|e| self.expr(&e, nested));
                match prefix.op_kind()? {
                    SyntaxKind::NOT_KW => Some(SymbolType::Primitive(PrimitiveKind::Bool)),
                    _ => inner,
                }
            }

            Expr::ParenExpr(paren) => self.expr(&paren.expr()?, walk),

            Expr::ListExpr(list) => {
                for item in list.items() {
                    self.expr(&item, nested);
                }
                Some(SymbolType::Primitive(PrimitiveKind::List))
            }

            Expr::DictExpr(dict) => {
                for item in dict.syntax().children().filter_map(Expr::cast) {
                    self.expr(&item, nested);
                }
                Some(SymbolType::Primitive(PrimitiveKind::Dict))
            }

            Expr::CondExpr(cond) => {
                for item in cond.syntax().children().filter_map(Expr::cast) {
                    self.expr(&item, nested);
                }
                None
            }

            Expr::Testlist(list) => {
                for item in list.items() {
                    self.expr(&item, nested);
                }
                None
            }

            Expr::Comprehension(comp) => self.comprehension(comp, walk),

            Expr::LambdaExpr(lambda) => {
                self.lambda(lambda, walk);
                None
            }

            Expr::YieldExpr(yield_expr) => {
                self.condition(yield_expr.expr(), nested);
                None
            }
        }
    }

    /// An atom and its trailers, left to right. The type of the value so far
    /// and what a call would call are carried from one trailer to the next.
    fn power(&mut self, power: &ast::Power, walk: WalkContext) -> Option<SymbolType> {
        let atom = power.atom()?;
        let trailers: Vec<Trailer> = power.trailers().collect();
        let tracked = walk.mode.is_tracked();

        let (mut current, mut callee) = match &atom {
            Expr::Name(name) => {
                let token = self.ctxt.spans.token(&name.ident_token()?);
                if tracked {
                    self.tracker.variable(token.clone());
                }
                let typ = self.ctxt.lookup_symbol(&token);
                let callee = match &typ {
                    Some(SymbolType::Method(signature)) => Callee::Signature(signature.clone(), token),
                    Some(SymbolType::Class(class)) => Callee::Constructor(class.clone(), token),
                    _ => Callee::Unchecked,
                };
                (typ, callee)
            }
            _ => (
                self.expr(&atom, walk.with_mode(WalkMode::Statement)),
                Callee::Unchecked,
            ),
        };

        for (i, trailer) in trailers.iter().enumerate() {
            match trailer {
                Trailer::Attribute(attr) => {
                    let Some(ident) = attr.name().and_then(|n| n.ident_token()) else {
                        current = None;
                        callee = Callee::Unchecked;
                        continue;
                    };
                    let token = self.ctxt.spans.token(&ident);
                    if tracked {
                        self.tracker.trailing_method(token.clone());
                    }
                    let called = matches!(trailers.get(i + 1), Some(Trailer::ArgList(_)));
                    (current, callee) = self.member(current.as_ref(), token, called);
                }
                Trailer::ArgList(args) => {
                    let arguments = self.arguments(args, walk);
                    if tracked {
                        self.tracker.arguments(arguments.clone());
                    }
                    current = self.call(&callee, &arguments);
                    callee = Callee::Unchecked;
                }
                Trailer::SubscriptList(list) => {
                    for expr in list.subscripts().flat_map(|s| s.exprs()) {
                        self.expr(&expr, walk.with_mode(WalkMode::Statement));
                    }
                    if tracked {
                        self.tracker.indexed();
                    }
                    current = current.and_then(|typ| element_type(&typ, &*self.ctxt.symbol_table));
                    callee = Callee::Unchecked;
                }
            }
        }
        current
    }

    // An unknown method is an error only when it is called. A missing
    // attribute may be a field assigned in `__init__`.
    fn member(
        &mut self,
        receiver: Option<&SymbolType>,
        token: Token,
        called: bool,
    ) -> (Option<SymbolType>, Callee) {
        let Some(receiver) = receiver else {
            return (None, Callee::Unchecked);
        };
        match lookup_member(receiver, token.text(), &*self.ctxt.symbol_table) {
            MemberLookup::Found(returned) => {
                let callee = receiver
                    .as_class()
                    .and_then(|class| class.member(token.text()))
                    .map_or(Callee::Unchecked, |signature| {
                        Callee::Signature(signature.clone(), token)
                    });
                (returned, callee)
            }
            MemberLookup::Missing => {
                if called {
                    let message = format!(
                        "Method {} is not defined for {}",
                        token.text(),
                        receiver.name()
                    );
                    self.ctxt
                        .insert_error(SemanticErrorKind::UnknownMethod, message, &token);
                }
                (None, Callee::Unchecked)
            }
            MemberLookup::Unknown => (None, Callee::Unchecked),
        }
    }

    fn arguments(&mut self, args: &ast::ArgList, walk: WalkContext) -> Vec<Argument> {
        let walk = walk.with_mode(WalkMode::CallArguments);
        args.args()
            .map(|arg| {
                let typ = arg.expr().and_then(|expr| self.expr(&expr, walk));
                let mut argument = Argument::new(typ, self.ctxt.spans.node_token(&arg));
                if let Some(keyword) = arg.keyword().and_then(|k| k.text()) {
                    argument = argument.with_keyword(keyword);
                }
                if arg.is_unpacked() {
                    argument = argument.unpacked();
                }
                argument
            })
            .collect()
    }

    /// Check a call and return the type of its value.
    fn call(&mut self, callee: &Callee, arguments: &[Argument]) -> Option<SymbolType> {
        match callee {
            Callee::Signature(signature, name) => {
                self.check_arguments(signature, name, arguments);
                signature
                    .return_type()
                    .and_then(|ret| self.ctxt.symbol_table.resolve_type(ret))
            }
            Callee::Constructor(class, name) => {
                if let Some(init) = class.constructor() {
                    self.check_arguments(&constructor_signature(class, init), name, arguments);
                }
                Some(SymbolType::Class(class.clone()))
            }
            Callee::Unchecked => {
                trace!("call not checked");
                None
            }
        }
    }

    fn check_arguments(&mut self, signature: &MethodSignature, name: &Token, arguments: &[Argument]) {
        let checker = ArgumentChecker::new(&*self.ctxt.symbol_table);
        checker.check(
            signature,
            &CallSite::new(name, arguments),
            &mut self.ctxt.diagnostics,
        );
    }
}

/// The signature of `__init__` under the name of the class, which is how the
/// call site names it.
fn constructor_signature(class: &ClassType, init: &MethodSignature) -> MethodSignature {
    let mut signature = MethodSignature::new(class.name()).returning(class.name());
    for param in init.params() {
        signature = signature.with_param(param.clone());
    }
    if init.is_variadic() {
        signature = signature.variadic();
    }
    signature
}

fn is_range_call(expr: &Expr) -> bool {
    let Expr::Power(power) = expr else {
        return false;
    };
    let callee = match power.atom() {
        Some(Expr::Name(name)) => name.text(),
        _ => None,
    };
    callee.is_some_and(|name| name == "range")
        && matches!(power.trailers().next(), Some(Trailer::ArgList(_)))
}

fn binary_type(op: SyntaxKind, lhs: SymbolType, rhs: SymbolType) -> Option<SymbolType> {
    use PrimitiveKind::*;
    use SyntaxKind::*;
    if matches!(op, EQ2 | NEQ | L_ANGLE | R_ANGLE | LTEQ | GTEQ | IN_KW | NOT_KW | IS_KW) {
        return Some(SymbolType::Primitive(Bool));
    }
    let (SymbolType::Primitive(lhs), SymbolType::Primitive(rhs)) = (lhs, rhs) else {
        return None;
    };
    let kind = match (lhs, rhs) {
        (Int, Int) if op == SLASH => Float,
        (Int, Int) => Int,
        (Int | Float, Int | Float) => Float,
        (Int | Float | Complex, Int | Float | Complex) => Complex,
        (Str, Str) if op == PLUS => Str,
        (List, List) if op == PLUS => List,
        (Bool, Bool) if matches!(op, AND_KW | OR_KW) => Bool,
        _ => return None,
    };
    Some(SymbolType::Primitive(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> SymbolType {
        SymbolType::Primitive(PrimitiveKind::Int)
    }

    fn float() -> SymbolType {
        SymbolType::Primitive(PrimitiveKind::Float)
    }

    #[test]
    fn arithmetic_widens() {
        assert_eq!(binary_type(SyntaxKind::PLUS, int(), int()), Some(int()));
        assert_eq!(binary_type(SyntaxKind::SLASH, int(), int()), Some(float()));
        assert_eq!(binary_type(SyntaxKind::STAR, int(), float()), Some(float()));
        assert_eq!(
            binary_type(SyntaxKind::L_ANGLE, int(), float()),
            Some(SymbolType::Primitive(PrimitiveKind::Bool))
        );
        let str_type = SymbolType::Primitive(PrimitiveKind::Str);
        assert_eq!(binary_type(SyntaxKind::MINUS, str_type.clone(), str_type), None);
    }

    #[test]
    fn constructor_is_named_after_class() {
        let init = MethodSignature::new("__init__").with_param(crate::types::ParamSpec::new("n", None));
        let class = ClassType::new("Foo").with_member(init.clone());
        let signature = constructor_signature(&class, &init);
        assert_eq!(signature.name(), "Foo");
        assert_eq!(signature.arity(), (1, 1));
    }
}
