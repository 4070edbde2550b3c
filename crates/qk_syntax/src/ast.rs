// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree, layered on top of untyped `SyntaxNode`s

use std::marker::PhantomData;

use smol_str::SmolStr;

use crate::{
    SyntaxKind::{self, *},
    SyntaxNode, SyntaxNodeChildren, SyntaxToken, T,
};

// NOTE! "typed ast" here does not mean annotated with types in the target language.
// It means that rather than encoding syntactic elements with enum variants, they
// are encoded via types, i.e. `struct`s.
/// The main trait to go from untyped `SyntaxNode` to a typed ast. The
/// conversion itself has zero runtime cost: ast and syntax nodes have exactly
/// the same representation: a pointer to the tree root and a pointer to the
/// node itself.
pub trait AstNode {
    fn can_cast(kind: SyntaxKind) -> bool
    where
        Self: Sized;

    fn cast(syntax: SyntaxNode) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxNode;

    /// Source text of the node, trivia included.
    fn source_text(&self) -> String {
        self.syntax().text().to_string()
    }
}

/// An iterator over `SyntaxNode` children of a particular AST type.
#[derive(Debug, Clone)]
pub struct AstChildren<N> {
    inner: SyntaxNodeChildren,
    ph: PhantomData<N>,
}

impl<N> AstChildren<N> {
    fn new(parent: &SyntaxNode) -> Self {
        AstChildren {
            inner: parent.children(),
            ph: PhantomData,
        }
    }
}

impl<N: AstNode> Iterator for AstChildren<N> {
    type Item = N;
    fn next(&mut self) -> Option<N> {
        self.inner.find_map(N::cast)
    }
}

mod support {
    use super::{AstChildren, AstNode, SyntaxKind, SyntaxNode, SyntaxToken};

    pub(super) fn child<N: AstNode>(parent: &SyntaxNode) -> Option<N> {
        parent.children().find_map(N::cast)
    }

    pub(super) fn children<N: AstNode>(parent: &SyntaxNode) -> AstChildren<N> {
        AstChildren::new(parent)
    }

    pub(super) fn token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        parent
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| it.kind() == kind)
    }
}

macro_rules! ast_nodes {
    ($($name:ident => $kind:ident),* $(,)?) => {$(
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == $kind
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                if Self::can_cast(syntax.kind()) {
                    Some(Self { syntax })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    )*};
}

macro_rules! ast_enum {
    ($(#[$attr:meta])* $name:ident { $($variant:ident),* $(,)? }) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant($variant),)*
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                $($variant::can_cast(kind))||*
            }

            fn cast(syntax: SyntaxNode) -> Option<Self> {
                let kind = syntax.kind();
                $(
                    if $variant::can_cast(kind) {
                        return Some($name::$variant($variant { syntax }));
                    }
                )*
                None
            }

            fn syntax(&self) -> &SyntaxNode {
                match self {
                    $($name::$variant(it) => &it.syntax,)*
                }
            }
        }
    };
}

ast_nodes! {
    SourceFile => SOURCE_FILE,
    ExprStmt => EXPR_STMT,
    PassStmt => PASS_STMT,
    BreakStmt => BREAK_STMT,
    ContinueStmt => CONTINUE_STMT,
    ReturnStmt => RETURN_STMT,
    ImportStmt => IMPORT_STMT,
    FromImportStmt => FROM_IMPORT_STMT,
    ImportAlias => IMPORT_ALIAS,
    DottedName => DOTTED_NAME,
    FuncDef => FUNC_DEF,
    ParamList => PARAM_LIST,
    Param => PARAM,
    TypeAnnotation => TYPE_ANNOTATION,
    DefaultValue => DEFAULT_VALUE,
    RetType => RET_TYPE,
    ClassDef => CLASS_DEF,
    Suite => SUITE,
    IfStmt => IF_STMT,
    ElifClause => ELIF_CLAUSE,
    ElseClause => ELSE_CLAUSE,
    WhileStmt => WHILE_STMT,
    ForStmt => FOR_STMT,
    WithStmt => WITH_STMT,
    WithItem => WITH_ITEM,
    TryStmt => TRY_STMT,
    ExceptClause => EXCEPT_CLAUSE,
    FinallyClause => FINALLY_CLAUSE,
    RaiseStmt => RAISE_STMT,
    AssertStmt => ASSERT_STMT,
    DelStmt => DEL_STMT,
    GlobalStmt => GLOBAL_STMT,
    Decorator => DECORATOR,
    Testlist => TESTLIST,
    CondExpr => COND_EXPR,
    LambdaExpr => LAMBDA_EXPR,
    YieldExpr => YIELD_EXPR,
    BinExpr => BIN_EXPR,
    PrefixExpr => PREFIX_EXPR,
    Power => POWER,
    Name => NAME,
    Literal => LITERAL,
    ParenExpr => PAREN_EXPR,
    ListExpr => LIST_EXPR,
    DictExpr => DICT_EXPR,
    Comprehension => COMPREHENSION,
    CompFor => COMP_FOR,
    CompIf => COMP_IF,
    ArgList => ARG_LIST,
    Argument => ARGUMENT,
    SubscriptList => SUBSCRIPT_LIST,
    Subscript => SUBSCRIPT,
    Attribute => ATTRIBUTE,
}

ast_enum! {
    /// A statement. Statements that failed to parse are `ERROR` nodes and
    /// do not cast to `Stmt`.
    Stmt {
        ExprStmt,
        PassStmt,
        BreakStmt,
        ContinueStmt,
        ReturnStmt,
        ImportStmt,
        FromImportStmt,
        FuncDef,
        ClassDef,
        IfStmt,
        WhileStmt,
        ForStmt,
        WithStmt,
        TryStmt,
        RaiseStmt,
        AssertStmt,
        DelStmt,
        GlobalStmt,
    }
}

ast_enum! {
    Expr {
        Name,
        Literal,
        Power,
        BinExpr,
        PrefixExpr,
        ParenExpr,
        ListExpr,
        DictExpr,
        CondExpr,
        Testlist,
        LambdaExpr,
        YieldExpr,
        Comprehension,
    }
}

ast_enum! {
    /// A `for` or `if` clause of a comprehension.
    CompClause {
        CompFor,
        CompIf,
    }
}

ast_enum! {
    /// A suffix applied to an atom: a call, a subscript or an attribute access.
    Trailer {
        ArgList,
        SubscriptList,
        Attribute,
    }
}

impl Stmt {
    /// `true` for statements that own a suite.
    pub fn is_compound(&self) -> bool {
        self.syntax().kind().is_compound_stmt()
    }
}

impl SourceFile {
    pub fn statements(&self) -> AstChildren<Stmt> {
        support::children(&self.syntax)
    }
}

impl Suite {
    pub fn statements(&self) -> AstChildren<Stmt> {
        support::children(&self.syntax)
    }
}

impl ExprStmt {
    /// The expressions of the statement, left to right. For an assignment
    /// these are the targets followed by the assigned value.
    pub fn exprs(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }

    /// `true` if the statement contains a plain `=`.
    pub fn is_assignment(&self) -> bool {
        support::token(&self.syntax, T![=]).is_some()
    }

    pub fn is_aug_assignment(&self) -> bool {
        support::token(&self.syntax, AUG_ASSIGN).is_some()
    }

    pub fn annotation(&self) -> Option<TypeAnnotation> {
        support::child(&self.syntax)
    }
}

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ImportStmt {
    pub fn aliases(&self) -> AstChildren<ImportAlias> {
        support::children(&self.syntax)
    }
}

impl FromImportStmt {
    pub fn module(&self) -> Option<DottedName> {
        support::child(&self.syntax)
    }

    pub fn aliases(&self) -> AstChildren<ImportAlias> {
        support::children(&self.syntax)
    }

    /// `from m import *`
    pub fn is_glob(&self) -> bool {
        support::token(&self.syntax, T![*]).is_some()
    }
}

impl ImportAlias {
    pub fn dotted_name(&self) -> Option<DottedName> {
        support::child(&self.syntax)
    }

    /// The name after `as`, if any.
    pub fn alias(&self) -> Option<Name> {
        let names: Vec<Name> = support::children(&self.syntax).collect();
        let has_as = support::token(&self.syntax, T![as]).is_some();
        if has_as {
            names.last().cloned()
        } else {
            None
        }
    }

    /// The name that the import binds in the importing scope.
    pub fn bound_name(&self) -> Option<SmolStr> {
        if let Some(alias) = self.alias() {
            return alias.text();
        }
        match self.dotted_name() {
            // `import a.b` binds `a`
            Some(dotted) => dotted.names().next().and_then(|n| n.text()),
            None => support::child::<Name>(&self.syntax).and_then(|n| n.text()),
        }
    }

    /// The name that is looked up in the imported module.
    pub fn imported_name(&self) -> Option<SmolStr> {
        match self.dotted_name() {
            Some(dotted) => Some(dotted.text()),
            None => support::child::<Name>(&self.syntax).and_then(|n| n.text()),
        }
    }
}

impl DottedName {
    pub fn names(&self) -> AstChildren<Name> {
        support::children(&self.syntax)
    }

    /// The components joined with `.`, without trivia.
    pub fn text(&self) -> SmolStr {
        let parts: Vec<SmolStr> = self.names().filter_map(|n| n.text()).collect();
        SmolStr::new(parts.join("."))
    }
}

impl FuncDef {
    pub fn decorators(&self) -> AstChildren<Decorator> {
        support::children(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        support::child(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        support::child(&self.syntax)
    }

    pub fn ret_type(&self) -> Option<RetType> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }
}

impl ParamList {
    pub fn params(&self) -> AstChildren<Param> {
        support::children(&self.syntax)
    }
}

impl Param {
    pub fn name(&self) -> Option<Name> {
        support::child(&self.syntax)
    }

    pub fn annotation(&self) -> Option<TypeAnnotation> {
        support::child(&self.syntax)
    }

    pub fn default_value(&self) -> Option<DefaultValue> {
        support::child(&self.syntax)
    }

    /// `*args` or `**kwargs`
    pub fn is_variadic(&self) -> bool {
        support::token(&self.syntax, T![*]).is_some()
            || support::token(&self.syntax, T![**]).is_some()
    }
}

impl TypeAnnotation {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl DefaultValue {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl RetType {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ClassDef {
    pub fn decorators(&self) -> AstChildren<Decorator> {
        support::children(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        support::child(&self.syntax)
    }

    pub fn bases(&self) -> Option<ArgList> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }
}

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }

    pub fn elif_clauses(&self) -> AstChildren<ElifClause> {
        support::children(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        support::child(&self.syntax)
    }
}

impl ElifClause {
    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }
}

impl ElseClause {
    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }
}

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        support::child(&self.syntax)
    }
}

impl ForStmt {
    /// The loop variable(s), before `in`.
    pub fn target(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    /// The expression after `in`.
    pub fn iterable(&self) -> Option<Expr> {
        support::children(&self.syntax).nth(1)
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        support::child(&self.syntax)
    }
}

impl WithStmt {
    pub fn items(&self) -> AstChildren<WithItem> {
        support::children(&self.syntax)
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }
}

impl WithItem {
    /// The context manager.
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    /// The target after `as`, if any.
    pub fn target(&self) -> Option<Expr> {
        support::token(&self.syntax, T![as])?;
        support::children(&self.syntax).nth(1)
    }
}

impl TryStmt {
    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }

    pub fn except_clauses(&self) -> AstChildren<ExceptClause> {
        support::children(&self.syntax)
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        support::child(&self.syntax)
    }

    pub fn finally_clause(&self) -> Option<FinallyClause> {
        support::child(&self.syntax)
    }
}

impl ExceptClause {
    /// The exception type, or `None` for a bare `except:`.
    pub fn type_expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    /// The name after `as`, if any.
    pub fn name(&self) -> Option<Name> {
        support::token(&self.syntax, T![as])?;
        support::children(&self.syntax).last()
    }

    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }
}

impl FinallyClause {
    pub fn body(&self) -> Option<Suite> {
        support::child(&self.syntax)
    }
}

impl RaiseStmt {
    /// The exception, then the cause after `from`.
    pub fn exprs(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
}

impl AssertStmt {
    /// The condition, then the message.
    pub fn exprs(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
}

impl DelStmt {
    pub fn target(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl GlobalStmt {
    pub fn names(&self) -> AstChildren<Name> {
        support::children(&self.syntax)
    }

    pub fn is_nonlocal(&self) -> bool {
        support::token(&self.syntax, T![nonlocal]).is_some()
    }
}

impl Decorator {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl Testlist {
    pub fn items(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
}

impl CondExpr {
    /// The value if the condition holds.
    pub fn then_expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl LambdaExpr {
    pub fn param_list(&self) -> Option<ParamList> {
        support::child(&self.syntax)
    }

    pub fn body(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl YieldExpr {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl BinExpr {
    pub fn lhs(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn rhs(&self) -> Option<Expr> {
        support::children(&self.syntax).nth(1)
    }

    /// The first operator token. `not in` and `is not` are reported by
    /// their first keyword.
    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .map(|it| it.kind())
            .find(|kind| !kind.is_trivia())
    }
}

impl PrefixExpr {
    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .map(|it| it.kind())
            .find(|kind| !kind.is_trivia())
    }

    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl Power {
    /// The expression that the trailers apply to.
    pub fn atom(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    pub fn trailers(&self) -> AstChildren<Trailer> {
        support::children(&self.syntax)
    }
}

impl Name {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, IDENT)
    }

    pub fn text(&self) -> Option<SmolStr> {
        self.ident_token().map(|t| SmolStr::new(t.text()))
    }
}

impl Literal {
    /// The first token of the literal. Adjacent strings are several tokens.
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| !it.kind().is_trivia())
    }

    pub fn kind(&self) -> Option<SyntaxKind> {
        self.token().map(|t| t.kind())
    }

    pub fn string_tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|it| it.kind() == STRING)
    }
}

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ListExpr {
    pub fn items(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
}

impl Comprehension {
    /// The element, or the key and value of a dict comprehension.
    pub fn elements(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }

    pub fn clauses(&self) -> AstChildren<CompClause> {
        support::children(&self.syntax)
    }

    /// The opening bracket. A generator passed as the only argument of a
    /// call has none.
    pub fn bracket(&self) -> Option<SyntaxKind> {
        [T!['['], T!['{'], T!['(']]
            .into_iter()
            .find(|kind| support::token(&self.syntax, *kind).is_some())
    }

    /// `{k: v for ...}`
    pub fn is_dict(&self) -> bool {
        support::token(&self.syntax, T![:]).is_some()
    }
}

impl CompFor {
    pub fn target(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }

    /// The expression after `in`.
    pub fn iterable(&self) -> Option<Expr> {
        support::children(&self.syntax).nth(1)
    }
}

impl CompIf {
    pub fn condition(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ArgList {
    pub fn args(&self) -> AstChildren<Argument> {
        support::children(&self.syntax)
    }
}

impl Argument {
    /// For a keyword argument `name=value`, the name.
    pub fn keyword(&self) -> Option<Name> {
        support::token(&self.syntax, T![=])?;
        support::child(&self.syntax)
    }

    /// `*args` or `**kwargs`
    pub fn is_unpacked(&self) -> bool {
        support::token(&self.syntax, T![*]).is_some()
            || support::token(&self.syntax, T![**]).is_some()
    }

    /// The argument value.
    pub fn expr(&self) -> Option<Expr> {
        support::children(&self.syntax).last()
    }
}

impl SubscriptList {
    pub fn subscripts(&self) -> AstChildren<Subscript> {
        support::children(&self.syntax)
    }
}

impl Subscript {
    /// The index, or the bounds and step of a slice.
    pub fn exprs(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
}

impl Attribute {
    pub fn name(&self) -> Option<Name> {
        support::child(&self.syntax)
    }
}

#[test]
fn assert_ast_is_object_safe() {
    fn _f(_: &dyn AstNode) {}
}
