// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Defines [`SyntaxKind`] -- a fieldless enum of all possible syntactic
//! constructs of the Python subset accepted for Qiskit scripts.
//!
//! The kind of every node is decided here, once, by the parser. Consumers
//! match on `SyntaxKind` rather than inspecting token text.

#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u16)]
pub enum SyntaxKind {
    #[doc(hidden)]
    TOMBSTONE,
    #[doc(hidden)]
    EOF,
    SEMICOLON,
    COMMA,
    DOT,
    L_PAREN,
    R_PAREN,
    L_CURLY,
    R_CURLY,
    L_BRACK,
    R_BRACK,
    AT,
    TILDE,
    COLON,
    EQ,
    BANG,
    L_ANGLE,
    R_ANGLE,
    MINUS,
    AMP,
    PIPE,
    PLUS,
    STAR,
    SLASH,
    CARET,
    PERCENT,
    THIN_ARROW,
    STAR2,
    SLASH2,
    EQ2,
    NEQ,
    LTEQ,
    GTEQ,
    SHL,
    SHR,
    AUG_ASSIGN,
    // keywords
    AND_KW,
    AS_KW,
    ASSERT_KW,
    BREAK_KW,
    CLASS_KW,
    CONTINUE_KW,
    DEF_KW,
    DEL_KW,
    ELIF_KW,
    ELSE_KW,
    EXCEPT_KW,
    FALSE_KW,
    FINALLY_KW,
    FOR_KW,
    FROM_KW,
    GLOBAL_KW,
    IF_KW,
    IMPORT_KW,
    IN_KW,
    IS_KW,
    LAMBDA_KW,
    NONE_KW,
    NONLOCAL_KW,
    NOT_KW,
    OR_KW,
    PASS_KW,
    RAISE_KW,
    RETURN_KW,
    TRUE_KW,
    TRY_KW,
    WHILE_KW,
    WITH_KW,
    YIELD_KW,
    // literals and other tokens
    INT_NUMBER,
    FLOAT_NUMBER,
    IMAG_NUMBER,
    STRING,
    IDENT,
    WHITESPACE,
    COMMENT,
    NEWLINE,
    INDENT,
    DEDENT,
    ERROR,
    // nodes
    SOURCE_FILE,
    EXPR_STMT,
    TYPE_ANNOTATION,
    PASS_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    RETURN_STMT,
    IMPORT_STMT,
    FROM_IMPORT_STMT,
    IMPORT_ALIAS,
    DOTTED_NAME,
    FUNC_DEF,
    PARAM_LIST,
    PARAM,
    DEFAULT_VALUE,
    RET_TYPE,
    CLASS_DEF,
    SUITE,
    IF_STMT,
    ELIF_CLAUSE,
    ELSE_CLAUSE,
    WHILE_STMT,
    FOR_STMT,
    WITH_STMT,
    WITH_ITEM,
    TRY_STMT,
    EXCEPT_CLAUSE,
    FINALLY_CLAUSE,
    RAISE_STMT,
    ASSERT_STMT,
    DEL_STMT,
    GLOBAL_STMT,
    DECORATOR,
    TESTLIST,
    COND_EXPR,
    LAMBDA_EXPR,
    YIELD_EXPR,
    BIN_EXPR,
    PREFIX_EXPR,
    POWER,
    NAME,
    LITERAL,
    PAREN_EXPR,
    LIST_EXPR,
    DICT_EXPR,
    COMPREHENSION,
    COMP_FOR,
    COMP_IF,
    ARG_LIST,
    ARGUMENT,
    SUBSCRIPT_LIST,
    SUBSCRIPT,
    ATTRIBUTE,
    #[doc(hidden)]
    __LAST,
}

use self::SyntaxKind::*;

impl From<u16> for SyntaxKind {
    #[inline]
    fn from(d: u16) -> SyntaxKind {
        assert!(d <= (SyntaxKind::__LAST as u16));
        unsafe { std::mem::transmute::<u16, SyntaxKind>(d) }
    }
}

impl From<SyntaxKind> for u16 {
    #[inline]
    fn from(k: SyntaxKind) -> u16 {
        k as u16
    }
}

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | COMMENT)
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            AND_KW
                | AS_KW
                | ASSERT_KW
                | BREAK_KW
                | CLASS_KW
                | CONTINUE_KW
                | DEF_KW
                | DEL_KW
                | ELIF_KW
                | ELSE_KW
                | EXCEPT_KW
                | FALSE_KW
                | FINALLY_KW
                | FOR_KW
                | FROM_KW
                | GLOBAL_KW
                | IF_KW
                | IMPORT_KW
                | IN_KW
                | IS_KW
                | LAMBDA_KW
                | NONE_KW
                | NONLOCAL_KW
                | NOT_KW
                | OR_KW
                | PASS_KW
                | RAISE_KW
                | RETURN_KW
                | TRUE_KW
                | TRY_KW
                | WHILE_KW
                | WITH_KW
                | YIELD_KW
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            INT_NUMBER | FLOAT_NUMBER | IMAG_NUMBER | STRING | TRUE_KW | FALSE_KW | NONE_KW
        )
    }

    /// Statements that introduce a suite, and therefore end without a `NEWLINE` of their own.
    pub fn is_compound_stmt(self) -> bool {
        matches!(
            self,
            FUNC_DEF | CLASS_DEF | IF_STMT | WHILE_STMT | FOR_STMT | WITH_STMT | TRY_STMT
        )
    }

    /// Nodes that the parser produces for a whole statement.
    pub fn is_stmt(self) -> bool {
        self.is_compound_stmt()
            || matches!(
                self,
                EXPR_STMT
                    | PASS_STMT
                    | BREAK_STMT
                    | CONTINUE_STMT
                    | RETURN_STMT
                    | IMPORT_STMT
                    | FROM_IMPORT_STMT
                    | RAISE_STMT
                    | ASSERT_STMT
                    | DEL_STMT
                    | GLOBAL_STMT
            )
    }

    /// Nodes that can follow an atom: a call, a subscript, or an attribute access.
    pub fn is_trailer(self) -> bool {
        matches!(self, ARG_LIST | SUBSCRIPT_LIST | ATTRIBUTE)
    }

    pub fn from_keyword(ident: &str) -> Option<SyntaxKind> {
        let kw = match ident {
            "and" => AND_KW,
            "as" => AS_KW,
            "assert" => ASSERT_KW,
            "break" => BREAK_KW,
            "class" => CLASS_KW,
            "continue" => CONTINUE_KW,
            "def" => DEF_KW,
            "del" => DEL_KW,
            "elif" => ELIF_KW,
            "else" => ELSE_KW,
            "except" => EXCEPT_KW,
            "False" => FALSE_KW,
            "finally" => FINALLY_KW,
            "for" => FOR_KW,
            "from" => FROM_KW,
            "global" => GLOBAL_KW,
            "if" => IF_KW,
            "import" => IMPORT_KW,
            "in" => IN_KW,
            "is" => IS_KW,
            "lambda" => LAMBDA_KW,
            "None" => NONE_KW,
            "nonlocal" => NONLOCAL_KW,
            "not" => NOT_KW,
            "or" => OR_KW,
            "pass" => PASS_KW,
            "raise" => RAISE_KW,
            "return" => RETURN_KW,
            "True" => TRUE_KW,
            "try" => TRY_KW,
            "while" => WHILE_KW,
            "with" => WITH_KW,
            "yield" => YIELD_KW,
            _ => return None,
        };
        Some(kw)
    }
}

/// Shorthand for the `SyntaxKind` of punctuation and keywords.
/// `//` can not be written inside a macro pattern; use `SLASH2`.
#[macro_export]
macro_rules! T {
    [;] => { $crate::SyntaxKind::SEMICOLON };
    [,] => { $crate::SyntaxKind::COMMA };
    [.] => { $crate::SyntaxKind::DOT };
    ['('] => { $crate::SyntaxKind::L_PAREN };
    [')'] => { $crate::SyntaxKind::R_PAREN };
    ['{'] => { $crate::SyntaxKind::L_CURLY };
    ['}'] => { $crate::SyntaxKind::R_CURLY };
    ['['] => { $crate::SyntaxKind::L_BRACK };
    [']'] => { $crate::SyntaxKind::R_BRACK };
    [@] => { $crate::SyntaxKind::AT };
    [~] => { $crate::SyntaxKind::TILDE };
    [:] => { $crate::SyntaxKind::COLON };
    [=] => { $crate::SyntaxKind::EQ };
    [!] => { $crate::SyntaxKind::BANG };
    [<] => { $crate::SyntaxKind::L_ANGLE };
    [>] => { $crate::SyntaxKind::R_ANGLE };
    [-] => { $crate::SyntaxKind::MINUS };
    [&] => { $crate::SyntaxKind::AMP };
    [|] => { $crate::SyntaxKind::PIPE };
    [+] => { $crate::SyntaxKind::PLUS };
    [*] => { $crate::SyntaxKind::STAR };
    [/] => { $crate::SyntaxKind::SLASH };
    [^] => { $crate::SyntaxKind::CARET };
    [%] => { $crate::SyntaxKind::PERCENT };
    [->] => { $crate::SyntaxKind::THIN_ARROW };
    [**] => { $crate::SyntaxKind::STAR2 };
    [==] => { $crate::SyntaxKind::EQ2 };
    [!=] => { $crate::SyntaxKind::NEQ };
    [<=] => { $crate::SyntaxKind::LTEQ };
    [>=] => { $crate::SyntaxKind::GTEQ };
    [<<] => { $crate::SyntaxKind::SHL };
    [>>] => { $crate::SyntaxKind::SHR };
    [and] => { $crate::SyntaxKind::AND_KW };
    [as] => { $crate::SyntaxKind::AS_KW };
    [assert] => { $crate::SyntaxKind::ASSERT_KW };
    [break] => { $crate::SyntaxKind::BREAK_KW };
    [class] => { $crate::SyntaxKind::CLASS_KW };
    [continue] => { $crate::SyntaxKind::CONTINUE_KW };
    [def] => { $crate::SyntaxKind::DEF_KW };
    [del] => { $crate::SyntaxKind::DEL_KW };
    [elif] => { $crate::SyntaxKind::ELIF_KW };
    [else] => { $crate::SyntaxKind::ELSE_KW };
    [except] => { $crate::SyntaxKind::EXCEPT_KW };
    [False] => { $crate::SyntaxKind::FALSE_KW };
    [finally] => { $crate::SyntaxKind::FINALLY_KW };
    [for] => { $crate::SyntaxKind::FOR_KW };
    [from] => { $crate::SyntaxKind::FROM_KW };
    [global] => { $crate::SyntaxKind::GLOBAL_KW };
    [if] => { $crate::SyntaxKind::IF_KW };
    [import] => { $crate::SyntaxKind::IMPORT_KW };
    [in] => { $crate::SyntaxKind::IN_KW };
    [is] => { $crate::SyntaxKind::IS_KW };
    [lambda] => { $crate::SyntaxKind::LAMBDA_KW };
    [None] => { $crate::SyntaxKind::NONE_KW };
    [nonlocal] => { $crate::SyntaxKind::NONLOCAL_KW };
    [not] => { $crate::SyntaxKind::NOT_KW };
    [or] => { $crate::SyntaxKind::OR_KW };
    [pass] => { $crate::SyntaxKind::PASS_KW };
    [raise] => { $crate::SyntaxKind::RAISE_KW };
    [return] => { $crate::SyntaxKind::RETURN_KW };
    [True] => { $crate::SyntaxKind::TRUE_KW };
    [try] => { $crate::SyntaxKind::TRY_KW };
    [while] => { $crate::SyntaxKind::WHILE_KW };
    [with] => { $crate::SyntaxKind::WITH_KW };
    [yield] => { $crate::SyntaxKind::YIELD_KW };
}
