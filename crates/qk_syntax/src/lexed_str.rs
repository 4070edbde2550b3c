// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Lexing `&str` into a sequence of syntax tokens.
//!
//! Note that `str` does *not* refer to a string in the target language.
//!
//! This is where the layout of the source becomes explicit: logical line ends
//! are `NEWLINE` tokens, and changes of indentation are zero-width `INDENT` and
//! `DEDENT` tokens. Line breaks inside brackets, blank lines and comment-only
//! lines are demoted to `WHITESPACE`.
//!
//! Note that these tokens, unlike the tokens we feed into the parser, do
//! include info about comments and whitespace.

use std::ops;

use crate::{
    SyntaxKind::{self, *},
    T,
};

/// Width of a tab when measuring indentation.
const TAB_WIDTH: usize = 8;

pub struct LexedStr<'a> {
    text: &'a str,
    kind: Vec<SyntaxKind>,
    start: Vec<u32>,
    error: Vec<LexError>,
}

struct LexError {
    msg: String,
    token: u32,
}

impl<'a> LexedStr<'a> {
    pub fn new(text: &'a str) -> LexedStr<'a> {
        let mut conv = Converter::new(text);

        for token in qk_lexer::tokenize(text) {
            let token_text = &text[conv.offset..][..token.len as usize];
            conv.extend_token(&token.kind, token_text);
        }

        conv.finalize_with_eof()
    }

    pub fn as_str(&self) -> &str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.kind.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self, i: usize) -> SyntaxKind {
        assert!(i <= self.len());
        self.kind[i]
    }

    pub fn text(&self, i: usize) -> &str {
        let r = self.text_range(i);
        &self.text[r]
    }

    // A range corresponding to piece of text.
    pub fn text_range(&self, i: usize) -> ops::Range<usize> {
        assert!(i < self.len());
        let lo = self.start[i] as usize;
        let hi = self.start[i + 1] as usize;
        lo..hi
    }

    pub fn text_start(&self, i: usize) -> usize {
        assert!(i <= self.len());
        self.start[i] as usize
    }

    pub fn error(&self, i: usize) -> Option<&str> {
        assert!(i < self.len());
        let err = self
            .error
            .binary_search_by_key(&(i as u32), |i| i.token)
            .ok()?;
        Some(self.error[err].msg.as_str())
    }

    pub fn errors(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.error
            .iter()
            .map(|it| (it.token as usize, it.msg.as_str()))
    }

    fn push(&mut self, kind: SyntaxKind, offset: usize) {
        self.kind.push(kind);
        self.start.push(offset as u32);
    }
}

struct Converter<'a> {
    res: LexedStr<'a>,
    offset: usize,
    /// Columns of the open indentation levels. Never empty; the bottom is `0`.
    indents: Vec<usize>,
    /// Width of the whitespace seen so far on the current physical line.
    line_indent: usize,
    /// No significant token has been seen yet on the current logical line.
    at_line_start: bool,
    /// Nesting depth of `(`, `[` and `{`. Line breaks inside brackets are insignificant.
    bracket_depth: usize,
}

impl<'a> Converter<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            res: LexedStr {
                text,
                kind: Vec::new(),
                start: Vec::new(),
                error: Vec::new(),
            },
            offset: 0,
            indents: vec![0],
            line_indent: 0,
            at_line_start: true,
            bracket_depth: 0,
        }
    }

    fn finalize_with_eof(mut self) -> LexedStr<'a> {
        // Close the last logical line and any open blocks.
        if !self.at_line_start {
            self.push(NEWLINE, 0, None);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(DEDENT, 0, None);
        }
        self.res.push(EOF, self.offset);
        self.res
    }

    fn push(&mut self, kind: SyntaxKind, len: usize, err: Option<&str>) {
        self.res.push(kind, self.offset);
        self.offset += len;

        if let Some(err) = err {
            let token = self.res.len() as u32;
            let msg = err.to_string();
            self.res.error.push(LexError { msg, token });
        }
    }

    fn extend_token(&mut self, kind: &qk_lexer::TokenKind, token_text: &str) {
        match kind {
            qk_lexer::TokenKind::Whitespace => {
                if self.at_line_start {
                    self.line_indent += indent_width(token_text);
                }
                self.push(WHITESPACE, token_text.len(), None);
                return;
            }
            qk_lexer::TokenKind::LineComment => {
                self.push(COMMENT, token_text.len(), None);
                return;
            }
            qk_lexer::TokenKind::Newline => {
                if self.bracket_depth > 0 || self.at_line_start {
                    self.push(WHITESPACE, token_text.len(), None);
                } else {
                    self.push(NEWLINE, token_text.len(), None);
                }
                if self.bracket_depth == 0 {
                    self.at_line_start = true;
                }
                self.line_indent = 0;
                return;
            }
            _ => (),
        }

        if self.at_line_start {
            self.at_line_start = false;
            self.emit_indentation();
        }

        let (err, syntax_kind) = inner_extend_token(kind, token_text);
        match syntax_kind {
            T!['('] | T!['['] | T!['{'] => self.bracket_depth += 1,
            T![')'] | T![']'] | T!['}'] => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1)
            }
            _ => (),
        }
        let err = if err.is_empty() { None } else { Some(err) };
        self.push(syntax_kind, token_text.len(), err);
    }

    /// Compare the indentation of the line that is starting with the open blocks,
    /// and push zero-width `INDENT` or `DEDENT` tokens accordingly.
    fn emit_indentation(&mut self) {
        let current = *self.indents.last().unwrap_or(&0);
        if self.line_indent > current {
            self.indents.push(self.line_indent);
            self.push(INDENT, 0, None);
            return;
        }
        while self.line_indent < *self.indents.last().unwrap_or(&0) {
            self.indents.pop();
            self.push(DEDENT, 0, None);
        }
        if self.line_indent != *self.indents.last().unwrap_or(&0) {
            // Treat the line as opening a new block so that the parser reports it.
            self.indents.push(self.line_indent);
            self.push(
                INDENT,
                0,
                Some("unindent does not match any outer indentation level"),
            );
        }
    }
}

fn indent_width(whitespace: &str) -> usize {
    whitespace.chars().fold(0, |width, c| match c {
        '\t' => (width / TAB_WIDTH + 1) * TAB_WIDTH,
        _ => width + 1,
    })
}

fn literal_kind(kind: &qk_lexer::LiteralKind) -> (&'static str, SyntaxKind) {
    let mut err = "";
    let syntax_kind = match *kind {
        qk_lexer::LiteralKind::Int { empty_int, base: _ } => {
            if empty_int {
                err = "Missing digits after the integer base prefix";
            }
            INT_NUMBER
        }
        qk_lexer::LiteralKind::Float { empty_exponent } => {
            if empty_exponent {
                err = "Missing digits after the exponent symbol";
            }
            FLOAT_NUMBER
        }
        qk_lexer::LiteralKind::Imaginary => IMAG_NUMBER,
        qk_lexer::LiteralKind::Str { terminated, triple } => {
            if !terminated {
                err = if triple {
                    "Missing trailing quotes to terminate the triple-quoted string literal"
                } else {
                    "Missing trailing quote to terminate the string literal"
                };
            }
            STRING
        }
    };
    (err, syntax_kind)
}

fn inner_extend_token(kind: &qk_lexer::TokenKind, token_text: &str) -> (&'static str, SyntaxKind) {
    let mut err = "";

    let syntax_kind = match kind {
        // Handled by the caller, which tracks layout.
        qk_lexer::TokenKind::LineComment => COMMENT,
        qk_lexer::TokenKind::Whitespace => WHITESPACE,
        qk_lexer::TokenKind::Newline => NEWLINE,

        // If it looks like an identifer, look first if it is a keyword.
        qk_lexer::TokenKind::Ident => SyntaxKind::from_keyword(token_text).unwrap_or(IDENT),

        qk_lexer::TokenKind::Literal { kind } => return literal_kind(kind),

        qk_lexer::TokenKind::Semi => T![;],
        qk_lexer::TokenKind::Comma => T![,],
        qk_lexer::TokenKind::Dot => T![.],
        qk_lexer::TokenKind::OpenParen => T!['('],
        qk_lexer::TokenKind::CloseParen => T![')'],
        qk_lexer::TokenKind::OpenBrace => T!['{'],
        qk_lexer::TokenKind::CloseBrace => T!['}'],
        qk_lexer::TokenKind::OpenBracket => T!['['],
        qk_lexer::TokenKind::CloseBracket => T![']'],
        qk_lexer::TokenKind::At => T![@],
        qk_lexer::TokenKind::Tilde => T![~],
        qk_lexer::TokenKind::Colon => T![:],
        qk_lexer::TokenKind::Eq => T![=],
        qk_lexer::TokenKind::Bang => T![!],
        qk_lexer::TokenKind::Lt => T![<],
        qk_lexer::TokenKind::Gt => T![>],
        qk_lexer::TokenKind::Minus => T![-],
        qk_lexer::TokenKind::And => T![&],
        qk_lexer::TokenKind::Or => T![|],
        qk_lexer::TokenKind::Plus => T![+],
        qk_lexer::TokenKind::Star => T![*],
        qk_lexer::TokenKind::Slash => T![/],
        qk_lexer::TokenKind::Caret => T![^],
        qk_lexer::TokenKind::Percent => T![%],
        qk_lexer::TokenKind::Arrow => T![->],
        qk_lexer::TokenKind::DoubleStar => T![**],
        qk_lexer::TokenKind::DoubleSlash => SLASH2,
        qk_lexer::TokenKind::EqEq => T![==],
        qk_lexer::TokenKind::NotEq => T![!=],
        qk_lexer::TokenKind::LtEq => T![<=],
        qk_lexer::TokenKind::GtEq => T![>=],
        qk_lexer::TokenKind::ShiftLeft => T![<<],
        qk_lexer::TokenKind::ShiftRight => T![>>],
        qk_lexer::TokenKind::AugAssign => AUG_ASSIGN,
        qk_lexer::TokenKind::Unknown => {
            err = "Unknown character";
            ERROR
        }
        qk_lexer::TokenKind::Eof => EOF,
    };
    (err, syntax_kind)
}
