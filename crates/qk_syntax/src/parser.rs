// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! The recursive descent parser API used by the grammar.
//!
//! The parser writes straight into a rowan `GreenNodeBuilder`. A [`Marker`]
//! remembers a builder checkpoint; completing it wraps everything emitted since
//! the checkpoint in a node of the given kind. [`CompletedMarker::precede`]
//! reuses the checkpoint, so a node can be wrapped in a parent after the fact,
//! which is how left-associative binary expressions and trailers are built.
//!
//! Trivia (whitespace and comments) is not seen by the grammar. It is flushed
//! into the tree just before the next significant token, and just before a
//! checkpoint is taken, so nodes never start with trivia.

use drop_bomb::DropBomb;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use crate::{
    LexedStr,
    SyntaxError,
    SyntaxKind::{self, EOF, ERROR, NEWLINE},
    TokenSet,
};

pub(crate) struct Parser<'t> {
    lexed: &'t LexedStr<'t>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(lexed: &'t LexedStr<'t>) -> Parser<'t> {
        Parser {
            lexed,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    /// Open the root node. Unlike [`Parser::start`], leading trivia is
    /// placed inside the node, because there is nothing outside the root.
    pub(crate) fn start_root(&mut self, kind: SyntaxKind) {
        self.builder.start_node(raw(kind));
    }

    /// Close the root node, including any trivia that follows the last token,
    /// and hand back the tree together with parse and lexing errors.
    pub(crate) fn finish(mut self) -> (GreenNode, Vec<SyntaxError>) {
        self.flush_trivia();
        while self.pos < self.lexed.len() {
            self.push_token();
        }
        self.builder.finish_node();

        let mut errors = self.errors;
        for (i, msg) in self.lexed.errors() {
            errors.push(SyntaxError::new(msg, range_of(self.lexed, i)));
        }
        errors.sort_by_key(|err| err.range().start());
        (self.builder.finish(), errors)
    }

    /// Returns the kind of the current token.
    /// If parser has already reached the end of input,
    /// the special `EOF` kind is returned.
    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Lookahead operation: returns the kind of the next nth
    /// significant token.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.lexed.kind(self.nth_index(n))
    }

    /// Checks if the current token is `kind`.
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.nth_at(0, kind)
    }

    pub(crate) fn nth_at(&self, n: usize, kind: SyntaxKind) -> bool {
        self.nth(n) == kind
    }

    /// Checks if the current token is in `kinds`.
    pub(crate) fn at_ts(&self, kinds: TokenSet) -> bool {
        kinds.contains(self.current())
    }

    /// Source text of the current token. Empty at the end of input.
    pub(crate) fn current_text(&self) -> &str {
        let i = self.nth_index(0);
        if i < self.lexed.len() {
            self.lexed.text(i)
        } else {
            ""
        }
    }

    /// Consume the next token if `kind` matches.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if !self.at(kind) {
            return false;
        }
        self.do_bump();
        true
    }

    /// Starts a new node in the syntax tree. All nodes and tokens
    /// consumed between the `start` and the corresponding `Marker::complete`
    /// belong to the same node.
    pub(crate) fn start(&mut self) -> Marker {
        self.flush_trivia();
        Marker::new(self.builder.checkpoint())
    }

    /// Consume the next token. Panics if the parser isn't currently at `kind`.
    pub(crate) fn bump(&mut self, kind: SyntaxKind) {
        assert!(self.eat(kind));
    }

    /// Advances the parser by one token
    pub(crate) fn bump_any(&mut self) {
        if self.at(EOF) {
            return;
        }
        self.do_bump();
    }

    /// Emit error with the `message`, located at the current token.
    pub(crate) fn error<T: Into<String>>(&mut self, message: T) {
        let i = self.nth_index(0);
        let range = if i < self.lexed.len() {
            range_of(self.lexed, i)
        } else {
            TextRange::empty(offset(self.lexed.text_start(i)))
        };
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Number of parse errors reported so far. Used to tell whether a
    /// statement parsed cleanly.
    pub(crate) fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Consume the next token if it is `kind` or emit an error
    /// otherwise.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error(format!("expected {}", describe(kind)));
        false
    }

    /// Create an error node and consume the next token.
    pub(crate) fn err_and_bump(&mut self, message: &str) {
        let m = self.start();
        self.error(message);
        self.bump_any();
        m.complete(self, ERROR);
    }

    /// Create an error node and consume the next token, unless it is in
    /// `recovery` or ends the logical line.
    pub(crate) fn err_recover(&mut self, message: &str, recovery: TokenSet) {
        if self.at_ts(recovery) || self.at(NEWLINE) || self.at(EOF) {
            self.error(message);
            return;
        }
        self.err_and_bump(message);
    }

    fn nth_index(&self, n: usize) -> usize {
        let mut remaining = n;
        let mut i = self.pos;
        while i < self.lexed.len() {
            if !self.lexed.kind(i).is_trivia() {
                if remaining == 0 {
                    return i;
                }
                remaining -= 1;
            }
            i += 1;
        }
        self.lexed.len()
    }

    fn do_bump(&mut self) {
        self.flush_trivia();
        self.push_token();
    }

    fn flush_trivia(&mut self) {
        while self.pos < self.lexed.len() && self.lexed.kind(self.pos).is_trivia() {
            self.push_token();
        }
    }

    fn push_token(&mut self) {
        let kind = self.lexed.kind(self.pos);
        self.builder.token(raw(kind), self.lexed.text(self.pos));
        self.pos += 1;
    }
}

/// See [`Parser::start`].
pub(crate) struct Marker {
    checkpoint: Checkpoint,
    bomb: DropBomb,
}

impl Marker {
    fn new(checkpoint: Checkpoint) -> Marker {
        Marker {
            checkpoint,
            bomb: DropBomb::new("Marker must be either completed or abandoned"),
        }
    }

    /// Finishes the syntax tree node and assigns `kind` to it.
    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();
        p.builder.start_node_at(self.checkpoint, raw(kind));
        p.builder.finish_node();
        CompletedMarker {
            checkpoint: self.checkpoint,
        }
    }
}

pub(crate) struct CompletedMarker {
    checkpoint: Checkpoint,
}

impl CompletedMarker {
    /// Starts a new node that will contain this one, so that
    /// `a + b` can become `BIN_EXPR(a + b)` once the `+` is seen.
    pub(crate) fn precede(self, _p: &mut Parser<'_>) -> Marker {
        Marker::new(self.checkpoint)
    }
}

fn raw(kind: SyntaxKind) -> rowan::SyntaxKind {
    rowan::SyntaxKind(kind.into())
}

fn offset(pos: usize) -> TextSize {
    TextSize::from(pos as u32)
}

fn range_of(lexed: &LexedStr<'_>, i: usize) -> TextRange {
    let r = lexed.text_range(i);
    TextRange::new(offset(r.start), offset(r.end))
}

fn describe(kind: SyntaxKind) -> &'static str {
    use crate::SyntaxKind::*;
    match kind {
        NEWLINE => "end of line",
        INDENT => "an indented block",
        IDENT => "a name",
        R_PAREN => "`)`",
        R_BRACK => "`]`",
        R_CURLY => "`}`",
        COLON => "`:`",
        IN_KW => "`in`",
        IMPORT_KW => "`import`",
        _ => "another token",
    }
}
