// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Syntax tree for the Python subset used to write Qiskit scripts.
//!
//! The tree is a lossless rowan tree: every byte of the input, comments and
//! whitespace included, is a token in the tree. Layout is explicit: logical
//! line ends are `NEWLINE` tokens and blocks are delimited by zero-width
//! `INDENT` and `DEDENT` tokens.
//!
//! Parsing never fails. Errors are collected next to the tree, and a statement
//! that could not be parsed becomes an `ERROR` node.

mod grammar;
mod lexed_str;
mod line_index;
mod parser;
mod syntax_error;
mod syntax_kind;
mod syntax_node;
mod token_set;

pub mod ast;

#[cfg(test)]
mod tests;

pub use rowan::{Direction, NodeOrToken, TextRange, TextSize, WalkEvent};
pub use smol_str::SmolStr;

pub(crate) use token_set::TokenSet;

pub use crate::{
    ast::AstNode,
    lexed_str::LexedStr,
    line_index::{LineCol, LineIndex},
    syntax_error::SyntaxError,
    syntax_kind::SyntaxKind,
    syntax_node::{
        GreenNode, PreorderWithTokens, QiskitLanguage, SyntaxElement, SyntaxElementChildren,
        SyntaxNode, SyntaxNodeChildren, SyntaxToken,
    },
};

/// `Parse` is the result of the parsing: a syntax tree and a collection of
/// errors.
///
/// Note that we always produce a syntax tree, even for completely invalid
/// files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<SyntaxError>,
}

impl Parse {
    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn tree(&self) -> ast::SourceFile {
        // The root is always a SOURCE_FILE.
        ast::SourceFile {
            syntax: self.syntax_node(),
        }
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn ok(self) -> Result<ast::SourceFile, Vec<SyntaxError>> {
        if self.errors.is_empty() {
            Ok(self.tree())
        } else {
            Err(self.errors)
        }
    }

    /// Indented dump of the tree, one node or token per line.
    pub fn debug_dump(&self) -> String {
        let mut buf = format!("{:#?}", self.syntax_node());
        for err in self.errors.iter() {
            buf += &format!("error {:?}: {}\n", err.range(), err);
        }
        buf
    }
}

/// Lex and parse `text` as a whole source file.
pub fn parse_text(text: &str) -> Parse {
    let lexed = LexedStr::new(text);
    let mut p = parser::Parser::new(&lexed);
    grammar::entry::source_file(&mut p);
    let (green, errors) = p.finish();
    Parse { green, errors }
}
