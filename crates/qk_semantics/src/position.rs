// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use qk_syntax::{AstNode, LineIndex, SmolStr, SyntaxKind, SyntaxNode, SyntaxToken, TextRange};

/// Location of a folded node or a diagnostic. `line` is 0-based, `start` and
/// `end` are `char` columns on that line, `end` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn new(line: usize, start: usize, end: usize) -> Position {
        Position { line, start, end }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.line, self.start, self.end)
    }
}

/// A significant token lifted out of the tree, so that it can outlive the walk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    text: SmolStr,
    range: TextRange,
    position: Position,
}

impl Token {
    pub fn new<T: Into<SmolStr>>(text: T, range: TextRange, position: Position) -> Token {
        Token {
            text: text.into(),
            range,
            position,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Line as the parser counts lines, starting at 1. Symbol versions are
    /// keyed by this line.
    pub fn line(&self) -> usize {
        self.position.line + 1
    }
}

/// Converts tree ranges to [`Position`]s. Built from the text of the tree,
/// which is lossless, so no separate copy of the source is needed.
#[derive(Clone, Debug)]
pub(crate) struct Spans {
    line_index: LineIndex,
}

impl Spans {
    pub(crate) fn for_node(node: &SyntaxNode) -> Spans {
        Spans {
            line_index: LineIndex::new(&node.text().to_string()),
        }
    }

    pub(crate) fn position(&self, range: TextRange) -> Position {
        let (start, end) = self.line_index.range_line_col(range);
        let first = start.line as usize - 1;
        let end_col = if end.line == start.line {
            end.col as usize
        } else {
            start.col as usize + 1
        };
        Position::new(first, start.col as usize, end_col)
    }

    /// The position of the significant tokens of `node`. Leading trivia is
    /// never inside a node, trailing layout tokens are skipped.
    pub(crate) fn node_position<N: AstNode>(&self, node: &N) -> Position {
        self.position(significant_range(node.syntax()))
    }

    pub(crate) fn token(&self, token: &SyntaxToken) -> Token {
        Token::new(token.text(), token.text_range(), self.position(token.text_range()))
    }

    /// The whole of `node` as a single token.
    pub(crate) fn node_token<N: AstNode>(&self, node: &N) -> Token {
        let range = significant_range(node.syntax());
        let text = node.syntax().text().to_string();
        Token::new(text.trim(), range, self.position(range))
    }

    /// The first significant token of `node`.
    pub(crate) fn first_token<N: AstNode>(&self, node: &N) -> Token {
        node.syntax()
            .descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !is_layout(t.kind()))
            .map_or_else(|| self.node_token(node), |t| self.token(&t))
    }

    /// 1-based line of the first token of `node`.
    pub(crate) fn first_line(&self, node: &SyntaxNode) -> usize {
        self.line_index.line_col(node.text_range().start()).line as usize
    }

    /// 1-based line of the last significant token of `node`. The `DEDENT`
    /// closing a block sits on the following line and does not count.
    pub(crate) fn last_line(&self, node: &SyntaxNode) -> usize {
        self.line_index
            .line_col(significant_range(node).end())
            .line as usize
    }
}

fn is_layout(kind: SyntaxKind) -> bool {
    kind.is_trivia() || matches!(kind, SyntaxKind::NEWLINE | SyntaxKind::INDENT | SyntaxKind::DEDENT)
}

fn significant_range(node: &SyntaxNode) -> TextRange {
    let mut tokens = node
        .descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| !is_layout(t.kind()));
    let Some(first) = tokens.next() else {
        return node.text_range();
    };
    let last = tokens.last().unwrap_or_else(|| first.clone());
    TextRange::new(first.text_range().start(), last.text_range().end())
}
