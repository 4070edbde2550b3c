// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! This module defines the Concrete Syntax Tree (CST).
//!
//! The CST includes comments and whitespace, provides a single node type,
//! `SyntaxNode`, and a basic traversal API (parent, children, siblings).
//!
//! The *real* implementation is in the (language-agnostic) `rowan` crate, this
//! module just wraps its API.

use rowan::Language;

use crate::SyntaxKind;

pub use rowan::GreenNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QiskitLanguage {}
impl Language for QiskitLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from(raw.0)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.into())
    }
}

pub type SyntaxNode = rowan::SyntaxNode<QiskitLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<QiskitLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<QiskitLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<QiskitLanguage>;
pub type SyntaxElementChildren = rowan::SyntaxElementChildren<QiskitLanguage>;
pub type PreorderWithTokens = rowan::api::PreorderWithTokens<QiskitLanguage>;
