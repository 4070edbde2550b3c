// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! This is the actual "grammar" of the Python subset used by Qiskit scripts.
//!
//! Each function in this module and its children corresponds
//! to a production of the formal grammar. Submodules roughly
//! correspond to different *areas* of the grammar. By convention,
//! each submodule starts with `use super::*` import and exports
//! "public" productions via `pub(super)`.
//!
//! See docs for [`Parser`](super::parser::Parser) to learn about API,
//! available to the grammar.
//!
//! Coding convention: rules like `param_list` always produce either a
//! node or an error, rules like `opt_ret_type` may produce nothing.
//! Non-opt rules typically start with `assert!(p.at(FIRST_TOKEN))`, the
//! caller is responsible for branching on the first token.

mod expressions;
mod statements;

use crate::{
    parser::{CompletedMarker, Marker, Parser},
    SyntaxKind::{self, *},
    TokenSet, T,
};

pub(crate) mod entry {
    use super::*;

    // This is the entry point into the parser.
    // It produces the SOURCE_FILE root; the parser closes it in `finish`.
    pub(crate) fn source_file(p: &mut Parser<'_>) {
        p.start_root(SOURCE_FILE);
        statements::source_file_contents(p);
    }
}

/// Parse the optional return annotation of a `def`.
/// Return `true` if the annotation was found, else `false`.
fn opt_ret_type(p: &mut Parser<'_>) -> bool {
    if !p.at(T![->]) {
        return false;
    }
    let m = p.start();
    p.bump(T![->]);
    expressions::test(p);
    m.complete(p, RET_TYPE);
    true
}

/// Parse an identifer signifying a name. Attempt recovery
/// on failure.
fn name_r(p: &mut Parser<'_>, recovery: TokenSet) {
    if p.at(IDENT) {
        let m = p.start();
        p.bump(IDENT);
        m.complete(p, NAME);
    } else {
        p.err_recover("expected a name", recovery);
    }
}

/// Parse an identifer signifying a name. Do not attempt
/// error recovery.
fn name(p: &mut Parser<'_>) {
    name_r(p, TokenSet::EMPTY);
}

/// The `parser` passed this is required to at least consume one token if it returns `true`.
/// If the `parser` returns false, parsing will stop.
fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    first_set: TokenSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    p.bump(bra);
    while !p.at(ket) && !p.at(EOF) {
        if !parser(p) {
            break;
        }
        if !p.at(delim) {
            if p.at_ts(first_set) {
                p.error(format!("expected {delim:?}"));
            } else {
                break;
            }
        } else {
            p.bump(delim);
        }
    }
    p.expect(ket);
}
