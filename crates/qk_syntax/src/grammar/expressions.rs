// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Expressions, from the loosest binding (`test`) to the tightest (`atom`).
//!
//! An atom followed by trailers (calls, subscripts, attribute access) is a
//! flat `POWER` node: `qc.h(q[0])` is `POWER(NAME ATTRIBUTE ARG_LIST)`.
//! A bare atom is not wrapped.

use super::*;

pub(super) const LITERAL_FIRST: TokenSet = TokenSet::new(&[
    INT_NUMBER,
    FLOAT_NUMBER,
    IMAG_NUMBER,
    STRING,
    T![True],
    T![False],
    T![None],
]);

pub(super) const ATOM_FIRST: TokenSet =
    LITERAL_FIRST.union(TokenSet::new(&[IDENT, T!['('], T!['['], T!['{']]));

pub(super) const EXPR_FIRST: TokenSet =
    ATOM_FIRST.union(TokenSet::new(&[T![-], T![+], T![~], T![not], T![lambda]]));

// Tokens at which an expression that failed to start gives up without
// swallowing the token.
const EXPR_RECOVERY_SET: TokenSet = TokenSet::new(&[
    T![')'],
    T![']'],
    T!['}'],
    T![:],
    T![=],
    T![,],
    T![;],
    AUG_ASSIGN,
    INDENT,
    DEDENT,
]);

/// `test (',' test)* [',']`. A `TESTLIST` node is created only when
/// there is at least one comma.
pub(super) fn testlist(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    list_of(p, test)
}

/// Target of a `for` loop: parsed below the level of comparisons so that
/// the `in` is left for the loop.
pub(super) fn target_list(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    list_of(p, or_expr)
}

/// A single target, as in `with f() as target` or a comprehension.
pub(super) fn target(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    or_expr(p)
}

fn list_of(
    p: &mut Parser<'_>,
    item: fn(&mut Parser<'_>) -> Option<CompletedMarker>,
) -> Option<CompletedMarker> {
    let first = item(p)?;
    if !p.at(T![,]) {
        return Some(first);
    }
    let m = first.precede(p);
    while p.eat(T![,]) {
        if !p.at_ts(EXPR_FIRST) {
            break;
        }
        item(p);
    }
    Some(m.complete(p, TESTLIST))
}

// test cond_expr
// x = 1 if flag else 2
pub(super) fn test(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(T![lambda]) {
        return Some(lambda_expr(p));
    }
    let lhs = or_test(p)?;
    if !p.at(T![if]) {
        return Some(lhs);
    }
    let m = lhs.precede(p);
    p.bump(T![if]);
    or_test(p);
    if p.expect(T![else]) {
        test(p);
    }
    Some(m.complete(p, COND_EXPR))
}

// test lambda_expr
// key = lambda item, n=1: item[n]
fn lambda_expr(p: &mut Parser<'_>) -> CompletedMarker {
    assert!(p.at(T![lambda]));
    let m = p.start();
    p.bump(T![lambda]);
    let params = p.start();
    while p.at_ts(TokenSet::new(&[IDENT, T![*], T![**]])) {
        let param = p.start();
        if !p.eat(T![*]) {
            p.eat(T![**]);
        }
        name(p);
        if p.at(T![=]) {
            let d = p.start();
            p.bump(T![=]);
            test(p);
            d.complete(p, DEFAULT_VALUE);
        }
        param.complete(p, PARAM);
        if !p.eat(T![,]) {
            break;
        }
    }
    params.complete(p, PARAM_LIST);
    p.expect(T![:]);
    test(p);
    m.complete(p, LAMBDA_EXPR)
}

// test yield_expr
// x = yield qc
pub(super) fn yield_expr(p: &mut Parser<'_>) -> CompletedMarker {
    assert!(p.at(T![yield]));
    let m = p.start();
    p.bump(T![yield]);
    if p.eat(T![from]) {
        test(p);
    } else if p.at_ts(EXPR_FIRST) {
        testlist(p);
    }
    m.complete(p, YIELD_EXPR)
}

fn or_test(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, TokenSet::new(&[T![or]]), and_test)
}

fn and_test(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, TokenSet::new(&[T![and]]), not_test)
}

fn not_test(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(T![not]) {
        let m = p.start();
        p.bump(T![not]);
        not_test(p);
        return Some(m.complete(p, PREFIX_EXPR));
    }
    comparison(p)
}

const COMPARISON_OPS: TokenSet = TokenSet::new(&[
    T![<],
    T![>],
    T![==],
    T![!=],
    T![<=],
    T![>=],
    T![in],
    T![is],
]);

// test comparison
// ok = a not in b and c is not None
fn comparison(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = or_expr(p)?;
    loop {
        let negated_in = p.at(T![not]) && p.nth_at(1, T![in]);
        if !p.at_ts(COMPARISON_OPS) && !negated_in {
            break;
        }
        let m = lhs.precede(p);
        if negated_in {
            p.bump(T![not]);
            p.bump(T![in]);
        } else if p.eat(T![is]) {
            p.eat(T![not]);
        } else {
            p.bump_any();
        }
        or_expr(p);
        lhs = m.complete(p, BIN_EXPR);
    }
    Some(lhs)
}

fn or_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, TokenSet::new(&[T![|]]), xor_expr)
}

fn xor_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, TokenSet::new(&[T![^]]), and_expr)
}

fn and_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, TokenSet::new(&[T![&]]), shift_expr)
}

fn shift_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, TokenSet::new(&[T![<<], T![>>]]), arith_expr)
}

fn arith_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(p, TokenSet::new(&[T![+], T![-]]), term)
}

fn term(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary(
        p,
        TokenSet::new(&[T![*], T![/], SLASH2, T![%], T![@]]),
        factor,
    )
}

/// Left-associative chain of `operand`s joined by any of `ops`.
fn binary(
    p: &mut Parser<'_>,
    ops: TokenSet,
    operand: fn(&mut Parser<'_>) -> Option<CompletedMarker>,
) -> Option<CompletedMarker> {
    let mut lhs = operand(p)?;
    while p.at_ts(ops) {
        let m = lhs.precede(p);
        p.bump_any();
        operand(p);
        lhs = m.complete(p, BIN_EXPR);
    }
    Some(lhs)
}

fn factor(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at_ts(TokenSet::new(&[T![-], T![+], T![~]])) {
        let m = p.start();
        p.bump_any();
        factor(p);
        return Some(m.complete(p, PREFIX_EXPR));
    }
    power(p)
}

// test power
// x = 2 ** -1
fn power(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let lhs = atom_expr(p)?;
    if !p.at(T![**]) {
        return Some(lhs);
    }
    let m = lhs.precede(p);
    p.bump(T![**]);
    factor(p);
    Some(m.complete(p, BIN_EXPR))
}

const TRAILER_FIRST: TokenSet = TokenSet::new(&[T!['('], T!['['], T![.]]);

fn atom_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let atom = atom(p)?;
    if !p.at_ts(TRAILER_FIRST) {
        return Some(atom);
    }
    let m = atom.precede(p);
    while p.at_ts(TRAILER_FIRST) {
        match p.current() {
            T!['('] => {
                arg_list(p);
            }
            T!['['] => subscript_list(p),
            _ => attribute(p),
        }
    }
    Some(m.complete(p, POWER))
}

fn atom(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at_ts(LITERAL_FIRST) {
        return Some(literal(p));
    }
    let done = match p.current() {
        IDENT => {
            let m = p.start();
            p.bump(IDENT);
            m.complete(p, NAME)
        }
        T!['('] => paren_expr(p),
        T!['['] => list_expr(p),
        T!['{'] => dict_expr(p),
        _ => {
            p.err_recover("expected an expression", EXPR_RECOVERY_SET);
            return None;
        }
    };
    Some(done)
}

// test literal
// s = "abc" 'def'
fn literal(p: &mut Parser<'_>) -> CompletedMarker {
    assert!(p.at_ts(LITERAL_FIRST));
    let m = p.start();
    if p.at(STRING) {
        // Adjacent string literals are one literal.
        while p.eat(STRING) {}
    } else {
        p.bump_any();
    }
    m.complete(p, LITERAL)
}

fn paren_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump(T!['(']);
    let mut kind = PAREN_EXPR;
    if !p.at(T![')']) {
        testlist(p);
        if opt_comp_clauses(p) {
            kind = COMPREHENSION;
        }
    }
    p.expect(T![')']);
    m.complete(p, kind)
}

fn list_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let mut kind = LIST_EXPR;
    delimited(p, T!['['], T![']'], T![,], EXPR_FIRST, |p| {
        if test(p).is_none() {
            return false;
        }
        if opt_comp_clauses(p) {
            kind = COMPREHENSION;
        }
        true
    });
    m.complete(p, kind)
}

// test dict_expr
// d = {"00": 1, "11": 2}
fn dict_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let mut kind = DICT_EXPR;
    delimited(p, T!['{'], T!['}'], T![,], EXPR_FIRST, |p| {
        if test(p).is_none() {
            return false;
        }
        if p.eat(T![:]) {
            test(p);
        }
        if opt_comp_clauses(p) {
            kind = COMPREHENSION;
        }
        true
    });
    m.complete(p, kind)
}

// The `for` and `if` clauses of a comprehension, after its element.
// test comprehension
// ones = [k for k, v in counts.items() if v > 0]
fn opt_comp_clauses(p: &mut Parser<'_>) -> bool {
    if !p.at(T![for]) {
        return false;
    }
    while p.at(T![for]) || p.at(T![if]) {
        let m = p.start();
        if p.eat(T![for]) {
            target_list(p);
            p.expect(T![in]);
            or_test(p);
            m.complete(p, COMP_FOR);
        } else {
            p.bump(T![if]);
            or_test(p);
            m.complete(p, COMP_IF);
        }
    }
    true
}

/// A call trailer, or the base list of a class.
pub(super) fn arg_list(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let first = EXPR_FIRST.union(TokenSet::new(&[T![*], T![**]]));
    delimited(p, T!['('], T![')'], T![,], first, |p| {
        if !p.at_ts(first) {
            return false;
        }
        argument(p);
        true
    });
    m.complete(p, ARG_LIST)
}

// test argument
// qp.execute(["bell"], backend="local_qasm_simulator", shots=1024)
fn argument(p: &mut Parser<'_>) {
    let m = p.start();
    if !p.eat(T![*]) {
        p.eat(T![**]);
    }
    if p.at(IDENT) && p.nth_at(1, T![=]) {
        name(p);
        p.bump(T![=]);
    }
    if let Some(value) = test(p) {
        // A generator argument, `sum(x for x in xs)`.
        if p.at(T![for]) {
            let c = value.precede(p);
            opt_comp_clauses(p);
            c.complete(p, COMPREHENSION);
        }
    }
    m.complete(p, ARGUMENT);
}

fn subscript_list(p: &mut Parser<'_>) {
    let m = p.start();
    let first = EXPR_FIRST.union(TokenSet::new(&[T![:]]));
    delimited(p, T!['['], T![']'], T![,], first, |p| {
        if !p.at_ts(first) {
            p.error("expected an index");
            return false;
        }
        subscript(p);
        true
    });
    m.complete(p, SUBSCRIPT_LIST);
}

// test subscript
// q[0]
// q[1:3]
fn subscript(p: &mut Parser<'_>) {
    let m = p.start();
    if !p.at(T![:]) {
        test(p);
    }
    for _ in 0..2 {
        if !p.eat(T![:]) {
            break;
        }
        if p.at_ts(EXPR_FIRST) {
            test(p);
        }
    }
    m.complete(p, SUBSCRIPT);
}

fn attribute(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump(T![.]);
    name_r(p, TRAILER_FIRST);
    m.complete(p, ATTRIBUTE);
}
