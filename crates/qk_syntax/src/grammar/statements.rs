// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use super::*;

pub(super) fn source_file_contents(p: &mut Parser<'_>) {
    while !p.at(EOF) {
        match p.current() {
            // Left over from a line that was indented by mistake.
            DEDENT | NEWLINE => p.bump_any(),
            _ => statement(p),
        }
    }
}

pub(super) fn statement(p: &mut Parser<'_>) {
    match p.current() {
        T![def] => func_def(p),
        T![class] => class_def(p),
        T![if] => if_stmt(p),
        T![while] => while_stmt(p),
        T![for] => for_stmt(p),
        T![with] => with_stmt(p),
        T![try] => try_stmt(p),
        T![@] => decorated(p),
        INDENT => p.err_and_bump("unexpected indent"),
        _ => simple_stmt_line(p),
    }
}

/// One or more small statements separated by `;` and ended by `NEWLINE`.
fn simple_stmt_line(p: &mut Parser<'_>) {
    loop {
        small_stmt(p);
        if !p.eat(T![;]) || p.at(NEWLINE) || p.at(EOF) {
            break;
        }
    }
    if !p.at(EOF) {
        p.expect(NEWLINE);
    }
}

fn at_stmt_end(p: &Parser<'_>) -> bool {
    matches!(p.current(), NEWLINE | EOF | T![;])
}

// A statement that produced an error is completed as an `ERROR` node, so that
// consumers can skip it as a unit.
fn small_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    let errors = p.error_count();
    let kind = match p.current() {
        T![pass] => {
            p.bump(T![pass]);
            PASS_STMT
        }
        T![break] => {
            p.bump(T![break]);
            BREAK_STMT
        }
        T![continue] => {
            p.bump(T![continue]);
            CONTINUE_STMT
        }
        T![return] => {
            p.bump(T![return]);
            if !at_stmt_end(p) {
                expressions::testlist(p);
            }
            RETURN_STMT
        }
        T![import] => {
            import_stmt(p);
            IMPORT_STMT
        }
        T![from] => {
            from_import_stmt(p);
            FROM_IMPORT_STMT
        }
        T![raise] => {
            raise_stmt(p);
            RAISE_STMT
        }
        T![assert] => {
            p.bump(T![assert]);
            expressions::test(p);
            if p.eat(T![,]) {
                expressions::test(p);
            }
            ASSERT_STMT
        }
        T![del] => {
            p.bump(T![del]);
            expressions::target_list(p);
            DEL_STMT
        }
        T![global] | T![nonlocal] => {
            p.bump_any();
            loop {
                name(p);
                if !p.eat(T![,]) {
                    break;
                }
            }
            GLOBAL_STMT
        }
        _ => {
            expr_stmt(p);
            EXPR_STMT
        }
    };
    if !at_stmt_end(p) {
        if p.error_count() == errors {
            let msg = format!("unexpected {}", p.current_text());
            p.error(msg);
        }
        while !at_stmt_end(p) {
            p.bump_any();
        }
    }
    let kind = if p.error_count() > errors { ERROR } else { kind };
    m.complete(p, kind);
}

// test expr_stmt
// a = b = qp.create_circuit("c", [qr], [cr])
// x: int = 3
// n += 1
fn expr_stmt(p: &mut Parser<'_>) {
    testlist_or_yield(p);
    if p.at(T![:]) {
        let m = p.start();
        p.bump(T![:]);
        expressions::test(p);
        m.complete(p, TYPE_ANNOTATION);
    }
    if p.eat(AUG_ASSIGN) {
        testlist_or_yield(p);
        return;
    }
    while p.eat(T![=]) {
        testlist_or_yield(p);
    }
}

fn testlist_or_yield(p: &mut Parser<'_>) {
    if p.at(T![yield]) {
        expressions::yield_expr(p);
    } else {
        expressions::testlist(p);
    }
}

// test raise_stmt
// raise ValueError("no backend") from err
fn raise_stmt(p: &mut Parser<'_>) {
    p.bump(T![raise]);
    if at_stmt_end(p) {
        return;
    }
    expressions::test(p);
    if p.eat(T![from]) {
        expressions::test(p);
    }
}

// test import_stmt
// import qiskit.tools as tools, math
fn import_stmt(p: &mut Parser<'_>) {
    p.bump(T![import]);
    loop {
        let m = p.start();
        dotted_name(p);
        if p.eat(T![as]) {
            name(p);
        }
        m.complete(p, IMPORT_ALIAS);
        if !p.eat(T![,]) {
            break;
        }
    }
}

// test from_import_stmt
// from qiskit import QuantumProgram, QuantumCircuit as QC
fn from_import_stmt(p: &mut Parser<'_>) {
    p.bump(T![from]);
    dotted_name(p);
    if !p.expect(T![import]) {
        return;
    }
    if p.eat(T![*]) {
        return;
    }
    let parenthesized = p.eat(T!['(']);
    loop {
        let m = p.start();
        name(p);
        if p.eat(T![as]) {
            name(p);
        }
        m.complete(p, IMPORT_ALIAS);
        if !p.eat(T![,]) || (parenthesized && p.at(T![')'])) {
            break;
        }
    }
    if parenthesized {
        p.expect(T![')']);
    }
}

fn dotted_name(p: &mut Parser<'_>) {
    let m = p.start();
    // Relative imports
    while p.eat(T![.]) {}
    name(p);
    while p.at(T![.]) && p.nth_at(1, IDENT) {
        p.bump(T![.]);
        name(p);
    }
    m.complete(p, DOTTED_NAME);
}

// test func_def
// def bell(qc: QuantumCircuit, n=2) -> Result:
//     return qc
fn func_def(p: &mut Parser<'_>) {
    assert!(p.at(T![def]));
    let m = p.start();
    func_def_rest(p, m);
}

fn func_def_rest(p: &mut Parser<'_>, m: Marker) {
    p.bump(T![def]);
    name_r(p, TokenSet::new(&[T!['('], T![:]]));
    if p.at(T!['(']) {
        param_list(p);
    } else {
        p.error("expected function arguments");
    }
    opt_ret_type(p);
    p.expect(T![:]);
    suite(p);
    m.complete(p, FUNC_DEF);
}

const PARAM_FIRST: TokenSet = TokenSet::new(&[IDENT, T![*], T![**]]);

fn param_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, T!['('], T![')'], T![,], PARAM_FIRST, |p| {
        if !p.at_ts(PARAM_FIRST) {
            p.error("expected a parameter");
            return false;
        }
        param(p);
        true
    });
    m.complete(p, PARAM_LIST);
}

fn param(p: &mut Parser<'_>) {
    let m = p.start();
    if !p.eat(T![*]) {
        p.eat(T![**]);
    }
    name_r(p, TokenSet::new(&[T![,], T![')']]));
    if p.at(T![:]) {
        let a = p.start();
        p.bump(T![:]);
        expressions::test(p);
        a.complete(p, TYPE_ANNOTATION);
    }
    if p.at(T![=]) {
        let d = p.start();
        p.bump(T![=]);
        expressions::test(p);
        d.complete(p, DEFAULT_VALUE);
    }
    m.complete(p, PARAM);
}

// test class_def
// class Foo(object):
//     def bar(self) -> Qubit:
//         pass
fn class_def(p: &mut Parser<'_>) {
    assert!(p.at(T![class]));
    let m = p.start();
    class_def_rest(p, m);
}

fn class_def_rest(p: &mut Parser<'_>, m: Marker) {
    p.bump(T![class]);
    name_r(p, TokenSet::new(&[T!['('], T![:]]));
    if p.at(T!['(']) {
        expressions::arg_list(p);
    }
    p.expect(T![:]);
    suite(p);
    m.complete(p, CLASS_DEF);
}

// Decorators are children of the `FUNC_DEF` or `CLASS_DEF` they decorate.
// test decorated
// @register("bell")
// @staticmethod
// def bell(): pass
fn decorated(p: &mut Parser<'_>) {
    assert!(p.at(T![@]));
    let m = p.start();
    while p.at(T![@]) {
        let d = p.start();
        p.bump(T![@]);
        expressions::test(p);
        p.expect(NEWLINE);
        d.complete(p, DECORATOR);
    }
    match p.current() {
        T![def] => func_def_rest(p, m),
        T![class] => class_def_rest(p, m),
        _ => {
            p.error("expected `def` or `class` after decorators");
            m.complete(p, ERROR);
        }
    }
}

fn if_stmt(p: &mut Parser<'_>) {
    assert!(p.at(T![if]));
    let m = p.start();
    p.bump(T![if]);
    condition_and_suite(p);
    while p.at(T![elif]) {
        let c = p.start();
        p.bump(T![elif]);
        condition_and_suite(p);
        c.complete(p, ELIF_CLAUSE);
    }
    opt_else_clause(p);
    m.complete(p, IF_STMT);
}

fn while_stmt(p: &mut Parser<'_>) {
    assert!(p.at(T![while]));
    let m = p.start();
    p.bump(T![while]);
    condition_and_suite(p);
    opt_else_clause(p);
    m.complete(p, WHILE_STMT);
}

// test for_stmt
// for i in range(5):
//     qc.h(q[i])
fn for_stmt(p: &mut Parser<'_>) {
    assert!(p.at(T![for]));
    let m = p.start();
    p.bump(T![for]);
    expressions::target_list(p);
    p.expect(T![in]);
    expressions::testlist(p);
    p.expect(T![:]);
    suite(p);
    opt_else_clause(p);
    m.complete(p, FOR_STMT);
}

// test with_stmt
// with open("bell.qasm", "w") as f, lock:
//     f.write(qasm)
fn with_stmt(p: &mut Parser<'_>) {
    assert!(p.at(T![with]));
    let m = p.start();
    p.bump(T![with]);
    loop {
        let item = p.start();
        expressions::test(p);
        if p.eat(T![as]) {
            expressions::target(p);
        }
        item.complete(p, WITH_ITEM);
        if !p.eat(T![,]) {
            break;
        }
    }
    p.expect(T![:]);
    suite(p);
    m.complete(p, WITH_STMT);
}

// test try_stmt
// try:
//     result = qp.execute(["bell"])
// except (ValueError, KeyError) as err:
//     print(err)
// else:
//     pass
// finally:
//     print("done")
fn try_stmt(p: &mut Parser<'_>) {
    assert!(p.at(T![try]));
    let m = p.start();
    p.bump(T![try]);
    p.expect(T![:]);
    suite(p);
    let mut handled = false;
    while p.at(T![except]) {
        handled = true;
        let c = p.start();
        p.bump(T![except]);
        if !p.at(T![:]) {
            expressions::test(p);
            if p.eat(T![as]) {
                name(p);
            }
        }
        p.expect(T![:]);
        suite(p);
        c.complete(p, EXCEPT_CLAUSE);
    }
    if handled {
        opt_else_clause(p);
    }
    if p.at(T![finally]) {
        handled = true;
        let c = p.start();
        p.bump(T![finally]);
        p.expect(T![:]);
        suite(p);
        c.complete(p, FINALLY_CLAUSE);
    }
    if !handled {
        p.error("expected `except` or `finally`");
    }
    m.complete(p, TRY_STMT);
}

fn condition_and_suite(p: &mut Parser<'_>) {
    expressions::test(p);
    p.expect(T![:]);
    suite(p);
}

fn opt_else_clause(p: &mut Parser<'_>) {
    if !p.at(T![else]) {
        return;
    }
    let m = p.start();
    p.bump(T![else]);
    p.expect(T![:]);
    suite(p);
    m.complete(p, ELSE_CLAUSE);
}

/// Either an indented block or the rest of the line, as in `if x: pass`.
fn suite(p: &mut Parser<'_>) {
    let m = p.start();
    if p.eat(NEWLINE) {
        if p.eat(INDENT) {
            while !p.at(DEDENT) && !p.at(EOF) {
                if p.at(NEWLINE) {
                    p.bump(NEWLINE);
                    continue;
                }
                statement(p);
            }
            p.eat(DEDENT);
        } else {
            p.error("expected an indented block");
        }
    } else if !p.at(EOF) {
        simple_stmt_line(p);
    }
    m.complete(p, SUITE);
}
