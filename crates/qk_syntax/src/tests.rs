// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use crate::ast::{self, AstNode, Expr, Stmt, Trailer};
use crate::{parse_text, LexedStr, LineIndex, SyntaxKind, SyntaxKind::*};

fn statements(code: &str) -> Vec<Stmt> {
    parse_text(code).tree().statements().collect()
}

fn top_level_kinds(code: &str) -> Vec<SyntaxKind> {
    parse_text(code)
        .syntax_node()
        .children()
        .map(|n| n.kind())
        .collect()
}

fn lexed_kinds(code: &str) -> Vec<SyntaxKind> {
    let lexed = LexedStr::new(code);
    (0..lexed.len())
        .map(|i| lexed.kind(i))
        .filter(|k| !k.is_trivia())
        .collect()
}

#[test]
fn tree_is_lossless() {
    let code = r##"
from qiskit import QuantumProgram  # import
qp = QuantumProgram()
def bell(qc):
    qc.h(q[0])

    qc.cx(q[0], q[1])
"##;
    let parse = parse_text(code);
    assert_eq!(parse.syntax_node().text().to_string(), code);
    assert!(parse.ok().is_ok());
}

#[test]
fn layout_tokens() {
    let code = "if x:\n    y = 1\n\n    # c\nz = 2";
    assert_eq!(
        lexed_kinds(code),
        vec![
            IF_KW, IDENT, COLON, NEWLINE, INDENT, IDENT, EQ, INT_NUMBER, NEWLINE, DEDENT, IDENT,
            EQ, INT_NUMBER, NEWLINE
        ]
    );
}

#[test]
fn newlines_inside_brackets_are_whitespace() {
    let code = "f(a,\n  b)\n";
    assert_eq!(
        lexed_kinds(code),
        vec![IDENT, L_PAREN, IDENT, COMMA, IDENT, R_PAREN, NEWLINE]
    );
    assert!(parse_text(code).ok().is_ok());
}

#[test]
fn dedents_are_closed_at_eof() {
    let code = "def f():\n    if x:\n        pass";
    let kinds = lexed_kinds(code);
    assert_eq!(&kinds[kinds.len() - 3..], &[NEWLINE, DEDENT, DEDENT]);
    assert!(parse_text(code).ok().is_ok());
}

#[test]
fn parse_assignment_chain() {
    let stmts = statements("a = b = qp.create_circuit('c', [qr], [cr])\n");
    assert_eq!(stmts.len(), 1);
    let Stmt::ExprStmt(stmt) = &stmts[0] else {
        panic!("expected an expression statement");
    };
    assert!(stmt.is_assignment());
    let exprs: Vec<Expr> = stmt.exprs().collect();
    assert_eq!(exprs.len(), 3);
    assert!(matches!(exprs[0], Expr::Name(_)));
    assert!(matches!(exprs[1], Expr::Name(_)));
    let Expr::Power(power) = &exprs[2] else {
        panic!("expected a call chain");
    };
    let trailers: Vec<Trailer> = power.trailers().collect();
    assert_eq!(trailers.len(), 2);
    assert!(matches!(trailers[0], Trailer::Attribute(_)));
    let Trailer::ArgList(args) = &trailers[1] else {
        panic!("expected a call");
    };
    assert_eq!(args.args().count(), 3);
}

#[test]
fn parse_keyword_arguments() {
    let stmts = statements("r = qp.execute(['bell'], backend='local_qasm_simulator', shots=1024)\n");
    let Stmt::ExprStmt(stmt) = &stmts[0] else {
        panic!("expected an expression statement");
    };
    let Some(Expr::Power(power)) = stmt.exprs().nth(1) else {
        panic!("expected a call chain");
    };
    let Some(Trailer::ArgList(args)) = power.trailers().last() else {
        panic!("expected a call");
    };
    let keywords: Vec<String> = args
        .args()
        .filter_map(|a| a.keyword())
        .filter_map(|n| n.text())
        .map(|s| s.to_string())
        .collect();
    assert_eq!(keywords, vec!["backend", "shots"]);
}

#[test]
fn parse_class_with_methods() {
    let code = r##"
class Foo(object):
    def bar(self, n: int) -> Qubit:
        return n
"##;
    let stmts = statements(code);
    let Stmt::ClassDef(class) = &stmts[0] else {
        panic!("expected a class");
    };
    assert_eq!(class.name().and_then(|n| n.text()).unwrap(), "Foo");
    let body = class.body().unwrap();
    let Some(Stmt::FuncDef(def)) = body.statements().next() else {
        panic!("expected a method");
    };
    let params: Vec<ast::Param> = def.param_list().unwrap().params().collect();
    assert_eq!(params.len(), 2);
    assert!(params[0].annotation().is_none());
    assert!(params[1].annotation().is_some());
    let ret = def.ret_type().and_then(|r| r.expr()).unwrap();
    assert_eq!(ret.syntax().text().to_string(), "Qubit");
}

#[test]
fn parse_imports() {
    let stmts = statements("import qiskit.tools as tools, math\nfrom qiskit import QuantumProgram, QuantumCircuit as QC\n");
    let Stmt::ImportStmt(import) = &stmts[0] else {
        panic!("expected import");
    };
    let bound: Vec<String> = import
        .aliases()
        .filter_map(|a| a.bound_name())
        .map(|s| s.to_string())
        .collect();
    assert_eq!(bound, vec!["tools", "math"]);
    let Stmt::FromImportStmt(from) = &stmts[1] else {
        panic!("expected from-import");
    };
    assert_eq!(from.module().unwrap().text(), "qiskit");
    let bound: Vec<String> = from
        .aliases()
        .filter_map(|a| a.bound_name())
        .map(|s| s.to_string())
        .collect();
    assert_eq!(bound, vec!["QuantumProgram", "QC"]);
}

#[test]
fn parse_compound_statements() {
    let code = r##"
for i in range(5):
    qc.h(q[i])
else:
    pass
while n > 0:
    n -= 1
if a not in b:
    pass
elif c is not None:
    pass
else:
    x = 1 if y else 2
"##;
    let parse = parse_text(code);
    assert!(parse.errors().is_empty(), "{:?}", parse.errors());
    let kinds: Vec<SyntaxKind> = parse
        .tree()
        .statements()
        .map(|s| s.syntax().kind())
        .collect();
    assert_eq!(kinds, vec![FOR_STMT, WHILE_STMT, IF_STMT]);
}

#[test]
fn parse_single_line_suite() {
    let parse = parse_text("if x: pass\nif y: a = 1; b = 2\n");
    assert!(parse.errors().is_empty());
    assert_eq!(parse.tree().statements().count(), 2);
}

#[test]
fn stray_paren_makes_error_statement() {
    let code = "x = 1\nqc.h(q[0]))\ny = 2\n";
    let parse = parse_text(code);
    assert_eq!(parse.errors().len(), 1);
    let err = &parse.errors()[0];
    assert_eq!(&code[err.range()], ")");
    assert_eq!(top_level_kinds(code), vec![EXPR_STMT, ERROR, EXPR_STMT]);
}

#[test]
fn unexpected_indent() {
    let code = "x = 1\n    y = 2\nz = 3\n";
    let parse = parse_text(code);
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.errors()[0].message(), "unexpected indent");
    // The indented statement is still parsed.
    assert_eq!(parse.tree().statements().count(), 3);
}

#[test]
fn missing_block() {
    let parse = parse_text("def f():\nx = 1\n");
    assert!(parse
        .errors()
        .iter()
        .any(|e| e.message() == "expected an indented block"));
}

#[test]
fn unterminated_string_is_reported() {
    let parse = parse_text("s = 'abc\n");
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(
        parse.errors()[0].message(),
        "Missing trailing quote to terminate the string literal"
    );
}

#[test]
fn error_positions() {
    let code = "a = 1\nb = )\n";
    let parse = parse_text(code);
    let index = LineIndex::new(code);
    let (start, end) = index.range_line_col(parse.errors()[0].range());
    assert_eq!((start.line, start.col), (2, 4));
    assert_eq!((end.line, end.col), (2, 5));
}

#[test]
fn lex_error_on_first_token() {
    for (code, message) in [
        ("$\n", "Unknown character"),
        ("0x\n", "Missing digits after the integer base prefix"),
        ("'open\n", "Missing trailing quote to terminate the string literal"),
    ] {
        let parse = parse_text(code);
        let err = parse
            .errors()
            .iter()
            .find(|e| e.message() == message)
            .unwrap();
        assert_eq!(u32::from(err.range().start()), 0, "{code:?}");
        assert_eq!(parse.syntax_node().text().to_string(), code);
    }
}

#[test]
fn lex_error_columns() {
    let code = "x = 1 + $\n";
    let parse = parse_text(code);
    let err = parse
        .errors()
        .iter()
        .find(|e| e.message() == "Unknown character")
        .unwrap();
    assert_eq!(&code[err.range()], "$");
    let (start, _) = LineIndex::new(code).range_line_col(err.range());
    assert_eq!((start.line, start.col), (1, 8));

    let code = "x = 'abc\n";
    let parse = parse_text(code);
    let (start, _) = LineIndex::new(code).range_line_col(parse.errors()[0].range());
    assert_eq!((start.line, start.col), (1, 4));
    assert!(code[parse.errors()[0].range()].starts_with("'abc"));
}

#[test]
fn parse_with_and_try() {
    let code = r#"with open("bell.qasm", "w") as f, lock:
    f.write(qasm)
try:
    result = qp.execute(["bell"])
except (ValueError, KeyError) as err:
    print(err)
except:
    raise
else:
    pass
finally:
    print("done")
"#;
    let parse = parse_text(code);
    assert!(parse.errors().is_empty(), "{:?}", parse.errors());
    assert_eq!(top_level_kinds(code), vec![WITH_STMT, TRY_STMT]);

    let stmts = statements(code);
    let Stmt::WithStmt(with) = &stmts[0] else {
        panic!("expected with");
    };
    let items: Vec<ast::WithItem> = with.items().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].target().unwrap().syntax().text().to_string(), "f");
    assert!(items[1].target().is_none());
    assert_eq!(with.body().unwrap().statements().count(), 1);

    let Stmt::TryStmt(try_stmt) = &stmts[1] else {
        panic!("expected try");
    };
    let handlers: Vec<ast::ExceptClause> = try_stmt.except_clauses().collect();
    assert_eq!(handlers.len(), 2);
    assert_eq!(
        handlers[0].name().and_then(|n| n.text()).as_deref(),
        Some("err")
    );
    assert!(matches!(handlers[0].type_expr(), Some(Expr::ParenExpr(_))));
    assert!(handlers[1].type_expr().is_none());
    assert!(handlers[1].name().is_none());
    assert!(try_stmt.else_clause().is_some());
    assert!(try_stmt.finally_clause().is_some());
}

#[test]
fn try_without_handler() {
    let parse = parse_text("try:\n    pass\nx = 1\n");
    assert!(parse
        .errors()
        .iter()
        .any(|e| e.message() == "expected `except` or `finally`"));
}

#[test]
fn parse_simple_statements() {
    let code = r#"raise ValueError("no backend") from err
assert n > 0, "empty register"
del counts["00"], shots
global backend, shots
nonlocal total
x = yield qc
"#;
    let parse = parse_text(code);
    assert!(parse.errors().is_empty(), "{:?}", parse.errors());
    assert_eq!(
        top_level_kinds(code),
        vec![RAISE_STMT, ASSERT_STMT, DEL_STMT, GLOBAL_STMT, GLOBAL_STMT, EXPR_STMT]
    );
    let stmts = statements(code);
    let Stmt::RaiseStmt(raise) = &stmts[0] else {
        panic!("expected raise");
    };
    assert_eq!(raise.exprs().count(), 2);
    let Stmt::AssertStmt(assert) = &stmts[1] else {
        panic!("expected assert");
    };
    assert_eq!(assert.exprs().count(), 2);
    let Stmt::DelStmt(del) = &stmts[2] else {
        panic!("expected del");
    };
    assert!(matches!(del.target(), Some(Expr::Testlist(_))));
    let Stmt::GlobalStmt(global) = &stmts[3] else {
        panic!("expected global");
    };
    assert_eq!(global.names().count(), 2);
    assert!(!global.is_nonlocal());
    let Stmt::ExprStmt(assign) = &stmts[5] else {
        panic!("expected assignment");
    };
    assert!(matches!(assign.exprs().last(), Some(Expr::YieldExpr(_))));
    assert_eq!(statements("raise\n").len(), 1);
}

#[test]
fn parse_decorators() {
    let code = r#"@register("bell")
@staticmethod
def bell(): pass
@dataclass
class Job:
    shots: int = 1024
"#;
    let parse = parse_text(code);
    assert!(parse.errors().is_empty(), "{:?}", parse.errors());
    assert_eq!(top_level_kinds(code), vec![FUNC_DEF, CLASS_DEF]);
    let stmts = statements(code);
    let Stmt::FuncDef(def) = &stmts[0] else {
        panic!("expected a function");
    };
    assert_eq!(def.decorators().count(), 2);
    assert_eq!(def.name().and_then(|n| n.text()).as_deref(), Some("bell"));
    let Stmt::ClassDef(class) = &stmts[1] else {
        panic!("expected a class");
    };
    assert_eq!(class.decorators().count(), 1);
    assert_eq!(class.name().and_then(|n| n.text()).as_deref(), Some("Job"));
    assert!(class.bases().is_none());

    let parse = parse_text("@decorator\nx = 1\n");
    assert!(parse
        .errors()
        .iter()
        .any(|e| e.message() == "expected `def` or `class` after decorators"));
}

#[test]
fn parse_lambda() {
    let stmts = statements("key = lambda item, n=1: item[n]\nf = lambda: 0\n");
    let Stmt::ExprStmt(assign) = &stmts[0] else {
        panic!("expected assignment");
    };
    let Some(Expr::LambdaExpr(lambda)) = assign.exprs().last() else {
        panic!("expected lambda");
    };
    let params: Vec<ast::Param> = lambda.param_list().unwrap().params().collect();
    assert_eq!(params.len(), 2);
    assert!(params[1].default_value().is_some());
    assert!(matches!(lambda.body(), Some(Expr::Power(_))));

    let Stmt::ExprStmt(assign) = &stmts[1] else {
        panic!("expected assignment");
    };
    let Some(Expr::LambdaExpr(lambda)) = assign.exprs().last() else {
        panic!("expected lambda");
    };
    assert_eq!(lambda.param_list().unwrap().params().count(), 0);
}

#[test]
fn parse_comprehensions() {
    let code = r#"ones = [k for k, v in counts.items() if v > 0]
squares = {i: i * i for i in range(4)}
seen = {q for q in qubits}
total = sum(c for c in counts.values())
pairs = list((a, b) for a in xs for b in ys)
gen = (x for x in xs)
"#;
    let parse = parse_text(code);
    assert!(parse.errors().is_empty(), "{:?}", parse.errors());
    let values: Vec<Expr> = statements(code)
        .into_iter()
        .filter_map(|stmt| match stmt {
            Stmt::ExprStmt(assign) => assign.exprs().last(),
            _ => None,
        })
        .collect();
    assert_eq!(values.len(), 6);

    let Expr::Comprehension(list) = &values[0] else {
        panic!("expected a list comprehension");
    };
    assert_eq!(list.bracket(), Some(L_BRACK));
    let clauses: Vec<ast::CompClause> = list.clauses().collect();
    assert!(matches!(clauses[0], ast::CompClause::CompFor(_)));
    assert!(matches!(clauses[1], ast::CompClause::CompIf(_)));
    if let ast::CompClause::CompFor(comp_for) = &clauses[0] {
        assert!(matches!(comp_for.target(), Some(Expr::Testlist(_))));
        assert!(matches!(comp_for.iterable(), Some(Expr::Power(_))));
    }

    let Expr::Comprehension(dict) = &values[1] else {
        panic!("expected a dict comprehension");
    };
    assert!(dict.is_dict());
    assert_eq!(dict.elements().count(), 2);

    let Expr::Comprehension(set) = &values[2] else {
        panic!("expected a set comprehension");
    };
    assert!(!set.is_dict());

    let Expr::Power(call) = &values[3] else {
        panic!("expected a call");
    };
    let Some(Trailer::ArgList(args)) = call.trailers().next() else {
        panic!("expected arguments");
    };
    let arg = args.args().next().unwrap();
    let Some(Expr::Comprehension(generator)) = arg.expr() else {
        panic!("expected a generator argument");
    };
    assert_eq!(generator.bracket(), None);

    let Expr::Power(call) = &values[4] else {
        panic!("expected a call");
    };
    let Some(Trailer::ArgList(args)) = call.trailers().next() else {
        panic!("expected arguments");
    };
    let Some(Expr::Comprehension(nested)) = args.args().next().and_then(|a| a.expr()) else {
        panic!("expected a generator");
    };
    assert_eq!(nested.clauses().count(), 2);

    assert!(matches!(
        &values[5],
        Expr::Comprehension(paren) if paren.bracket() == Some(L_PAREN)
    ));
    // A plain list display is unchanged.
    assert!(matches!(
        statements("regs = [qr, cr]\n")[0].syntax().last_child().and_then(Expr::cast),
        Some(Expr::ListExpr(_))
    ));
}
