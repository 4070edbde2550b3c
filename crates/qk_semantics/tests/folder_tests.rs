// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use qk_semantics::analyze_source_string;
use qk_semantics::folded::{Statement, Term};
use qk_semantics::position::Position;
use qk_semantics::TreeFolder;
use qk_syntax::parse_text;

fn fold(code: &str) -> Vec<Statement> {
    TreeFolder::fold(&parse_text(code).tree())
}

fn rendered(code: &str) -> Vec<String> {
    fold(code).iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_chained_assignment() {
    assert_eq!(
        rendered("a = b = f()\n"),
        vec!["Statement(Assignment(VariableReference(a), Assignment(VariableReference(b), MethodReference(f, []))))"]
    );
}

#[test]
fn test_method_chain() {
    assert_eq!(
        rendered("qc.h(q[0])\n"),
        vec!["Statement(Expression([VariableReference(qc), MethodReference(h, [ArrayReference(q, 0)])]))"]
    );
}

#[test]
fn test_call_arguments() {
    let code = r#"qr = qp.create_quantum_register("qr", 2)
"#;
    assert_eq!(
        rendered(code),
        vec![r#"Statement(Assignment(VariableReference(qr), Expression([VariableReference(qp), MethodReference(create_quantum_register, [Text("qr"), Integer(2)])])))"#]
    );
}

#[test]
fn test_non_literal_index_defaults_to_zero() {
    assert_eq!(
        rendered("qc.x(q[i])\n"),
        vec!["Statement(Expression([VariableReference(qc), MethodReference(x, [ArrayReference(q, 0)])]))"]
    );
    assert_eq!(
        rendered("b = q[3]\n"),
        vec!["Statement(Assignment(VariableReference(b), ArrayReference(q, 3)))"]
    );
}

#[test]
fn test_computed_index_defaults_to_zero() {
    assert_eq!(
        rendered("qc.h(q[i + 1])\n"),
        vec!["Statement(Expression([VariableReference(qc), MethodReference(h, [ArrayReference(q, 0)])]))"]
    );
    assert_eq!(
        rendered("b = q[-1]\n"),
        vec!["Statement(Assignment(VariableReference(b), ArrayReference(q, -1)))"]
    );
}

#[test]
fn test_assignment_of_unfoldable_value_is_kept() {
    let code = r#"x = None
y = a if c else b
z = w = None
None
"#;
    assert_eq!(
        rendered(code),
        vec![
            "Statement(Assignment(VariableReference(x), Expression([])))",
            "Statement(Assignment(VariableReference(y), Expression([])))",
            "Statement(Assignment(VariableReference(z), Assignment(VariableReference(w), Expression([]))))",
        ]
    );
}

#[test]
fn test_literals() {
    let code = r#"
n = -3
x = 2.5
s = "bell" 'pair'
t = True
f = False
d = {"shots": 1024}
h = 0x1F
"#;
    assert_eq!(
        rendered(code),
        vec![
            "Statement(Assignment(VariableReference(n), Integer(-3)))",
            "Statement(Assignment(VariableReference(x), Float(2.5)))",
            r#"Statement(Assignment(VariableReference(s), Text("bellpair")))"#,
            "Statement(Assignment(VariableReference(t), Boolean(true)))",
            "Statement(Assignment(VariableReference(f), Boolean(false)))",
            "Statement(Assignment(VariableReference(d), Dictionary))",
            "Statement(Assignment(VariableReference(h), Integer(31)))",
        ]
    );
}

#[test]
fn test_operands_are_flattened() {
    assert_eq!(
        rendered("y = a + b * 2\n"),
        vec!["Statement(Assignment(VariableReference(y), Expression([VariableReference(a), VariableReference(b), Integer(2)])))"]
    );
    assert_eq!(
        rendered("y = (a)\n"),
        vec!["Statement(Assignment(VariableReference(y), VariableReference(a)))"]
    );
}

#[test]
fn test_list_display() {
    assert_eq!(
        rendered("regs = [qr, cr]\n"),
        vec!["Statement(Assignment(VariableReference(regs), Expression([VariableReference(qr), VariableReference(cr)])))"]
    );
}

#[test]
fn test_unfoldable_statements_are_dropped() {
    let code = r#"
import math
def f():
    pass
for i in range(2):
    pass
n += 1
x = 1
"#;
    assert_eq!(
        rendered(code),
        vec!["Statement(Assignment(VariableReference(x), Integer(1)))"]
    );
}

#[test]
fn test_positions() {
    let statements = fold("x = 1\nqc.h(q[10])\n");
    let Term::Assignment(assignment) = statements[0].expr() else {
        panic!("expected an assignment");
    };
    assert_eq!(assignment.target().position(), Some(Position::new(0, 0, 1)));
    assert_eq!(assignment.value().position(), Some(Position::new(0, 4, 5)));
    assert_eq!(statements[0].expr().position(), Some(Position::new(0, 0, 1)));

    let Term::Expression(chain) = statements[1].expr() else {
        panic!("expected an expression");
    };
    let Term::MethodReference(h) = &chain.terms()[1] else {
        panic!("expected a method reference");
    };
    assert_eq!(h.position(), Position::new(1, 3, 4));
    let Term::ArrayReference(q) = &h.args()[0] else {
        panic!("expected an array reference");
    };
    assert_eq!(q.index(), 10);
    assert_eq!(q.position(), Position::new(1, 5, 6));
}

#[test]
fn test_one_malformed_statement_among_ten() {
    let code = r#"qp = QuantumProgram()
qr = qp.create_quantum_register("qr", 2)
cr = qp.create_classical_register("cr", 2)
qc = qp.create_circuit("bell", [qr], [cr])
qc.h(qr[0]))
qc.cx(qr[0], qr[1])
qc.measure(qr[0], cr[0])
qc.measure(qr[1], cr[1])
result = qp.execute(["bell"])
counts = result.get_counts("bell")
"#;
    let result = analyze_source_string(code);
    assert_eq!(result.ast().len(), 9);
    assert!(!result.diagnostics().is_empty());
    let first = &result.diagnostics()[0];
    assert_eq!(first.message(), "Expecting arguments before symbol )");
    assert_eq!(first.line(), 4);
    assert!(result.any_syntax_errors());
}
