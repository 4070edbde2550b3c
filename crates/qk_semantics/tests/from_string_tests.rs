// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use qk_semantics::diagnostic::{DiagnosticKind, SemanticErrorKind};
use qk_semantics::{analyze_source_string, analyze_source_string_with, AnalysisOptions};

const BELL: &str = r#"
from qiskit import QuantumProgram
qp = QuantumProgram()
qr = qp.create_quantum_register("qr", 2)
cr = qp.create_classical_register("cr", 2)
qc = qp.create_circuit("bell", [qr], [cr])
qc.h(qr[0])
qc.cx(qr[0], qr[1])
qc.measure(qr, cr)
result = qp.execute(["bell"], backend="local_qasm_simulator", shots=1024)
counts = result.get_counts("bell")
print(counts)
"#;

#[test]
fn test_from_string_bell() {
    let result = analyze_source_string(BELL);
    assert!(result.diagnostics().is_empty(), "{:?}", *result.diagnostics());
    assert!(!result.any_errors());
    let table = result.symbol_table();
    let type_of = |name: &str| table.lookup(name).unwrap().symbol_type().name().to_string();
    assert_eq!(type_of("qp"), "QuantumProgram");
    assert_eq!(type_of("qr"), "QuantumRegister");
    assert_eq!(type_of("cr"), "ClassicalRegister");
    assert_eq!(type_of("qc"), "QuantumCircuit");
    assert_eq!(type_of("result"), "Result");
    assert_eq!(type_of("counts"), "dict");
    // The import is not folded.
    assert_eq!(result.ast().len(), 10);
}

#[test]
fn test_from_string_history() {
    let code = r#"
qp = QuantumProgram()
circuit = qp.create_circuit("a", [], [])
circuit = circuit.qasm()
"#;
    let result = analyze_source_string(code);
    assert!(result.diagnostics().is_empty());
    let table = result.symbol_table();
    assert_eq!(table.lookup("circuit").unwrap().symbol_type().name(), "str");
    assert_eq!(
        table.lookup_at("circuit", 3).unwrap().symbol_type().name(),
        "QuantumCircuit"
    );
}

#[test]
fn test_from_string_argument_type() {
    let code = r#"
qp = QuantumProgram()
qr = qp.create_quantum_register("qr", "two")
counts = qp.execute(["c"]).get_counts(name=3)
"#;
    let result = analyze_source_string(code);
    let messages: Vec<&str> = result.diagnostics().iter().map(|d| d.message()).collect();
    assert_eq!(
        messages,
        vec![
            "Argument 2 of create_quantum_register should be of type int, found str",
            "Argument 1 of get_counts should be of type str, found int",
        ]
    );
    assert!(result.any_errors());
}

#[test]
fn test_from_string_annotations() {
    let code = r#"
shots: int = 1024
name: str = "bell"
qc: QuantumCircuit = make()
"#;
    let result = analyze_source_string(code);
    let kinds: Vec<_> = result
        .diagnostics()
        .iter()
        .filter_map(|d| d.semantic_kind().cloned())
        .collect();
    assert_eq!(kinds, vec![SemanticErrorKind::UndefinedSymbol]);
    let table = result.symbol_table();
    assert_eq!(table.lookup("shots").unwrap().symbol_type().name(), "int");
    assert_eq!(table.lookup("qc").unwrap().symbol_type().name(), "QuantumCircuit");
}

#[test]
fn test_from_string_syntax_rewrites() {
    let result = analyze_source_string("x = 1\nqc.h(q[0]))\n");
    let first = &result.diagnostics()[0];
    assert_eq!(first.kind(), &DiagnosticKind::Syntax);
    assert_eq!(first.message(), "Expecting arguments before symbol )");
    assert_eq!((first.line(), first.start_column(), first.end_column()), (1, 10, 11));

    let result = analyze_source_string("x = 1\n    y = 2\nz = 3\n");
    assert_eq!(result.diagnostics().len(), 1);
    assert_eq!(result.diagnostics()[0].message(), "Unexpected indentation");
}

#[test]
fn test_from_string_order_of_diagnostics() {
    let code = r#"def f(c: Circ):
    return undefined_name
print(1))
"#;
    let result = analyze_source_string(code);
    let kinds: Vec<&DiagnosticKind> = result.diagnostics().iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            &DiagnosticKind::Syntax,
            &DiagnosticKind::Semantic(SemanticErrorKind::UnknownType),
            &DiagnosticKind::Semantic(SemanticErrorKind::UndefinedSymbol),
        ]
    );
}

#[test]
fn test_from_string_without_builtins() {
    let options = AnalysisOptions {
        builtins: false,
        fake_file_path: Some("bell.py".to_string()),
    };
    let result = analyze_source_string_with("qc = QuantumCircuit()\nn: int = 2\n", &options);
    let messages: Vec<&str> = result.diagnostics().iter().map(|d| d.message()).collect();
    assert_eq!(messages, vec!["Symbol QuantumCircuit is not defined"]);
    assert_eq!(
        result.diagnostics().source_file_path().to_str(),
        Some("bell.py")
    );
    assert_eq!(result.symbol_table().lookup("n").unwrap().symbol_type().name(), "int");
}

#[test]
fn test_lex_error_positions() {
    let result = analyze_source_string("$\n");
    assert!(result.any_syntax_errors());
    let first = &result.diagnostics()[0];
    assert_eq!((first.line(), first.start_column()), (0, 0));

    let result = analyze_source_string("qc = 1\nx = 1 + $\n");
    assert!(!result.diagnostics().is_empty());
    assert!(result
        .diagnostics()
        .iter()
        .all(|d| (d.line(), d.start_column()) == (1, 8)));
}
