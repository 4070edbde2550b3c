// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use qk_semantics::diagnostic::{Diagnostic, SemanticErrorKind, Severity};
use qk_semantics::symbols::PersistentSymbolTable;
use qk_semantics::types::{PrimitiveKind, SymbolType};
use qk_semantics::{SemanticAnalyzer, SymbolTableGenerator, SymbolTableResult};
use qk_syntax::parse_text;

// Run both passes, as the analysis entry point does, skipping the folder.
fn analyze(code: &str) -> (PersistentSymbolTable, Vec<Diagnostic>) {
    let tree = parse_text(code).tree();
    let SymbolTableResult {
        mut symbol_table,
        errors,
    } = SymbolTableGenerator::symbol_table_for(&tree);
    let mut diagnostics = errors;
    diagnostics.extend(SemanticAnalyzer::analyze(&tree, &mut symbol_table));
    (symbol_table, diagnostics)
}

fn kinds(diagnostics: &[Diagnostic]) -> Vec<SemanticErrorKind> {
    diagnostics
        .iter()
        .filter_map(|d| d.semantic_kind().cloned())
        .collect()
}

fn type_name(table: &PersistentSymbolTable, name: &str) -> String {
    table.lookup(name).unwrap().symbol_type().name().to_string()
}

const FOO: &str = r#"class Foo:
    def bar(self) -> Qubit:
        return Qubit()
x = Foo()
"#;

#[test]
fn test_method_reference_resolution() {
    let code = format!("{FOO}y = x.bar()\n");
    let (table, diagnostics) = analyze(&code);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(type_name(&table, "x"), "Foo");
    assert_eq!(type_name(&table, "y"), "Qubit");
    assert_eq!(
        table.lookup_at("y", 5).unwrap().symbol_type().name(),
        "Qubit"
    );
}

#[test]
fn test_arity_mismatch() {
    let code = format!("{FOO}y = x.bar(1)\n");
    let (_table, diagnostics) = analyze(&code);
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::ArityMismatch]);
    let error = &diagnostics[0];
    assert_eq!(error.message(), "bar expects 0 arguments, got 1");
    assert_eq!(error.severity(), Severity::Error);
    // Reported at the method name.
    assert_eq!((error.line(), error.start_column(), error.end_column()), (4, 6, 9));
}

#[test]
fn test_first_pass_declares_top_level() {
    let tree = parse_text(FOO).tree();
    let result = SymbolTableGenerator::symbol_table_for(&tree);
    assert!(result.errors.is_empty());
    let foo = result.symbol_table.lookup_declared("Foo").unwrap();
    let class = foo.symbol_type().as_class().unwrap();
    let bar = class.member("bar").unwrap();
    assert_eq!(bar.arity(), (0, 0));
    assert_eq!(bar.return_type().unwrap().as_str(), "Qubit");
    // Only constants are typed by the first pass.
    assert!(result
        .symbol_table
        .lookup_declared("x")
        .unwrap()
        .symbol_type()
        .is_any());
}

#[test]
fn test_undefined_symbol() {
    let (_table, diagnostics) = analyze("x = 1\ny = z + x\n");
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::UndefinedSymbol]);
    assert_eq!(diagnostics[0].message(), "Symbol z is not defined");
    assert_eq!(
        (diagnostics[0].line(), diagnostics[0].start_column()),
        (1, 4)
    );
}

#[test]
fn test_unknown_method() {
    let code = r#"qc = QuantumCircuit()
qc.hadamard(0)
"#;
    let (_table, diagnostics) = analyze(code);
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::UnknownMethod]);
    assert_eq!(
        diagnostics[0].message(),
        "Method hadamard is not defined for QuantumCircuit"
    );
    assert_eq!(diagnostics[0].start_column(), 3);
}

#[test]
fn test_attribute_without_call_is_not_checked() {
    let code = r#"class Job:
    def __init__(self):
        self.shots = 1024
j = Job()
n = j.shots
"#;
    let (_table, diagnostics) = analyze(code);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_forward_reference() {
    let code = r#"def main():
    return helper(2)
def helper(n: int) -> int:
    return n
"#;
    let (table, diagnostics) = analyze(code);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(type_name(&table, "helper"), "helper");
}

#[test]
fn test_function_scope_is_closed() {
    let code = r#"def f():
    local = 1
    return local
print(local)
"#;
    let (table, diagnostics) = analyze(code);
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::UndefinedSymbol]);
    assert_eq!(diagnostics[0].line(), 3);
    assert_eq!(table.number_of_scopes(), 1);
    assert_eq!(table.scopes().len(), 2);
    assert_eq!(table.scopes()[1].name(), "f");
    assert_eq!(
        table.lookup_at("local", 3).unwrap().symbol_type(),
        &SymbolType::Primitive(PrimitiveKind::Int)
    );
    assert!(table.lookup_at("local", 4).is_err());
}

#[test]
fn test_self_has_the_class_type() {
    let code = r#"class Experiment:
    def __init__(self, shots: int):
        self.shots = shots
    def run(self) -> Result:
        return execute(self)
    def twice(self) -> Result:
        self.run()
        return self.rerun()
"#;
    let (_table, diagnostics) = analyze(code);
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::UnknownMethod]);
    assert_eq!(
        diagnostics[0].message(),
        "Method rerun is not defined for Experiment"
    );
}

#[test]
fn test_constructor_arguments() {
    let code = r#"class Experiment:
    def __init__(self, shots: int):
        self.shots = shots
a = Experiment(1024)
b = Experiment("many")
c = Experiment()
"#;
    let (table, diagnostics) = analyze(code);
    assert_eq!(
        kinds(&diagnostics),
        vec![
            SemanticErrorKind::ArgumentTypeMismatch,
            SemanticErrorKind::ArityMismatch
        ]
    );
    assert_eq!(
        diagnostics[0].message(),
        "Argument 1 of Experiment should be of type int, found str"
    );
    assert_eq!(diagnostics[1].message(), "Experiment expects 1 argument, got 0");
    assert_eq!(type_name(&table, "a"), "Experiment");
}

#[test]
fn test_inherited_methods() {
    let code = r#"class Bell(QuantumCircuit):
    def entangle(self, a: Qubit, b: Qubit):
        self.h(a)
        self.cx(a, b)
bell = Bell()
bell.measure(1, 2)
"#;
    let (_table, diagnostics) = analyze(code);
    assert_eq!(
        kinds(&diagnostics),
        vec![
            SemanticErrorKind::ArgumentTypeMismatch,
            SemanticErrorKind::ArgumentTypeMismatch
        ]
    );
    assert_eq!(
        diagnostics[0].message(),
        "Argument 1 of measure should be of type Qubit, found int"
    );
}

#[test]
fn test_inherited_methods_of_class_defined_below() {
    let code = r#"def main():
    b = Bell()
    b.barrier()
    b.entangle()
class Bell(QuantumCircuit):
    def entangle(self):
        pass
"#;
    let (table, diagnostics) = analyze(code);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let bell = table.lookup_declared("Bell").unwrap();
    let class = bell.symbol_type().as_class().unwrap();
    assert!(class.member("h").is_some());
    assert!(class.member("entangle").is_some());
}

#[test]
fn test_unknown_annotation_is_a_warning() {
    let code = r#"def run(circuit: Circut) -> int:
    return 0
"#;
    let (_table, diagnostics) = analyze(code);
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::UnknownType]);
    assert_eq!(diagnostics[0].severity(), Severity::Warning);
    assert_eq!(diagnostics[0].message(), "Type Circut is not defined");
    assert_eq!(diagnostics[0].start_column(), 17);
}

#[test]
fn test_for_target_types() {
    let code = r#"qp = QuantumProgram()
qr = qp.create_quantum_register("qr", 3)
qc = qp.create_circuit("ghz", [qr], [])
for i in range(3):
    qc.h(qr[i])
for q in qr:
    qc.x(q)
"#;
    let (table, diagnostics) = analyze(code);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(type_name(&table, "i"), "int");
    assert_eq!(type_name(&table, "q"), "Qubit");
    assert_eq!(type_name(&table, "qc"), "QuantumCircuit");
}

#[test]
fn test_tuple_targets_are_bound() {
    let (table, diagnostics) = analyze("a, b = 1, 2\nc = a\n");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert!(table.lookup("a").unwrap().symbol_type().is_any());
    assert!(table.lookup("b").is_ok());
}

#[test]
fn test_types_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<PersistentSymbolTable>();
    assert_send::<Diagnostic>();
    assert_send::<qk_semantics::folded::Statement>();
    assert_send::<qk_semantics::AnalysisResult<qk_source_file::SourceString>>();
}

#[test]
fn test_common_python_statements() {
    let code = r#"import math
@staticmethod
def helper(x):
    return x
def run(qp: QuantumProgram, names):
    global shots
    try:
        result = qp.execute(names)
    except (ValueError, KeyError) as err:
        print(err)
        raise RuntimeError("failed") from err
    finally:
        print("done")
    with open("counts.txt", "w") as fh:
        fh.write(result.get_counts("bell"))
    counts = result.get_counts("bell")
    ones = [k for k, v in counts.items() if v > 0]
    total = sum(v for v in counts.values())
    squares = {i: i * i for i in range(4)}
    key = lambda item, n=1: item[n]
    assert total > 0, "no shots"
    del squares
    return sorted(ones)
"#;
    let (table, diagnostics) = analyze(code);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(
        table.lookup_at("ones", 17).unwrap().symbol_type(),
        &SymbolType::Primitive(PrimitiveKind::List)
    );
    assert_eq!(
        table.lookup_at("squares", 19).unwrap().symbol_type(),
        &SymbolType::Primitive(PrimitiveKind::Dict)
    );
}

#[test]
fn test_comprehension_targets_are_local() {
    let code = "xs = [k for k in range(3)]\nprint(k)\n";
    let (_table, diagnostics) = analyze(code);
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::UndefinedSymbol]);
    assert_eq!(diagnostics[0].message(), "Symbol k is not defined");
    assert_eq!(diagnostics[0].line(), 1);
}

#[test]
fn test_with_and_except_bind_names() {
    let code = r#"try:
    x = 1
except ValueError as err:
    print(err)
with open("bell.qasm") as fh:
    fh.read()
"#;
    let (table, diagnostics) = analyze(code);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(type_name(&table, "err"), "ValueError");
    assert_eq!(type_name(&table, "fh"), "object");
    assert_eq!(type_name(&table, "x"), "int");
}

#[test]
fn test_lambda_parameters_are_local() {
    let code = "f = lambda n: n + offset\n";
    let (_table, diagnostics) = analyze(code);
    assert_eq!(kinds(&diagnostics), vec![SemanticErrorKind::UndefinedSymbol]);
    assert_eq!(diagnostics[0].message(), "Symbol offset is not defined");
}
