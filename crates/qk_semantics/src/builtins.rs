// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! The names a Qiskit script may use without defining them: the Python
//! primitive types, the common builtin functions and exceptions, and the
//! Qiskit SDK classes.
//! All are defined at line 0 in the global scope.

use crate::symbols::{PersistentSymbolTable, Symbol};
use crate::types::{ClassType, MethodSignature, ParamSpec, PrimitiveKind, SymbolType, TypeName};

const BUILTIN_LINE: usize = 0;

fn param(name: &str, type_name: &str) -> ParamSpec {
    ParamSpec::new(name, Some(TypeName::new(type_name)))
}

fn untyped(name: &str) -> ParamSpec {
    ParamSpec::new(name, None)
}

fn method(name: &str) -> MethodSignature {
    MethodSignature::new(name)
}

/// A gate acting on a single qubit.
fn one_qubit_gate(name: &str) -> MethodSignature {
    method(name).with_param(param("qubit", "Qubit"))
}

/// A gate taking the float parameters `angles` before the qubit.
fn rotation_gate(name: &str, angles: &[&str]) -> MethodSignature {
    let sig = angles
        .iter()
        .fold(method(name), |sig, angle| sig.with_param(param(angle, "float")));
    sig.with_param(param("qubit", "Qubit"))
}

fn quantum_program() -> ClassType {
    ClassType::new("QuantumProgram")
        .with_member(method("__init__").with_param(param("specs", "dict").optional()))
        .with_member(
            method("create_quantum_register")
                .with_param(param("name", "str"))
                .with_param(param("size", "int"))
                .returning("QuantumRegister"),
        )
        .with_member(
            method("create_classical_register")
                .with_param(param("name", "str"))
                .with_param(param("size", "int"))
                .returning("ClassicalRegister"),
        )
        .with_member(
            method("create_circuit")
                .with_param(param("name", "str"))
                .with_param(param("qregs", "list"))
                .with_param(param("cregs", "list"))
                .returning("QuantumCircuit"),
        )
        .with_member(
            method("get_circuit")
                .with_param(param("name", "str"))
                .returning("QuantumCircuit"),
        )
        .with_member(
            method("get_quantum_register")
                .with_param(param("name", "str"))
                .returning("QuantumRegister"),
        )
        .with_member(
            method("get_classical_register")
                .with_param(param("name", "str"))
                .returning("ClassicalRegister"),
        )
        .with_member(
            method("get_qasm")
                .with_param(param("name", "str"))
                .returning("str"),
        )
        .with_member(
            method("set_api")
                .with_param(param("token", "str"))
                .with_param(param("url", "str")),
        )
        .with_member(method("available_backends").returning("list"))
        .with_member(method("compile").variadic().returning("dict"))
        .with_member(method("execute").variadic().returning("Result"))
}

fn quantum_circuit() -> ClassType {
    let mut class = ClassType::new("QuantumCircuit")
        .with_member(method("__init__").variadic())
        .with_member(
            method("cx")
                .with_param(param("control", "Qubit"))
                .with_param(param("target", "Qubit")),
        )
        .with_member(
            method("cz")
                .with_param(param("control", "Qubit"))
                .with_param(param("target", "Qubit")),
        )
        .with_member(
            method("ccx")
                .with_param(param("control1", "Qubit"))
                .with_param(param("control2", "Qubit"))
                .with_param(param("target", "Qubit")),
        )
        .with_member(
            method("measure")
                .with_param(param("qubit", "Qubit"))
                .with_param(param("cbit", "Clbit")),
        )
        .with_member(method("barrier").variadic())
        .with_member(method("add").with_param(param("circuit", "QuantumCircuit")))
        .with_member(method("qasm").returning("str"));
    for gate in ["h", "x", "y", "z", "s", "sdg", "t", "tdg", "iden", "reset"] {
        class = class.with_member(one_qubit_gate(gate));
    }
    class
        .with_member(rotation_gate("rx", &["theta"]))
        .with_member(rotation_gate("ry", &["theta"]))
        .with_member(rotation_gate("rz", &["phi"]))
        .with_member(rotation_gate("u1", &["theta"]))
        .with_member(rotation_gate("u2", &["phi", "lam"]))
        .with_member(rotation_gate("u3", &["theta", "phi", "lam"]))
}

fn result() -> ClassType {
    ClassType::new("Result")
        .with_member(
            method("get_counts")
                .with_param(param("name", "str").optional())
                .returning("dict"),
        )
        .with_member(
            method("get_data")
                .with_param(param("name", "str").optional())
                .returning("dict"),
        )
        .with_member(
            method("get_ran_qasm")
                .with_param(param("name", "str"))
                .returning("str"),
        )
        .with_member(method("get_names").returning("list"))
}

fn builtin_classes() -> Vec<ClassType> {
    let mut classes = vec![
        quantum_program(),
        ClassType::new("QuantumRegister").with_member(method("__init__").variadic()),
        ClassType::new("ClassicalRegister").with_member(method("__init__").variadic()),
        quantum_circuit(),
        ClassType::new("Qubit"),
        ClassType::new("Clbit"),
        result(),
    ];
    classes.extend(
        EXCEPTIONS
            .iter()
            .map(|name| ClassType::new(*name).with_member(method("__init__").variadic())),
    );
    classes
}

const EXCEPTIONS: [&str; 16] = [
    "BaseException",
    "Exception",
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "FileNotFoundError",
    "ImportError",
    "IndexError",
    "KeyError",
    "KeyboardInterrupt",
    "NotImplementedError",
    "OSError",
    "RuntimeError",
    "StopIteration",
    "TypeError",
    "ValueError",
];

// Python functions whose arguments are not checked.
const UNCHECKED_FUNCTIONS: [&str; 29] = [
    "abs",
    "all",
    "any",
    "classmethod",
    "enumerate",
    "filter",
    "getattr",
    "hasattr",
    "input",
    "isinstance",
    "iter",
    "map",
    "max",
    "min",
    "next",
    "open",
    "property",
    "repr",
    "reversed",
    "round",
    "set",
    "setattr",
    "sorted",
    "staticmethod",
    "sum",
    "super",
    "tuple",
    "type",
    "zip",
];

fn builtin_functions() -> Vec<MethodSignature> {
    let mut functions = vec![
        method("print").variadic(),
        method("len").with_param(untyped("obj")).returning("int"),
        method("range").variadic().returning("list"),
        method("execute").variadic().returning("Result"),
    ];
    functions.extend(UNCHECKED_FUNCTIONS.iter().map(|name| method(name).variadic()));
    functions
}

/// Define the builtins in the current scope of `table`.
pub fn define_builtins(table: &mut PersistentSymbolTable) {
    for kind in PrimitiveKind::ALL {
        table.define(Symbol::new(
            kind.name(),
            SymbolType::Primitive(kind),
            BUILTIN_LINE,
        ));
    }
    for signature in builtin_functions() {
        let name = signature.name().to_string();
        table.define(Symbol::new(name, SymbolType::Method(signature), BUILTIN_LINE));
    }
    for class in builtin_classes() {
        let name = class.name().to_string();
        table.define(Symbol::new(name, SymbolType::Class(class), BUILTIN_LINE));
    }
    table.define(Symbol::new(
        "__name__",
        SymbolType::Primitive(PrimitiveKind::Str),
        BUILTIN_LINE,
    ));
    // The SDK module itself. Its attributes are not checked.
    table.define(Symbol::new("qiskit", SymbolType::any(), BUILTIN_LINE));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_visible_from_line_zero() {
        let table = PersistentSymbolTable::with_builtins();
        let circuit = table.lookup("QuantumCircuit").unwrap();
        let class = circuit.symbol_type().as_class().unwrap();
        assert_eq!(class.member("cx").unwrap().arity(), (2, 2));
        assert!(class.member("barrier").unwrap().is_variadic());
        assert!(table.lookup("print").is_ok());
        assert!(matches!(
            table.lookup("enumerate").unwrap().symbol_type(),
            SymbolType::Method(_)
        ));
        assert!(table.lookup("ValueError").unwrap().symbol_type().as_class().is_some());
        assert_eq!(
            table.lookup("int").unwrap().symbol_type(),
            &SymbolType::Primitive(PrimitiveKind::Int)
        );
    }

    #[test]
    fn return_types_resolve() {
        let table = PersistentSymbolTable::with_builtins();
        let program = table.lookup("QuantumProgram").unwrap();
        let create = program
            .symbol_type()
            .as_class()
            .and_then(|c| c.member("create_circuit"))
            .unwrap();
        let ret = table.resolve_type(create.return_type().unwrap()).unwrap();
        assert_eq!(ret.name(), "QuantumCircuit");
    }
}
