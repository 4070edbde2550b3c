// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

use qk_semantics::symbols::{PersistentSymbolTable, Symbol, SymbolError};
use qk_semantics::types::{PrimitiveKind, SymbolType, TypeName};

fn int() -> SymbolType {
    SymbolType::Primitive(PrimitiveKind::Int)
}

fn string() -> SymbolType {
    SymbolType::Primitive(PrimitiveKind::Str)
}

//
// Test API of the persistent symbol table
//

#[test]
fn test_symbol_table_create() {
    let table = PersistentSymbolTable::new();
    assert_eq!(table.number_of_scopes(), 1);
    assert_eq!(table.scopes()[0].name(), "global");
    assert_eq!(table.scopes()[0].opened_at(), 0);
    assert!(matches!(table.lookup("x"), Err(SymbolError::MissingBinding)));
}

#[test]
fn test_versioned_lookup() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("x", int(), 1));
    table.define(Symbol::new("x", string(), 5));

    table.seek(3);
    assert_eq!(table.lookup("x").unwrap().symbol_type(), &int());
    table.seek(5);
    assert_eq!(table.lookup("x").unwrap().symbol_type(), &string());

    // Old versions stay reachable.
    assert_eq!(table.lookup_at("x", 4).unwrap().symbol_type(), &int());
    assert_eq!(table.lookup_at("x", 7).unwrap().symbol_type(), &string());
    assert!(table.lookup_at("x", 0).is_err());
}

#[test]
fn test_define_moves_position_forward() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("x", int(), 4));
    assert_eq!(table.position(), 4);
    table.define(Symbol::new("y", int(), 2));
    assert_eq!(table.position(), 4);
}

#[test]
fn test_duplicate_versions_are_stored_once() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("x", int(), 1));
    table.define(Symbol::new("x", int(), 1));
    table.define(Symbol::new("x", string(), 1));
    let scope = table.scope(table.current_scope());
    assert_eq!(scope.versions("x").len(), 2);
    // The last definition on a line wins.
    assert_eq!(table.lookup("x").unwrap().symbol_type(), &string());
}

#[test]
fn test_redefinition_on_one_line_keeps_latest() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("x", int(), 1));
    table.define(Symbol::new("x", string(), 1));
    table.define(Symbol::new("x", int(), 1));
    let scope = table.scope(table.current_scope());
    assert_eq!(scope.versions("x").len(), 3);
    assert_eq!(table.lookup("x").unwrap().symbol_type(), &int());
}

#[test]
fn test_lookup_of_consecutive_versions() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("b", int(), 2));
    table.define(Symbol::new("b", string(), 3));
    assert_eq!(table.lookup_at("b", 2).unwrap().symbol_type(), &int());
    assert_eq!(table.lookup("b").unwrap().symbol_type(), &string());
}

#[test]
fn test_lookup_inside_closed_scope() {
    let mut table = PersistentSymbolTable::new();
    let f = table.push("f", 3);
    table.define(Symbol::new("v", int(), 5));
    assert_eq!(table.pop(7).unwrap(), f);

    let found = table.lookup_at("v", 6).unwrap();
    assert_eq!(found.symbol_type(), &int());
    assert_eq!(found.scope_id(), f);
    assert!(table.lookup_at("v", 4).is_err());
    assert!(table.lookup_at("v", 8).is_err());
    assert!(table.lookup("v").is_err());
}

#[test]
fn test_scope_visibility() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("a", int(), 1));
    let f = table.push("f", 2);
    table.define(Symbol::new("b", string(), 3));
    assert_eq!(table.number_of_scopes(), 2);
    assert_eq!(table.current_scope(), f);

    let a = table.lookup("a").unwrap();
    assert_eq!(a.scope_level(), 0);
    let b = table.lookup("b").unwrap();
    assert_eq!(b.scope_level(), 1);
    assert_eq!(b.scope_id(), f);

    assert_eq!(table.pop(4).unwrap(), f);
    assert_eq!(table.number_of_scopes(), 1);
    assert_eq!(table.scope(f).closed_at(), Some(4));

    // Closed scopes are invisible to `lookup`, but not to `lookup_at`.
    assert!(table.lookup("b").is_err());
    assert_eq!(table.lookup_at("b", 3).unwrap().symbol_type(), &string());
    assert!(table.lookup_at("b", 5).is_err());
    assert_eq!(table.lookup_at("a", 3).unwrap().symbol_type(), &int());
    assert_eq!(table.scopes().len(), 2);
}

#[test]
fn test_inner_version_shadows_outer() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("n", int(), 1));
    table.push("f", 2);
    table.define(Symbol::new("n", string(), 3));
    assert_eq!(table.lookup("n").unwrap().symbol_type(), &string());
    table.pop(4).unwrap();
    assert_eq!(table.lookup("n").unwrap().symbol_type(), &int());
    assert_eq!(table.lookup_at("n", 3).unwrap().symbol_type(), &string());
}

#[test]
fn test_sibling_scopes_at_same_depth() {
    let mut table = PersistentSymbolTable::new();
    table.push("f", 1);
    table.define(Symbol::new("v", int(), 2));
    table.pop(2).unwrap();
    table.push("g", 3);
    table.define(Symbol::new("v", string(), 4));
    table.pop(4).unwrap();
    assert_eq!(table.lookup_at("v", 2).unwrap().symbol_type(), &int());
    assert_eq!(table.lookup_at("v", 4).unwrap().symbol_type(), &string());
}

#[test]
fn test_pop_global_scope_fails() {
    let mut table = PersistentSymbolTable::new();
    assert!(matches!(table.pop(1), Err(SymbolError::ScopeUnderflow)));
    assert_eq!(table.number_of_scopes(), 1);
}

#[test]
fn test_lookup_declared_ignores_position() {
    let mut table = PersistentSymbolTable::new();
    table.define(Symbol::new("later", int(), 10));
    table.seek(2);
    assert!(table.lookup("later").is_err());
    let declared = table.lookup_declared("later").unwrap();
    assert_eq!(declared.symbol().defined_at(), 10);
}

#[test]
fn test_resolve_type() {
    let table = PersistentSymbolTable::with_builtins();
    assert_eq!(
        table.resolve_type(&TypeName::new("QuantumCircuit")).unwrap().name(),
        "QuantumCircuit"
    );
    assert_eq!(table.resolve_type(&TypeName::new("int")), Some(int()));
    assert_eq!(table.resolve_type(&TypeName::new("print")), None);
    assert_eq!(table.resolve_type(&TypeName::new("Nope")), None);

    // Primitive names resolve without the builtins.
    let bare = PersistentSymbolTable::new();
    assert_eq!(
        bare.resolve_type(&TypeName::new("float")),
        Some(SymbolType::Primitive(PrimitiveKind::Float))
    );
    assert_eq!(bare.resolve_type(&TypeName::new("QuantumCircuit")), None);
}
