// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Tracking the targets and the value of an assignment while the analyzer
//! walks it, so that the targets can be defined with the type of the value.
//!
//! For `a = b = qp.get_circuit("bell")` the analyzer reports, in order:
//! `begin(a)`, `assign()`, `begin(b)`, `assign()`, `begin(qp)`,
//! `variable(qp)`, `trailing_method(get_circuit)`, `arguments(..)`, and
//! finally calls `finish()`, which hands back the targets `a` and `b` and the
//! chain `qp.get_circuit(..)`.

use crate::arguments::Argument;
use crate::position::Token;
use crate::symbols::PersistentSymbolTable;
use crate::types::{element_class, PrimitiveKind, SymbolType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrailingMethod {
    pub method_name: Token,
    /// `true` if the value returned by the method is subscripted.
    pub indexed: bool,
}

impl TrailingMethod {
    pub fn new(method_name: Token) -> TrailingMethod {
        TrailingMethod {
            method_name,
            indexed: false,
        }
    }
}

/// A variable followed by a chain of method accesses, as in `x.foo().bar()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodCall {
    pub variable: Token,
    pub trailing_methods: Vec<TrailingMethod>,
    pub arguments: Vec<Argument>,
    /// `true` if the variable is subscripted, as in `q[0]`.
    pub indexed: bool,
}

impl MethodCall {
    pub fn new(variable: Token) -> MethodCall {
        MethodCall {
            variable,
            trailing_methods: Vec::new(),
            arguments: Vec::new(),
            indexed: false,
        }
    }
}

/// One side of an assignment. A target that is a plain name has no chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingAssignment {
    pub target_first_token: Token,
    pub chain: Option<MethodCall>,
}

impl PendingAssignment {
    /// The name bound by this target, if it is a plain name.
    pub fn plain_name(&self) -> Option<&str> {
        match self.chain {
            None => Some(self.target_first_token.text()),
            Some(_) => None,
        }
    }
}

/// Targets and value of one assignment statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedAssignment {
    pub targets: Vec<PendingAssignment>,
    pub value: PendingAssignment,
}

#[derive(Clone, Debug, Default)]
pub struct AssignmentsStack {
    pending: Vec<PendingAssignment>,
    targets: Vec<PendingAssignment>,
}

impl AssignmentsStack {
    pub fn new() -> AssignmentsStack {
        AssignmentsStack::default()
    }

    /// Start a target or the value, at its first token.
    pub fn begin(&mut self, first_token: Token) {
        self.pending.push(PendingAssignment {
            target_first_token: first_token,
            chain: None,
        });
    }

    /// The expression being tracked starts with the variable `token`.
    pub fn variable(&mut self, token: Token) {
        if let Some(pending) = self.pending.last_mut() {
            pending.chain = Some(MethodCall::new(token));
        }
    }

    /// The expression so far is subscripted.
    pub fn indexed(&mut self) {
        if let Some(chain) = self.current_chain() {
            match chain.trailing_methods.last_mut() {
                Some(method) => method.indexed = true,
                None => chain.indexed = true,
            }
        }
    }

    pub fn trailing_method(&mut self, token: Token) {
        if let Some(chain) = self.current_chain() {
            chain.trailing_methods.push(TrailingMethod::new(token));
        }
    }

    /// Arguments of the latest call in the chain.
    pub fn arguments(&mut self, arguments: Vec<Argument>) {
        if let Some(chain) = self.current_chain() {
            chain.arguments = arguments;
        }
    }

    /// An `=` was seen: the most recent pending entry is a target.
    pub fn assign(&mut self) {
        if let Some(target) = self.pending.pop() {
            self.targets.push(target);
        }
    }

    /// End the statement. Returns `None` if no value was begun.
    pub fn finish(&mut self) -> Option<FinishedAssignment> {
        let value = self.pending.pop();
        let targets = std::mem::take(&mut self.targets);
        self.pending.clear();
        Some(FinishedAssignment {
            targets,
            value: value?,
        })
    }

    fn current_chain(&mut self) -> Option<&mut MethodCall> {
        self.pending.last_mut().and_then(|p| p.chain.as_mut())
    }
}

/// The type of the value of a variable when it is used in an expression.
/// Naming a function stands for calling it.
pub fn value_type(typ: &SymbolType, table: &PersistentSymbolTable) -> Option<SymbolType> {
    match typ {
        SymbolType::Method(signature) => match signature.return_type() {
            Some(name) => table.resolve_type(name),
            None => Some(SymbolType::any()),
        },
        _ => Some(typ.clone()),
    }
}

/// The type of an element of a value of type `typ`.
pub fn element_type(typ: &SymbolType, table: &PersistentSymbolTable) -> Option<SymbolType> {
    match typ {
        SymbolType::Class(class) => element_class(class.name())
            .and_then(|name| table.lookup_declared(name).ok())
            .map(|record| record.symbol_type().clone()),
        SymbolType::Primitive(PrimitiveKind::Any) => Some(SymbolType::any()),
        _ => None,
    }
}

/// What is known about a method of a receiver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberLookup {
    /// The receiver declares the method. Holds its return type, if declared.
    Found(Option<SymbolType>),
    /// The receiver is a class without the method.
    Missing,
    /// Nothing is known about the methods of the receiver.
    Unknown,
}

/// Follow one method access from a value of type `receiver`.
pub fn lookup_member(
    receiver: &SymbolType,
    method_name: &str,
    table: &PersistentSymbolTable,
) -> MemberLookup {
    match receiver {
        SymbolType::Class(class) => match class.member(method_name) {
            Some(member) => MemberLookup::Found(
                member
                    .return_type()
                    .and_then(|name| table.resolve_type(name)),
            ),
            None => MemberLookup::Missing,
        },
        _ => MemberLookup::Unknown,
    }
}

/// Resolve the type a chain evaluates to, walking the trailing methods
/// through the member tables of the classes met on the way.
pub fn resolve_chain(chain: &MethodCall, table: &PersistentSymbolTable) -> Option<SymbolType> {
    let name = chain.variable.text();
    let record = table
        .lookup(name)
        .or_else(|_| table.lookup_declared(name))
        .ok()?;
    let mut typ = value_type(record.symbol_type(), table)?;
    if chain.indexed {
        typ = element_type(&typ, table)?;
    }
    for trailing in chain.trailing_methods.iter() {
        match lookup_member(&typ, trailing.method_name.text(), table) {
            MemberLookup::Found(Some(returned)) => typ = returned,
            _ => return None,
        }
        if trailing.indexed {
            typ = element_type(&typ, table)?;
        }
    }
    Some(typ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;
    use crate::symbols::Symbol;
    use crate::types::{ClassType, MethodSignature};
    use crate::TextRange;

    fn token(text: &str) -> Token {
        Token::new(text, TextRange::default(), Position::default())
    }

    #[test]
    fn chained_targets_are_collected() {
        let mut stack = AssignmentsStack::new();
        stack.begin(token("a"));
        stack.assign();
        stack.begin(token("b"));
        stack.assign();
        stack.begin(token("f"));
        stack.variable(token("f"));
        let finished = stack.finish().unwrap();
        let names: Vec<&str> = finished
            .targets
            .iter()
            .filter_map(|t| t.plain_name())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(finished.value.chain.unwrap().variable.text(), "f");
        assert!(stack.finish().is_none());
    }

    #[test]
    fn attribute_target_is_not_a_plain_name() {
        let mut stack = AssignmentsStack::new();
        stack.begin(token("self"));
        stack.variable(token("self"));
        stack.trailing_method(token("x"));
        stack.assign();
        stack.begin(token("1"));
        let finished = stack.finish().unwrap();
        assert_eq!(finished.targets[0].plain_name(), None);
    }

    #[test]
    fn chain_follows_return_types() {
        let mut table = PersistentSymbolTable::with_builtins();
        let foo = ClassType::new("Foo").with_member(MethodSignature::new("bar").returning("Qubit"));
        table.define(Symbol::new("x", SymbolType::Class(foo), 1));
        let mut chain = MethodCall::new(token("x"));
        chain.trailing_methods.push(TrailingMethod::new(token("bar")));
        assert_eq!(resolve_chain(&chain, &table).unwrap().name(), "Qubit");

        chain.trailing_methods[0].method_name = token("baz");
        assert_eq!(resolve_chain(&chain, &table), None);
    }
}
