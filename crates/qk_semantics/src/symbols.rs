// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

// Defines data structures and api for symbols, scopes, and the persistent symbol table.

use hashbrown::HashMap;
use thiserror::Error;
use tracing::trace;

use crate::types::{PrimitiveKind, SymbolType, TypeName};

// A script is analyzed line by line, so every definition is tagged with the
// line it happens on. Nothing is ever removed: redefining a name adds a new
// version, and closing a scope only marks it closed. This lets an editor ask
// "what was `q` at line 12" long after line 12 was walked.

/// A name bound to a type at a line. Immutable once made.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Symbol {
    name: String,
    typ: SymbolType,
    defined_at: usize,
}

impl Symbol {
    pub fn new<T: ToString>(name: T, typ: SymbolType, defined_at: usize) -> Symbol {
        Symbol {
            name: name.to_string(),
            typ,
            defined_at,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol_type(&self) -> &SymbolType {
        &self.typ
    }

    pub fn defined_at(&self) -> usize {
        self.defined_at
    }
}

// This wrapped `usize` is an index into the arena of all scopes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl From<ScopeId> for usize {
    fn from(id: ScopeId) -> usize {
        id.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("no binding is visible for this name")]
    MissingBinding,
    #[error("the global scope cannot be closed")]
    ScopeUnderflow,
}

pub type SymbolRecordResult<'a> = Result<SymbolRecord<'a>, SymbolError>;

/// A lexical region: the module, or the body of a `def` or a `class`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    name: String,
    opened_at: usize,
    closed_at: Option<usize>,
    /// Versions of each name, ordered by `defined_at`.
    symbols: HashMap<String, Vec<Symbol>>,
    parent: Option<ScopeId>,
    depth: usize,
}

impl Scope {
    fn new(name: String, opened_at: usize, parent: Option<ScopeId>, depth: usize) -> Scope {
        Scope {
            name,
            opened_at,
            closed_at: None,
            symbols: HashMap::new(),
            parent,
            depth,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opened_at(&self) -> usize {
        self.opened_at
    }

    pub fn closed_at(&self) -> Option<usize> {
        self.closed_at
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// `true` if `line` is within `[opened_at, closed_at]`, or after
    /// `opened_at` if the scope is still open.
    pub fn contains_line(&self, line: usize) -> bool {
        self.opened_at <= line && self.closed_at.map_or(true, |closed| line <= closed)
    }

    /// Every version of `name` in this scope, oldest first.
    pub fn versions(&self, name: &str) -> &[Symbol] {
        self.symbols.get(name).map_or(&[], |v| v.as_slice())
    }

    /// The latest version of `name` defined no later than `line`.
    pub fn latest_at(&self, name: &str, line: usize) -> Option<&Symbol> {
        let versions = self.versions(name);
        let n = versions.partition_point(|s| s.defined_at() <= line);
        n.checked_sub(1).map(|i| &versions[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(|k| k.as_str())
    }

    fn insert(&mut self, symbol: Symbol) -> bool {
        let versions = self.symbols.entry(symbol.name().to_string()).or_default();
        // Several versions on one line keep their order of definition.
        let at = versions.partition_point(|s| s.defined_at() <= symbol.defined_at());
        if let Some(latest) = at.checked_sub(1).map(|i| &versions[i]) {
            if latest.defined_at() == symbol.defined_at()
                && latest.symbol_type() == symbol.symbol_type()
            {
                return false;
            }
        }
        versions.insert(at, symbol);
        true
    }
}

/// A symbol found by a lookup, together with where it was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolRecord<'a> {
    symbol: &'a Symbol,
    scope_id: ScopeId,
    scope_level: usize,
}

impl<'a> SymbolRecord<'a> {
    pub fn new(symbol: &'a Symbol, scope_id: ScopeId, scope_level: usize) -> SymbolRecord<'a> {
        SymbolRecord {
            symbol,
            scope_id,
            scope_level,
        }
    }

    pub fn symbol(&self) -> &'a Symbol {
        self.symbol
    }

    pub fn symbol_type(&self) -> &'a SymbolType {
        self.symbol.symbol_type()
    }

    pub fn scope_id(&self) -> ScopeId {
        self.scope_id
    }

    pub fn scope_level(&self) -> usize {
        self.scope_level
    }
}

/// The persistent symbol table.
///
/// * `scopes` is an append-only arena of every scope ever opened. A scope
///   refers to its parent by `ScopeId`.
/// * `live` is the stack of scopes that are currently open, innermost last.
/// * `position` is the line the analysis has reached. Versions defined after
///   it are not visible to [`lookup`](Self::lookup).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistentSymbolTable {
    scopes: Vec<Scope>,
    live: Vec<ScopeId>,
    position: usize,
}

impl Default for PersistentSymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PersistentSymbolTable {
    /// Create a table holding only the empty global scope, opened at line 0.
    pub fn new() -> PersistentSymbolTable {
        PersistentSymbolTable {
            scopes: vec![Scope::new("global".to_string(), 0, None, 0)],
            live: vec![ScopeId(0)],
            position: 0,
        }
    }

    /// Create a table whose global scope holds the Python and Qiskit builtins.
    pub fn with_builtins() -> PersistentSymbolTable {
        let mut table = PersistentSymbolTable::new();
        crate::builtins::define_builtins(&mut table);
        table
    }

    /// Open a child of the current scope.
    pub fn push<T: ToString>(&mut self, scope_name: T, at_line: usize) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        let scope = Scope::new(
            scope_name.to_string(),
            at_line,
            Some(self.current_scope()),
            self.live.len(),
        );
        trace!(scope = scope.name(), line = at_line, "open scope");
        self.scopes.push(scope);
        self.live.push(id);
        self.position = self.position.max(at_line);
        id
    }

    /// Close the current scope at `at_line` and return to its parent.
    pub fn pop(&mut self, at_line: usize) -> Result<ScopeId, SymbolError> {
        if self.live.len() <= 1 {
            return Err(SymbolError::ScopeUnderflow);
        }
        let id = self.live.pop().ok_or(SymbolError::ScopeUnderflow)?;
        let scope = &mut self.scopes[id.0];
        scope.closed_at = Some(at_line);
        trace!(scope = scope.name(), line = at_line, "close scope");
        self.position = self.position.max(at_line);
        Ok(id)
    }

    /// Add a version of `symbol.name()` to the current scope. A version with
    /// the same line and type as an existing one is not stored twice.
    pub fn define(&mut self, symbol: Symbol) {
        let line = symbol.defined_at();
        let current = self.current_scope();
        let scope = &mut self.scopes[current.0];
        trace!(
            name = symbol.name(),
            typ = %symbol.symbol_type(),
            line,
            scope = scope.name(),
            "define"
        );
        scope.insert(symbol);
        self.position = self.position.max(line);
    }

    /// Find the latest visible version of `name` in the open scopes,
    /// innermost first.
    pub fn lookup(&self, name: &str) -> SymbolRecordResult<'_> {
        for (level, id) in self.live.iter().enumerate().rev() {
            if let Some(symbol) = self.scopes[id.0].latest_at(name, self.position) {
                return Ok(SymbolRecord::new(symbol, *id, level));
            }
        }
        Err(SymbolError::MissingBinding)
    }

    /// Find the version of `name` that was visible at `line`, looking in
    /// closed scopes as well as open ones.
    pub fn lookup_at(&self, name: &str, line: usize) -> SymbolRecordResult<'_> {
        let innermost = self
            .scopes
            .iter()
            .enumerate()
            .filter(|(_, scope)| scope.contains_line(line))
            .max_by_key(|(i, scope)| (scope.depth(), *i))
            .map(|(i, _)| ScopeId(i));
        let mut next = innermost;
        while let Some(id) = next {
            let scope = &self.scopes[id.0];
            if let Some(symbol) = scope.latest_at(name, line) {
                return Ok(SymbolRecord::new(symbol, id, scope.depth()));
            }
            next = scope.parent();
        }
        Err(SymbolError::MissingBinding)
    }

    /// Find the earliest version of `name` in the open scopes, ignoring the
    /// current position. This accepts uses of names that are defined further
    /// down the script.
    pub fn lookup_declared(&self, name: &str) -> SymbolRecordResult<'_> {
        for (level, id) in self.live.iter().enumerate().rev() {
            if let Some(symbol) = self.scopes[id.0].versions(name).first() {
                return Ok(SymbolRecord::new(symbol, *id, level));
            }
        }
        Err(SymbolError::MissingBinding)
    }

    pub fn seek(&mut self, line: usize) {
        self.position = line;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_scope(&self) -> ScopeId {
        // The global scope is never popped.
        self.live.last().copied().unwrap_or(ScopeId(0))
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    /// Every scope ever opened, in the order they were opened.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// The number of open scopes.
    pub fn number_of_scopes(&self) -> usize {
        self.live.len()
    }

    /// The type named in an annotation. Primitive names resolve even if the
    /// builtins were not loaded.
    pub fn resolve_type(&self, name: &TypeName) -> Option<SymbolType> {
        if let Some(kind) = PrimitiveKind::from_name(name.as_str()) {
            return Some(SymbolType::Primitive(kind));
        }
        let record = self
            .lookup(name.as_str())
            .or_else(|_| self.lookup_declared(name.as_str()))
            .ok()?;
        match record.symbol_type() {
            typ @ SymbolType::Class(_) => Some(typ.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number() -> SymbolType {
        SymbolType::Primitive(PrimitiveKind::Int)
    }

    fn string() -> SymbolType {
        SymbolType::Primitive(PrimitiveKind::Str)
    }

    #[test]
    fn versions_stay_sorted() {
        let mut table = PersistentSymbolTable::new();
        table.define(Symbol::new("b", string(), 5));
        table.define(Symbol::new("b", number(), 2));
        table.define(Symbol::new("b", number(), 2));
        let lines: Vec<usize> = table
            .scope(table.current_scope())
            .versions("b")
            .iter()
            .map(|s| s.defined_at())
            .collect();
        assert_eq!(lines, vec![2, 5]);
    }

    #[test]
    fn global_scope_cannot_be_popped() {
        let mut table = PersistentSymbolTable::new();
        assert_eq!(table.pop(3), Err(SymbolError::ScopeUnderflow));
        table.push("f", 1);
        assert!(table.pop(3).is_ok());
        assert_eq!(table.number_of_scopes(), 1);
    }

    #[test]
    fn position_hides_later_versions() {
        let mut table = PersistentSymbolTable::new();
        table.define(Symbol::new("x", number(), 4));
        table.seek(3);
        assert_eq!(table.lookup("x"), Err(SymbolError::MissingBinding));
        assert!(table.lookup_declared("x").is_ok());
        table.seek(4);
        assert_eq!(table.lookup("x").unwrap().symbol_type(), &number());
    }

    #[test]
    fn inner_scope_shadows_outer() {
        let mut table = PersistentSymbolTable::new();
        table.define(Symbol::new("x", number(), 1));
        table.push("f", 2);
        table.define(Symbol::new("x", string(), 3));
        let record = table.lookup("x").unwrap();
        assert_eq!(record.symbol_type(), &string());
        assert_eq!(record.scope_level(), 1);
        table.pop(4).unwrap();
        assert_eq!(table.lookup("x").unwrap().symbol_type(), &number());
    }
}
