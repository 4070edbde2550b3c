// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! The folded AST: a small tree of terms describing the simple statements of
//! a script, for consumers that do not want to deal with the syntax tree.
//!
//! Every leaf carries the [`Position`] of the source it was folded from.

use std::fmt;

use crate::position::Position;

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    expr: Term,
}

impl Statement {
    pub fn new(expr: Term) -> Statement {
        Statement { expr }
    }

    pub fn expr(&self) -> &Term {
        &self.expr
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Assignment(Assignment),
    Expression(Expression),
    VariableReference(VariableReference),
    MethodReference(MethodReference),
    ArrayReference(ArrayReference),
    Dictionary(Dictionary),
    Integer(Integer),
    Float(Float),
    Text(Text),
    Boolean(Boolean),
}

impl Term {
    /// The position of a leaf or a reference. Assignments and expressions
    /// report the position of their first term.
    pub fn position(&self) -> Option<Position> {
        match self {
            Term::Assignment(assignment) => assignment.target().position(),
            Term::Expression(expression) => expression.terms().first().and_then(|t| t.position()),
            Term::VariableReference(var) => Some(var.position()),
            Term::MethodReference(method) => Some(method.position()),
            Term::ArrayReference(array) => Some(array.position()),
            Term::Dictionary(dict) => Some(dict.position()),
            Term::Integer(int) => Some(int.position()),
            Term::Float(float) => Some(float.position()),
            Term::Text(text) => Some(text.position()),
            Term::Boolean(boolean) => Some(boolean.position()),
        }
    }
}

/// `target = value`. A chained assignment nests to the right:
/// `a = b = c` is `Assignment(a, Assignment(b, c))`.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    target: Box<Term>,
    value: Box<Term>,
}

impl Assignment {
    pub fn new(target: Term, value: Term) -> Assignment {
        Assignment {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    pub fn target(&self) -> &Term {
        &self.target
    }

    pub fn value(&self) -> &Term {
        &self.value
    }
}

/// A chain such as `qc.h(q[0])`, or the operands of an operator.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    pub fn new(terms: Vec<Term>) -> Expression {
        Expression { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariableReference {
    name: String,
    position: Position,
}

impl VariableReference {
    pub fn new<T: ToString>(name: T, position: Position) -> VariableReference {
        VariableReference {
            name: name.to_string(),
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodReference {
    name: String,
    args: Vec<Term>,
    position: Position,
}

impl MethodReference {
    pub fn new<T: ToString>(name: T, args: Vec<Term>, position: Position) -> MethodReference {
        MethodReference {
            name: name.to_string(),
            args,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Term] {
        &self.args
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayReference {
    name: String,
    index: i64,
    position: Position,
}

impl ArrayReference {
    pub fn new<T: ToString>(name: T, index: i64, position: Position) -> ArrayReference {
        ArrayReference {
            name: name.to_string(),
            index,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> i64 {
        self.index
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dictionary {
    position: Position,
}

impl Dictionary {
    pub fn new(position: Position) -> Dictionary {
        Dictionary { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

macro_rules! leaf {
    ($name:ident, $typ:ty) => {
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            value: $typ,
            position: Position,
        }

        impl $name {
            pub fn new(value: $typ, position: Position) -> $name {
                $name { value, position }
            }

            pub fn value(&self) -> &$typ {
                &self.value
            }

            pub fn position(&self) -> Position {
                self.position
            }
        }
    };
}

leaf!(Integer, i64);
leaf!(Float, f64);
leaf!(Text, String);
leaf!(Boolean, bool);

// A compact rendering, used in tests and by the demo. Positions are omitted.

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Statement({})", self.expr)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, terms: &[Term]) -> fmt::Result {
    f.write_str("[")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{term}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Assignment(a) => write!(f, "Assignment({}, {})", a.target(), a.value()),
            Term::Expression(e) => {
                f.write_str("Expression(")?;
                write_list(f, e.terms())?;
                f.write_str(")")
            }
            Term::VariableReference(v) => write!(f, "VariableReference({})", v.name()),
            Term::MethodReference(m) => {
                write!(f, "MethodReference({}, ", m.name())?;
                write_list(f, m.args())?;
                f.write_str(")")
            }
            Term::ArrayReference(a) => write!(f, "ArrayReference({}, {})", a.name(), a.index()),
            Term::Dictionary(_) => f.write_str("Dictionary"),
            Term::Integer(i) => write!(f, "Integer({})", i.value()),
            Term::Float(x) => write!(f, "Float({})", x.value()),
            Term::Text(t) => write!(f, "Text({:?})", t.value()),
            Term::Boolean(b) => write!(f, "Boolean({})", b.value()),
        }
    }
}
