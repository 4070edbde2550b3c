// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Type tags carried by symbols.
//!
//! Types are deliberately shallow. A class is a name plus the signatures of
//! its methods, and the return and parameter types of a signature are
//! [`TypeName`]s that are resolved through the symbol table only when they are
//! needed. So a class may mention itself, or a class declared further down
//! the script.

use std::fmt;

use boolenum::BoolEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Int,
    Float,
    Complex,
    Str,
    Bool,
    List,
    Dict,
    NoneType,
    /// Anything at all. Imported names that we know nothing about get this type.
    Any,
}

impl PrimitiveKind {
    /// The name of the type as written in a script.
    pub fn name(&self) -> &'static str {
        use PrimitiveKind::*;
        match self {
            Int => "int",
            Float => "float",
            Complex => "complex",
            Str => "str",
            Bool => "bool",
            List => "list",
            Dict => "dict",
            NoneType => "None",
            Any => "object",
        }
    }

    pub fn from_name(name: &str) -> Option<PrimitiveKind> {
        use PrimitiveKind::*;
        let kind = match name {
            "int" => Int,
            "float" => Float,
            "complex" => Complex,
            "str" => Str,
            "bool" => Bool,
            "list" => List,
            "dict" => Dict,
            "None" => NoneType,
            "object" => Any,
            _ => return None,
        };
        Some(kind)
    }

    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Complex,
        PrimitiveKind::Str,
        PrimitiveKind::Bool,
        PrimitiveKind::List,
        PrimitiveKind::Dict,
        PrimitiveKind::NoneType,
        PrimitiveKind::Any,
    ];
}

/// The name of a class or primitive type, as written in an annotation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeName(String);

impl TypeName {
    pub fn new<T: ToString>(name: T) -> TypeName {
        TypeName(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> TypeName {
        TypeName::new(name)
    }
}

#[derive(BoolEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IsVariadic {
    True,
    False,
}

#[derive(BoolEnum, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IsOptional {
    True,
    False,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamSpec {
    name: String,
    type_name: Option<TypeName>,
    optional: IsOptional,
}

impl ParamSpec {
    /// A parameter with no annotation accepts anything.
    pub fn new<T: ToString>(name: T, type_name: Option<TypeName>) -> ParamSpec {
        ParamSpec {
            name: name.to_string(),
            type_name,
            optional: IsOptional::False,
        }
    }

    /// A parameter with a default value.
    pub fn optional(mut self) -> ParamSpec {
        self.optional = IsOptional::True;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> Option<&TypeName> {
        self.type_name.as_ref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional.into()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    name: String,
    return_type: Option<TypeName>,
    params: Vec<ParamSpec>,
    variadic: IsVariadic,
}

impl MethodSignature {
    pub fn new<T: ToString>(name: T) -> MethodSignature {
        MethodSignature {
            name: name.to_string(),
            return_type: None,
            params: Vec::new(),
            variadic: IsVariadic::False,
        }
    }

    pub fn with_param(mut self, param: ParamSpec) -> MethodSignature {
        self.params.push(param);
        self
    }

    pub fn returning<T: Into<TypeName>>(mut self, return_type: T) -> MethodSignature {
        self.return_type = Some(return_type.into());
        self
    }

    /// Accept any number of arguments of any type.
    pub fn variadic(mut self) -> MethodSignature {
        self.variadic = IsVariadic::True;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> Option<&TypeName> {
        self.return_type.as_ref()
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<(usize, &ParamSpec)> {
        self.params.iter().enumerate().find(|(_, p)| p.name() == name)
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic.into()
    }

    /// The smallest and largest number of arguments accepted by a
    /// non-variadic signature.
    pub fn arity(&self) -> (usize, usize) {
        let required = self.params.iter().filter(|p| !p.is_optional()).count();
        (required, self.params.len())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> TypeName {
        TypeName(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassType {
    name: String,
    members: Vec<MethodSignature>,
}

impl ClassType {
    pub fn new<T: ToString>(name: T) -> ClassType {
        ClassType {
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: MethodSignature) -> ClassType {
        self.members.push(member);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[MethodSignature] {
        &self.members
    }

    pub fn member(&self, name: &str) -> Option<&MethodSignature> {
        self.members.iter().find(|m| m.name() == name)
    }

    pub fn constructor(&self) -> Option<&MethodSignature> {
        self.member("__init__")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SymbolType {
    Primitive(PrimitiveKind),
    /// A class, or an instance of the class.
    Class(ClassType),
    Method(MethodSignature),
}

impl SymbolType {
    pub fn any() -> SymbolType {
        SymbolType::Primitive(PrimitiveKind::Any)
    }

    /// The name used for the type in diagnostics.
    pub fn name(&self) -> &str {
        match self {
            SymbolType::Primitive(kind) => kind.name(),
            SymbolType::Class(class) => class.name(),
            SymbolType::Method(signature) => signature.name(),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, SymbolType::Primitive(PrimitiveKind::Any))
    }

    pub fn as_class(&self) -> Option<&ClassType> {
        match self {
            SymbolType::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Return `true` if a value of type `self` may be passed where `expected`
    /// is declared.
    pub fn is_compatible_with(&self, expected: &SymbolType) -> bool {
        use PrimitiveKind::*;
        if expected.is_any() || self.is_any() {
            return true;
        }
        match (self, expected) {
            (SymbolType::Primitive(Int), SymbolType::Primitive(Float | Complex)) => true,
            (SymbolType::Primitive(have), SymbolType::Primitive(want)) => have == want,
            (SymbolType::Class(have), SymbolType::Class(want)) => {
                have.name() == want.name()
                    || element_class(have.name()).is_some_and(|elem| elem == want.name())
            }
            _ => false,
        }
    }
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the class of the elements of a register class. A register is also
/// accepted wherever one of its elements is, since gates broadcast over
/// registers.
pub fn element_class(register: &str) -> Option<&'static str> {
    match register {
        "QuantumRegister" => Some("Qubit"),
        "ClassicalRegister" => Some("Clbit"),
        _ => None,
    }
}
