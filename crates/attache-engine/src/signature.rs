//! Method declaration records stored in the declaration tree.

use std::fmt;

/// A type the engine can declare.
///
/// These are symbolic: the renderer decides how each one is spelled in the
/// output format (see [`RenderConfig`](crate::config::RenderConfig)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclType {
    /// Handle to a single attached resource.
    AttachedOne,
    /// Handle to a collection of attached resources.
    AttachedMany,
    /// No stronger type is known.
    Unknown,
}

impl fmt::Display for DeclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclType::AttachedOne => write!(f, "AttachedOne"),
            DeclType::AttachedMany => write!(f, "AttachedMany"),
            DeclType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A named, typed parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Declared type
    pub ty: DeclType,
}

impl Parameter {
    /// Create a new parameter.
    pub fn new(name: impl Into<String>, ty: DeclType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A single method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Method name, including a trailing `=` for writers.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Declared return type.
    pub return_type: DeclType,
}

impl MethodSignature {
    /// Create a new signature.
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, return_type: DeclType) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
        }
    }

    /// Whether this is a writer (`name=`).
    pub fn is_setter(&self) -> bool {
        self.name.ends_with('=')
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", param.name, param.ty)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}
