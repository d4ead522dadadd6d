//! Decorator trait and supporting types.
//!
//! A decorator owns one kind of dynamically-defined metadata. It picks the
//! classes it cares about ([`Decorator::gather`]) and writes declarations for
//! one class at a time into the shared tree ([`Decorator::decorate`]).

use crate::error::ReflectionError;
use crate::model::ModelClass;
use crate::tree::DeclarationTree;

/// Static metadata for a decorator.
#[derive(Debug)]
pub struct DecoratorMeta {
    /// Decorator name, e.g. "attachments". Used by config to disable it.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Trait that every decorator must implement.
pub trait Decorator: Send + Sync {
    /// Static metadata for this decorator.
    fn meta(&self) -> &DecoratorMeta;

    /// Pick the classes this decorator should visit, in visiting order.
    fn gather<'a>(&self, classes: &[&'a dyn ModelClass]) -> Vec<&'a dyn ModelClass>;

    /// Write declarations for `class` into `tree`.
    ///
    /// Reflection failures are returned to the caller, which decides how to
    /// isolate them.
    fn decorate(&self, tree: &DeclarationTree, class: &dyn ModelClass) -> Result<(), ReflectionError>;
}
