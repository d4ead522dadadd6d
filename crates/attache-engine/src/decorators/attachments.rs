//! Decorator: attachments
//!
//! Declares a reader and a writer for every attachment on a model class:
//!
//! ```text
//! photo()                      -> AttachedOne   (single)
//! blogs()                      -> AttachedMany  (multiple)
//! photo=(attachable: Unknown)  -> Unknown
//! ```
//!
//! Writers are always `Unknown`: the host accepts many shapes of payload on
//! assignment and we don't try to type them.

use tracing::debug;

use crate::decorator::{Decorator, DecoratorMeta};
use crate::error::ReflectionError;
use crate::model::{AttachmentReflection, Cardinality, ModelClass};
use crate::selector;
use crate::signature::{DeclType, Parameter};
use crate::tree::DeclarationTree;

/// Writer parameter name.
pub const ATTACHABLE_PARAM: &str = "attachable";

/// Declares readers and writers for `has_one_attached` / `has_many_attached`.
pub struct Attachments;

static META: DecoratorMeta = DecoratorMeta {
    name: "attachments",
    description: "Reader and writer declarations for attached files",
};

/// Return type of the reader for a given cardinality.
pub fn classify(cardinality: &Cardinality) -> DeclType {
    match cardinality {
        Cardinality::Single => DeclType::AttachedOne,
        Cardinality::Multiple => DeclType::AttachedMany,
        Cardinality::Unknown(_) => DeclType::Unknown,
    }
}

impl Decorator for Attachments {
    fn meta(&self) -> &DecoratorMeta {
        &META
    }

    fn gather<'a>(&self, classes: &[&'a dyn ModelClass]) -> Vec<&'a dyn ModelClass> {
        selector::select(classes.iter().copied())
    }

    fn decorate(&self, tree: &DeclarationTree, class: &dyn ModelClass) -> Result<(), ReflectionError> {
        let reflector = class
            .attachment_reflector()?
            .ok_or_else(|| ReflectionError::Unsupported {
                class: class.path().to_string(),
                capability: "attachment",
            })?;

        let reflections = reflector.reflect_on_all_attachments()?;
        if reflections.is_empty() {
            return Ok(());
        }

        let node = tree.create_path_if_absent(class.path());
        for AttachmentReflection { name, cardinality } in &reflections {
            node.create_method(name, vec![], classify(cardinality));
            node.create_method(
                &format!("{}=", name),
                vec![Parameter::new(ATTACHABLE_PARAM, DeclType::Unknown)],
                DeclType::Unknown,
            );
        }

        debug!(
            class = class.path(),
            attachments = reflections.len(),
            "declared attachments"
        );
        Ok(())
    }
}
