//! Host data-model surface.
//!
//! The engine never walks the host's class hierarchy itself. It consumes
//! classes through [`ModelClass`], and asks each one for the attachment
//! capability through [`ModelClass::attachment_reflector`] instead of probing
//! for methods at runtime.

use std::fmt;

use crate::error::ReflectionError;

/// How many resources an attachment holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one attached resource (`has_one_attached`).
    Single,
    /// A collection of attached resources (`has_many_attached`).
    Multiple,
    /// Anything the host reported that we don't recognise. Keeps the raw tag.
    Unknown(String),
}

impl Cardinality {
    /// Parse the host's reflection tag. Unrecognised tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "single" | "has_one_attached" => Cardinality::Single,
            "multiple" | "has_many_attached" => Cardinality::Multiple,
            other => Cardinality::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::Single => write!(f, "single"),
            Cardinality::Multiple => write!(f, "multiple"),
            Cardinality::Unknown(tag) => write!(f, "unknown({})", tag),
        }
    }
}

/// One dynamically-defined attachment on a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentReflection {
    /// Attribute name, unique per class.
    pub name: String,
    /// Single or multiple.
    pub cardinality: Cardinality,
}

impl AttachmentReflection {
    /// Create a new reflection record.
    pub fn new(name: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            cardinality,
        }
    }
}

/// Capability: a class that can enumerate its attachment reflections.
pub trait AttachmentReflector: Send + Sync {
    /// All attachment reflections, in the order the host declares them.
    fn reflect_on_all_attachments(&self) -> Result<Vec<AttachmentReflection>, ReflectionError>;
}

/// A class as seen by the host's reflection system.
pub trait ModelClass: Send + Sync {
    /// Fully-qualified class path, e.g. `Admin::Post`.
    fn path(&self) -> &str;

    /// Whether the class is an abstract base rather than a concrete entity.
    fn is_abstract(&self) -> bool;

    /// The attachment capability, if the class has one.
    ///
    /// `Ok(None)` means the class simply doesn't support attachments. An `Err`
    /// means the check itself blew up; selection treats both the same way.
    fn attachment_reflector(&self) -> Result<Option<&dyn AttachmentReflector>, ReflectionError> {
        Ok(None)
    }
}

impl fmt::Debug for dyn ModelClass + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("path", &self.path())
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

/// Source of every class loaded in the host process.
pub trait ClassEnumerator {
    /// Every known class, relevant to attachments or not.
    fn classes(&self) -> Vec<&dyn ModelClass>;
}

/// In-memory class, used by the snapshot loader and in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticClass {
    path: String,
    is_abstract: bool,
    attachments: Option<Result<Vec<AttachmentReflection>, String>>,
}

impl StaticClass {
    /// A concrete class without the attachment capability.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_abstract: false,
            attachments: None,
        }
    }

    /// Mark the class abstract.
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Give the class the attachment capability with these reflections.
    pub fn with_attachments(mut self, attachments: Vec<AttachmentReflection>) -> Self {
        self.attachments = Some(Ok(attachments));
        self
    }

    /// Shorthand for adding one reflection.
    pub fn attach(mut self, name: &str, cardinality: Cardinality) -> Self {
        let reflection = AttachmentReflection::new(name, cardinality);
        match &mut self.attachments {
            Some(Ok(list)) => list.push(reflection),
            _ => self.attachments = Some(Ok(vec![reflection])),
        }
        self
    }

    /// The class is attachment-capable but reading its reflections fails.
    pub fn with_reflection_error(mut self, message: impl Into<String>) -> Self {
        self.attachments = Some(Err(message.into()));
        self
    }
}

impl ModelClass for StaticClass {
    fn path(&self) -> &str {
        &self.path
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn attachment_reflector(&self) -> Result<Option<&dyn AttachmentReflector>, ReflectionError> {
        Ok(self.attachments.as_ref().map(|_| self as &dyn AttachmentReflector))
    }
}

impl AttachmentReflector for StaticClass {
    fn reflect_on_all_attachments(&self) -> Result<Vec<AttachmentReflection>, ReflectionError> {
        match &self.attachments {
            Some(Ok(list)) => Ok(list.clone()),
            Some(Err(message)) => Err(ReflectionError::failed(&self.path, message.clone())),
            None => Err(ReflectionError::Unsupported {
                class: self.path.clone(),
                capability: "attachment",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_tags() {
        assert_eq!(Cardinality::from_tag("single"), Cardinality::Single);
        assert_eq!(Cardinality::from_tag("has_one_attached"), Cardinality::Single);
        assert_eq!(Cardinality::from_tag("multiple"), Cardinality::Multiple);
        assert_eq!(Cardinality::from_tag("has_many_attached"), Cardinality::Multiple);
        assert_eq!(
            Cardinality::from_tag("has_some_attached"),
            Cardinality::Unknown("has_some_attached".to_string())
        );
    }

    #[test]
    fn test_static_class_without_capability() {
        let class = StaticClass::new("Comment");
        assert!(class.attachment_reflector().unwrap().is_none());
        assert!(matches!(
            class.reflect_on_all_attachments(),
            Err(ReflectionError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_static_class_attach_builder() {
        let class = StaticClass::new("Post")
            .attach("photo", Cardinality::Single)
            .attach("blogs", Cardinality::Multiple);

        let reflector = class.attachment_reflector().unwrap().unwrap();
        let names: Vec<_> = reflector
            .reflect_on_all_attachments()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["photo", "blogs"]);
    }

    #[test]
    fn test_static_class_reflection_error() {
        let class = StaticClass::new("Broken").with_reflection_error("boom");
        let reflector = class.attachment_reflector().unwrap().unwrap();
        let err = reflector.reflect_on_all_attachments().unwrap_err();
        assert_eq!(err, ReflectionError::failed("Broken", "boom"));
        assert_eq!(err.to_string(), "Reflection failed for Broken: boom");
    }
}
