//! Class snapshots
//!
//! The host process dumps its model classes and their attachment reflections
//! to JSON; this module loads that dump and serves it as a [`ClassEnumerator`].
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "Post", "attachments": [{ "name": "photo", "macro": "has_one_attached" }] },
//!     { "name": "ApplicationRecord", "abstract": true },
//!     { "name": "Legacy", "attachments": [], "reflection_error": "table missing" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::model::{AttachmentReflection, Cardinality, ClassEnumerator, ModelClass, StaticClass};

/// Root of a snapshot document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotDocument {
    /// Every class the host reported
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

/// One class in the dump
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassEntry {
    /// Fully-qualified class path
    pub name: String,

    /// Abstract base class
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    /// Attachment reflections; absent when the class has no attachment support
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<AttachmentEntry>>,

    /// Set when the host could not reflect on this class
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection_error: Option<String>,
}

/// One attachment reflection in the dump
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttachmentEntry {
    /// Attribute name
    pub name: String,
    /// Reflection macro, e.g. `has_one_attached`
    #[serde(rename = "macro")]
    pub kind: String,
}

impl ClassEntry {
    fn to_class(&self) -> StaticClass {
        let mut class = StaticClass::new(&self.name);
        if self.is_abstract {
            class = class.abstract_class();
        }
        if let Some(message) = &self.reflection_error {
            class = class.with_reflection_error(message.clone());
        } else if let Some(attachments) = &self.attachments {
            class = class.with_attachments(
                attachments
                    .iter()
                    .map(|a| AttachmentReflection::new(&a.name, Cardinality::from_tag(&a.kind)))
                    .collect(),
            );
        }
        class
    }
}

/// Classes loaded from a snapshot, in document order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    classes: Vec<StaticClass>,
}

impl Snapshot {
    /// Load a snapshot from a file
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a snapshot from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, SnapshotError> {
        let document: SnapshotDocument = serde_json::from_str(content)?;
        Self::from_document(&document)
    }

    /// Build from an already-parsed document. Class paths must be unique
    /// constant paths.
    pub fn from_document(document: &SnapshotDocument) -> Result<Self, SnapshotError> {
        let mut seen = HashSet::new();
        for entry in &document.classes {
            if !is_constant_path(&entry.name) {
                return Err(SnapshotError::InvalidClassName(entry.name.clone()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(SnapshotError::DuplicateClass(entry.name.clone()));
            }
        }
        Ok(Self {
            classes: document.classes.iter().map(ClassEntry::to_class).collect(),
        })
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// `Post`, `Admin::BlogPost`: `::`-separated segments, each starting with an
/// uppercase ASCII letter. Class paths become file paths, so nothing else gets in.
fn is_constant_path(name: &str) -> bool {
    name.split("::").all(|segment| {
        let mut chars = segment.chars();
        chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

impl ClassEnumerator for Snapshot {
    fn classes(&self) -> Vec<&dyn ModelClass> {
        self.classes.iter().map(|c| c as &dyn ModelClass).collect()
    }
}
