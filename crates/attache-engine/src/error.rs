//! Engine errors

use thiserror::Error;

/// Errors raised while reading reflection metadata from a class.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReflectionError {
    /// The host failed to answer a reflection query
    #[error("Reflection failed for {class}: {message}")]
    Failed {
        /// Class path the query was made on
        class: String,
        /// Host-provided failure message
        message: String,
    },

    /// The class does not expose the reflection capability it was asked for
    #[error("{class} does not support {capability} reflection")]
    Unsupported {
        /// Class path
        class: String,
        /// Name of the missing capability
        capability: &'static str,
    },
}

impl ReflectionError {
    /// Shorthand for [`ReflectionError::Failed`].
    pub fn failed(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            class: class.into(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while loading `attache.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Semantically invalid value
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Errors that can occur while loading a class snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to read snapshot file
    #[error("Failed to read snapshot: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse JSON
    #[error("Failed to parse snapshot: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Two classes in the snapshot share a path
    #[error("Duplicate class in snapshot: {0}")]
    DuplicateClass(String),

    /// A class name that is not a constant path such as `Admin::Post`
    #[error("Invalid class name in snapshot: {0:?}")]
    InvalidClassName(String),
}
