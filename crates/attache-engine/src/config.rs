//! Generator configuration (attache.toml)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::signature::DeclType;

/// Top-level configuration, loaded from `attache.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Which classes and decorators take part in a run
    #[serde(default)]
    pub generate: GenerateConfig,

    /// How the tree is written out
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[generate]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GenerateConfig {
    /// Restrict the run to these class paths (empty = every class)
    #[serde(default)]
    pub only: Vec<String>,

    /// Class paths to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Decorator names to disable
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Worker threads used for decoration
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_jobs() -> usize {
    1
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            only: Vec::new(),
            exclude: Vec::new(),
            disabled: Vec::new(),
            jobs: default_jobs(),
        }
    }
}

impl GenerateConfig {
    /// Whether a decorator has been switched off.
    pub fn is_disabled(&self, decorator: &str) -> bool {
        self.disabled.iter().any(|name| name == decorator)
    }

    /// Whether `only` and `exclude` let this class through.
    pub fn admits(&self, class_path: &str) -> bool {
        if !self.only.is_empty() && !self.only.iter().any(|p| p == class_path) {
            return false;
        }
        !self.exclude.iter().any(|p| p == class_path)
    }
}

/// `[render]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Sigil strictness written in the file header
    #[serde(default = "default_strictness")]
    pub strictness: String,

    /// Comment written below the `# typed:` header (empty to disable)
    #[serde(default = "default_banner")]
    pub banner: String,

    /// Spelling of the single-attachment handle type
    #[serde(default = "default_attached_one")]
    pub attached_one: String,

    /// Spelling of the multi-attachment handle type
    #[serde(default = "default_attached_many")]
    pub attached_many: String,

    /// Spelling of the "no stronger type known" marker
    #[serde(default = "default_unknown")]
    pub unknown: String,
}

fn default_strictness() -> String {
    "strong".to_string()
}

fn default_banner() -> String {
    "DO NOT EDIT MANUALLY".to_string()
}

fn default_attached_one() -> String {
    "ActiveStorage::Attached::One".to_string()
}

fn default_attached_many() -> String {
    "ActiveStorage::Attached::Many".to_string()
}

fn default_unknown() -> String {
    "T.untyped".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            strictness: default_strictness(),
            banner: default_banner(),
            attached_one: default_attached_one(),
            attached_many: default_attached_many(),
            unknown: default_unknown(),
        }
    }
}

impl RenderConfig {
    /// How a declared type is spelled in the output.
    pub fn type_name(&self, ty: DeclType) -> &str {
        match ty {
            DeclType::AttachedOne => &self.attached_one,
            DeclType::AttachedMany => &self.attached_many,
            DeclType::Unknown => &self.unknown,
        }
    }
}

impl Config {
    /// Load config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generate.jobs == 0 {
            return Err(ConfigError::ValidationError(
                "generate.jobs must be at least 1".to_string(),
            ));
        }
        for (key, value) in [
            ("render.strictness", &self.render.strictness),
            ("render.attached_one", &self.render.attached_one),
            ("render.attached_many", &self.render.attached_many),
            ("render.unknown", &self.render.unknown),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.generate.jobs, 1);
        assert_eq!(config.render.strictness, "strong");
        assert_eq!(config.render.type_name(DeclType::AttachedOne), "ActiveStorage::Attached::One");
        assert_eq!(config.render.type_name(DeclType::AttachedMany), "ActiveStorage::Attached::Many");
        assert_eq!(config.render.type_name(DeclType::Unknown), "T.untyped");
    }

    #[test]
    fn test_override_values() {
        let config = Config::from_str(
            r#"
[generate]
only = ["Post"]
disabled = ["attachments"]
jobs = 4

[render]
strictness = "true"
unknown = "Object"
"#,
        )
        .unwrap();

        assert_eq!(config.generate.only, vec!["Post"]);
        assert!(config.generate.is_disabled("attachments"));
        assert_eq!(config.generate.jobs, 4);
        assert_eq!(config.render.strictness, "true");
        assert_eq!(config.render.type_name(DeclType::Unknown), "Object");
        // Untouched keys keep their defaults
        assert_eq!(config.render.attached_one, "ActiveStorage::Attached::One");
    }

    #[test]
    fn test_admits() {
        let mut generate = GenerateConfig::default();
        assert!(generate.admits("Post"));

        generate.exclude.push("Post".to_string());
        assert!(!generate.admits("Post"));
        assert!(generate.admits("User"));

        generate.only.push("User".to_string());
        assert!(generate.admits("User"));
        assert!(!generate.admits("Comment"));
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let err = Config::from_str("[generate]\njobs = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_str("[render]\ncolour = \"red\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attache.toml");
        std::fs::write(&path, "[generate]\nexclude = [\"Legacy\"]\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.generate.exclude, vec!["Legacy"]);

        let missing = Config::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::IoError(_)));
    }
}
