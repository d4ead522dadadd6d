//! Attache Engine
//!
//! Synthesizes type declarations for dynamically-defined model attributes
//! (file attachments) from reflection metadata, so a static type checker can
//! see methods that never appear in source.
//!
//! - **Model**: the host's classes and their attachment reflections (`model`)
//! - **Selection**: which classes take part (`selector`)
//! - **Decoration**: classes → method declarations (`decorator`, `decorators`)
//! - **Tree**: shared, path-keyed declaration output (`tree`)
//! - **Pipeline**: per-class runs with failure isolation (`pipeline`)
//! - **Rendering**: tree → RBI files (`render`)
//!
//! # Example
//!
//! ```rust,ignore
//! use attache_engine::{ClassEnumerator, DeclarationTree, Pipeline, RenderConfig, Snapshot};
//!
//! let snapshot = Snapshot::from_str(json)?;
//! let tree = DeclarationTree::new();
//! let report = Pipeline::new().run(&tree, &snapshot.classes());
//! for file in attache_engine::render::render_tree(&tree, &RenderConfig::default()) {
//!     println!("{}:\n{}", file.relative_path.display(), file.contents);
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod decorator;
pub mod decorators;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod selector;
pub mod signature;
pub mod snapshot;
pub mod tree;

pub use config::{Config, GenerateConfig, RenderConfig};
pub use decorator::{Decorator, DecoratorMeta};
pub use error::{ConfigError, ReflectionError, SnapshotError};
pub use model::{
    AttachmentReflection, AttachmentReflector, Cardinality, ClassEnumerator, ModelClass,
    StaticClass,
};
pub use pipeline::{DecorationFailure, GenerationReport, Pipeline};
pub use render::RenderedFile;
pub use signature::{DeclType, MethodSignature, Parameter};
pub use snapshot::Snapshot;
pub use tree::{DeclarationTree, Scope, ScopedNode};
