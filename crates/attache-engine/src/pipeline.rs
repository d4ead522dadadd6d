//! Generation pipeline: runs every enabled decorator over the discovered classes.
//!
//! Each class is decorated on its own: a class whose reflection blows up is
//! recorded in the [`GenerationReport`] and the run moves on to the next one.

use crossbeam::channel;
use tracing::{debug, info, warn};

use crate::config::GenerateConfig;
use crate::decorator::Decorator;
use crate::decorators;
use crate::error::ReflectionError;
use crate::model::ModelClass;
use crate::tree::DeclarationTree;

/// A class that could not be decorated.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationFailure {
    /// Name of the decorator that failed
    pub decorator: &'static str,
    /// Class path
    pub class: String,
    /// What went wrong
    pub error: ReflectionError,
}

/// Outcome of a generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of (decorator, class) visits that succeeded, no-ops included.
    pub decorated: usize,
    /// Visits that failed, sorted by decorator then class path.
    pub failures: Vec<DecorationFailure>,
    /// Class paths present in the tree once the run finished, sorted.
    pub paths: Vec<String>,
}

impl GenerationReport {
    /// Whether every visit succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs decorators over classes and collects the result into a tree.
pub struct Pipeline {
    decorators: Vec<Box<dyn Decorator>>,
    config: GenerateConfig,
}

impl Pipeline {
    /// Pipeline with all built-in decorators and default settings.
    pub fn new() -> Self {
        Self::with_config(GenerateConfig::default())
    }

    /// Pipeline with all built-in decorators.
    pub fn with_config(config: GenerateConfig) -> Self {
        Self::with_decorators(decorators::all_decorators(), config)
    }

    /// Pipeline with an explicit decorator set.
    pub fn with_decorators(decorators: Vec<Box<dyn Decorator>>, config: GenerateConfig) -> Self {
        Self { decorators, config }
    }

    /// Decorators that are not disabled by config.
    pub fn active_decorators(&self) -> impl Iterator<Item = &dyn Decorator> {
        self.decorators
            .iter()
            .map(|d| -> &dyn Decorator { d.as_ref() })
            .filter(|d| !self.config.is_disabled(d.meta().name))
    }

    /// Classes `decorator` would visit, after `only`/`exclude` filtering.
    pub fn candidates<'a>(
        &self,
        decorator: &dyn Decorator,
        classes: &[&'a dyn ModelClass],
    ) -> Vec<&'a dyn ModelClass> {
        decorator
            .gather(classes)
            .into_iter()
            .filter(|class| {
                let admitted = self.config.admits(class.path());
                if !admitted {
                    debug!(class = class.path(), "filtered out by config");
                }
                admitted
            })
            .collect()
    }

    /// Decorate every candidate class into `tree`.
    pub fn run(&self, tree: &DeclarationTree, classes: &[&dyn ModelClass]) -> GenerationReport {
        let mut report = GenerationReport::default();

        for decorator in self.active_decorators() {
            let candidates = self.candidates(decorator, classes);
            debug!(
                decorator = decorator.meta().name,
                candidates = candidates.len(),
                "running decorator"
            );

            let outcomes = if self.config.jobs > 1 && candidates.len() > 1 {
                decorate_parallel(decorator, tree, &candidates, self.config.jobs)
            } else {
                candidates
                    .iter()
                    .map(|class| decorate_one(decorator, tree, *class))
                    .collect()
            };

            for outcome in outcomes {
                match outcome {
                    Ok(()) => report.decorated += 1,
                    Err(failure) => report.failures.push(failure),
                }
            }
        }

        report
            .failures
            .sort_by(|a, b| (a.decorator, &a.class).cmp(&(b.decorator, &b.class)));
        report.paths = tree.paths();

        info!(
            decorated = report.decorated,
            failed = report.failures.len(),
            scopes = report.paths.len(),
            "generation finished"
        );
        report
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn decorate_one(
    decorator: &dyn Decorator,
    tree: &DeclarationTree,
    class: &dyn ModelClass,
) -> Result<(), DecorationFailure> {
    decorator.decorate(tree, class).map_err(|error| {
        warn!(
            decorator = decorator.meta().name,
            class = class.path(),
            error = %error,
            "decoration failed, skipping class"
        );
        DecorationFailure {
            decorator: decorator.meta().name,
            class: class.path().to_string(),
            error,
        }
    })
}

/// Spread classes over `jobs` scoped workers pulling from a shared queue.
fn decorate_parallel(
    decorator: &dyn Decorator,
    tree: &DeclarationTree,
    classes: &[&dyn ModelClass],
    jobs: usize,
) -> Vec<Result<(), DecorationFailure>> {
    let (work_tx, work_rx) = channel::bounded(classes.len());
    for class in classes {
        // Capacity equals the number of classes, so this never blocks.
        if work_tx.send(*class).is_err() {
            break;
        }
    }
    drop(work_tx);

    let (result_tx, result_rx) = channel::unbounded();
    std::thread::scope(|s| {
        for _ in 0..jobs.min(classes.len()) {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            s.spawn(move || {
                for class in work_rx.iter() {
                    if result_tx.send(decorate_one(decorator, tree, class)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    result_rx.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::DecoratorMeta;
    use crate::model::{Cardinality, StaticClass};
    use crate::signature::DeclType;

    /// Declares a `model_name` reader on every concrete class (test only).
    struct ModelName;

    static MODEL_NAME_META: DecoratorMeta = DecoratorMeta {
        name: "model-name",
        description: "Declares model_name (test only)",
    };

    impl Decorator for ModelName {
        fn meta(&self) -> &DecoratorMeta {
            &MODEL_NAME_META
        }

        fn gather<'a>(&self, classes: &[&'a dyn ModelClass]) -> Vec<&'a dyn ModelClass> {
            classes.iter().copied().filter(|c| !c.is_abstract()).collect()
        }

        fn decorate(
            &self,
            tree: &DeclarationTree,
            class: &dyn ModelClass,
        ) -> Result<(), ReflectionError> {
            tree.create_path_if_absent(class.path())
                .create_method("model_name", vec![], DeclType::Unknown);
            Ok(())
        }
    }

    fn fixture() -> Vec<StaticClass> {
        vec![
            StaticClass::new("Post")
                .attach("photo", Cardinality::Single)
                .attach("blogs", Cardinality::Multiple),
            StaticClass::new("Draft")
                .abstract_class()
                .attach("photo", Cardinality::Single),
            StaticClass::new("Comment").with_attachments(vec![]),
            StaticClass::new("Broken").with_reflection_error("boom"),
            StaticClass::new("User").attach("avatar", Cardinality::Single),
        ]
    }

    fn refs(classes: &[StaticClass]) -> Vec<&dyn ModelClass> {
        classes.iter().map(|c| c as &dyn ModelClass).collect()
    }

    #[test]
    fn test_run_isolates_failures() {
        let classes = fixture();
        let tree = DeclarationTree::new();
        let report = Pipeline::new().run(&tree, &refs(&classes));

        assert_eq!(report.decorated, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].class, "Broken");
        assert_eq!(report.failures[0].decorator, "attachments");
        assert!(!report.is_success());

        assert_eq!(tree.paths(), vec!["Post", "User"]);
        assert_eq!(report.paths, vec!["Post", "User"]);
        assert!(!tree.contains_path("Draft"));
        assert!(!tree.contains_path("Comment"));
    }

    #[test]
    fn test_only_and_exclude() {
        let classes = fixture();
        let tree = DeclarationTree::new();
        let config = GenerateConfig {
            only: vec!["Post".into(), "User".into(), "Broken".into()],
            exclude: vec!["Broken".into()],
            ..GenerateConfig::default()
        };
        let report = Pipeline::with_config(config).run(&tree, &refs(&classes));

        assert!(report.is_success());
        assert_eq!(tree.paths(), vec!["Post", "User"]);
    }

    #[test]
    fn test_disabled_decorator_does_nothing() {
        let classes = fixture();
        let tree = DeclarationTree::new();
        let config = GenerateConfig {
            disabled: vec!["attachments".into()],
            ..GenerateConfig::default()
        };
        let pipeline = Pipeline::with_config(config);
        assert_eq!(pipeline.active_decorators().count(), 0);

        let report = pipeline.run(&tree, &refs(&classes));
        assert_eq!(report.decorated, 0);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_decorators_share_nodes() {
        let classes = fixture();
        let tree = DeclarationTree::new();
        let pipeline = Pipeline::with_decorators(
            vec![
                Box::new(decorators::attachments::Attachments),
                Box::new(ModelName),
            ],
            GenerateConfig::default(),
        );
        pipeline.run(&tree, &refs(&classes));

        let post = tree.get("Post").unwrap();
        assert_eq!(post.len(), 5);
        assert!(post.method("model_name").is_some());
        assert!(post.method("photo=").is_some());
        // ModelName visits classes the attachment decorator skipped.
        assert!(tree.contains_path("Comment"));
        assert!(tree.get("Comment").unwrap().method("photo").is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut classes = fixture();
        for i in 0..32 {
            classes.push(
                StaticClass::new(format!("Model{}", i))
                    .attach("file", Cardinality::Single)
                    .attach("files", Cardinality::Multiple),
            );
        }

        let sequential = DeclarationTree::new();
        let seq_report = Pipeline::new().run(&sequential, &refs(&classes));

        let parallel = DeclarationTree::new();
        let config = GenerateConfig {
            jobs: 4,
            ..GenerateConfig::default()
        };
        let par_report = Pipeline::with_config(config).run(&parallel, &refs(&classes));

        assert_eq!(sequential.snapshot(), parallel.snapshot());
        assert_eq!(seq_report.decorated, par_report.decorated);
        assert_eq!(seq_report.failures, par_report.failures);
    }
}
