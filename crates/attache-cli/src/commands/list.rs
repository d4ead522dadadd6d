//! `attache list` — show which classes each decorator would visit.

use std::path::Path;

use anyhow::Context;
use attache_engine::{ClassEnumerator, ModelClass, Pipeline, Snapshot};

use super::load_config;
use crate::output::{resolve_color_choice, StyledOutput};

pub fn execute(snapshot: &Path, config: Option<&Path>, color: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let snapshot = Snapshot::from_file(snapshot)
        .with_context(|| format!("loading snapshot {}", snapshot.display()))?;
    let classes = snapshot.classes();
    let pipeline = Pipeline::with_config(config.generate);

    let mut out = StyledOutput::new(resolve_color_choice(color));
    for decorator in pipeline.active_decorators() {
        let candidates = pipeline.candidates(decorator, &classes);
        out.bold(&format!("{} ({} classes)", decorator.meta().name, candidates.len()));
        for class in candidates {
            out.plain(&format!("  {:<40} {}", class.path(), describe(class)));
        }
    }
    Ok(())
}

fn describe(class: &dyn ModelClass) -> String {
    match class.attachment_reflector() {
        Ok(Some(reflector)) => match reflector.reflect_on_all_attachments() {
            Ok(reflections) if reflections.is_empty() => "no attachments".to_string(),
            Ok(reflections) => reflections
                .iter()
                .map(|r| format!("{} ({})", r.name, r.cardinality))
                .collect::<Vec<_>>()
                .join(", "),
            Err(err) => format!("error: {}", err),
        },
        Ok(None) => "-".to_string(),
        Err(err) => format!("error: {}", err),
    }
}
