//! Candidate selection: which classes get attachment declarations.

use std::collections::HashSet;

use tracing::debug;

use crate::model::ModelClass;

/// Filter every discovered class down to the attachment-capable concrete ones.
///
/// Each path is considered once: the first class reported under a path
/// decides, even if it is later dropped. Abstract classes are dropped next,
/// then classes without the attachment capability. A capability check that
/// fails counts as "not capable". The result is sorted by path.
pub fn select<'a, I>(classes: I) -> Vec<&'a dyn ModelClass>
where
    I: IntoIterator<Item = &'a dyn ModelClass>,
{
    let mut seen = HashSet::new();
    let mut selected: Vec<&'a dyn ModelClass> = classes
        .into_iter()
        .filter(|class| {
            let first = seen.insert(class.path().to_string());
            if !first {
                debug!(class = class.path(), "skipping duplicate path");
            }
            first
        })
        .filter(|class| {
            if class.is_abstract() {
                debug!(class = class.path(), "skipping abstract class");
                return false;
            }
            true
        })
        .filter(|class| is_attachment_capable(*class))
        .collect();

    selected.sort_by(|a, b| a.path().cmp(b.path()));
    selected
}

fn is_attachment_capable(class: &dyn ModelClass) -> bool {
    match class.attachment_reflector() {
        Ok(Some(_)) => true,
        Ok(None) => false,
        Err(err) => {
            debug!(class = class.path(), error = %err, "capability check failed, skipping");
            false
        }
    }
}
