//! `attache decorators` — list registered decorators.

use std::path::Path;

use attache_engine::decorators::all_decorators;

use super::load_config;
use crate::output::{resolve_color_choice, StyledOutput};

pub fn execute(config: Option<&Path>, color: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let mut out = StyledOutput::new(resolve_color_choice(color));

    for decorator in all_decorators() {
        let meta = decorator.meta();
        if config.generate.is_disabled(meta.name) {
            out.warning(&format!("{:<16} {} (disabled)", meta.name, meta.description));
        } else {
            out.info(&format!("{:<16} {}", meta.name, meta.description));
        }
    }
    Ok(())
}
