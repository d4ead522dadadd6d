//! CLI subcommands.

pub mod decorators;
pub mod generate;
pub mod list;

use std::path::Path;

use anyhow::Context;
use attache_engine::Config;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "attache.toml";

/// Load the explicit config file, or `./attache.toml` if it exists, or defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG);
            if fallback.is_file() {
                Config::from_file(fallback)
                    .with_context(|| format!("loading config {}", fallback.display()))
            } else {
                Ok(Config::default())
            }
        }
    }
}
