//! `attache generate` — write (or verify) declaration files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use attache_engine::render::{file_path_for, render_tree};
use attache_engine::{ClassEnumerator, DeclarationTree, Pipeline, RenderedFile, Snapshot};
use tracing::{debug, info};

use super::load_config;
use crate::output::{resolve_color_choice, StyledOutput};

/// Everything `generate` needs from the command line.
pub struct GenerateOptions {
    pub snapshot: PathBuf,
    pub out_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub only: Vec<String>,
    pub exclude: Vec<String>,
    pub jobs: Option<usize>,
    pub check: bool,
}

pub fn execute(opts: GenerateOptions, color: Option<&str>) -> anyhow::Result<()> {
    // 1. Config file, then command-line overrides
    let mut config = load_config(opts.config.as_deref())?;
    config.generate.only.extend(opts.only);
    config.generate.exclude.extend(opts.exclude);
    if let Some(jobs) = opts.jobs {
        config.generate.jobs = jobs;
    }
    config.validate()?;

    // 2. Decorate every class in the snapshot
    let snapshot = Snapshot::from_file(&opts.snapshot)
        .with_context(|| format!("loading snapshot {}", opts.snapshot.display()))?;
    let tree = DeclarationTree::new();
    let report = Pipeline::with_config(config.generate.clone()).run(&tree, &snapshot.classes());
    let files = render_tree(&tree, &config.render);

    // Stale files are only pruned on full runs; a filtered run can't tell
    // which of the other files are still current.
    let prune = config.generate.only.is_empty();
    // Classes that failed this run keep whatever file they had.
    let keep: BTreeSet<PathBuf> = report
        .failures
        .iter()
        .map(|failure| file_path_for(&failure.class))
        .collect();
    let mut out = StyledOutput::new(resolve_color_choice(color));

    // 3. Write or verify
    let drifted = if opts.check {
        let drift = check_files(&opts.out_dir, &files, prune, &keep)?;
        for entry in &drift {
            out.warning(&entry.to_string());
        }
        if drift.is_empty() {
            out.success(&format!("{} file(s) up to date.", files.len()));
        }
        !drift.is_empty()
    } else {
        let summary = write_files(&opts.out_dir, &files, prune, &keep)?;
        out.success(&format!(
            "Wrote {} file(s), {} unchanged, {} removed.",
            summary.written, summary.unchanged, summary.removed
        ));
        false
    };

    // 4. Failures
    for failure in &report.failures {
        out.stderr_error(&format!(
            "[{}] {}: {}",
            failure.decorator, failure.class, failure.error
        ));
    }

    if drifted {
        bail!("declaration files in {} are out of date", opts.out_dir.display());
    }
    if !report.is_success() {
        bail!("{} class(es) could not be decorated", report.failures.len());
    }
    Ok(())
}

/// Counts from a write pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub unchanged: usize,
    pub removed: usize,
}

/// Write rendered files under `out_dir`, skipping files whose contents match.
///
/// With `prune`, `.rbi` files under `out_dir` that were not generated are
/// removed, except those listed in `keep` (relative paths).
pub fn write_files(
    out_dir: &Path,
    files: &[RenderedFile],
    prune: bool,
    keep: &BTreeSet<PathBuf>,
) -> anyhow::Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    for file in files {
        let path = out_dir.join(&file.relative_path);
        if std::fs::read_to_string(&path).ok().as_deref() == Some(file.contents.as_str()) {
            summary.unchanged += 1;
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(class = %file.class, path = %path.display(), "wrote declarations");
        summary.written += 1;
    }

    if prune {
        for stale in stale_files(out_dir, files, keep)? {
            let path = out_dir.join(&stale);
            std::fs::remove_file(&path).with_context(|| format!("removing {}", path.display()))?;
            info!(path = %path.display(), "removed stale declarations");
            summary.removed += 1;
        }
    }

    Ok(summary)
}

/// A difference between generated output and what's on disk.
#[derive(Debug, PartialEq, Eq)]
pub enum Drift {
    /// Would be created
    Missing(PathBuf),
    /// Would be rewritten
    Changed(PathBuf),
    /// Would be removed
    Stale(PathBuf),
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Drift::Missing(path) => write!(f, "missing: {}", path.display()),
            Drift::Changed(path) => write!(f, "changed: {}", path.display()),
            Drift::Stale(path) => write!(f, "stale:   {}", path.display()),
        }
    }
}

/// Compare rendered files against `out_dir` without touching it.
pub fn check_files(
    out_dir: &Path,
    files: &[RenderedFile],
    prune: bool,
    keep: &BTreeSet<PathBuf>,
) -> anyhow::Result<Vec<Drift>> {
    let mut drift = Vec::new();

    for file in files {
        let path = out_dir.join(&file.relative_path);
        match std::fs::read_to_string(&path) {
            Ok(existing) if existing == file.contents => {}
            Ok(_) => drift.push(Drift::Changed(file.relative_path.clone())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                drift.push(Drift::Missing(file.relative_path.clone()))
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        }
    }

    if prune {
        drift.extend(stale_files(out_dir, files, keep)?.into_iter().map(Drift::Stale));
    }
    Ok(drift)
}

/// `.rbi` files under `out_dir` (relative paths) that are neither in `files` nor in `keep`.
fn stale_files(
    out_dir: &Path,
    files: &[RenderedFile],
    keep: &BTreeSet<PathBuf>,
) -> anyhow::Result<Vec<PathBuf>> {
    if !out_dir.is_dir() {
        return Ok(Vec::new());
    }
    let generated: BTreeSet<&Path> = files.iter().map(|f| f.relative_path.as_path()).collect();

    let mut existing = Vec::new();
    collect_rbi_in_dir(out_dir, out_dir, &mut existing)?;
    existing.retain(|path| !generated.contains(path.as_path()) && !keep.contains(path));
    existing.sort();
    Ok(existing)
}

/// Recursively collect .rbi files, relative to `root`.
fn collect_rbi_in_dir(root: &Path, dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_rbi_in_dir(root, &path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("rbi") {
            files.push(path.strip_prefix(root)?.to_path_buf());
        }
    }
    Ok(())
}
