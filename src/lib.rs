use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use log::{debug, error, info, warn};

pub mod calls;
pub mod comments;
pub mod scan;

use crate::calls::CallStripper;
use crate::comments::strip_comments;

/// Configuration passed from the CLI layer (main.rs) into the core logic.
#[derive(Debug)]
pub struct Config {
    pub exts: HashSet<String>,
    pub paths: Vec<PathBuf>,
    pub follow_symlinks: bool,
    pub no_gitignore: bool,
    pub json: bool,
    pub excludes: Vec<String>,
    pub max_bytes: Option<u64>,
    pub strip_comments: bool,
    pub strip_calls: bool,
    pub calls: CallStripper,
    pub dry_run: bool,
}

/// One rewritten (or, in a dry run, rewritable) file.
#[derive(Debug, serde::Serialize)]
struct FileEntry {
    path: String,
    file_name: String,
    lines_before: usize,
    lines_after: usize,
}

/// Apply the enabled passes to one file's text: comments first, then calls.
pub fn transform(text: &str, cfg: &Config) -> String {
    let mut out = if cfg.strip_comments {
        strip_comments(text)
    } else {
        text.to_string()
    };

    if cfg.strip_calls {
        out = cfg.calls.strip(&out);
    }

    out
}

pub fn run_with_config(cfg: Config) -> Result<()> {
    let exclude_globset = build_exclude_globset(&cfg.excludes)?;

    let mut had_error = false;
    let mut scanned = 0usize;
    let mut changed: Vec<FileEntry> = Vec::new();

    if cfg.strip_calls {
        debug!("Call prefixes: {:?}", cfg.calls.prefixes());
    }

    for raw_root in &cfg.paths {
        // Canonicalise roots so running from arbitrary working dirs is reliable.
        let canon_root = match raw_root.canonicalize() {
            Ok(p) => p,
            Err(e) => {
                warn!("Skipping root {:?}: {}", raw_root, e);
                had_error = true;
                continue;
            }
        };

        let mut builder = WalkBuilder::new(&canon_root);
        builder.follow_links(cfg.follow_symlinks);
        builder.current_dir(canon_root.clone());

        if cfg.no_gitignore {
            builder
                .git_ignore(false)
                .git_exclude(false)
                .git_global(false)
                .ignore(false);
        } else {
            builder
                .git_ignore(true)
                .git_exclude(true)
                .git_global(true)
                .ignore(true)
                .require_git(false);
        }

        // The filter closure is 'static, so it gets its own copies.
        let root_for_filter = canon_root.clone();
        let exclude_globset = exclude_globset.clone();

        builder.filter_entry(move |entry: &DirEntry| {
            if entry.depth() == 0 {
                return true;
            }

            let Some(ref gs) = exclude_globset else {
                return true;
            };

            let path = entry.path();
            let rel = path.strip_prefix(&root_for_filter).unwrap_or(path);
            let rel_norm = normalize_for_matching(rel);

            if gs.is_match(&rel_norm) {
                return false;
            }

            // Directories also get a trailing slash so `build/**` prunes the subtree.
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false)
                && !rel_norm.ends_with('/')
            {
                let rel_dir = format!("{rel_norm}/");
                if gs.is_match(&rel_dir) {
                    return false;
                }
            }

            true
        });

        for result in builder.build() {
            let entry = match result {
                Ok(e) => e,
                Err(err) => {
                    error!("Walk error: {err}");
                    had_error = true;
                    continue;
                }
            };

            if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            if !matches_ext(path, &cfg.exts) {
                continue;
            }

            let display_path = make_display_path(&canon_root, path);

            if let Some(limit) = cfg.max_bytes
                && let Ok(meta) = fs::metadata(path)
                && meta.len() > limit
            {
                warn!(
                    "Skipping {} (size {} bytes > max {} bytes)",
                    display_path,
                    meta.len(),
                    limit
                );
                continue;
            }

            scanned += 1;
            match process_file(path, &display_path, &cfg) {
                Ok(Some(file)) => {
                    if !cfg.json {
                        let verb = if cfg.dry_run { "Would process" } else { "Processed" };
                        println!("{verb}: {}", file.path);
                    }
                    changed.push(file);
                }
                Ok(None) => debug!("Unchanged: {display_path}"),
                Err(err) => {
                    error!("Error processing {}: {:#}", display_path, err);
                    had_error = true;
                }
            }
        }
    }

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(&changed)?);
    } else {
        let verb = if cfg.dry_run { "Would process" } else { "Processed" };
        println!("{verb} {} of {} files", changed.len(), scanned);
    }
    info!("Scanned {scanned} files, {} changed", changed.len());

    if had_error {
        anyhow::bail!("One or more files could not be processed. See stderr for details.");
    }

    Ok(())
}

/// Transform a single file, writing it back only if the text changed.
///
/// Returns `Ok(None)` when the file is already clean.
fn process_file(path: &Path, display_path: &str, cfg: &Config) -> Result<Option<FileEntry>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", display_path))?;

    let new_text = transform(&text, cfg);
    if new_text == text {
        return Ok(None);
    }

    if !cfg.dry_run {
        fs::write(path, &new_text)
            .with_context(|| format!("Failed to write {}", display_path))?;
    }

    Ok(Some(FileEntry {
        path: display_path.to_string(),
        file_name: path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string(),
        lines_before: text.lines().count(),
        lines_after: new_text.lines().count(),
    }))
}

/// Build a GlobSet from the user–provided `--exclude` patterns.
/// Returns `Ok(None)` if there are no patterns.
fn build_exclude_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();

    for pat in patterns {
        let pat = pat.trim();
        if pat.is_empty() {
            continue;
        }

        let glob =
            Glob::new(pat).with_context(|| format!("Invalid --exclude glob pattern: {pat}"))?;
        builder.add(glob);
    }

    let set = builder
        .build()
        .context("Failed to build exclude glob set")?;

    Ok(Some(set))
}

/// Case-insensitive extension match, using the provided extension set.
pub fn matches_ext(path: &Path, exts: &HashSet<String>) -> bool {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => exts.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}

/// Produce a display path relative to `root` (stable regardless of current working directory).
pub fn make_display_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);

    // If root is a file and path == root, rel is empty.
    if rel.as_os_str().is_empty() {
        return path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
    }

    normalize_for_matching(rel)
}

/// Convert paths to a stable, slash-separated form for matching/printing.
fn normalize_for_matching(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
