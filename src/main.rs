use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use tidysrc::calls::CallStripper;
use tidysrc::{Config, run_with_config};

/// tidysrc - strip comments and debug prints from C-family sources.
///
/// Rewrites source files in place:
///
///   - drops `//` comments (full-line and trailing), keeps `///` doc comments
///   - deletes complete `print(...);` statements, including multi-line ones
///   - never touches `//` or parentheses inside string literals
///   - respects .gitignore / .ignore / git exclude files
#[derive(Parser, Debug)]
#[command(
    name = "tidysrc",
    author,
    version,
    about = "Strip comments and debug print statements from C-family source trees",
    long_about = r#"Recursively rewrite source files, removing `//` comments and
complete diagnostic print statements while leaving all other code untouched.

By default it:
  • respects .gitignore / .ignore / git exclude files
  • keeps `///` documentation comments
  • removes `print(...);` statements (see --call)
  • only writes files whose content actually changes

Typical usage:
  tidysrc -t dart lib
  tidysrc -t js,ts --call console.log --keep-comments src
"#
)]
struct Args {
    /// File extensions / types to process (e.g. dart, c, js).
    ///
    /// Can be repeated or comma-separated:
    ///   tidysrc -t dart
    ///   tidysrc -t c,h
    ///   tidysrc -t js -t ts
    #[arg(
        short = 't',
        long = "type",
        alias = "ext",
        value_name = "EXT",
        action = ArgAction::Append,
        value_delimiter = ',',
        required = true
    )]
    exts: Vec<String>,

    /// Paths to process (files or directories). Defaults to current directory.
    #[arg(value_name = "PATH", default_value = ".")]
    paths: Vec<PathBuf>,

    /// Follow symbolic links during traversal.
    #[arg(long = "follow-symlinks")]
    follow_symlinks: bool,

    /// Disable reading .gitignore / .ignore / git exclude files.
    #[arg(long = "no-gitignore")]
    no_gitignore: bool,

    /// Additional glob patterns to exclude (files or directories).
    ///
    /// Patterns are evaluated relative to each PATH root, e.g.:
    ///
    ///   tidysrc -t dart --exclude 'test/**,*.g.dart'
    #[arg(
        long = "exclude",
        short = 'E',
        value_name = "GLOB",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    excludes: Vec<String>,

    /// Skip files larger than N bytes.
    #[arg(long = "max-bytes", value_name = "N")]
    max_bytes: Option<u64>,

    /// Call prefix marking a statement to delete (default `print(`).
    ///
    /// A missing trailing `(` is added, so `--call console.log` matches
    /// `console.log(...)`. Can be repeated or comma-separated.
    #[arg(
        long = "call",
        value_name = "PREFIX",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    calls: Vec<String>,

    /// Leave comments alone; only remove call statements.
    #[arg(long = "keep-comments")]
    keep_comments: bool,

    /// Leave call statements alone; only strip comments.
    #[arg(long = "keep-calls")]
    keep_calls: bool,

    /// Report what would change without writing any file.
    #[arg(short = 'n', long = "dry-run")]
    dry_run: bool,

    /// Output changed files as a JSON array instead of plain lines.
    #[arg(long = "json")]
    json: bool,

    /// Only log warnings and errors.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    init_logger(args.quiet);

    if let Err(err) = run(args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Log to stderr; RUST_LOG overrides the default level.
fn init_logger(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> Result<()> {
    // Normalise extensions to lowercase, no leading dot.
    let mut ext_set = HashSet::new();
    for e in &args.exts {
        let norm = e.trim().trim_start_matches('.').to_ascii_lowercase();
        if !norm.is_empty() {
            ext_set.insert(norm);
        }
    }

    if ext_set.is_empty() {
        bail!("No valid extensions provided (after normalisation).");
    }

    if args.keep_comments && args.keep_calls {
        bail!("--keep-comments and --keep-calls together leave nothing to do.");
    }

    let calls = if args.calls.is_empty() {
        CallStripper::default()
    } else {
        CallStripper::new(normalize_call_prefixes(&args.calls)?)
    };

    let cfg = Config {
        exts: ext_set,
        paths: args.paths,
        follow_symlinks: args.follow_symlinks,
        no_gitignore: args.no_gitignore,
        json: args.json,
        excludes: args.excludes,
        max_bytes: args.max_bytes,
        strip_comments: !args.keep_comments,
        strip_calls: !args.keep_calls,
        calls,
        dry_run: args.dry_run,
    };

    run_with_config(cfg)
}

/// Trim each prefix and make sure it ends with the call's opening paren.
fn normalize_call_prefixes(raw: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(raw.len());
    for p in raw {
        let p = p.trim();
        if p.is_empty() || p == "(" {
            bail!("Empty --call prefix.");
        }
        if p.ends_with('(') {
            out.push(p.to_string());
        } else {
            out.push(format!("{p}("));
        }
    }
    Ok(out)
}
