//! Core CLI commands for yiinav: scan, resolve, check, classes, behaviors.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use walkdir::WalkDir;

use crate::config::Config;
use crate::context::{Context, FileLocation};
use crate::diagnostics::{self, Severity};
use crate::error::Error;
use crate::indexer::ClassIndex;
use crate::resolver::{self, DiskProbe, ResolutionContext};
use crate::scanner;
use crate::types::{ReferenceKind, ResolvedPath, SymbolicReference, line_of_offset};

/// Parse a `--kind` argument into a reference kind.
///
/// # Errors
///
/// Returns `Error::UnknownKind` for anything not in the fixed list.
pub fn parse_kind(kind: &str) -> Result<ReferenceKind, Error> {
    return match kind {
        "behavior" => Ok(ReferenceKind::BehaviorClass),
        "import" => Ok(ReferenceKind::Import),
        "layout" => Ok(ReferenceKind::Layout),
        "partial" => Ok(ReferenceKind::PartialView),
        "route" => Ok(ReferenceKind::Route),
        "view" => Ok(ReferenceKind::View),
        _ => Err(Error::UnknownKind { kind: kind.to_string() }),
    };
}

/// The workspace root: the current directory, absolute.
///
/// # Errors
///
/// Returns `Error::Io` when the current directory cannot be determined.
fn workspace_root() -> Result<PathBuf, Error> {
    return Ok(std::env::current_dir()?);
}

/// Make a path absolute against the workspace root.
fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    return root.join(path);
}

/// List the `actionXxx` methods defined in one controller file, with the
/// line span of each brace-matched body.
///
/// # Errors
///
/// Returns `Error::FileNotFound` when the file cannot be read.
pub fn actions(file: &str) -> Result<(), Error> {
    let root = workspace_root()?;
    let path = absolutize(&root, Path::new(file));
    let source = std::fs::read_to_string(&path).map_err(|_err| {
        return Error::FileNotFound { path: path.clone() };
    })?;

    let blanked = scanner::blank_comments(&source);
    for action in scanner::find_action_methods(&blanked) {
        let start = line_of_offset(&blanked, action.offset);
        match action.body_end {
            Some(end) => {
                println!("{}  lines {start}-{}", action.name, line_of_offset(&blanked, end));
            },
            None => {
                let opened = line_of_offset(&blanked, action.body_start);
                println!("{}  line {start} (body opened at line {opened} never closes)", action.name);
            },
        }
    }
    return Ok(());
}

/// List every symbolic reference found in one PHP file.
///
/// # Errors
///
/// Returns `Error::FileNotFound` when the file cannot be read.
pub fn scan(file: &str, json: bool) -> Result<(), Error> {
    let root = workspace_root()?;
    let path = absolutize(&root, Path::new(file));
    let source = std::fs::read_to_string(&path).map_err(|_err| {
        return Error::FileNotFound { path: path.clone() };
    })?;

    let references = scanner::scan_references(&source);

    if json {
        print_references_json(&references);
        return Ok(());
    }

    for reference in &references {
        println!(
            "{}:{}  {:<9} {:?}  {}",
            file,
            reference.line,
            kind_label(reference.kind),
            reference.style,
            reference.raw_text,
        );
    }
    return Ok(());
}

/// Resolve one literal from the position of one file and print the outcome.
///
/// # Errors
///
/// Returns errors from config loading, context derivation, or an unknown kind.
pub fn resolve(file: &str, literal: &str, kind: &str) -> Result<(), Error> {
    let kind = parse_kind(kind)?;
    let root = workspace_root()?;
    let config = Config::load(&root)?;
    let document = absolutize(&root, Path::new(file));
    let file_context = Context::derive(&document, &root, &config)?;

    let location = match file_context.location {
        FileLocation::InsideControllers => "controllers",
        FileLocation::InsideViews => "views",
        FileLocation::Other => "other",
    };
    println!(
        "context: module={} controller={} ({location})",
        file_context.module.as_deref().unwrap_or("-"),
        file_context.controller.as_deref().unwrap_or("-"),
    );

    let rc = ResolutionContext {
        config: &config,
        document_path: &document,
        file_context: &file_context,
        probe: &DiskProbe,
        workspace_root: &root,
    };

    match kind {
        ReferenceKind::Route => print_route(literal, &rc),
        ReferenceKind::BehaviorClass => print_behavior(literal, &rc),
        _ => {
            let reference = SymbolicReference::new(kind, literal, 0, 0);
            print_resolved(&resolver::resolve(&reference, &rc));
        },
    }
    return Ok(());
}

/// Run diagnostics over one file or the whole private source tree.
///
/// Exit code priority mirrors severity: errors (2) > warnings (1) > clean (0).
///
/// # Errors
///
/// Returns errors from config loading or unreadable inputs.
pub fn check(path: Option<&str>) -> Result<ExitCode, Error> {
    let mut index = ClassIndex::new();
    return check_with_index(path, &mut index);
}

/// `check` against a caller-owned index, so the watcher can keep its cache
/// warm across runs and invalidate selectively.
///
/// # Errors
///
/// Returns errors from config loading or unreadable inputs.
pub fn check_with_index(path: Option<&str>, index: &mut ClassIndex) -> Result<ExitCode, Error> {
    let root = workspace_root()?;
    let config = Config::load(&root)?;

    if !config.enabled {
        eprintln!("yiinav is disabled for this project (.yiinav.toml)");
        return Ok(ExitCode::SUCCESS);
    }

    let files = match path {
        Some(p) => {
            let target = absolutize(&root, Path::new(p));
            if target.is_dir() { php_files_under(&target) } else { vec![target] }
        },
        None => php_files_under(&config.protected_root(&root)),
    };

    let mut error_count = 0_u32;
    let mut warning_count = 0_u32;

    for file in &files {
        let outcome = check_file(file, &root, &config, index)?;
        error_count = error_count.saturating_add(outcome.0);
        warning_count = warning_count.saturating_add(outcome.1);
    }

    if error_count > 0 {
        eprintln!("{error_count} errors, {warning_count} warnings");
        return Ok(ExitCode::from(2));
    } else if warning_count > 0 {
        eprintln!("{warning_count} warnings");
        return Ok(ExitCode::from(1));
    } else {
        let total = files.len();
        eprintln!("All references healthy in {total} files");
        return Ok(ExitCode::SUCCESS);
    }
}

/// Diagnose a single file; returns (errors, warnings).
///
/// # Errors
///
/// Returns `Error::OutsideWorkspace` when the file is not under the root.
fn check_file(
    file: &Path,
    root: &Path,
    config: &Config,
    index: &mut ClassIndex,
) -> Result<(u32, u32), Error> {
    // A file that vanished between the walk and the read is not an error.
    let Ok(source) = std::fs::read_to_string(file) else {
        return Ok((0, 0));
    };

    let file_context = Context::derive(file, root, config)?;
    let rc = ResolutionContext {
        config,
        document_path: file,
        file_context: &file_context,
        probe: &DiskProbe,
        workspace_root: root,
    };

    let mut errors = 0_u32;
    let mut warnings = 0_u32;
    for reference in scanner::scan_references(&source) {
        let Some(diagnostic) = diagnostics::evaluate(&reference, &rc, index) else {
            continue;
        };
        diagnostics::print(file.strip_prefix(root).unwrap_or(file), &diagnostic);
        match diagnostic.severity {
            Severity::Error => errors = errors.saturating_add(1),
            Severity::Warning => warnings = warnings.saturating_add(1),
            Severity::Info => {},
        }
    }
    return Ok((errors, warnings));
}

/// List all classes (or only behavior classes) under a directory.
///
/// # Errors
///
/// Returns errors from config loading.
pub fn classes(dir: Option<&str>, behaviors_only: bool, json: bool) -> Result<(), Error> {
    let root = workspace_root()?;
    let config = Config::load(&root)?;
    let target = match dir {
        Some(d) => absolutize(&root, Path::new(d)),
        None => config.protected_root(&root),
    };

    let mut index = ClassIndex::new();
    let mut records = if behaviors_only {
        index.behavior_classes(&target)
    } else {
        index.all_classes(&target)
    };
    records.sort_by(|a, b| a.name.cmp(&b.name));

    if json {
        match serde_json::to_string_pretty(&records) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("error: {e}"),
        }
        return Ok(());
    }

    for record in &records {
        let parent = record.parent_class_name.as_deref().unwrap_or("-");
        println!("{}  extends {}  {}", record.name, parent, record.file_path.display());
    }
    return Ok(());
}

// ── Output helpers ─────────────────────────────────────────────────────

fn kind_label(kind: ReferenceKind) -> &'static str {
    return match kind {
        ReferenceKind::BehaviorClass => "behavior",
        ReferenceKind::Import => "import",
        ReferenceKind::Layout => "layout",
        ReferenceKind::PartialView => "partial",
        ReferenceKind::Route => "route",
        ReferenceKind::View => "view",
    };
}

fn print_resolved(resolved: &ResolvedPath) {
    if resolved.is_unresolvable() {
        println!("unresolvable");
        return;
    }
    for candidate in &resolved.candidates {
        let marker = if resolved.existing.as_ref() == Some(candidate) { "  (exists)" } else { "" };
        println!("{}{marker}", candidate.display());
    }
    return;
}

fn print_route(literal: &str, rc: &ResolutionContext<'_>) {
    let target = resolver::resolve_route(literal, rc);
    print_resolved(&target.controller);
    match &target.action {
        Some(action) => println!("action {} at line {}", action.name, action.line),
        None => {
            if target.action_segment.is_some() && target.controller.existing.is_some() {
                println!("action not found");
            }
        },
    }
    return;
}

fn print_behavior(literal: &str, rc: &ResolutionContext<'_>) {
    let mut index = ClassIndex::new();
    let resolution = resolver::resolve_behavior_class(literal, rc, &mut index);
    match &resolution.record {
        None => println!("behavior class not found"),
        Some(record) => {
            println!("{}", record.file_path.display());
            if let Some(dot_path) = &resolution.dot_path {
                let imported = if resolution.imported { "imported" } else { "not imported" };
                println!("{dot_path}  ({imported})");
            }
        },
    }
    return;
}

/// Serialize scanned references by hand — the reference type itself stays
/// serde-free since line/offset pairs are all the JSON consumer needs.
fn print_references_json(references: &[SymbolicReference]) {
    let items: Vec<serde_json::Value> = references
        .iter()
        .map(|r| {
            return serde_json::json!({
                "kind": kind_label(r.kind),
                "line": r.line,
                "offset": r.offset,
                "raw": r.raw_text,
                "style": format!("{:?}", r.style),
            });
        })
        .collect();
    match serde_json::to_string_pretty(&items) {
        Ok(out) => println!("{out}"),
        Err(e) => eprintln!("error: {e}"),
    }
    return;
}

/// Enumerate `.php` files under a directory for batch checking.
pub fn php_files_under(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    return files;
}
