//! Mapping resolution outcomes to diagnostics, and rendering them.
//!
//! Diagnostics are markdown blocks with a Fix section, readable by both
//! humans and LLM agents; headings are bolded when printed to a terminal.

use std::path::Path;

use crate::indexer::ClassIndex;
use crate::resolver::{self, ResolutionContext};
use crate::types::{ReferenceKind, SymbolicReference};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Stable machine-readable code for each finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Code {
    /// The primary partial form is missing but the alternate form exists.
    AlternatePartialForm,
    /// Behavior class found, but no configured import path covers it.
    BehaviorNotImported,
    /// No class with this name extends a behavior base class anywhere.
    BehaviorClassMissing,
    /// Non-wildcard import does not resolve to an existing class file.
    ImportTargetMissing,
    /// Wildcard import resolves to a regular file instead of a directory.
    ImportWildcardNotDirectory,
    /// Layout file absent at every candidate location.
    LayoutMissing,
    /// Route names an action the resolved controller does not define.
    RouteActionMissing,
    /// Route's controller file absent at every candidate location.
    RouteControllerMissing,
    /// Literal matched no known naming convention.
    UnresolvableReference,
    /// View or partial file absent at every candidate location.
    ViewMissing,
}

/// How loudly the adapter should surface a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum Severity {
    /// Informational — the reference works, but something is worth knowing.
    Info,
    /// Soft problem — navigation degraded, nothing is broken outright.
    Warning,
    /// The reference points at something that does not exist.
    Error,
}

/// One finding about one reference in one file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    /// Machine-readable code.
    pub code: Code,
    /// One-based line of the offending literal.
    pub line: u32,
    /// Human-readable description.
    pub message: String,
    /// Whether a create-missing-file remediation applies.
    pub offers_creation: bool,
    /// Error, warning, or info.
    pub severity: Severity,
}

/// Evaluate one scanned reference against the resolution engine.
/// Returns `None` when the reference is healthy.
pub fn evaluate(
    reference: &SymbolicReference,
    rc: &ResolutionContext<'_>,
    index: &mut ClassIndex,
) -> Option<Diagnostic> {
    match reference.kind {
        ReferenceKind::View | ReferenceKind::PartialView => evaluate_view(reference, rc),
        ReferenceKind::Layout => evaluate_layout(reference, rc),
        ReferenceKind::Import => evaluate_import(reference, rc),
        ReferenceKind::Route => evaluate_route(reference, rc),
        ReferenceKind::BehaviorClass => evaluate_behavior(reference, rc, index),
    }
}

fn evaluate_view(reference: &SymbolicReference, rc: &ResolutionContext<'_>) -> Option<Diagnostic> {
    let resolved = resolver::resolve(reference, rc);
    if resolved.is_unresolvable() {
        return Some(unresolvable(reference));
    }

    let Some(existing) = &resolved.existing else {
        return Some(Diagnostic {
            code: Code::ViewMissing,
            line: reference.line,
            message: format!(
                "view `{}` does not exist (expected {})",
                reference.raw_text,
                resolved.best_guess().map(|p| p.display().to_string()).unwrap_or_default(),
            ),
            offers_creation: reference.kind.offers_file_creation(),
            severity: Severity::Error,
        });
    };

    // Partial-specific: the primary underscore form is missing but the
    // alternate form exists. Compared by file name so a directory-case
    // fallback alone does not trigger it.
    if reference.kind == ReferenceKind::PartialView
        && resolved
            .candidates
            .first()
            .is_some_and(|primary| primary.file_name() != existing.file_name())
    {
        return Some(Diagnostic {
            code: Code::AlternatePartialForm,
            line: reference.line,
            message: format!(
                "partial `{}` found as alternate form {}",
                reference.raw_text,
                existing.display(),
            ),
            offers_creation: false,
            severity: Severity::Info,
        });
    }

    None
}

fn evaluate_layout(reference: &SymbolicReference, rc: &ResolutionContext<'_>) -> Option<Diagnostic> {
    let resolved = resolver::resolve_layout(&reference.raw_text, rc);
    if resolved.existing.is_some() {
        return None;
    }
    Some(Diagnostic {
        code: Code::LayoutMissing,
        line: reference.line,
        message: format!(
            "layout `{}` does not exist (expected {})",
            reference.raw_text,
            resolved.best_guess().map(|p| p.display().to_string()).unwrap_or_default(),
        ),
        offers_creation: true,
        severity: Severity::Error,
    })
}

fn evaluate_import(reference: &SymbolicReference, rc: &ResolutionContext<'_>) -> Option<Diagnostic> {
    let resolved = resolver::resolve_import(&reference.raw_text, rc);
    if resolved.is_unresolvable() {
        return Some(unresolvable(reference));
    }

    if resolved.trailing_wildcard {
        // A wildcard path is valid when it resolves to a directory or
        // resolves to nothing at all; only a regular file is wrong.
        let file_hit = resolved
            .existing
            .as_ref()
            .is_some_and(|p| p.extension().is_some_and(|e| e == "php"));
        if file_hit {
            return Some(Diagnostic {
                code: Code::ImportWildcardNotDirectory,
                line: reference.line,
                message: format!(
                    "wildcard import `{}` resolves to a file, expected a directory",
                    reference.raw_text,
                ),
                offers_creation: false,
                severity: Severity::Error,
            });
        }
        return None;
    }

    let file_hit = resolved
        .existing
        .as_ref()
        .is_some_and(|p| p.extension().is_some_and(|e| e == "php"));
    if file_hit {
        return None;
    }
    Some(Diagnostic {
        code: Code::ImportTargetMissing,
        line: reference.line,
        message: format!(
            "import `{}` does not resolve to an existing class file (expected {})",
            reference.raw_text,
            resolved.best_guess().map(|p| p.display().to_string()).unwrap_or_default(),
        ),
        offers_creation: false,
        severity: Severity::Error,
    })
}

fn evaluate_route(reference: &SymbolicReference, rc: &ResolutionContext<'_>) -> Option<Diagnostic> {
    let target = resolver::resolve_route(&reference.raw_text, rc);
    if target.controller.is_unresolvable() {
        return Some(unresolvable(reference));
    }

    let Some(controller) = &target.controller.existing else {
        return Some(Diagnostic {
            code: Code::RouteControllerMissing,
            line: reference.line,
            message: format!(
                "route `{}`: controller file not found (expected {})",
                reference.raw_text,
                target
                    .controller
                    .best_guess()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            offers_creation: false,
            severity: Severity::Warning,
        });
    };

    if target.action_segment.is_some() && target.action.is_none() {
        return Some(Diagnostic {
            code: Code::RouteActionMissing,
            line: reference.line,
            message: format!(
                "route `{}`: no matching action method in {}",
                reference.raw_text,
                controller.display(),
            ),
            offers_creation: false,
            severity: Severity::Warning,
        });
    }

    None
}

fn evaluate_behavior(
    reference: &SymbolicReference,
    rc: &ResolutionContext<'_>,
    index: &mut ClassIndex,
) -> Option<Diagnostic> {
    let resolution = resolver::resolve_behavior_class(&reference.raw_text, rc, index);

    let Some(record) = &resolution.record else {
        return Some(Diagnostic {
            code: Code::BehaviorClassMissing,
            line: reference.line,
            message: format!(
                "behavior class `{}` not found under the private source root",
                reference.raw_text,
            ),
            offers_creation: true,
            severity: Severity::Error,
        });
    };

    if !resolution.imported {
        return Some(Diagnostic {
            code: Code::BehaviorNotImported,
            line: reference.line,
            message: format!(
                "behavior class `{}` ({}) is not covered by any configured import path",
                record.name,
                resolution.dot_path.as_deref().unwrap_or("?"),
            ),
            offers_creation: false,
            severity: Severity::Warning,
        });
    }

    None
}

/// Shared soft warning for literals matching no convention.
fn unresolvable(reference: &SymbolicReference) -> Diagnostic {
    Diagnostic {
        code: Code::UnresolvableReference,
        line: reference.line,
        message: format!(
            "`{}` does not match any known naming convention",
            reference.raw_text,
        ),
        offers_creation: false,
        severity: Severity::Warning,
    }
}

// ── Rendering ──────────────────────────────────────────────────────────

/// Render a diagnostic as a structured markdown block.
pub fn render(file: &Path, diagnostic: &Diagnostic) -> String {
    let heading = match diagnostic.severity {
        Severity::Error => "Error",
        Severity::Info => "Info",
        Severity::Warning => "Warning",
    };

    let mut out = format!(
        "# {heading}: {:?}\n\n{}:{}  {}\n",
        diagnostic.code, file.display(), diagnostic.line, diagnostic.message,
    );

    if diagnostic.offers_creation {
        out.push_str("\n## Fix\n\nCreate the missing file at the expected path.\n");
    }
    if diagnostic.code == Code::BehaviorNotImported {
        out.push_str(
            "\n## Fix\n\nAdd the class path to the `import` array in protected/config/main.php.\n",
        );
    }

    out
}

/// Print a rendered diagnostic to stderr with bold headings.
pub fn print(file: &Path, diagnostic: &Diagnostic) {
    let md = render(file, diagnostic);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}
