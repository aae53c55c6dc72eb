//! The convention-based path resolution engine.
//!
//! Pure dispatch over a reference's notation style, each branch implementing
//! one project convention. The only I/O dependency is an injected
//! [`PathProbe`]; resolution itself never fails — unknown conventions yield
//! an empty candidate list and missing targets leave `existing` unset.

use std::path::{Component, Path, PathBuf};

use crate::config::Config;
use crate::context::{self, Context};
use crate::indexer::ClassIndex;
use crate::scanner;
use crate::types::{
    ClassRecord, NotationStyle, ReferenceKind, ResolvedPath, SymbolicReference, line_of_offset,
};

/// File-existence oracle injected into the resolver, so the engine has no
/// hard dependency on a concrete filesystem.
pub trait PathProbe {
    /// Whether the path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;
    /// Whether the path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// The real filesystem.
pub struct DiskProbe;

impl PathProbe for DiskProbe {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Everything a resolution rule needs to know about its surroundings.
pub struct ResolutionContext<'a> {
    /// Directory-name conventions.
    pub config: &'a Config,
    /// Absolute path of the file containing the reference.
    pub document_path: &'a Path,
    /// Module/controller classification of the document.
    pub file_context: &'a Context,
    /// Injected existence oracle.
    pub probe: &'a dyn PathProbe,
    /// Absolute path of the project root.
    pub workspace_root: &'a Path,
}

impl ResolutionContext<'_> {
    /// The main application's views directory.
    fn main_views_root(&self) -> PathBuf {
        self.config
            .protected_root(self.workspace_root)
            .join(&self.config.views_dir)
    }

    /// The current module's views directory, when the document is in one.
    fn module_views_root(&self) -> Option<PathBuf> {
        let module = self.file_context.module.as_deref()?;
        Some(
            self.config
                .module_root(self.workspace_root, module)
                .join(&self.config.views_dir),
        )
    }

    /// Views root honoring the current module, falling back to main.
    fn effective_views_root(&self) -> PathBuf {
        self.module_views_root().unwrap_or_else(|| self.main_views_root())
    }
}

/// Resolve a view, partial, layout, or import reference to its candidates.
/// Routes and behaviors carry extra result data and have dedicated entry
/// points ([`resolve_route`], [`resolve_behavior_class`]).
pub fn resolve(reference: &SymbolicReference, rc: &ResolutionContext<'_>) -> ResolvedPath {
    match reference.kind {
        ReferenceKind::View => resolve_view(&reference.raw_text, false, rc),
        ReferenceKind::PartialView => resolve_view(&reference.raw_text, true, rc),
        ReferenceKind::Layout => resolve_layout(&reference.raw_text, rc),
        ReferenceKind::Import => resolve_import(&reference.raw_text, rc),
        ReferenceKind::Route | ReferenceKind::BehaviorClass => ResolvedPath::default(),
    }
}

// ── Views and partials ─────────────────────────────────────────────────

/// Resolve a view literal under all five notation conventions.
pub fn resolve_view(raw: &str, is_partial: bool, rc: &ResolutionContext<'_>) -> ResolvedPath {
    let candidates = match NotationStyle::detect(raw) {
        NotationStyle::AbsoluteDoubleSlash => {
            // Always the main application, even from inside a module.
            view_candidates_under(&rc.main_views_root(), raw.trim_start_matches('/'), is_partial)
        },
        NotationStyle::AbsoluteSingleSlash => {
            view_candidates_under(&rc.effective_views_root(), raw.trim_start_matches('/'), is_partial)
        },
        NotationStyle::Relative => relative_view_candidates(raw, is_partial, rc),
        NotationStyle::DotNotation => dot_view_candidates(raw, is_partial, rc),
        NotationStyle::Bare => bare_view_candidates(raw, is_partial, rc),
    };

    probe_files(candidates, rc.probe)
}

/// `controller/view[/...]` resolved under a given views root.
fn view_candidates_under(views_root: &Path, path: &str, is_partial: bool) -> Vec<PathBuf> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return Vec::new();
    }
    let Some((base, dirs)) = segments.split_last() else {
        return Vec::new();
    };

    let mut dir = views_root.to_path_buf();
    for segment in dirs {
        dir.push(segment);
    }

    partial_basenames(base, is_partial, false)
        .into_iter()
        .map(|name| dir.join(format!("{name}.php")))
        .collect()
}

/// `./x` and `../x` resolved against the document's directory, with any
/// `controllers` segment textually rewritten to `views`.
fn relative_view_candidates(raw: &str, is_partial: bool, rc: &ResolutionContext<'_>) -> Vec<PathBuf> {
    let source_dir = rc.document_path.parent().unwrap_or(Path::new(""));
    let joined = normalize_path(&source_dir.join(raw));

    let Some(base) = joined.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let dir = joined.parent().unwrap_or(Path::new(""));

    // In-place textual substitution, not re-derivation: a render() from a
    // controller file lands in the sibling views tree.
    let rewritten: PathBuf = dir
        .components()
        .map(|c| {
            if c.as_os_str() == rc.config.controllers_dir.as_str() {
                Component::Normal(rc.config.views_dir.as_ref())
            } else {
                c
            }
        })
        .collect();

    partial_basenames(base, is_partial, false)
        .into_iter()
        .map(|name| rewritten.join(format!("{name}.php")))
        .collect()
}

/// `application[.modules.M].views.Controller.view…` pattern match.
/// Anything not starting with `application` or not fitting either shape
/// fails to resolve.
fn dot_view_candidates(raw: &str, is_partial: bool, rc: &ResolutionContext<'_>) -> Vec<PathBuf> {
    let segments: Vec<&str> = raw.split('.').collect();
    if segments.first() != Some(&"application") {
        return Vec::new();
    }

    let (views_root, rest) = if segments.len() >= 6
        && segments.get(1) == Some(&rc.config.modules_dir.as_str())
        && segments.get(3) == Some(&rc.config.views_dir.as_str())
    {
        let Some(module) = segments.get(2) else {
            return Vec::new();
        };
        let root = rc
            .config
            .module_root(rc.workspace_root, module)
            .join(&rc.config.views_dir);
        (root, segments.get(4..).unwrap_or(&[]))
    } else if segments.len() >= 4 && segments.get(1) == Some(&rc.config.views_dir.as_str()) {
        (rc.main_views_root(), segments.get(2..).unwrap_or(&[]))
    } else {
        return Vec::new();
    };

    let Some((base, dirs)) = rest.split_last() else {
        return Vec::new();
    };
    let mut dir = views_root;
    for segment in dirs {
        dir.push(segment);
    }

    partial_basenames(base, is_partial, true)
        .into_iter()
        .map(|name| dir.join(format!("{name}.php")))
        .collect()
}

/// A bare name resolves into the current controller's own views
/// subdirectory, module-aware, trying the exact-case directory before the
/// lowercase-first fallback.
fn bare_view_candidates(raw: &str, is_partial: bool, rc: &ResolutionContext<'_>) -> Vec<PathBuf> {
    let Some(controller) = rc.file_context.controller.as_deref() else {
        return Vec::new();
    };
    let views_root = rc.effective_views_root();

    let mut candidates = Vec::new();
    for dir_name in context::controller_dir_candidates(controller) {
        let dir = views_root.join(dir_name);
        for name in partial_basenames(raw, is_partial, true) {
            candidates.push(dir.join(format!("{name}.php")));
        }
    }
    candidates
}

/// The partial invariant: partials always yield both the underscored and
/// plain forms of the same basename. Path-style notations try the form as
/// written first; dot and bare notations try the underscore form first.
fn partial_basenames(written: &str, is_partial: bool, prefer_underscore: bool) -> Vec<String> {
    if !is_partial {
        return vec![written.to_string()];
    }

    let plain = written.strip_prefix('_').unwrap_or(written).to_string();
    let underscored = format!("_{plain}");

    if prefer_underscore || written.starts_with('_') {
        vec![underscored, plain]
    } else {
        vec![plain, underscored]
    }
}

// ── Layouts ────────────────────────────────────────────────────────────

/// Resolve a layout name. Unlike views, layout resolution never fails
/// outright: it always returns a best-guess path for navigation.
pub fn resolve_layout(raw: &str, rc: &ResolutionContext<'_>) -> ResolvedPath {
    let mut candidates = Vec::new();

    if let Some(name) = raw.strip_prefix("//") {
        // Main application, current module ignored.
        candidates.push(rc.main_views_root().join("layouts").join(format!("{name}.php")));
    } else {
        let name = raw.trim_start_matches('/');
        if let Some(module_views) = rc.module_views_root() {
            candidates.push(module_views.join("layouts").join(format!("{name}.php")));
        }
        candidates.push(rc.main_views_root().join("layouts").join(format!("{name}.php")));
    }

    probe_files(candidates, rc.probe)
}

// ── Imports ────────────────────────────────────────────────────────────

/// Resolve a `Yii::import`-style dot path.
///
/// First segment selects the root: `application` → the private source root,
/// `zii` → the framework's `zii` subtree, `system` → the framework root,
/// anything else → private source root then an `application/` fallback.
/// Each base yields `<path>.php` (file) then `<path>` (directory); the
/// default for navigation is `<path>.php` even when absent. A trailing `.*`
/// is stripped and recorded in `trailing_wildcard`.
pub fn resolve_import(raw: &str, rc: &ResolutionContext<'_>) -> ResolvedPath {
    let (path, wildcard) = match raw.strip_suffix(".*") {
        Some(stripped) => (stripped, true),
        None => (raw, false),
    };

    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((&first, rest)) = segments.split_first() else {
        return ResolvedPath { trailing_wildcard: wildcard, ..ResolvedPath::default() };
    };

    let framework = rc.config.framework_root(rc.workspace_root);
    let protected = rc.config.protected_root(rc.workspace_root);

    let bases: Vec<PathBuf> = match first {
        "application" => vec![join_segments(&protected, rest)],
        "zii" => vec![join_segments(&framework.join("zii"), rest)],
        "system" => vec![join_segments(&framework, rest)],
        _ => vec![
            join_segments(&protected, &segments),
            join_segments(&rc.workspace_root.join("application"), &segments),
        ],
    };

    let mut candidates = Vec::new();
    for base in &bases {
        candidates.push(base.with_extension("php"));
        candidates.push(base.clone());
    }

    // A candidate with the .php extension must be a file; the bare path
    // must be a directory.
    let existing = candidates.iter().find(|c| {
        if c.extension().is_some_and(|e| e == "php") {
            rc.probe.is_file(c)
        } else {
            rc.probe.is_dir(c)
        }
    });

    ResolvedPath {
        existing: existing.cloned(),
        candidates,
        trailing_wildcard: wildcard,
    }
}

/// Append dot-path segments to a base directory.
fn join_segments(base: &Path, segments: &[&str]) -> PathBuf {
    let mut path = base.to_path_buf();
    for segment in segments {
        path.push(segment);
    }
    path
}

// ── Routes ─────────────────────────────────────────────────────────────

/// A located `actionXxx` method inside a resolved controller file.
#[derive(Debug, Clone)]
pub struct ActionLocation {
    /// One-based line of the method in the controller file.
    pub line: u32,
    /// The matched method name.
    pub name: String,
    /// Byte offset of the `function` keyword.
    pub offset: usize,
}

/// Outcome of route resolution: a controller file plus, when the file
/// exists and names an action, the located method.
#[derive(Debug, Clone)]
pub struct RouteTarget {
    /// Located action method, when the controller exists and matches.
    pub action: Option<ActionLocation>,
    /// Route's action segment as written, if any.
    pub action_segment: Option<String>,
    /// Resolved controller file.
    pub controller: ResolvedPath,
}

/// Resolve a route string (`[/]controller/action` or `/module/controller/action`).
///
/// A leading slash is stripped and empty segments filtered. When at least
/// three segments remain and the first names an existing module directory,
/// the route is `{module}/{controller}/{action}`; otherwise the first two
/// segments are `{controller}/{action}`, preferring the current module's
/// controllers directory (module wins silently when both exist).
pub fn resolve_route(raw: &str, rc: &ResolutionContext<'_>) -> RouteTarget {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();

    let empty = RouteTarget {
        action: None,
        action_segment: None,
        controller: ResolvedPath::default(),
    };
    let Some(&first) = segments.first() else {
        return empty;
    };

    let controllers = |base: PathBuf| base.join(&rc.config.controllers_dir);

    let (controller_segment, action_segment, dirs) = if segments.len() >= 3
        && rc.probe.is_dir(&rc.config.module_root(rc.workspace_root, first))
    {
        let Some(&controller) = segments.get(1) else {
            return empty;
        };
        (
            controller,
            segments.get(2).copied(),
            vec![controllers(rc.config.module_root(rc.workspace_root, first))],
        )
    } else {
        let mut dirs = Vec::new();
        if let Some(module) = rc.file_context.module.as_deref() {
            dirs.push(controllers(rc.config.module_root(rc.workspace_root, module)));
        }
        dirs.push(controllers(rc.config.protected_root(rc.workspace_root)));
        (first, segments.get(1).copied(), dirs)
    };

    let file_name = format!("{}Controller.php", context::controller_class_name(controller_segment));
    let candidates: Vec<PathBuf> = dirs.into_iter().map(|d| d.join(&file_name)).collect();
    let controller = probe_files(candidates, rc.probe);

    let action = match (&controller.existing, action_segment) {
        (Some(path), Some(segment)) => locate_action(path, segment),
        _ => None,
    };

    RouteTarget {
        action,
        action_segment: action_segment.map(String::from),
        controller,
    }
}

/// Search a controller file for the route's action method, trying each
/// candidate name in turn; first match wins. Read failures degrade to
/// "not found" — a file that vanished mid-resolution is not an error.
fn locate_action(controller_path: &Path, action_segment: &str) -> Option<ActionLocation> {
    let source = std::fs::read_to_string(controller_path).ok()?;
    let blanked = scanner::blank_comments(&source);
    let actions = scanner::find_action_methods(&blanked);

    for name in context::action_method_candidates(action_segment) {
        if let Some(found) = actions.iter().find(|a| a.name == name) {
            return Some(ActionLocation {
                line: line_of_offset(&blanked, found.offset),
                name,
                offset: found.offset,
            });
        }
    }
    None
}

// ── Behaviors ──────────────────────────────────────────────────────────

/// Outcome of behavior-class resolution. Two independent findings:
/// whether a matching class exists anywhere under the private source root,
/// and whether its dot path is covered by the configured import paths.
#[derive(Debug, Clone)]
pub struct BehaviorResolution {
    /// Dot-notation path of the found class file, e.g.
    /// `application.components.behaviors.Foo`.
    pub dot_path: Option<String>,
    /// Whether the dot path falls under a configured import path.
    /// Meaningless when `record` is `None`.
    pub imported: bool,
    /// The matching class record, if any.
    pub record: Option<ClassRecord>,
}

/// Resolve a behavior class literal through the class index.
///
/// The literal's last dot-separated segment is the simple class name;
/// matching is by simple name among classes extending a framework behavior
/// base class, scoped to the private source root.
pub fn resolve_behavior_class(
    raw: &str,
    rc: &ResolutionContext<'_>,
    index: &mut ClassIndex,
) -> BehaviorResolution {
    let simple_name = raw.rsplit('.').next().unwrap_or(raw);
    let protected = rc.config.protected_root(rc.workspace_root);

    let record = index
        .behavior_classes(&protected)
        .iter()
        .find(|r| r.name == simple_name)
        .cloned();

    let dot_path = record
        .as_ref()
        .and_then(|r| dot_path_for(&r.file_path, &protected));

    let imported = dot_path.as_deref().is_some_and(|path| {
        let imports = configured_import_paths(rc);
        imports.iter().any(|import| matches_import_path(path, import))
    });

    BehaviorResolution { dot_path, imported, record }
}

/// Compute the `application.…` dot path of a file under the private root.
fn dot_path_for(file_path: &Path, protected_root: &Path) -> Option<String> {
    let relative = file_path.strip_prefix(protected_root).ok()?;
    let mut segments = vec!["application".to_string()];
    for component in relative.components() {
        let part = component.as_os_str().to_str()?;
        segments.push(part.strip_suffix(".php").unwrap_or(part).to_string());
    }
    Some(segments.join("."))
}

/// Read the import paths from the project's main configuration file.
fn configured_import_paths(rc: &ResolutionContext<'_>) -> Vec<String> {
    let main_config = rc
        .config
        .protected_root(rc.workspace_root)
        .join("config")
        .join("main.php");
    match std::fs::read_to_string(&main_config) {
        Ok(text) => scanner::find_config_import_paths(&scanner::blank_comments(&text)),
        Err(_) => Vec::new(),
    }
}

/// Whether a class dot path is covered by one configured import path.
///
/// A wildcard import (`a.b.*`) covers the direct children of `a.b`; an
/// exact import covers only the identical full path, never sub-paths.
fn matches_import_path(dot_path: &str, import: &str) -> bool {
    if let Some(prefix) = import.strip_suffix(".*") {
        let Some((parent, _)) = dot_path.rsplit_once('.') else {
            return false;
        };
        return parent == prefix;
    }
    dot_path == import
}

// ── Shared helpers ─────────────────────────────────────────────────────

/// Probe file candidates in order and record the first that exists.
fn probe_files(candidates: Vec<PathBuf>, probe: &dyn PathProbe) -> ResolvedPath {
    let existing = candidates.iter().find(|c| probe.is_file(c)).cloned();
    ResolvedPath { candidates, existing, trailing_wildcard: false }
}

/// Collapse `.` and `..` components in a path without touching the
/// filesystem. Preserves leading `..` when there is nothing left to pop.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                let can_pop = matches!(
                    components.last(),
                    Some(c) if !matches!(c, Component::ParentDir)
                );
                if can_pop {
                    components.pop();
                } else {
                    components.push(component);
                }
            },
            other => components.push(other),
        }
    }
    components.iter().collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::config::Config;
    use crate::context::{Context, FileLocation};

    /// In-memory probe for pure resolution tests.
    struct FakeProbe {
        dirs: HashSet<PathBuf>,
        files: HashSet<PathBuf>,
    }

    impl FakeProbe {
        fn new(files: &[&str], dirs: &[&str]) -> Self {
            Self {
                dirs: dirs.iter().map(PathBuf::from).collect(),
                files: files.iter().map(PathBuf::from).collect(),
            }
        }
    }

    impl PathProbe for FakeProbe {
        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
    }

    fn controller_context() -> Context {
        Context {
            controller: Some("Site".to_string()),
            location: FileLocation::InsideControllers,
            module: None,
        }
    }

    fn module_context(module: &str) -> Context {
        Context {
            controller: Some("post".to_string()),
            location: FileLocation::InsideControllers,
            module: Some(module.to_string()),
        }
    }

    fn rc<'a>(
        config: &'a Config,
        document: &'a Path,
        file_context: &'a Context,
        probe: &'a dyn PathProbe,
    ) -> ResolutionContext<'a> {
        ResolutionContext {
            config,
            document_path: document,
            file_context,
            probe,
            workspace_root: Path::new("/ws"),
        }
    }

    #[test]
    fn bare_view_uses_controller_views_dir_with_case_fallback() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&["/ws/protected/views/site/index.php"], &[]);
        let file_context = controller_context();
        let document = PathBuf::from("/ws/protected/controllers/SiteController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let resolved = resolve_view("index", false, &rc);
        assert_eq!(
            resolved.existing.as_deref(),
            Some(Path::new("/ws/protected/views/site/index.php"))
        );
        // Exact-case candidate is still tried first.
        assert_eq!(
            resolved.candidates.first().map(PathBuf::as_path),
            Some(Path::new("/ws/protected/views/Site/index.php"))
        );
    }

    #[test]
    fn partial_always_yields_underscore_and_plain_pair() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&[], &[]);
        let file_context = controller_context();
        let document = PathBuf::from("/ws/protected/controllers/SiteController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let resolved = resolve_view("application.views.site.form", true, &rc);
        assert_eq!(
            resolved.candidates,
            vec![
                PathBuf::from("/ws/protected/views/site/_form.php"),
                PathBuf::from("/ws/protected/views/site/form.php"),
            ]
        );

        // Path-style notation keeps the as-written form first.
        let resolved = resolve_view("/site/form", true, &rc);
        assert_eq!(
            resolved.candidates,
            vec![
                PathBuf::from("/ws/protected/views/site/form.php"),
                PathBuf::from("/ws/protected/views/site/_form.php"),
            ]
        );
    }

    #[test]
    fn double_slash_ignores_current_module() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&[], &[]);
        let file_context = module_context("Blog");
        let document = PathBuf::from("/ws/protected/modules/Blog/controllers/PostController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let resolved = resolve_view("//site/index", false, &rc);
        assert_eq!(
            resolved.candidates,
            vec![PathBuf::from("/ws/protected/views/site/index.php")]
        );

        let resolved = resolve_view("/post/index", false, &rc);
        assert_eq!(
            resolved.candidates,
            vec![PathBuf::from("/ws/protected/modules/Blog/views/post/index.php")]
        );
    }

    #[test]
    fn relative_view_rewrites_controllers_to_views() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&[], &[]);
        let file_context = controller_context();
        let document = PathBuf::from("/ws/protected/controllers/SiteController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let resolved = resolve_view("./site/index", false, &rc);
        assert_eq!(
            resolved.candidates,
            vec![PathBuf::from("/ws/protected/views/site/index.php")]
        );
    }

    #[test]
    fn dot_view_requires_application_prefix_and_shape() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&[], &[]);
        let file_context = controller_context();
        let document = PathBuf::from("/ws/protected/controllers/SiteController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let module_view = resolve_view("application.modules.Blog.views.post.index", false, &rc);
        assert_eq!(
            module_view.candidates,
            vec![PathBuf::from("/ws/protected/modules/Blog/views/post/index.php")]
        );

        assert!(resolve_view("system.views.site.index", false, &rc).is_unresolvable());
        assert!(resolve_view("application.site", false, &rc).is_unresolvable());
    }

    #[test]
    fn layout_double_slash_ignores_module_and_never_fails() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&["/ws/protected/views/layouts/main.php"], &[]);
        let file_context = module_context("Blog");
        let document = PathBuf::from("/ws/protected/modules/Blog/controllers/PostController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let resolved = resolve_layout("//main", &rc);
        assert_eq!(
            resolved.existing.as_deref(),
            Some(Path::new("/ws/protected/views/layouts/main.php"))
        );

        // Non-absolute layout tries the module first, then main; a missing
        // file still leaves a best guess for navigation.
        let resolved = resolve_layout("column2", &rc);
        assert_eq!(resolved.existing, None);
        assert_eq!(
            resolved.best_guess().map(PathBuf::as_path),
            Some(Path::new("/ws/protected/modules/Blog/views/layouts/column2.php"))
        );
        assert_eq!(resolved.candidates.len(), 2);
    }

    #[test]
    fn import_roots_select_by_first_segment() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&["/ws/protected/modules/Blog/models/Post.php"], &[]);
        let file_context = controller_context();
        let document = PathBuf::from("/ws/protected/controllers/SiteController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let resolved = resolve_import("application.modules.Blog.models.Post", &rc);
        assert_eq!(
            resolved.existing.as_deref(),
            Some(Path::new("/ws/protected/modules/Blog/models/Post.php"))
        );

        let zii = resolve_import("zii.widgets.CPortlet", &rc);
        assert_eq!(
            zii.best_guess().map(PathBuf::as_path),
            Some(Path::new("/ws/framework/zii/widgets/CPortlet.php"))
        );

        let system = resolve_import("system.web.CController", &rc);
        assert_eq!(
            system.best_guess().map(PathBuf::as_path),
            Some(Path::new("/ws/framework/web/CController.php"))
        );
    }

    #[test]
    fn wildcard_strip_resolves_same_base_path() {
        let config = Config::defaults();
        let probe = FakeProbe::new(&[], &["/ws/protected/components"]);
        let file_context = controller_context();
        let document = PathBuf::from("/ws/protected/controllers/SiteController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let with = resolve_import("application.components.*", &rc);
        let without = resolve_import("application.components", &rc);
        assert_eq!(with.candidates, without.candidates);
        assert!(with.trailing_wildcard);
        assert!(!without.trailing_wildcard);
        // The directory candidate exists.
        assert_eq!(
            with.existing.as_deref(),
            Some(Path::new("/ws/protected/components"))
        );
    }

    #[test]
    fn route_prefers_named_module_then_current_module_then_main() {
        let config = Config::defaults();
        let probe = FakeProbe::new(
            &[
                "/ws/protected/modules/Blog/controllers/PostController.php",
                "/ws/protected/controllers/PostController.php",
            ],
            &["/ws/protected/modules/Blog"],
        );
        let file_context = controller_context();
        let document = PathBuf::from("/ws/protected/controllers/SiteController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let target = resolve_route("/Blog/post/view", &rc);
        assert_eq!(
            target.controller.existing.as_deref(),
            Some(Path::new("/ws/protected/modules/Blog/controllers/PostController.php"))
        );
        assert_eq!(target.action_segment.as_deref(), Some("view"));

        // Two segments fall back to controller/action against the main app.
        let target = resolve_route("post/view", &rc);
        assert_eq!(
            target.controller.existing.as_deref(),
            Some(Path::new("/ws/protected/controllers/PostController.php"))
        );
    }

    #[test]
    fn route_module_wins_when_both_controllers_exist() {
        let config = Config::defaults();
        let probe = FakeProbe::new(
            &[
                "/ws/protected/modules/Blog/controllers/PostController.php",
                "/ws/protected/controllers/PostController.php",
            ],
            &["/ws/protected/modules/Blog"],
        );
        let file_context = module_context("Blog");
        let document = PathBuf::from("/ws/protected/modules/Blog/controllers/CommentController.php");
        let rc = rc(&config, &document, &file_context, &probe);

        let target = resolve_route("post/index", &rc);
        assert_eq!(
            target.controller.existing.as_deref(),
            Some(Path::new("/ws/protected/modules/Blog/controllers/PostController.php"))
        );
    }

    #[test]
    fn import_matching_is_exact_or_direct_child_wildcard() {
        assert!(matches_import_path(
            "application.components.behaviors.Foo",
            "application.components.behaviors.*"
        ));
        assert!(!matches_import_path(
            "application.components.behaviors.Foo",
            "application.components.*"
        ));
        assert!(matches_import_path(
            "application.components.behaviors.Foo",
            "application.components.behaviors.Foo"
        ));
        // Exact imports never cover sub-paths.
        assert!(!matches_import_path(
            "application.components.behaviors.Foo",
            "application.components.behaviors"
        ));
    }
}
