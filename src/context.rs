//! Module/controller context derivation from a file's position in the tree.
//!
//! Pure directory-name comparison against the configured conventions; no I/O.

use std::path::Path;

use crate::config::Config;
use crate::error::Error;

/// Which conventional subtree the document sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLocation {
    /// Under a controllers directory (the filename named the controller).
    InsideControllers,
    /// Under a views directory (the next segment named the controller).
    InsideViews,
    /// Anywhere else — models, components, config.
    Other,
}

/// The module and controller a file logically belongs to.
#[derive(Debug, Clone)]
pub struct Context {
    /// Controller name, e.g. `Site` from `SiteController.php` or `site`
    /// from `views/site/index.php`.
    pub controller: Option<String>,
    /// Classification of the containing directory.
    pub location: FileLocation,
    /// Module name when the file sits under `modules/<name>/`.
    pub module: Option<String>,
}

impl Context {
    /// Derive the context by walking the document's path segments relative
    /// to the workspace root.
    ///
    /// # Errors
    ///
    /// Returns `Error::OutsideWorkspace` when the document does not live
    /// under the workspace root.
    pub fn derive(
        document_path: &Path,
        workspace_root: &Path,
        config: &Config,
    ) -> Result<Self, Error> {
        let relative = document_path
            .strip_prefix(workspace_root)
            .map_err(|_err| Error::OutsideWorkspace {
                path: document_path.to_path_buf(),
            })?;

        let segments: Vec<&str> = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect();

        let mut context = Self {
            controller: None,
            location: FileLocation::Other,
            module: None,
        };

        for (i, segment) in segments.iter().enumerate() {
            let next = segments.get(i.saturating_add(1));
            if *segment == config.modules_dir
                && let Some(module) = next
                && context.module.is_none()
            {
                context.module = Some((*module).to_string());
            }
            if *segment == config.views_dir
                && let Some(controller) = next
                && context.controller.is_none()
            {
                context.controller = Some((*controller).to_string());
                context.location = FileLocation::InsideViews;
            }
        }

        if context.controller.is_some() {
            return Ok(context);
        }

        for (i, segment) in segments.iter().enumerate() {
            if *segment == config.controllers_dir
                && let Some(file_name) = segments.get(i.saturating_add(1))
            {
                context.controller = Some(strip_controller_suffix(file_name));
                context.location = FileLocation::InsideControllers;
                break;
            }
        }

        Ok(context)
    }
}

/// `SiteController.php` → `Site`. Files without the suffix keep their stem.
fn strip_controller_suffix(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".php").unwrap_or(file_name);
    stem.strip_suffix("Controller").unwrap_or(stem).to_string()
}

/// Convert a controller name to its conventional class-name form:
/// split on underscores and hyphens, capitalize each part's first letter,
/// lowercase the rest, concatenate (`sow_info` → `SowInfo`).
pub fn controller_class_name(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(capitalize_part)
        .collect()
}

/// Directory-name candidates for a controller's views subdirectory, in probe
/// order: the converted exact-case form first, then the lowercase-first-letter
/// fallback used when the exact case doesn't match an existing file.
pub fn controller_dir_candidates(name: &str) -> Vec<String> {
    let exact = controller_class_name(name);
    let fallback = lowercase_first(&exact);
    if fallback == exact {
        return vec![exact];
    }
    vec![exact, fallback]
}

/// Candidate `actionXxx` method names for a route's action segment, tried in
/// order: verbatim when already uppercase, capitalize-first, then a
/// snake/kebab-to-camel variant when the segment contains `_` or `-`.
pub fn action_method_candidates(segment: &str) -> Vec<String> {
    let mut names = Vec::new();

    if segment.chars().next().is_some_and(char::is_uppercase) {
        names.push(format!("action{segment}"));
    }

    let capitalized = format!("action{}", capitalize_first(segment));
    if !names.contains(&capitalized) {
        names.push(capitalized);
    }

    if segment.contains(['_', '-']) {
        let camel = format!("action{}", controller_class_name(segment));
        if !names.contains(&camel) {
            names.push(camel);
        }
    }

    names
}

/// Capitalize the first letter, lowercase the rest.
fn capitalize_part(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

/// Capitalize the first letter, keep the rest as written.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first letter, keep the rest as written.
fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::Config;

    #[test]
    fn controller_file_context() {
        let config = Config::defaults();
        let context = Context::derive(
            Path::new("/ws/protected/controllers/SiteController.php"),
            Path::new("/ws"),
            &config,
        )
        .unwrap();
        assert_eq!(context.controller.as_deref(), Some("Site"));
        assert_eq!(context.location, FileLocation::InsideControllers);
        assert_eq!(context.module, None);
    }

    #[test]
    fn view_file_in_module_context() {
        let config = Config::defaults();
        let context = Context::derive(
            Path::new("/ws/protected/modules/Blog/views/post/index.php"),
            Path::new("/ws"),
            &config,
        )
        .unwrap();
        assert_eq!(context.module.as_deref(), Some("Blog"));
        assert_eq!(context.controller.as_deref(), Some("post"));
        assert_eq!(context.location, FileLocation::InsideViews);
    }

    #[test]
    fn model_file_has_no_controller() {
        let config = Config::defaults();
        let context = Context::derive(
            Path::new("/ws/protected/models/Post.php"),
            Path::new("/ws"),
            &config,
        )
        .unwrap();
        assert_eq!(context.controller, None);
        assert_eq!(context.location, FileLocation::Other);
    }

    #[test]
    fn outside_root_is_an_error() {
        let config = Config::defaults();
        let result = Context::derive(Path::new("/elsewhere/a.php"), Path::new("/ws"), &config);
        assert!(result.is_err());
    }

    #[test]
    fn underscored_name_converts_to_camel_case() {
        assert_eq!(controller_class_name("sow_info"), "SowInfo");
        assert_eq!(controller_class_name("post"), "Post");
        assert_eq!(controller_class_name("my-page"), "MyPage");
    }

    #[test]
    fn dir_candidates_try_exact_case_then_lowercase_first() {
        assert_eq!(controller_dir_candidates("Site"), vec!["Site", "site"]);
        assert_eq!(controller_dir_candidates("sow_info"), vec!["SowInfo", "sowInfo"]);
    }

    #[test]
    fn action_candidates_follow_priority_order() {
        assert_eq!(action_method_candidates("View"), vec!["actionView"]);
        assert_eq!(action_method_candidates("view"), vec!["actionView"]);
        assert_eq!(
            action_method_candidates("my_page"),
            vec!["actionMy_page", "actionMyPage"]
        );
    }
}
