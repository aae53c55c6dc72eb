//! Recursive class indexing with per-file and per-directory caches.
//!
//! Caches are plain maps, safe under the crate's single-threaded model only.
//! Invalidation is explicit: the watcher (or any caller that knows a file
//! changed) drops the file's entry and every ancestor directory's aggregate
//! entry up to the indexed root.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::scanner;
use crate::types::ClassRecord;

/// A class counts as a behavior when its parent carries this suffix —
/// covers CBehavior, CModelBehavior, CActiveRecordBehavior.
const BEHAVIOR_BASE_SUFFIX: &str = "Behavior";

/// Process-wide class index. Keyed by absolute path throughout; no TTL,
/// only explicit invalidation.
#[derive(Default)]
pub struct ClassIndex {
    /// Per-directory cache of behavior-class listings.
    behavior_lists: HashMap<PathBuf, Vec<ClassRecord>>,
    /// Per-directory cache of the `.php` files found by a walk.
    dir_lists: HashMap<PathBuf, Vec<PathBuf>>,
    /// Per-file cache. `None` records a scanned file that declares no class,
    /// so it isn't re-read on every directory listing.
    file_records: HashMap<PathBuf, Option<ClassRecord>>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// All classes found under `dir`, from cache when possible.
    ///
    /// A cached directory listing is reconstructed from the per-file cache,
    /// re-extracting only files missing from it; otherwise the subtree is
    /// walked once and both cache levels populated.
    pub fn all_classes(&mut self, dir: &Path) -> Vec<ClassRecord> {
        let files = match self.dir_lists.get(dir) {
            Some(cached) => cached.clone(),
            None => {
                let walked = walk_php_files(dir);
                self.dir_lists.insert(dir.to_path_buf(), walked.clone());
                walked
            },
        };

        let mut records = Vec::new();
        for file in &files {
            let record = match self.file_records.get(file) {
                Some(cached) => cached.clone(),
                None => {
                    let extracted = extract_record(file);
                    self.file_records.insert(file.clone(), extracted.clone());
                    extracted
                },
            };
            if let Some(record) = record {
                records.push(record);
            }
        }
        records
    }

    /// Classes under `dir` whose parent is a framework behavior base class.
    /// Cached separately, keyed by directory.
    pub fn behavior_classes(&mut self, dir: &Path) -> Vec<ClassRecord> {
        if let Some(cached) = self.behavior_lists.get(dir) {
            return cached.clone();
        }

        let behaviors: Vec<ClassRecord> = self
            .all_classes(dir)
            .into_iter()
            .filter(|r| {
                r.parent_class_name
                    .as_deref()
                    .is_some_and(|p| p.ends_with(BEHAVIOR_BASE_SUFFIX))
            })
            .collect();

        self.behavior_lists.insert(dir.to_path_buf(), behaviors.clone());
        behaviors
    }

    /// Drop every cache entry at or under `dir`: the directory listing, the
    /// behavior listing, and each per-file record beneath it.
    pub fn invalidate(&mut self, dir: &Path) {
        self.behavior_lists.retain(|key, _| !key.starts_with(dir));
        self.dir_lists.retain(|key, _| !key.starts_with(dir));
        self.file_records.retain(|key, _| !key.starts_with(dir));
    }

    /// Drop one file's record plus every ancestor directory's aggregate
    /// entries up to (and including) `root`.
    ///
    /// Invalidating only the immediate directory would leave a stale listing
    /// cached at a higher level that still names a deleted file; this is the
    /// one shared invalidation routine every caller goes through.
    pub fn invalidate_file(&mut self, file: &Path, root: &Path) {
        self.file_records.remove(file);

        let mut dir = file.parent();
        while let Some(current) = dir {
            self.behavior_lists.remove(current);
            self.dir_lists.remove(current);
            if current == root || !current.starts_with(root) {
                break;
            }
            dir = current.parent();
        }
    }
}

/// Read and lexically extract a class record from one file.
/// A file that vanished mid-scan degrades to "no class here".
fn extract_record(path: &Path) -> Option<ClassRecord> {
    let source = std::fs::read_to_string(path).ok()?;
    let blanked = scanner::blank_comments(&source);
    let (is_abstract, name, parent, methods, properties) = scanner::extract_class(&blanked)?;
    Some(ClassRecord {
        file_path: path.to_path_buf(),
        is_abstract,
        method_names: methods,
        name,
        parent_class_name: parent,
        property_names: properties,
    })
}

/// Enumerate `.php` files under a directory, sorted for determinism.
fn walk_php_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn indexes_classes_recursively() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "models/Post.php", "<?php class Post extends CActiveRecord {}");
        write(
            dir.path(),
            "components/behaviors/Foo.php",
            "<?php class Foo extends CActiveRecordBehavior { public function attach($owner) {} }",
        );
        write(dir.path(), "helpers.php", "<?php function helper() {}");

        let mut index = ClassIndex::new();
        let classes = index.all_classes(dir.path());
        let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "Post"]);
    }

    #[test]
    fn behavior_filter_matches_base_class_suffix() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "behaviors/Foo.php", "<?php class Foo extends CActiveRecordBehavior {}");
        write(dir.path(), "models/Post.php", "<?php class Post extends CActiveRecord {}");

        let mut index = ClassIndex::new();
        let behaviors = index.behavior_classes(dir.path());
        assert_eq!(behaviors.len(), 1);
        assert_eq!(behaviors[0].name, "Foo");
    }

    #[test]
    fn second_lookup_is_served_from_cache_without_rewalking() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "models/Post.php", "<?php class Post extends CActiveRecord {}");

        let mut index = ClassIndex::new();
        let first = index.all_classes(dir.path());
        assert_eq!(first.len(), 1);

        // Delete the file behind the cache's back: a repeat lookup must
        // still serve the cached record, proving no second walk happened.
        std::fs::remove_file(&file).unwrap();
        let second = index.all_classes(dir.path());
        assert_eq!(first, second);
    }

    #[test]
    fn invalidation_drops_stale_entries() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "models/Post.php", "<?php class Post extends CActiveRecord {}");

        let mut index = ClassIndex::new();
        assert_eq!(index.all_classes(dir.path()).len(), 1);

        std::fs::remove_file(&file).unwrap();
        index.invalidate(dir.path());
        assert_eq!(index.all_classes(dir.path()).len(), 0);
    }

    #[test]
    fn file_invalidation_clears_ancestor_aggregates() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "a/b/Post.php", "<?php class Post extends CActiveRecord {}");

        let mut index = ClassIndex::new();
        // Prime the aggregate at the root, above the file's own directory.
        assert_eq!(index.all_classes(dir.path()).len(), 1);

        write(dir.path(), "a/b/Comment.php", "<?php class Comment extends CActiveRecord {}");
        index.invalidate_file(&file, dir.path());
        let names: Vec<String> = index
            .all_classes(dir.path())
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Comment".to_string(), "Post".to_string()]);
    }

    #[test]
    fn behavior_roundtrip_through_resolver() {
        use crate::config::Config;
        use crate::context::{Context, FileLocation};
        use crate::resolver::{DiskProbe, ResolutionContext, resolve_behavior_class};

        let ws = tempfile::tempdir().unwrap();
        let behavior = write(
            ws.path(),
            "protected/components/behaviors/Foo.php",
            "<?php class Foo extends CActiveRecordBehavior {}",
        );
        write(
            ws.path(),
            "protected/config/main.php",
            "<?php return array('import' => array('application.components.behaviors.*'));",
        );

        let config = Config::defaults();
        let file_context = Context {
            controller: Some("Site".to_string()),
            location: FileLocation::InsideControllers,
            module: None,
        };
        let document = ws.path().join("protected/controllers/SiteController.php");
        let rc = ResolutionContext {
            config: &config,
            document_path: &document,
            file_context: &file_context,
            probe: &DiskProbe,
            workspace_root: ws.path(),
        };

        let mut index = ClassIndex::new();
        let resolution = resolve_behavior_class("Foo", &rc, &mut index);
        let record = resolution.record.expect("behavior found");
        assert_eq!(record.file_path, behavior);
        assert_eq!(
            resolution.dot_path.as_deref(),
            Some("application.components.behaviors.Foo")
        );
        assert!(resolution.imported);
    }
}
