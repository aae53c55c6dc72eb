/// Core domain types for yiinav references, paths, and class records.
use std::path::PathBuf;

/// A located `function actionXxx(...)` definition inside a controller file.
#[derive(Debug, Clone)]
pub struct ActionRecord {
    /// Byte offset just past the closing brace, or `None` when the body
    /// is unterminated (the action then scopes to end of file).
    pub body_end: Option<usize>,
    /// Byte offset of the opening brace of the method body.
    pub body_start: usize,
    /// Full method name including the `action` prefix.
    pub name: String,
    /// Byte offset of the `function` keyword.
    pub offset: usize,
}

/// A lexically extracted class description, cached by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ClassRecord {
    /// Absolute path of the file declaring the class.
    pub file_path: PathBuf,
    /// Whether the class carries the `abstract` modifier.
    pub is_abstract: bool,
    /// Method names declared in the file (`function name(`).
    pub method_names: Vec<String>,
    /// Class name as written.
    pub name: String,
    /// Parent class name from the `extends` clause, if any.
    pub parent_class_name: Option<String>,
    /// Property names declared with a visibility modifier.
    pub property_names: Vec<String>,
}

/// How a reference literal is written. Exactly one style applies;
/// detection checks prefixes in priority order:
/// double-slash > single-slash > relative > dot-notation > bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotationStyle {
    /// `//controller/view` — always the main application, never a module.
    AbsoluteDoubleSlash,
    /// `/controller/view` — current module if any, else main application.
    AbsoluteSingleSlash,
    /// No prefix, no dots — resolved in the current controller's views dir.
    Bare,
    /// `application.views.site.index` — framework dot notation.
    DotNotation,
    /// `./x` or `../x` — relative to the containing file's directory.
    Relative,
}

impl NotationStyle {
    /// Classify a raw reference literal by its leading characters.
    pub fn detect(raw: &str) -> Self {
        if raw.starts_with("//") {
            return Self::AbsoluteDoubleSlash;
        }
        if raw.starts_with('/') {
            return Self::AbsoluteSingleSlash;
        }
        if raw.starts_with("./") || raw.starts_with("../") {
            return Self::Relative;
        }
        if raw.contains('.') {
            return Self::DotNotation;
        }
        Self::Bare
    }
}

/// What a symbolic reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// An entry in a `behaviors()` array naming a behavior class.
    BehaviorClass,
    /// A `Yii::import(...)` dot path.
    Import,
    /// A layout assignment (`$this->layout = ...`).
    Layout,
    /// The first argument of `renderPartial(...)`.
    PartialView,
    /// A route string passed to `createUrl(...)`.
    Route,
    /// The first argument of `render(...)`.
    View,
}

impl ReferenceKind {
    /// Kinds for which a missing target gets a create-file remediation.
    /// Imports and routes never offer file creation.
    pub fn offers_file_creation(self) -> bool {
        matches!(
            self,
            Self::View | Self::PartialView | Self::Layout | Self::BehaviorClass
        )
    }
}

/// Outcome of resolving a symbolic reference.
///
/// `candidates` is ordered most-specific first. `existing` is the first
/// candidate the path probe confirmed on disk. The best guess is the first
/// candidate regardless of existence, kept for create-missing-file flows;
/// it is absent only when the literal matched no known convention.
#[derive(Debug, Clone, Default)]
pub struct ResolvedPath {
    /// Candidate absolute paths in resolution-priority order.
    pub candidates: Vec<PathBuf>,
    /// First candidate that exists on disk, if any.
    pub existing: Option<PathBuf>,
    /// For imports: the dot path ended in `.*` before stripping.
    pub trailing_wildcard: bool,
}

impl ResolvedPath {
    /// The first candidate, returned even when nothing exists on disk.
    pub fn best_guess(&self) -> Option<&PathBuf> {
        self.candidates.first()
    }

    /// True when the literal matched no known convention at all.
    pub fn is_unresolvable(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// A reference to another file found in source text.
#[derive(Debug, Clone)]
pub struct SymbolicReference {
    /// What the reference points at.
    pub kind: ReferenceKind,
    /// One-based line of the literal in the source file.
    pub line: u32,
    /// Byte offset of the literal's first character in the source text.
    pub offset: usize,
    /// The literal string as written, without surrounding quotes.
    pub raw_text: String,
    /// Notation style derived from the literal's prefix.
    pub style: NotationStyle,
}

impl SymbolicReference {
    /// Build a reference, deriving the notation style from the raw text.
    pub fn new(kind: ReferenceKind, raw_text: &str, offset: usize, line: u32) -> Self {
        Self {
            kind,
            line,
            offset,
            raw_text: raw_text.to_string(),
            style: NotationStyle::detect(raw_text),
        }
    }
}

/// Compute the 1-based line number of a byte offset in source text.
pub fn line_of_offset(text: &str, offset: usize) -> u32 {
    let clamped = offset.min(text.len());
    let newlines = text
        .get(..clamped)
        .map(|prefix| prefix.bytes().filter(|b| *b == b'\n').count())
        .unwrap_or(0);
    u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1)
}
