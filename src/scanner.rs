//! Regex-driven extraction of symbolic references from raw PHP source.
//!
//! No parse tree is ever built. String literals are matched before comment
//! patterns so a `render()` inside a quoted string survives while one inside
//! a comment is never scanned, and all brace matching goes through the one
//! shared quote-aware scanner in [`find_brace_delimited_body`].

use regex::Regex;

use crate::types::{ActionRecord, ReferenceKind, SymbolicReference, line_of_offset};

/// A quoted string argument captured by one of the extractors.
#[derive(Debug, Clone)]
pub struct QuotedLiteral {
    /// Byte offset of the literal's first character (past the quote).
    pub offset: usize,
    /// Enclosing quote character, `'` or `"`.
    pub quote: char,
    /// The literal's content, without the quotes.
    pub value: String,
}

/// Replace `//...` and `/*...*/` comment spans with spaces.
///
/// String literals are left untouched, so `"//not-a-comment"` survives.
/// Spans are blanked rather than deleted so every byte offset into the
/// returned text is also a valid offset into the original; newlines inside
/// block comments are preserved to keep line numbers stable.
///
/// # Panics
///
/// Panics if the hardcoded pattern is invalid (compile-time invariant).
pub fn blank_comments(text: &str) -> String {
    let pattern = Regex::new(
        r#"(?s)'(?:\\.|[^'\\])*'|"(?:\\.|[^"\\])*"|/\*.*?\*/|//[^\n]*"#,
    )
    .expect("valid regex");

    pattern
        .replace_all(text, |cap: &regex::Captures<'_>| {
            let matched = cap.get(0).map_or("", |m| m.as_str());
            if matched.starts_with('\'') || matched.starts_with('"') {
                return matched.to_string();
            }
            // Per byte, not per char: multibyte text inside a comment must
            // not shrink the buffer or offsets would drift.
            matched
                .bytes()
                .map(|b| if b == b'\n' { '\n' } else { ' ' })
                .collect()
        })
        .into_owned()
}

/// Scan forward from `start` for a brace-delimited body.
///
/// Returns the offset just past the brace that brings the depth back to
/// zero, or `None` if the text ends first (malformed source). Braces inside
/// single- or double-quoted string literals are ignored; a quote character
/// is escaped iff it is preceded by an odd number of consecutive backslashes.
///
/// This is the single shared brace primitive — action bodies, behaviors()
/// bounds, and method scoping all go through it.
pub fn find_brace_delimited_body(text: &str, start: usize) -> Option<usize> {
    let (_, end) = scan_braces(text, start);
    end
}

/// Shared quote-aware brace walk: first opening brace and matching close.
fn scan_braces(text: &str, start: usize) -> (Option<usize>, Option<usize>) {
    let bytes = text.as_bytes();
    let mut depth: usize = 0;
    let mut open: Option<usize> = None;
    let mut in_string: Option<u8> = None;
    let mut i = start.min(bytes.len());

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(quote) = in_string {
            if b == quote && !is_escaped(bytes, i) {
                in_string = None;
            }
        } else {
            match b {
                b'\'' | b'"' => in_string = Some(b),
                b'{' => {
                    if open.is_none() {
                        open = Some(i);
                    }
                    depth = depth.saturating_add(1);
                },
                b'}' if open.is_some() => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return (open, Some(i.saturating_add(1)));
                    }
                },
                _ => {},
            }
        }
        i = i.saturating_add(1);
    }

    (open, None)
}

/// A quote is escaped iff preceded by an odd number of consecutive backslashes.
fn is_escaped(bytes: &[u8], at: usize) -> bool {
    let mut backslashes = 0usize;
    let mut i = at;
    while i > 0 && bytes[i.saturating_sub(1)] == b'\\' {
        backslashes = backslashes.saturating_add(1);
        i = i.saturating_sub(1);
    }
    backslashes % 2 == 1
}

/// Find every `function actionXxx(` definition and its brace-matched body.
///
/// # Panics
///
/// Panics if the hardcoded pattern is invalid (compile-time invariant).
pub fn find_action_methods(text: &str) -> Vec<ActionRecord> {
    let pattern = Regex::new(r"function\s+(action\w+)\s*\(").expect("valid regex");
    let mut actions = Vec::new();

    for cap in pattern.captures_iter(text) {
        let Some(whole) = cap.get(0) else { continue };
        let Some(name) = cap.get(1) else { continue };
        let (open, end) = scan_braces(text, whole.end());
        actions.push(ActionRecord {
            body_end: end,
            body_start: open.unwrap_or(text.len()),
            name: name.as_str().to_string(),
            offset: whole.start(),
        });
    }

    actions
}

/// Find `render(...)` / `renderPartial(...)` calls with a quoted first argument.
/// Returns the view literal plus whether the call was the partial form.
///
/// # Panics
///
/// Panics if the hardcoded pattern is invalid (compile-time invariant).
pub fn find_render_calls(text: &str) -> Vec<(QuotedLiteral, bool)> {
    let pattern =
        Regex::new(r#"->\s*(renderPartial|render)\s*\(\s*(?:'([^']*)'|"([^"]*)")"#)
            .expect("valid regex");

    pattern
        .captures_iter(text)
        .filter_map(|cap| {
            let method = cap.get(1)?.as_str();
            let literal = quoted_from_captures(&cap, 2, 3)?;
            Some((literal, method == "renderPartial"))
        })
        .collect()
}

/// Find `Yii::import('...')` calls.
///
/// # Panics
///
/// Panics if the hardcoded pattern is invalid (compile-time invariant).
pub fn find_import_calls(text: &str) -> Vec<QuotedLiteral> {
    let pattern =
        Regex::new(r#"Yii::import\s*\(\s*(?:'([^']*)'|"([^"]*)")"#).expect("valid regex");
    pattern
        .captures_iter(text)
        .filter_map(|cap| quoted_from_captures(&cap, 1, 2))
        .collect()
}

/// Find route strings passed to `createUrl(...)` / `createAbsoluteUrl(...)`.
///
/// # Panics
///
/// Panics if the hardcoded pattern is invalid (compile-time invariant).
pub fn find_route_calls(text: &str) -> Vec<QuotedLiteral> {
    let pattern = Regex::new(
        r#"(?:createUrl|createAbsoluteUrl)\s*\(\s*(?:'([^']*)'|"([^"]*)")"#,
    )
    .expect("valid regex");
    pattern
        .captures_iter(text)
        .filter_map(|cap| quoted_from_captures(&cap, 1, 2))
        .collect()
}

/// Find layout assignments: `$this->layout = '...'` or `public $layout = '...'`.
///
/// # Panics
///
/// Panics if the hardcoded pattern is invalid (compile-time invariant).
pub fn find_layout_assignments(text: &str) -> Vec<QuotedLiteral> {
    let pattern = Regex::new(
        r#"(?:\$this->layout|public\s+\$layout)\s*=\s*(?:'([^']*)'|"([^"]*)")"#,
    )
    .expect("valid regex");
    pattern
        .captures_iter(text)
        .filter_map(|cap| quoted_from_captures(&cap, 1, 2))
        .collect()
}

/// Find `'class' => '...'` entries inside the `behaviors()` method body.
/// Returns nothing when the file has no `behaviors()` method; an unterminated
/// body scopes the search to the rest of the file.
///
/// # Panics
///
/// Panics if the hardcoded patterns are invalid (compile-time invariant).
pub fn find_behavior_class_entries(text: &str) -> Vec<QuotedLiteral> {
    let signature = Regex::new(r"function\s+behaviors\s*\(").expect("valid regex");
    let Some(sig) = signature.find(text) else {
        return Vec::new();
    };

    let body_start = sig.end();
    let body_end = find_brace_delimited_body(text, body_start).unwrap_or(text.len());
    let Some(body) = text.get(body_start..body_end) else {
        return Vec::new();
    };

    let pattern = Regex::new(r#"["']class["']\s*=>\s*(?:'([^']*)'|"([^"]*)")"#)
        .expect("valid regex");
    pattern
        .captures_iter(body)
        .filter_map(|cap| {
            let mut literal = quoted_from_captures(&cap, 1, 2)?;
            literal.offset = literal.offset.saturating_add(body_start);
            Some(literal)
        })
        .collect()
}

/// Lexically extract a class declaration from file text.
/// Returns `(is_abstract, name, parent, methods, properties)` for the first
/// class declared, or `None` when the file declares no class.
///
/// # Panics
///
/// Panics if the hardcoded patterns are invalid (compile-time invariant).
pub fn extract_class(
    text: &str,
) -> Option<(bool, String, Option<String>, Vec<String>, Vec<String>)> {
    let class_pattern =
        Regex::new(r"(abstract\s+)?(?:final\s+)?class\s+(\w+)(?:\s+extends\s+(\w+))?")
            .expect("valid regex");
    let cap = class_pattern.captures(text)?;
    let is_abstract = cap.get(1).is_some();
    let name = cap.get(2)?.as_str().to_string();
    let parent = cap.get(3).map(|m| m.as_str().to_string());

    let method_pattern = Regex::new(r"function\s+&?(\w+)\s*\(").expect("valid regex");
    let methods = method_pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();

    let property_pattern =
        Regex::new(r"(?:public|protected|private|var)\s+(?:static\s+)?\$(\w+)")
            .expect("valid regex");
    let properties = property_pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect();

    Some((is_abstract, name, parent, methods, properties))
}

/// Extract the quoted entries of the `'import' => array(...)` block from the
/// main configuration file. Lexical only: collects quoted strings between the
/// opening `array(` and the next closing parenthesis.
///
/// # Panics
///
/// Panics if the hardcoded patterns are invalid (compile-time invariant).
pub fn find_config_import_paths(text: &str) -> Vec<String> {
    let opener =
        Regex::new(r#"["']import["']\s*=>\s*array\s*\("#).expect("valid regex");
    let Some(open) = opener.find(text) else {
        return Vec::new();
    };

    let rest = text.get(open.end()..).unwrap_or("");
    let block = rest.split(')').next().unwrap_or("");

    let string_pattern = Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("valid regex");
    string_pattern
        .captures_iter(block)
        .filter_map(|cap| {
            cap.get(1)
                .or_else(|| cap.get(2))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

/// Run every extractor over comment-blanked text and collect all references.
/// Callers pass the original text; blanking happens once here.
pub fn scan_references(text: &str) -> Vec<SymbolicReference> {
    let blanked = blank_comments(text);
    let mut refs = Vec::new();

    for (literal, as_partial) in find_render_calls(&blanked) {
        let kind = if as_partial { ReferenceKind::PartialView } else { ReferenceKind::View };
        refs.push(to_reference(kind, &literal, &blanked));
    }
    for literal in find_import_calls(&blanked) {
        refs.push(to_reference(ReferenceKind::Import, &literal, &blanked));
    }
    for literal in find_route_calls(&blanked) {
        refs.push(to_reference(ReferenceKind::Route, &literal, &blanked));
    }
    for literal in find_layout_assignments(&blanked) {
        refs.push(to_reference(ReferenceKind::Layout, &literal, &blanked));
    }
    for literal in find_behavior_class_entries(&blanked) {
        refs.push(to_reference(ReferenceKind::BehaviorClass, &literal, &blanked));
    }

    refs.sort_by_key(|r| r.offset);
    refs
}

/// Pull the value match out of a two-alternative quoted capture.
fn quoted_from_captures(
    cap: &regex::Captures<'_>,
    single_group: usize,
    double_group: usize,
) -> Option<QuotedLiteral> {
    if let Some(m) = cap.get(single_group) {
        return Some(QuotedLiteral {
            offset: m.start(),
            quote: '\'',
            value: m.as_str().to_string(),
        });
    }
    let m = cap.get(double_group)?;
    Some(QuotedLiteral {
        offset: m.start(),
        quote: '"',
        value: m.as_str().to_string(),
    })
}

/// Build a `SymbolicReference` from a captured literal.
fn to_reference(kind: ReferenceKind, literal: &QuotedLiteral, text: &str) -> SymbolicReference {
    SymbolicReference::new(kind, &literal.value, literal.offset, line_of_offset(text, literal.offset))
}
