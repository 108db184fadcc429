//! Filename and project-name derivation.
//!
//! Names come from the code when it has structure (first class, first
//! function), from the prompt when it does not, and from the wall clock as
//! a last resort. The timestamp fallback is the single non-deterministic
//! corner of the whole pipeline.

use chrono::Local;
use regex::Regex;
use std::sync::LazyLock;

use crate::infra::tables::{FILENAME_STOP_WORDS, PROJECT_STOP_WORDS};

/// Extension appended to every derived filename.
pub const SOURCE_EXT: &str = ".py";

static CLASS_SEARCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+(\w+)").expect("class search"));

static DEF_SEARCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"def\s+(\w+)").expect("def search"));

/// Word-like runs of length >= 3 used for project naming.
static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-zA-Z][a-zA-Z0-9_]{2,}\b").expect("keyword pattern"));

/// `BinarySearchTree` → `binary_search_tree`.
pub fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out.trim_start_matches('_').to_string()
}

/// Derive a filename for `code`, consulting `prompt` when the code offers
/// no class or function to name it after. Always terminates with the
/// timestamp fallback.
pub fn filename_from_content(code: &str, prompt: &str) -> String {
    if let Some(cap) = CLASS_SEARCH_RE.captures(code) {
        return format!("{}{SOURCE_EXT}", camel_to_snake(&cap[1]));
    }

    if let Some(cap) = DEF_SEARCH_RE.captures(code) {
        return format!("{}{SOURCE_EXT}", &cap[1]);
    }

    let lowered = prompt.to_lowercase();
    let relevant: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| !FILENAME_STOP_WORDS.contains(w) && w.chars().count() > 2)
        .take(3)
        .collect();

    let name: String = relevant
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect();

    if !name.is_empty() {
        return format!("{name}{SOURCE_EXT}");
    }

    format!("code_{}{SOURCE_EXT}", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Derive a project-directory name from the prompt, falling back to the
/// filename stem. Never empty, never longer than 30 characters.
pub fn project_name(prompt: &str, code: &str) -> String {
    let lowered = prompt.to_lowercase();
    let keywords: Vec<&str> = KEYWORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !PROJECT_STOP_WORDS.contains(w))
        .take(3)
        .collect();

    let raw = if keywords.is_empty() {
        filename_from_content(code, prompt)
            .trim_end_matches(SOURCE_EXT)
            .to_string()
    } else {
        keywords.join("_")
    };

    raw.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .take(30)
        .collect()
}
