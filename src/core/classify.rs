//! Single-pass line classification.
//!
//! The whole pipeline operates on malformed, ambiguous text, so structure is
//! derived exactly once: every line gets a `LineKind` tag and an indentation
//! width, and each later pass is a plain scan over the tagged sequence
//! instead of re-deriving headers with its own patterns.

use regex::Regex;
use std::sync::LazyLock;

static DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^def\s+(\w+)\s*\(").expect("def pattern"));

static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^class\s+(\w+)").expect("class pattern"));

static GUARD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^if\s+__name__\s*==\s*['"]__main__['"]"#).expect("guard pattern")
});

/// Tag alphabet for a single line. Tags are mutually exclusive; the first
/// matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Nothing but whitespace
    Blank,
    /// `import x` or `from x import y`, at any indentation
    Import,
    /// `class Name...`, at any indentation
    ClassHeader,
    /// `def name(...`, at any indentation
    DefHeader,
    /// The `if __name__ == "__main__"` entry-point guard
    Guard,
    /// `# ...`
    Comment,
    /// A line starting with `"""` or `'''`
    DocstringDelim,
    /// Anything else
    Body,
}

/// One classified source line. The original text is kept verbatim;
/// `indent` counts leading spaces and tabs as the original wrote them.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub indent: usize,
    pub kind: LineKind,
}

impl Line {
    pub fn stripped(&self) -> &str {
        self.text.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }
}

/// True for both import forms Python allows on one line.
pub fn is_import_line(stripped: &str) -> bool {
    stripped.starts_with("import ")
        || (stripped.starts_with("from ") && stripped.contains(" import "))
}

/// Name captured from a `def` header, if the line is one.
pub fn def_name(stripped: &str) -> Option<&str> {
    DEF_RE.captures(stripped).map(|c| c.get(1).expect("group").as_str())
}

/// Name captured from a `class` header, if the line is one.
pub fn class_name(stripped: &str) -> Option<&str> {
    CLASS_RE.captures(stripped).map(|c| c.get(1).expect("group").as_str())
}

/// True for the entry-point guard line.
pub fn is_guard_line(stripped: &str) -> bool {
    GUARD_RE.is_match(stripped)
}

fn kind_of(stripped: &str) -> LineKind {
    if stripped.is_empty() {
        LineKind::Blank
    } else if is_guard_line(stripped) {
        LineKind::Guard
    } else if is_import_line(stripped) {
        LineKind::Import
    } else if CLASS_RE.is_match(stripped) {
        LineKind::ClassHeader
    } else if DEF_RE.is_match(stripped) {
        LineKind::DefHeader
    } else if stripped.starts_with('#') {
        LineKind::Comment
    } else if stripped.starts_with("\"\"\"") || stripped.starts_with("'''") {
        LineKind::DocstringDelim
    } else {
        LineKind::Body
    }
}

/// Classify every line of `text`. Total: any input yields a tagged
/// sequence, garbage lines simply land in `Body`.
pub fn classify(text: &str) -> Vec<Line> {
    text.split('\n')
        .map(|raw| {
            let indent = raw.chars().take_while(|c| *c == ' ' || *c == '\t').count();
            Line {
                kind: kind_of(raw.trim()),
                indent,
                text: raw.to_string(),
            }
        })
        .collect()
}

/// Reassemble classified lines into a text buffer.
pub fn render(lines: &[Line]) -> String {
    lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n")
}
