//! Code block location inside free-form model output.
//!
//! Strategy ladder, best source first:
//!   1. fenced ``` regions (optional language tag)
//!   2. four-space / tab indented runs
//!   3. (clean mode only) heuristic signature search for Python-looking
//!      constructs scattered through prose
//!   4. the raw text itself
//!
//! The locator never fails: something is always returned, and the caller
//! decides what further cleanup applies.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```(?:[A-Za-z][\w+-]*)?[ \t]*\r?\n([\s\S]*?)```").expect("fence pattern")
});

/// Heuristic signatures for code that was never fenced: headers with an
/// indented body, plus literal/collection assignments.
static SIGNATURE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Function definitions
        r"def\s+\w+\s*\([^)]*\):\s*(?:\n\s+.+)+",
        // Class definitions
        r"class\s+\w+(?:\([^)]*\))?:\s*(?:\n\s+.+)+",
        // If statements
        r"if\s+.+:\s*(?:\n\s+.+)+",
        // For loops
        r"for\s+.+:\s*(?:\n\s+.+)+",
        // Assignments of string/number/collection literals
        r#"\w+\s*=\s*(?:['"]\w+['"]|\d+|\[.+\]|\{.+\}|\(.+\))"#,
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("signature pattern"))
    .collect()
});

/// Where a candidate block came from. Offsets keep concatenation in source
/// order; nothing downstream retains the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOrigin {
    Fenced,
    Indented,
    Heuristic,
}

/// A contiguous span of extracted code text.
#[derive(Debug, Clone)]
pub struct CodeBlock {
    pub text: String,
    pub origin: BlockOrigin,
    pub offset: usize,
}

fn fenced_blocks(text: &str) -> Vec<CodeBlock> {
    FENCE_RE
        .captures_iter(text)
        .map(|cap| {
            let m = cap.get(1).expect("fence body");
            CodeBlock {
                text: m.as_str().trim().to_string(),
                origin: BlockOrigin::Fenced,
                offset: m.start(),
            }
        })
        .collect()
}

fn indented_blocks(text: &str) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut run_offset = 0usize;
    let mut offset = 0usize;

    for raw in text.split('\n') {
        if let Some(rest) = raw.strip_prefix("    ").or_else(|| raw.strip_prefix('\t')) {
            if run.is_empty() {
                run_offset = offset;
            }
            run.push(rest);
        } else if !raw.trim().is_empty() && !run.is_empty() {
            blocks.push(CodeBlock {
                text: run.join("\n"),
                origin: BlockOrigin::Indented,
                offset: run_offset,
            });
            run.clear();
        }
        // Blank lines neither extend nor close a run

        offset += raw.len() + 1;
    }

    if !run.is_empty() {
        blocks.push(CodeBlock {
            text: run.join("\n"),
            origin: BlockOrigin::Indented,
            offset: run_offset,
        });
    }

    blocks
}

fn signature_blocks(text: &str) -> Vec<CodeBlock> {
    let mut blocks: Vec<CodeBlock> = SIGNATURE_RES
        .iter()
        .flat_map(|re| {
            re.find_iter(text).map(|m| CodeBlock {
                text: m.as_str().to_string(),
                origin: BlockOrigin::Heuristic,
                offset: m.start(),
            })
        })
        .collect();

    // Matches from different patterns interleave; restore source order
    blocks.sort_by_key(|b| b.offset);
    blocks
}

fn join(blocks: &[CodeBlock]) -> String {
    blocks.iter().map(|b| b.text.as_str()).collect::<Vec<_>>().join("\n\n")
}

/// Locate code inside `text`. The heuristic signature pass only runs when
/// `clean` is requested; without it, unfenced prose falls straight through
/// unchanged so nothing is invented on behalf of the caller.
pub fn locate(text: &str, clean: bool) -> String {
    let fenced = fenced_blocks(text);
    if !fenced.is_empty() {
        debug!(blocks = fenced.len(), "using fenced code blocks");
        return join(&fenced);
    }

    let indented = indented_blocks(text);
    if !indented.is_empty() {
        debug!(blocks = indented.len(), "using indented code runs");
        return join(&indented);
    }

    if clean {
        let found = signature_blocks(text);
        if !found.is_empty() {
            debug!(blocks = found.len(), "using heuristic signature matches");
            return join(&found);
        }
    }

    debug!("no code regions found, passing text through");
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_fence_yields_trimmed_inner_content() {
        let text = "Sure, here you go:\n```python\nx = 1\nprint(x)\n```\nHope that helps!";
        assert_eq!(locate(text, false), "x = 1\nprint(x)");
    }

    #[test]
    fn untagged_fence_is_accepted() {
        let text = "```\ny = 2\n```";
        assert_eq!(locate(text, false), "y = 2");
    }

    #[test]
    fn two_fences_join_with_one_blank_line_in_source_order() {
        let text = "first:\n```python\na = 1\n```\nthen:\n```python\nb = 2\n```";
        assert_eq!(locate(text, false), "a = 1\n\nb = 2");
    }

    #[test]
    fn indented_runs_are_dedented_one_level() {
        let text = "Example:\n    def f():\n        return 1\nDone.";
        assert_eq!(locate(text, false), "def f():\n    return 1");
    }

    #[test]
    fn tab_indent_counts_as_one_level() {
        let text = "Example:\n\tx = 1\nDone.";
        assert_eq!(locate(text, false), "x = 1");
    }

    #[test]
    fn heuristic_finds_bare_definitions_in_clean_mode_only() {
        // Two-space body: shallow enough to dodge the indented-run pass
        let text = "The function def add(a, b):\n  return a + b\nadds numbers.";
        assert_eq!(locate(text, true), "def add(a, b):\n  return a + b");
        // Without clean mode the prose passes through unchanged
        assert_eq!(locate(text, false), text);
    }

    #[test]
    fn plain_prose_falls_through_unchanged() {
        let text = "No code here at all.";
        assert_eq!(locate(text, true), text);
        assert_eq!(locate(text, false), text);
    }

    #[test]
    fn empty_input_is_fine() {
        assert_eq!(locate("", true), "");
    }
}
