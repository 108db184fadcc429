//! Definition-before-use reordering.
//!
//! Generated answers interleave usage and definitions freely; execution
//! needs imports and declarations first and the guarded entry point last.
//! Lines are grouped into logical blocks, each block is tagged from its
//! first non-blank line, and the blocks are re-emitted as
//! Import → Class → Function → Other → Main.

use crate::core::classify::{self, Line, LineKind};
use tracing::trace;

/// Classification of a logical block, taken from its first non-blank line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    Import,
    Class,
    Function,
    Main,
    Other,
}

/// A maximal run of lines carrying a single tag.
#[derive(Debug)]
pub struct LogicalBlock {
    pub lines: Vec<String>,
    pub tag: BlockTag,
}

fn tag_for(lines: &[String]) -> BlockTag {
    let Some(first) = lines.iter().map(|l| l.trim()).find(|l| !l.is_empty()) else {
        return BlockTag::Other;
    };

    if classify::is_guard_line(first) {
        BlockTag::Main
    } else if classify::class_name(first).is_some() {
        BlockTag::Class
    } else if classify::def_name(first).is_some() {
        BlockTag::Function
    } else if classify::is_import_line(first) {
        BlockTag::Import
    } else {
        BlockTag::Other
    }
}

/// A docstring delimiter line that opens and closes on the same line
/// (e.g. `"""one-liner"""`) does not flip the docstring state.
fn toggles_docstring(stripped: &str) -> bool {
    for q in ["\"\"\"", "'''"] {
        if stripped.starts_with(q) {
            return !(stripped.len() >= 2 * q.len() && stripped.ends_with(q));
        }
    }
    false
}

/// Split classified lines into logical blocks. A new block starts at every
/// zero-indentation `def`/`class` header or entry-point guard, except while
/// inside a docstring. Consecutive blanks collapse to one.
fn segment(lines: &[Line]) -> Vec<LogicalBlock> {
    fn flush(current: &mut Vec<String>, blocks: &mut Vec<LogicalBlock>) {
        if !current.is_empty() {
            let lines = std::mem::take(current);
            blocks.push(LogicalBlock { tag: tag_for(&lines), lines });
        }
    }

    let mut blocks: Vec<LogicalBlock> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut in_docstring = false;

    for line in lines {
        if line.is_blank() {
            // Collapse duplicate blanks early; spacing is rebuilt on emit
            if current.last().is_some_and(|l| l.trim().is_empty()) {
                continue;
            }
            current.push(String::new());
            continue;
        }

        let stripped = line.stripped();

        if line.kind == LineKind::DocstringDelim && toggles_docstring(stripped) {
            in_docstring = !in_docstring;
        }

        let starts_block = !in_docstring
            && line.indent == 0
            && matches!(
                line.kind,
                LineKind::DefHeader | LineKind::ClassHeader | LineKind::Guard
            );

        if starts_block {
            flush(&mut current, &mut blocks);
        }

        current.push(line.text.clone());
    }

    flush(&mut current, &mut blocks);
    blocks
}

/// Reorder `code` into a valid definition order. Degrades to a formatting
/// no-op when no recognizable structure exists.
pub fn reorder(code: &str) -> String {
    let classified = classify::classify(code);
    let blocks = segment(&classified);

    let mut imports = Vec::new();
    let mut classes = Vec::new();
    let mut functions = Vec::new();
    let mut mains = Vec::new();
    let mut others = Vec::new();

    for block in blocks {
        trace!(tag = ?block.tag, lines = block.lines.len(), "classified block");
        match block.tag {
            BlockTag::Import => imports.push(block),
            BlockTag::Class => classes.push(block),
            BlockTag::Function => functions.push(block),
            BlockTag::Main => mains.push(block),
            BlockTag::Other => others.push(block),
        }
    }

    let ordered = imports
        .into_iter()
        .chain(classes)
        .chain(functions)
        .chain(others)
        .chain(mains);

    let mut out: Vec<String> = Vec::new();
    for block in ordered {
        // Strip blank edges; spacing between blocks is exactly one blank
        let body: Vec<&str> = {
            let lines: Vec<&str> = block.lines.iter().map(|l| l.trim_end()).collect();
            let start = lines.iter().position(|l| !l.is_empty());
            let end = lines.iter().rposition(|l| !l.is_empty());
            match (start, end) {
                (Some(s), Some(e)) => lines[s..=e].to_vec(),
                _ => continue,
            }
        };

        if !out.is_empty() {
            out.push(String::new());
        }
        out.extend(body.into_iter().map(str::to_string));
    }

    let mut result = out.join("\n");
    if !result.is_empty() && !result.ends_with('\n') {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_block_moves_last() {
        let code = "if __name__ == '__main__':\n    main()\n\ndef main():\n    print('hi')\n";
        let out = reorder(code);
        assert_eq!(
            out,
            "def main():\n    print('hi')\n\nif __name__ == '__main__':\n    main()\n"
        );
    }

    #[test]
    fn classes_precede_functions_precede_others() {
        let code = "x = compute()\n\ndef compute():\n    return 1\n\nclass Thing:\n    pass\n";
        let out = reorder(code);
        let class_at = out.find("class Thing").unwrap();
        let def_at = out.find("def compute").unwrap();
        let use_at = out.find("x = compute()").unwrap();
        assert!(class_at < def_at && def_at < use_at);
    }

    #[test]
    fn duplicate_blanks_collapse() {
        let code = "a = 1\n\n\n\nb = 2\n";
        assert_eq!(reorder(code), "a = 1\n\nb = 2\n");
    }

    #[test]
    fn method_defs_stay_inside_their_class() {
        let code = "class A:\n    def m(self):\n        return 1\n    def n(self):\n        return 2\n";
        assert_eq!(reorder(code), code);
    }

    #[test]
    fn docstring_content_is_not_resegmented() {
        let code = "def f():\n    \"\"\"Docs mentioning\ndef g():\n    nothing real\n    \"\"\"\n    return 1\n";
        let out = reorder(code);
        // The fake header inside the docstring must not split the function
        assert_eq!(out.matches("def f():").count(), 1);
        assert!(out.find("def g():").unwrap() > out.find("def f():").unwrap());
        assert_eq!(out.matches("\n\n").count(), 0);
    }

    #[test]
    fn one_line_docstring_does_not_poison_state() {
        let code = "def f():\n    \"\"\"short\"\"\"\n    return 1\n\ndef g():\n    return 2\n";
        let out = reorder(code);
        assert!(out.contains("def g():"));
        // g still forms its own block, so the blank separator survives
        assert!(out.contains("return 1\n\ndef g():"));
    }

    #[test]
    fn reorder_is_idempotent() {
        let code = "x = f()\n\nimport os\n\ndef f():\n    return os.getpid()\n\nif __name__ == '__main__':\n    print(x)\n";
        let once = reorder(code);
        assert_eq!(reorder(&once), once);
    }

    #[test]
    fn trailing_whitespace_is_stripped() {
        let code = "a = 1   \nb = 2\t\n";
        assert_eq!(reorder(code), "a = 1\nb = 2\n");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(reorder(""), "");
        assert_eq!(reorder("\n\n"), "");
    }
}
