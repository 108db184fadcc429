//! Removal of interactive-session noise.
//!
//! Model output frequently includes pasted REPL transcripts. The scrubber
//! drops prompt markers, output ordinals, and object reprs line by line;
//! it carries no cross-line state, so retained lines keep their order.

use regex::Regex;
use std::sync::LazyLock;

static ARTIFACT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Interactive prompts and IPython cell markers
        r"^(>>>|\.\.\.|In \[\d+\]:|Out\[\d+\]:)",
        // Bare output numbering
        r"^\[\d+\]:",
        // Object representations like <Foo object at 0x...>
        r"^<(\w+) (object|at) .+>",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("artifact pattern"))
    .collect()
});

fn is_artifact(stripped: &str) -> bool {
    ARTIFACT_RES.iter().any(|re| re.is_match(stripped))
}

/// Drop every line that looks like session output rather than code.
pub fn scrub(text: &str) -> String {
    text.split('\n')
        .filter(|line| !is_artifact(line.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repl_prompts_are_dropped() {
        let text = ">>> x = 1\nx = 1\n... more\nprint(x)";
        assert_eq!(scrub(text), "x = 1\nprint(x)");
    }

    #[test]
    fn ipython_markers_are_dropped() {
        let text = "In [3]: run()\nOut[3]: 42\n[4]: 43\nresult = 42";
        assert_eq!(scrub(text), "result = 42");
    }

    #[test]
    fn object_reprs_are_dropped() {
        let text = "<Tree object at 0x7f3a>\ntree = Tree()";
        assert_eq!(scrub(text), "tree = Tree()");
    }

    #[test]
    fn clean_code_is_untouched() {
        let text = "def f():\n    return 1\n";
        assert_eq!(scrub(text), text);
    }
}
