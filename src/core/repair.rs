//! Duplicate and incomplete definition repair.
//!
//! Generated code loves to restate itself: the same class twice, the same
//! method in both halves of an answer, two `__init__`s with different
//! signatures. Three passes run over the classified line sequence:
//!
//!   1. generic duplicate elimination (first definition wins, `__init__`
//!      exempt),
//!   2. a list of pluggable [`RepairRule`]s for known anti-patterns
//!      (currently the node/tree constructor mix-up),
//!   3. duplicate-constructor collapse keeping the fullest candidate.
//!
//! Everything here is best-effort. Unmatched or ambiguous shapes are left
//! untouched; on adversarial input the passes may under-fix rather than
//! guess. No pass can fail.

use crate::core::classify::{self, Line, LineKind};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `self.<field> = <field>` where both sides look like a key/value slot.
static KEY_ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^self\.(?:key|value|val)\s*=\s*(?:key|value|val)\s*$").expect("key assign")
});

/// Any recognized node field assignment, capturing the field name.
static NODE_FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^self\.(key|value|val|left|right)\s*=").expect("node field"));

/// A definition's span: the header line plus every following line that is
/// blank or indented deeper than the header. Returns the exclusive end.
fn span_end(lines: &[Line], start: usize) -> usize {
    let indent = lines[start].indent;
    let mut j = start + 1;
    while j < lines.len() && (lines[j].is_blank() || lines[j].indent > indent) {
        j += 1;
    }
    j
}

/// Exclusive end of the span with trailing blank lines trimmed off, so a
/// replacement keeps the blank separation that followed the original.
fn content_end(lines: &[Line], start: usize, end: usize) -> usize {
    let mut e = end;
    while e > start + 1 && lines[e - 1].is_blank() {
        e -= 1;
    }
    e
}

/// Parameter identifiers of a `def` header line, `self` included.
fn header_params(stripped: &str) -> Vec<String> {
    let Some(open) = stripped.find('(') else {
        return Vec::new();
    };
    let close = match stripped.rfind(')') {
        Some(c) if c > open => c,
        _ => stripped.len(),
    };
    stripped[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            p.chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|p| !p.is_empty())
        .collect()
}

/// First parameter after `self`, if any.
fn first_param(stripped: &str) -> Option<String> {
    let params = header_params(stripped);
    params.iter().find(|p| *p != "self").cloned()
}

fn looks_like_key_param(param: &str) -> bool {
    param.starts_with("key") || param.starts_with("val")
}

/// Shift a line's indentation by `delta` columns, best effort.
fn shift_indent(text: &str, delta: isize) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    if delta >= 0 {
        format!("{}{}", " ".repeat(delta as usize), text)
    } else {
        let strip = (-delta) as usize;
        let leading = text.chars().take_while(|c| *c == ' ' || *c == '\t').count();
        text.chars().skip(strip.min(leading)).collect()
    }
}

/// Pass 1: delete repeated class spans and repeated method spans.
///
/// Methods are keyed by the nearest preceding class header when indented,
/// and unqualified when top-level. `__init__` is exempt; the dedicated
/// collapse pass picks the best constructor instead of the first.
fn drop_duplicate_definitions(lines: Vec<Line>) -> Vec<Line> {
    let mut seen_classes: IndexMap<String, usize> = IndexMap::new();
    let mut seen_methods: IndexMap<String, usize> = IndexMap::new();
    let mut enclosing: Option<String> = None;
    let mut kept: Vec<Line> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];

        match line.kind {
            LineKind::ClassHeader => {
                if let Some(name) = classify::class_name(line.stripped()) {
                    if seen_classes.contains_key(name) {
                        debug!(duplicate = name, "dropping duplicate class definition");
                        i = span_end(&lines, i);
                        continue;
                    }
                    seen_classes.insert(name.to_string(), i);
                    enclosing = Some(name.to_string());
                }
            }
            LineKind::DefHeader => {
                if let Some(name) = classify::def_name(line.stripped())
                    && name != "__init__"
                {
                    let key = match (&enclosing, line.indent) {
                        (Some(class), indent) if indent > 0 => format!("{class}.{name}"),
                        _ => name.to_string(),
                    };
                    if seen_methods.contains_key(&key) {
                        debug!(method = %key, "dropping duplicate method definition");
                        i = span_end(&lines, i);
                        continue;
                    }
                    seen_methods.insert(key, i);
                }
            }
            _ => {}
        }

        kept.push(line.clone());
        i += 1;
    }

    kept
}

/// A heuristic rewrite for one known anti-pattern. Rules see the whole
/// classified sequence and either return a rewritten sequence or decline.
pub trait RepairRule {
    fn name(&self) -> &'static str;
    fn apply(&self, lines: &[Line]) -> Option<Vec<Line>>;
}

/// The node/tree constructor mix-up: an empty node class next to a tree
/// class whose `__init__` takes a key — node-initialization logic landed
/// in the container. Moves (or synthesizes) a node constructor and reduces
/// the container to a bare `self.root = None`.
pub struct NodeClassRepair;

impl NodeClassRepair {
    fn find_class(lines: &[Line], names: &[&str]) -> Option<(usize, usize)> {
        lines.iter().enumerate().find_map(|(i, l)| {
            (l.kind == LineKind::ClassHeader
                && classify::class_name(l.stripped()).is_some_and(|n| names.contains(&n)))
            .then(|| (i, span_end(lines, i)))
        })
    }

    /// An `__init__` span whose first parameter is key-like and whose body
    /// assigns that key to a key/value field: a proper node constructor.
    fn find_proper_node_init(lines: &[Line]) -> Option<(usize, usize)> {
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            if line.kind == LineKind::DefHeader
                && classify::def_name(line.stripped()) == Some("__init__")
            {
                let end = span_end(lines, i);
                let keyish = first_param(line.stripped()).is_some_and(|p| looks_like_key_param(&p));
                let assigns =
                    lines[i + 1..end].iter().any(|l| KEY_ASSIGN_RE.is_match(l.stripped()));
                if keyish && assigns {
                    return Some((i, end));
                }
                i = end;
                continue;
            }
            i += 1;
        }
        None
    }
}

impl RepairRule for NodeClassRepair {
    fn name(&self) -> &'static str {
        "node-class-repair"
    }

    fn apply(&self, lines: &[Line]) -> Option<Vec<Line>> {
        let (node_idx, node_end) = Self::find_class(lines, &["TreeNode", "Node"])?;
        let (tree_idx, tree_end) = Self::find_class(lines, &["BinarySearchTree", "BST"])?;

        // Node body must be empty of methods for the pattern to apply
        if lines[node_idx + 1..node_end].iter().any(|l| l.kind == LineKind::DefHeader) {
            return None;
        }

        // The container constructor must look node-shaped: first param key
        let (init_idx, init_end) = (tree_idx + 1..tree_end)
            .find(|&i| {
                lines[i].kind == LineKind::DefHeader
                    && classify::def_name(lines[i].stripped()) == Some("__init__")
            })
            .map(|i| (i, span_end(lines, i)))?;
        let init_param = first_param(lines[init_idx].stripped())?;
        if !looks_like_key_param(&init_param) {
            return None;
        }

        // Nested node/tree classes are out of scope; leave them alone
        let node_content_end = content_end(lines, node_idx, node_end);
        let init_content_end = content_end(lines, init_idx, init_end);
        if node_idx < init_content_end && init_idx < node_content_end {
            return None;
        }

        let body_indent = lines[node_idx].indent + 4;
        let node_body: Vec<String> = match Self::find_proper_node_init(lines) {
            Some((proper_idx, proper_end)) => {
                // Transplant the found constructor, re-indented for the node
                let delta = body_indent as isize - lines[proper_idx].indent as isize;
                let proper_content_end = content_end(lines, proper_idx, proper_end);
                lines[proper_idx..proper_content_end]
                    .iter()
                    .map(|l| shift_indent(&l.text, delta))
                    .collect()
            }
            None => {
                // Synthesize one from whichever fields the container set
                let pad = " ".repeat(body_indent);
                let field_pad = " ".repeat(body_indent + 4);
                let mut assignments: Vec<String> = Vec::new();
                for attr in ["key", "val", "value", "left", "right"] {
                    let assigned = lines[init_idx + 1..init_end].iter().any(|l| {
                        NODE_FIELD_RE
                            .captures(l.stripped())
                            .is_some_and(|c| &c[1] == attr)
                    });
                    if assigned {
                        if attr == "left" || attr == "right" {
                            assignments.push(format!("{field_pad}self.{attr} = None"));
                        } else {
                            assignments.push(format!("{field_pad}self.{attr} = {init_param}"));
                        }
                    }
                }
                if assignments.is_empty() {
                    assignments = vec![
                        format!("{field_pad}self.key = {init_param}"),
                        format!("{field_pad}self.left = None"),
                        format!("{field_pad}self.right = None"),
                    ];
                }
                let mut body = vec![format!("{pad}def __init__(self, {init_param}):")];
                body.extend(assignments);
                body
            }
        };

        // Rebuild: node class gets the constructor, container init shrinks
        // to a bare root reference. Both replacements keep trailing blanks.
        let init_pad = " ".repeat(lines[init_idx].indent);
        let init_body_pad = " ".repeat(lines[init_idx].indent + 4);
        let reduced_init =
            vec![format!("{init_pad}def __init__(self):"), format!("{init_body_pad}self.root = None")];

        let mut out: Vec<String> = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            if i == node_idx {
                out.push(lines[node_idx].text.clone());
                out.extend(node_body.iter().cloned());
                i = node_content_end;
                continue;
            }
            if i == init_idx {
                out.extend(reduced_init.iter().cloned());
                i = init_content_end;
                continue;
            }
            out.push(lines[i].text.clone());
            i += 1;
        }

        Some(classify::classify(&out.join("\n")))
    }
}

/// The rule list applied between the two generic passes. Order matters:
/// later rules see earlier rewrites.
pub fn default_rules() -> Vec<Box<dyn RepairRule>> {
    vec![Box::new(NodeClassRepair)]
}

/// Pass 3: for each class with several `__init__` spans, keep the one with
/// the most parameters (ties: most lines) and delete the rest. The winner
/// is a proxy for "the most complete definition", nothing stronger.
fn collapse_duplicate_inits(code: &str) -> String {
    let lines = classify::classify(code);
    let mut by_class: IndexMap<String, Vec<(usize, usize)>> = IndexMap::new();
    let mut current_class: Option<String> = None;

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];
        if line.kind == LineKind::ClassHeader {
            current_class = classify::class_name(line.stripped()).map(str::to_string);
            i += 1;
            continue;
        }
        if line.kind == LineKind::DefHeader
            && classify::def_name(line.stripped()) == Some("__init__")
            && let Some(class) = &current_class
        {
            let end = span_end(&lines, i);
            by_class.entry(class.clone()).or_default().push((i, end));
            i = end;
            continue;
        }
        i += 1;
    }

    let mut doomed: Vec<(usize, usize)> = Vec::new();
    for (class, inits) in &by_class {
        if inits.len() < 2 {
            continue;
        }
        let mut best = 0usize;
        let mut best_score = (0usize, 0usize);
        for (idx, &(start, end)) in inits.iter().enumerate() {
            let score = (header_params(lines[start].stripped()).len(), end - start);
            // Strict comparison keeps the earliest definition on ties
            if idx == 0 || score > best_score {
                best = idx;
                best_score = score;
            }
        }
        debug!(owner = class.as_str(), kept = best, total = inits.len(), "collapsing __init__s");
        doomed.extend(inits.iter().enumerate().filter(|(i, _)| *i != best).map(|(_, s)| *s));
    }

    if doomed.is_empty() {
        return code.to_string();
    }

    let mut out: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        if let Some(&(_, end)) = doomed.iter().find(|(start, _)| *start == i) {
            i = end;
            continue;
        }
        out.push(&lines[i].text);
        i += 1;
    }
    out.join("\n")
}

/// Run every repair pass over `code`. Total and infallible: anything the
/// passes cannot confidently match passes through unchanged.
pub fn fix(code: &str) -> String {
    let lines = classify::classify(code);
    let lines = drop_duplicate_definitions(lines);
    let mut text = classify::render(&lines);

    for rule in default_rules() {
        let classified = classify::classify(&text);
        if let Some(rewritten) = rule.apply(&classified) {
            debug!(rule = rule.name(), "repair rule applied");
            text = classify::render(&rewritten);
        }
    }

    collapse_duplicate_inits(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_class_keeps_first_definition() {
        let code = "class Foo:\n    def bar(self):\n        return 1\n\nclass Foo:\n    def bar(self):\n        return 2\n";
        let out = fix(code);
        assert_eq!(out.matches("class Foo").count(), 1);
        assert!(out.contains("return 1"));
        assert!(!out.contains("return 2"));
    }

    #[test]
    fn duplicate_method_in_same_class_is_dropped() {
        let code = "class A:\n    def m(self):\n        return 1\n\n    def m(self):\n        return 2\n";
        let out = fix(code);
        assert_eq!(out.matches("def m(self):").count(), 1);
        assert!(out.contains("return 1"));
    }

    #[test]
    fn same_method_name_in_different_classes_survives() {
        let code = "class A:\n    def m(self):\n        return 1\n\nclass B:\n    def m(self):\n        return 2\n";
        let out = fix(code);
        assert_eq!(out.matches("def m(self):").count(), 2);
    }

    #[test]
    fn top_level_function_is_not_keyed_to_a_preceding_class() {
        let code = "class A:\n    def run(self):\n        return 1\n\ndef run():\n    return 2\n";
        let out = fix(code);
        // Different scopes, both definitions stay
        assert_eq!(out.matches("def run").count(), 2);
    }

    #[test]
    fn duplicate_init_keeps_widest_signature() {
        let code = "class P:\n    def __init__(self):\n        self.x = 0\n\n    def __init__(self, x, y):\n        self.x = x\n        self.y = y\n";
        let out = fix(code);
        assert_eq!(out.matches("def __init__").count(), 1);
        assert!(out.contains("def __init__(self, x, y):"));
    }

    #[test]
    fn init_tie_breaks_on_line_count_then_first() {
        let code = "class P:\n    def __init__(self, x):\n        self.x = x\n        self.log = []\n\n    def __init__(self, y):\n        self.y = y\n";
        let out = fix(code);
        assert_eq!(out.matches("def __init__").count(), 1);
        assert!(out.contains("self.log = []"));
    }

    #[test]
    fn node_repair_transplants_container_constructor() {
        let code = "class TreeNode:\n    pass\n\nclass BinarySearchTree:\n    def __init__(self, key):\n        self.key = key\n        self.left = None\n        self.right = None\n\n    def insert(self, key):\n        pass\n";
        let out = fix(code);
        // The node class now owns the key constructor
        assert!(out.contains("class TreeNode:\n    def __init__(self, key):\n        self.key = key"));
        // The container shrank to a root reference
        assert!(out.contains("class BinarySearchTree:\n    def __init__(self):\n        self.root = None"));
        assert!(out.contains("def insert(self, key):"));
    }

    #[test]
    fn node_repair_synthesizes_when_no_proper_constructor_exists() {
        let code = "class Node:\n    pass\n\nclass BST:\n    def __init__(self, key):\n        self.start = key\n";
        let out = fix(code);
        assert!(out.contains(
            "class Node:\n    def __init__(self, key):\n        self.key = key\n        self.left = None\n        self.right = None"
        ));
        assert!(out.contains("class BST:\n    def __init__(self):\n        self.root = None"));
    }

    #[test]
    fn node_repair_declines_without_the_pattern() {
        let code = "class Node:\n    def __init__(self, key):\n        self.key = key\n\nclass BST:\n    def __init__(self):\n        self.root = None\n";
        assert_eq!(fix(code), code);
    }

    #[test]
    fn clean_code_passes_through_unchanged() {
        let code = "import os\n\ndef f():\n    return os.getpid()\n";
        assert_eq!(fix(code), code);
    }

    #[test]
    fn garbage_input_never_panics() {
        for code in ["", "\n\n\n", "((((", "class\ndef\n", "\tdef  (:\n  x"] {
            let _ = fix(code);
        }
    }
}
