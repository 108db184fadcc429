//! Import consolidation.
//!
//! Every line matching import syntax is lifted out of the body and
//! reinserted at the top as Standard → ThirdParty → Local groups with a
//! blank line between non-empty groups. The partition is stable and the
//! total import-line count never changes: imports are moved, not rewritten.

use crate::core::classify::is_import_line;
use crate::infra::tables::PY_STDLIB;
use tracing::trace;

/// Import grouping, decided by the leading top-level module token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportGroup {
    Standard,
    ThirdParty,
    Local,
}

/// Leading module token of one import line: `a` for `import a.b as c`,
/// `a` for `from a.b import c`. Relative imports keep their leading dot.
pub fn module_token(stripped: &str) -> Option<&str> {
    if let Some(rest) = stripped.strip_prefix("from ") {
        let module = rest.split(" import").next()?.trim();
        // A relative module keeps its '.' marker so Local wins below
        if module.starts_with('.') {
            return Some(module);
        }
        return Some(module.split('.').next().unwrap_or(module)).filter(|m| !m.is_empty());
    }

    if let Some(rest) = stripped.strip_prefix("import ") {
        let first = rest.split(',').next()?;
        let module = first.split(" as ").next()?.trim();
        // A relative module keeps its '.' marker so Local wins below
        if module.starts_with('.') {
            return Some(module);
        }
        return Some(module.split('.').next().unwrap_or(module)).filter(|m| !m.is_empty());
    }

    None
}

fn group_of(stripped: &str) -> ImportGroup {
    match module_token(stripped) {
        Some(m) if m.starts_with('.') => ImportGroup::Local,
        Some(m) if PY_STDLIB.contains(m) => ImportGroup::Standard,
        _ => ImportGroup::ThirdParty,
    }
}

/// Lift all import lines to a grouped header at the top of `code`.
/// No imports means no change at all.
pub fn consolidate(code: &str) -> String {
    let mut standard: Vec<&str> = Vec::new();
    let mut third_party: Vec<&str> = Vec::new();
    let mut local: Vec<&str> = Vec::new();
    let mut body: Vec<&str> = Vec::new();

    for line in code.split('\n') {
        let stripped = line.trim();
        if is_import_line(stripped) {
            match group_of(stripped) {
                ImportGroup::Standard => standard.push(line),
                ImportGroup::ThirdParty => third_party.push(line),
                ImportGroup::Local => local.push(line),
            }
        } else {
            // Pulling an import out can leave two blanks touching; keep one
            if stripped.is_empty() && body.last().is_some_and(|l| l.trim().is_empty()) {
                continue;
            }
            body.push(line);
        }
    }

    if standard.is_empty() && third_party.is_empty() && local.is_empty() {
        return code.to_string();
    }

    trace!(
        standard = standard.len(),
        third_party = third_party.len(),
        local = local.len(),
        "grouped imports"
    );

    let mut header: Vec<&str> = Vec::new();
    for group in [standard, third_party, local] {
        if group.is_empty() {
            continue;
        }
        if !header.is_empty() {
            header.push("");
        }
        header.extend(group);
    }

    // One blank between header and body, unless the body brings its own
    if body.first().is_some_and(|l| !l.trim().is_empty()) {
        header.push("");
    }

    header.extend(body);
    header.join("\n")
}
