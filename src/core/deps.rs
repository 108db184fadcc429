//! Third-party dependency inference.
//!
//! The final import lines are the only signal: top-level module tokens,
//! minus the standard library, mapped through the alias table so the
//! manifest names real distributions rather than import conventions.

use itertools::Itertools;
use std::collections::BTreeSet;

use crate::core::classify::is_import_line;
use crate::infra::tables::{ALIAS_TO_PYPI, PY_STDLIB};

/// All top-level module tokens on one import line. `import a.b, c as d`
/// yields `a` and `c`; `from a.b import c` yields `a`. Relative imports
/// yield nothing — they name in-project modules, not distributions.
fn top_level_modules(stripped: &str) -> Vec<&str> {
    if let Some(rest) = stripped.strip_prefix("from ") {
        let module = rest.split(" import").next().unwrap_or("").trim();
        if module.starts_with('.') || module.is_empty() {
            return Vec::new();
        }
        return vec![module.split('.').next().unwrap_or(module)];
    }

    if let Some(rest) = stripped.strip_prefix("import ") {
        return rest
            .split(',')
            .filter_map(|part| {
                let module = part.split(" as ").next()?.trim();
                if module.starts_with('.') || module.is_empty() {
                    return None;
                }
                Some(module.split('.').next().unwrap_or(module))
            })
            .collect();
    }

    Vec::new()
}

/// Build a requirements manifest for `code`: one package per line, sorted,
/// deduplicated after alias mapping. `None` when nothing third-party is
/// imported — callers then skip the file entirely.
pub fn manifest(code: &str) -> Option<String> {
    let mut packages: BTreeSet<String> = BTreeSet::new();

    for line in code.lines() {
        let stripped = line.trim();
        if !is_import_line(stripped) {
            continue;
        }
        for module in top_level_modules(stripped) {
            if PY_STDLIB.contains(module) {
                continue;
            }
            let published = ALIAS_TO_PYPI.get(module).copied().unwrap_or(module);
            packages.insert(published.to_string());
        }
    }

    if packages.is_empty() {
        None
    } else {
        Some(packages.iter().join("\n"))
    }
}
