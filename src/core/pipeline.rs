//! End-to-end refinement pipeline and the `refine` command.
//!
//! Each stage is a pure (text, options) → text transform; this module owns
//! the order they compose in. Nothing here performs I/O except the command
//! runner at the bottom, which is the CLI seam.

use anyhow::Result;
use tracing::debug;

use crate::cli::{AppContext, ProcessFlags, RefineArgs};
use crate::core::{extract, imports, reorder, repair, scrub};
use crate::infra::io;

/// Which pipeline stages run. All off means the text passes through as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Run the block locator on the input first
    pub code_only: bool,
    /// Scrub artifacts, reorder declarations, consolidate imports
    pub clean: bool,
    /// Collapse duplicate/incomplete definitions
    pub fix: bool,
}

impl From<&ProcessFlags> for ProcessOptions {
    fn from(flags: &ProcessFlags) -> Self {
        Self { code_only: flags.code_only, clean: flags.clean, fix: flags.fix }
    }
}

/// Scrub → reorder → consolidate. Applying this to its own output is a
/// fixed point, which keeps repeated refinement runs harmless.
pub fn clean_for_execution(code: &str) -> String {
    imports::consolidate(&reorder::reorder(&scrub::scrub(code)))
}

/// Run the configured stages over `text`. Pure and total: malformed input
/// degrades stage by stage instead of failing.
pub fn process(text: &str, opts: &ProcessOptions) -> String {
    let mut out =
        if opts.code_only { extract::locate(text, opts.clean) } else { text.to_string() };

    if opts.clean {
        out = clean_for_execution(&out);
    }

    if opts.fix {
        out = repair::fix(&out);
    }

    debug!(
        in_bytes = text.len(),
        out_bytes = out.len(),
        code_only = opts.code_only,
        clean = opts.clean,
        fix = opts.fix,
        "pipeline finished"
    );

    out
}

/// `cst refine`: run the pipeline over a local file or stdin. The refined
/// text goes to stdout verbatim; everything informational goes to stderr.
pub fn run(args: RefineArgs, ctx: &AppContext) -> Result<()> {
    let text = io::read_input(args.input.as_deref())?;
    let opts = ProcessOptions::from(&args.process);
    let processed = process(&text, &opts);

    print!("{processed}");

    if args.clipboard && !ctx.dry_run {
        io::copy_to_clipboard(&processed)?;
    }

    let prompt = args.prompt.as_deref().unwrap_or_default();
    io::save_outputs(&processed, prompt, &args.save, ctx)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTS_ALL: ProcessOptions = ProcessOptions { code_only: true, clean: true, fix: true };

    #[test]
    fn fenced_duplicate_class_collapses_under_clean_and_fix() {
        let text = "Here is the code:\n```python\nimport os\n\nclass Foo:\n    def bar(self):\n        return 1\n\nclass Foo:\n    def bar(self):\n        return 2\n```\nEnjoy!";
        let out = process(text, &OPTS_ALL);
        assert_eq!(out.matches("class Foo").count(), 1);
        assert!(out.contains("return 1"));
        assert!(!out.contains("return 2"));
        assert!(out.starts_with("import os\n"));
    }

    #[test]
    fn no_flags_means_passthrough() {
        let text = "anything at all ```x``` even this";
        assert_eq!(process(text, &ProcessOptions::default()), text);
    }

    #[test]
    fn clean_without_code_only_cleans_the_whole_text() {
        let text = ">>> x = 1\nx = 1\nimport os\n";
        let out = process(text, &ProcessOptions { clean: true, ..Default::default() });
        assert!(out.starts_with("import os\n"));
        assert!(!out.contains(">>>"));
    }

    #[test]
    fn clean_is_idempotent_on_its_own_output() {
        let text = "x = f()\n\nimport os\nimport requests\n\ndef f():\n    return 1\n\nif __name__ == '__main__':\n    print(f())\n";
        let once = clean_for_execution(text);
        assert_eq!(clean_for_execution(&once), once);
    }

    #[test]
    fn guard_lands_last_through_the_full_pipeline() {
        let text = "```python\nif __name__ == '__main__':\n    run()\n\ndef run():\n    pass\n```";
        let out = process(text, &OPTS_ALL);
        let guard_at = out.find("if __name__").unwrap();
        let def_at = out.find("def run").unwrap();
        assert!(def_at < guard_at);
    }
}
