//! Prompt acquisition and output side effects.
//!
//! The pipeline never touches the filesystem; every read and write the
//! tool performs funnels through here. Informational messages go to
//! stderr so stdout stays reserved for refined text.

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::{AppContext, SaveFlags};
use crate::core::{deps, naming};

/// Resolve the prompt: an inline argument wins, otherwise the prompt file
/// (default `prompt.txt`). An empty file is an error rather than an empty
/// request on its way to the model.
pub fn read_prompt(inline: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(prompt) = inline {
        return Ok(prompt.to_string());
    }

    let path = file.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("prompt.txt"));
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();

    let content = std::fs::read_to_string(&expanded)
        .with_context(|| format!("Failed to read prompt file: {expanded}"))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        bail!("Prompt file '{expanded}' is empty");
    }
    Ok(trimmed.to_string())
}

/// Read refine input from a file, or stdin when no path was given.
pub fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

pub fn copy_to_clipboard(content: &str) -> Result<()> {
    use arboard::Clipboard;

    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;

    clipboard
        .set_text(content)
        .context("Failed to copy to clipboard")?;

    Ok(())
}

/// Write the refined code out per the save flags: an explicit path, an
/// auto-derived name, and optionally a project folder holding the file
/// plus a requirements manifest. Does nothing when no save was requested.
pub fn save_outputs(code: &str, prompt: &str, save: &SaveFlags, ctx: &AppContext) -> Result<()> {
    let path: Option<PathBuf> = save.output.clone().or_else(|| {
        save.auto_save.then(|| PathBuf::from(naming::filename_from_content(code, prompt)))
    });

    let Some(path) = path else {
        return Ok(());
    };

    if ctx.dry_run {
        eprintln!(
            "{}",
            format!("DRY RUN: Would save {} bytes to {}", code.len(), path.display()).yellow()
        );
        if save.project_folder {
            let project = naming::project_name(prompt, code);
            eprintln!("{}", format!("DRY RUN: Would create project folder {project}").yellow());
        }
        return Ok(());
    }

    std::fs::write(&path, code)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    if !ctx.quiet {
        eprintln!("{} Saved code to {}", "✓".green(), path.display());
    }

    if save.project_folder {
        let project = naming::project_name(prompt, code);
        let project_dir = PathBuf::from(&project);

        std::fs::create_dir_all(&project_dir)
            .with_context(|| format!("Failed to create project folder {project}"))?;

        let name = path.file_name().context("Output path has no file name")?;
        let target = project_dir.join(name);
        std::fs::rename(&path, &target)
            .with_context(|| format!("Failed to move {} into {project}", path.display()))?;
        if !ctx.quiet {
            eprintln!("{} Moved file into {}", "✓".green(), project_dir.display());
        }

        if let Some(manifest) = deps::manifest(code) {
            let req = project_dir.join("requirements.txt");
            std::fs::write(&req, format!("{manifest}\n"))
                .with_context(|| format!("Failed to write {}", req.display()))?;
            if !ctx.quiet {
                eprintln!("{} Wrote {} with detected dependencies", "✓".green(), req.display());
            }
        }
    }

    Ok(())
}
