//! The `ask` command: prompt → model → refined code.
//!
//! This is collaborator territory. Network access, console reporting, and
//! clipboard/file side effects all live here; the pipeline itself only
//! ever sees the completion text.

use anyhow::Result;
use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use std::io::Write;
use std::time::{Duration, Instant};

use crate::cli::{AppContext, AskArgs, SaveFlags};
use crate::core::pipeline::{self, ProcessOptions};
use crate::infra::client::{self, ChatParams};
use crate::infra::config;
use crate::infra::io;

pub fn run(args: AskArgs, ctx: &AppContext) -> Result<()> {
    let cfg = config::load_config().unwrap_or_default();

    let prompt = io::read_prompt(args.prompt.as_deref(), args.file.as_deref())?;

    if !ctx.quiet {
        println!("{}", "\nSending prompt:".blue().bold());
        println!("\"{prompt}\"");
    }

    let params = ChatParams {
        api_url: args.api_url.clone().unwrap_or_else(|| cfg.api.url.clone()),
        temperature: args.temperature.unwrap_or(cfg.api.temperature),
        max_tokens: args.max_tokens.unwrap_or(cfg.api.max_tokens),
    };

    if ctx.dry_run {
        if !ctx.quiet {
            println!("{}", format!("DRY RUN: Would query {}", params.api_url).yellow());
        }
        return Ok(());
    }

    let started = Instant::now();
    let completion = if args.stream || cfg.api.stream {
        fetch_streaming(&params, &prompt, ctx)?
    } else {
        fetch_blocking(&params, &prompt, ctx)?
    };
    let elapsed = started.elapsed();

    let opts = ProcessOptions {
        code_only: args.process.code_only,
        clean: args.process.clean || cfg.process.clean,
        fix: args.process.fix || cfg.process.fix,
    };
    let processed = pipeline::process(&completion, &opts);

    if opts.code_only && processed != completion && !ctx.quiet {
        println!("{}", "\nExtracted code:".blue().bold());
        println!("{processed}");
    }

    if !args.no_copy {
        io::copy_to_clipboard(&processed)?;
        if !ctx.quiet {
            println!("{}", "\nResponse copied to clipboard".blue());
            if opts.code_only {
                println!("{}", "(code blocks only)".blue());
            }
            if opts.clean {
                println!("{}", "(cleaned for execution)".blue());
            }
            if opts.fix {
                println!("{}", "(fixed common issues)".blue());
            }
        }
    }

    let save = SaveFlags {
        output: args.save.output.clone(),
        auto_save: args.save.auto_save || cfg.process.auto_save,
        project_folder: args.save.project_folder || cfg.process.project_folder,
    };
    io::save_outputs(&processed, &prompt, &save, ctx)?;

    if !ctx.quiet {
        println!(
            "{}",
            format!("\nResponse time: {:.2} seconds", elapsed.as_secs_f64()).blue()
        );
        println!(
            "{}",
            format!(
                "Approximate response tokens: {}",
                completion.split_whitespace().count()
            )
            .blue()
        );
    }

    Ok(())
}

/// Stream the completion, echoing deltas as they arrive.
fn fetch_streaming(params: &ChatParams, prompt: &str, ctx: &AppContext) -> Result<String> {
    if !ctx.quiet {
        println!("{}", "\nModel response:".green().bold());
        println!("{}", "-".repeat(40).green());
    }

    let full = client::complete_streaming(params, prompt, &mut |delta| {
        print!("{delta}");
        std::io::stdout().flush().ok();
    })?;

    if !ctx.quiet {
        println!();
        println!("{}", "-".repeat(40).green());
    }

    Ok(full)
}

/// Single-shot completion behind a spinner.
fn fetch_blocking(params: &ChatParams, prompt: &str, ctx: &AppContext) -> Result<String> {
    let spinner = if ctx.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_message("Waiting for the model server...");
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };

    let result = client::complete(params, prompt);
    spinner.finish_and_clear();

    let completion = result?;

    if !ctx.quiet {
        println!("{}", "\nModel response:".green().bold());
        println!("{}", "-".repeat(40).green());
        println!("{completion}");
        println!("{}", "-".repeat(40).green());
    }

    Ok(completion)
}
