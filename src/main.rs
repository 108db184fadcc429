use anyhow::Result;
use clap::Parser;
use codestill::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr; stdout is reserved for refined text
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CODESTILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Ask(args) => codestill::core::ask_run(args, &ctx),
        Commands::Refine(args) => codestill::core::refine_run(args, &ctx),
        Commands::Init(args) => codestill::infra::config::init(args, &ctx),
        Commands::Completions(args) => codestill::completion::run(args),
    }
}
