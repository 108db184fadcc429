use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "codestill")]
#[command(about = "A lightweight CLI that distills LLM chat output into runnable Python source")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress output and non-essential messages
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a prompt to the model server and refine the response
    Ask(AskArgs),

    /// Refine existing text from a file or stdin (no network)
    Refine(RefineArgs),

    /// Initialize a codestill.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Pipeline stage toggles, shared between `ask` and `refine`
#[derive(Args, Clone, Copy, Debug)]
pub struct ProcessFlags {
    /// Extract only code blocks from the text
    #[arg(short = 'c', long)]
    pub code_only: bool,

    /// Clean extracted code for execution (scrub, reorder, group imports)
    #[arg(long)]
    pub clean: bool,

    /// Attempt to fix duplicate and incomplete definitions
    #[arg(long)]
    pub fix: bool,
}

/// Output destination flags, shared between `ask` and `refine`
#[derive(Args, Clone, Debug)]
pub struct SaveFlags {
    /// Save the refined code to the specified file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Save to a file named after the content (or the prompt)
    #[arg(long)]
    pub auto_save: bool,

    /// Create a project folder with the file and a requirements.txt
    #[arg(long)]
    pub project_folder: bool,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Prompt text (if not provided, reads from the prompt file)
    pub prompt: Option<String>,

    /// Path to a prompt file (default: prompt.txt)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Chat-completions endpoint URL
    #[arg(short = 'u', long)]
    pub api_url: Option<String>,

    /// Temperature for generation
    #[arg(short = 't', long)]
    pub temperature: Option<f64>,

    /// Maximum tokens to generate
    #[arg(short = 'm', long)]
    pub max_tokens: Option<u32>,

    /// Stream the response for real-time output
    #[arg(short = 's', long)]
    pub stream: bool,

    /// Do not copy the result to the clipboard
    #[arg(short = 'n', long)]
    pub no_copy: bool,

    #[command(flatten)]
    pub process: ProcessFlags,

    #[command(flatten)]
    pub save: SaveFlags,
}

#[derive(Parser, Debug)]
pub struct RefineArgs {
    /// Input file (reads stdin when omitted)
    pub input: Option<PathBuf>,

    /// Prompt context used only for filename/project-name derivation
    #[arg(short = 'p', long)]
    pub prompt: Option<String>,

    /// Copy the refined code to the clipboard
    #[arg(long)]
    pub clipboard: bool,

    #[command(flatten)]
    pub process: ProcessFlags,

    #[command(flatten)]
    pub save: SaveFlags,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
