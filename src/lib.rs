//! **codestill** - Lightweight CLI that distills LLM chat output into runnable Python source
//!
//! Heuristic line-level refinement of malformed generated code: block location,
//! artifact scrubbing, declaration reordering, import consolidation, and
//! duplicate-definition repair. Best-effort by design; no stage ever fails.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Refinement pipeline - pure text-in/text-out heuristic passes
pub mod core {
    /// One-shot line classification shared by every pass
    pub mod classify;

    /// Code block location (fenced, indented, heuristic signatures)
    pub mod extract;

    /// Interactive-session artifact removal
    pub mod scrub;

    /// Definition-before-use block reordering
    pub mod reorder;

    /// Import lifting and Standard/ThirdParty/Local grouping
    pub mod imports;

    /// Duplicate/incomplete definition repair with pluggable rules
    pub mod repair;
    pub use repair::{NodeClassRepair, RepairRule};

    /// Filename and project-name derivation
    pub mod naming;

    /// Third-party dependency manifest inference
    pub mod deps;

    /// Stage orchestration and the `refine` command
    pub mod pipeline;
    pub use pipeline::{ProcessOptions, clean_for_execution, process, run as refine_run};

    /// The `ask` command - model call plus refinement
    pub mod ask;
    pub use ask::run as ask_run;
}

/// Infrastructure - configuration, I/O seams, lookup tables
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use self::config::{Config, load_config};

    /// Chat-completions client (blocking and streaming)
    pub mod client;
    pub use client::{ChatParams, ClientError};

    /// Prompt/input reading, saving, clipboard
    pub mod io;

    /// Immutable stdlib/alias/stop-word tables
    pub mod tables;
}

// Strategic re-exports for clean CLI interface. The `self::` prefix keeps
// our `core` module from colliding with the built-in `core` crate.
pub use cli::{AppContext, Cli, Commands};
pub use infra::{Config, load_config};
pub use self::core::{ask_run, clean_for_execution, process, refine_run};

// Core types for external consumers
pub use self::core::pipeline::ProcessOptions as PipelineOptions;
