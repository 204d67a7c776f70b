//! Clap derive structures for the `taskly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// taskly -- keep a REST task collection in view from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "taskly",
    version,
    about = "Manage a REST task collection from the command line",
    long_about = "List, add, edit, toggle and delete tasks on a REST task service.\n\n\
        Every change is written to the service first and followed by a full\n\
        reload of the collection, so what you see is what the service holds.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "TASKLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Task collection URL (overrides profile)
    #[arg(long, short = 'e', env = "TASKLY_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TASKLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "TASKLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long, env = "TASKLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all tasks
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one task
    Show {
        /// Task id
        id: String,
    },

    /// Create a task
    Add {
        /// Task title (must not be blank)
        title: String,

        /// Optional description
        #[arg(long, short = 'd')]
        description: Option<String>,
    },

    /// Change a task's title or description
    Edit(EditArgs),

    /// Flip a task between open and done
    #[command(alias = "done")]
    Toggle {
        /// Task id
        id: String,
    },

    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task id
        id: String,
    },

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Keep running and re-render whenever the collection changes
    #[arg(long, short = 'w')]
    pub watch: bool,

    /// Refresh period in seconds while watching (default: profile
    /// `refresh_interval`, else 5)
    #[arg(long, requires = "watch")]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task id
    pub id: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'd', conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub clear_description: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the configuration file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
