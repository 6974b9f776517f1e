//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Inkwright - AI request orchestration for writers.
#[derive(Parser, Debug)]
#[command(name = "inkwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a writing action over text
    Process(ProcessArgs),

    /// Generate contextual suggestions for a passage
    Suggest(SuggestArgs),

    /// Test provider connectivity
    Probe(ProbeArgs),

    /// List every provider and its configuration state
    Providers,

    /// Choose the active provider or model
    #[command(subcommand)]
    Select(SelectCommand),

    /// List models offered by a provider
    Models(ModelsArgs),

    /// Manage API keys
    #[command(subcommand)]
    Key(KeyCommand),

    /// Inspect or clear the response cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `process` command.
#[derive(Parser, Debug)]
pub struct ProcessArgs {
    /// The writing action to run (improve, shorten, expand, fix-grammar,
    /// analyze-tone, generate-plot, continue-story, writing-prompt)
    #[arg(value_name = "ACTION")]
    pub action: String,

    /// Text to process (reads stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Skip the response cache for this request
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the `suggest` command.
#[derive(Parser, Debug)]
pub struct SuggestArgs {
    /// The passage to suggest against (reads stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub context: Option<String>,

    /// Read the passage from a file
    #[arg(short, long, value_name = "PATH", conflicts_with = "context")]
    pub file: Option<PathBuf>,
}

/// Arguments for the `probe` command.
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Provider to probe (defaults to the active provider)
    #[arg(value_name = "PROVIDER", conflicts_with = "all")]
    pub provider: Option<String>,

    /// Probe every provider with a key plus the local daemons
    #[arg(long)]
    pub all: bool,
}

/// Selection subcommands.
#[derive(Subcommand, Debug)]
pub enum SelectCommand {
    /// Make a provider active
    Provider {
        /// Provider name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Pick a model from the active provider's catalog
    Model {
        /// Model identifier
        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// Arguments for the `models` command.
#[derive(Parser, Debug)]
pub struct ModelsArgs {
    /// Provider to list (defaults to the active provider)
    #[arg(value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Re-discover installed models from the local daemons first
    #[arg(long)]
    pub refresh: bool,
}

/// API key subcommands.
#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Store an API key for a provider
    Set {
        /// Provider name
        #[arg(value_name = "PROVIDER")]
        provider: String,

        /// The key (reads stdin when omitted, keeping it out of shell history)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },

    /// Remove a provider's API key
    Unset {
        /// Provider name
        #[arg(value_name = "PROVIDER")]
        provider: String,
    },

    /// List configured keys (masked)
    List,
}

/// Response cache subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Drop every cached response
    Clear,

    /// Show cache settings and entry count
    Stats,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show effective configuration and where each value came from
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Change a processing setting (maxTokens, temperature, ...)
    Set {
        /// Setting name
        #[arg(value_name = "KEY")]
        key: String,

        /// New value
        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Restore processing settings to their defaults
    Reset,
}

/// Arguments for the `completions` command.
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum, value_name = "SHELL")]
    pub shell: Shell,
}
