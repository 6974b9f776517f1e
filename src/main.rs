//! inkwright - AI request orchestration for writers
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::{CommandFactory, Parser};
use std::process::ExitCode;

use inkwright::cli::{Cli, Commands};
use inkwright::core::logging;
use inkwright::render;
use inkwright::storage::ResolvedConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = logging::parse_log_level_from_env()
        .or_else(inkwright::storage::file_log_level)
        .unwrap_or_default();
    let log_format = logging::parse_log_format_from_env().unwrap_or_default();
    let log_file = logging::parse_log_file_from_env();
    logging::init(log_level, log_format, log_file, cli.verbose);

    // Resolve configuration before dispatching
    let resolved = match ResolvedConfig::resolve(&cli) {
        Ok(resolved) => resolved,
        Err(e) => return report_failure(&e, cli.json, cli.no_color),
    };

    let no_color = !inkwright::util::env::should_use_color(resolved.no_color);
    if no_color {
        colored::control::set_override(false);
    }

    let json = resolved.json;
    let result = run(cli, &resolved).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e, json, no_color),
    }
}

fn report_failure(e: &inkwright::error::InkwrightError, json: bool, no_color: bool) -> ExitCode {
    tracing::error!(code = e.error_code(), "{}", e);
    eprintln!("{}", render::render_error(e, json, no_color));
    ExitCode::from(e.exit_code() as u8)
}

async fn run(cli: Cli, resolved: &ResolvedConfig) -> inkwright::Result<()> {
    match cli.command {
        None => {
            print_quickstart();
            Ok(())
        }

        Some(Commands::Process(args)) => inkwright::cli::process::execute(&args, resolved).await,

        Some(Commands::Suggest(args)) => inkwright::cli::suggest::execute(&args, resolved).await,

        Some(Commands::Probe(args)) => inkwright::cli::probe::execute(&args, resolved).await,

        Some(Commands::Providers) => inkwright::cli::providers::execute(resolved).await,

        Some(Commands::Select(cmd)) => inkwright::cli::select::execute(&cmd, resolved).await,

        Some(Commands::Models(args)) => inkwright::cli::models::execute(&args, resolved).await,

        Some(Commands::Key(cmd)) => inkwright::cli::key::execute(&cmd, resolved).await,

        Some(Commands::Cache(cmd)) => inkwright::cli::cache::execute(&cmd, resolved).await,

        Some(Commands::Config(cmd)) => inkwright::cli::config::execute(&cmd, resolved).await,

        Some(Commands::Completions(args)) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "inkwright",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

/// Print quickstart help when no command is given.
fn print_quickstart() {
    println!(
        r#"inkwright - AI request orchestration for writers

Run writing actions (improve, expand, continue a story, ...) against any
configured AI provider, with caching and an offline fallback.

USAGE:
    inkwright [OPTIONS] <COMMAND>

COMMANDS:
    process      Run a writing action over text
    suggest      Generate contextual suggestions for a passage
    probe        Test provider connectivity
    providers    List providers and their configuration state
    select       Choose the active provider or model
    models       List models offered by a provider
    key          Manage API keys
    cache        Inspect or clear the response cache
    config       Show or change configuration
    completions  Generate shell completions

QUICK START:
    inkwright key set groq                      # Store an API key
    inkwright select provider groq              # Make it active
    inkwright probe                             # Check it answers
    inkwright process improve "it was good"     # Run an action
    echo "draft text" | inkwright suggest       # Suggestions from stdin

ROBOT MODE (for scripts):
    inkwright providers --json
    inkwright process improve "some text" --json

For more help: inkwright --help
"#
    );

    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
