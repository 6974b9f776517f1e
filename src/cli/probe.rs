//! Probe command implementation.

use colored::Colorize;

use crate::cli::args::ProbeArgs;
use crate::core::Orchestrator;
use crate::core::probe::{ProbeOutcome, ProbeReport};
use crate::core::provider::Provider;
use crate::error::Result;
use crate::storage::{AppPaths, ProcessingSettings, ResolvedConfig};

/// Execute the probe command.
pub async fn execute(args: &ProbeArgs, resolved: &ResolvedConfig) -> Result<()> {
    let paths = AppPaths::new();
    let settings = ProcessingSettings::load(&paths);
    let orchestrator = crate::cli::build_orchestrator(resolved, &paths, settings)?;

    let targets = if args.all {
        probe_targets(&orchestrator)
    } else {
        let provider = match &args.provider {
            Some(name) => Provider::from_cli_name(name)?,
            None => orchestrator.selection().provider,
        };
        vec![provider]
    };

    let mut reports = Vec::with_capacity(targets.len());
    for provider in targets {
        reports.push(orchestrator.test_connection(provider).await?);
    }

    if resolved.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        print_report(report);
    }

    // Non-zero exit for scripting when nothing probed is usable
    if !reports.iter().any(ProbeReport::is_usable) {
        std::process::exit(1);
    }

    Ok(())
}

/// Providers worth probing with `--all`: everything with a key, plus the
/// local daemons, which never need one.
fn probe_targets(orchestrator: &Orchestrator) -> Vec<Provider> {
    let mut targets = orchestrator.configured_providers();
    for &daemon in Provider::LOCAL {
        if !targets.contains(&daemon) {
            targets.push(daemon);
        }
    }
    targets
}

fn print_report(report: &ProbeReport) {
    let status = match report.outcome {
        ProbeOutcome::Reachable => "reachable".green().bold(),
        ProbeOutcome::Unreachable => "unreachable".red().bold(),
        ProbeOutcome::Unverified => "unverified".yellow().bold(),
    };
    println!(
        "{:<12} {:<24} {} ({}ms)",
        report.provider.display_name(),
        status,
        report.detail,
        report.elapsed_ms
    );

    if let Some(models) = &report.discovered_models {
        for model in models {
            println!("{:<12} {}", "", model.dimmed());
        }
    }
}
