//! Jira Analytics command-line tool
//!
//! Loads the resolved issues of a project and renders charts, either from an
//! interactive menu or as a one-shot report.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use jira_analytics::app::{run_interactive, Cli, Commands, MenuHandler, MenuOutcome};
use jira_analytics::{parse_issue_dump, ChartRenderer, Config, Issue, IssueAggregator, JiraClient};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&cli.config, cli.strict)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    let issues = load_issues(cli.input.as_deref(), &config).await?;
    if issues.is_empty() {
        tracing::warn!("no issues loaded, check the configuration and connection");
    }

    let aggregator = IssueAggregator::new(issues);
    let renderer = ChartRenderer::new(config.project_key.clone(), cli.output_dir.clone());

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let handler = MenuHandler::new(aggregator, renderer);
            run_interactive(&handler, &config.project_key, io::stdin().lock(), io::stdout())
                .context("interactive menu failed")?;
        }
        Commands::Report { kind, last_days } => {
            let mut handler = MenuHandler::new(aggregator, renderer);
            if let Some(days) = last_days {
                handler = handler.with_last_days(Local::now().date_naive(), days);
            }
            for choice in kind.choices() {
                let outcome = handler
                    .handle(choice)
                    .with_context(|| format!("failed to render {}", choice.title()))?;
                if let MenuOutcome::Rendered { files, summary } = outcome {
                    println!("{}: {}", choice.title(), summary);
                    for file in files {
                        println!("  {}", file.display());
                    }
                }
            }
        }
        Commands::Export { output } => {
            let snapshot = aggregator.snapshot();
            let json = serde_json::to_string_pretty(&snapshot)
                .context("failed to serialize analytics snapshot")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!("wrote snapshot to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}

async fn load_issues(input: Option<&Path>, config: &Config) -> Result<Vec<Issue>> {
    if let Some(path) = input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let issues = parse_issue_dump(&text, &path.display().to_string())?;
        tracing::info!("loaded {} issues from {}", issues.len(), path.display());
        return Ok(issues);
    }

    let client = JiraClient::new(config)?;
    client
        .fetch_resolved_issues(&config.project_key, config.max_results, config.page_size)
        .await
        .with_context(|| format!("failed to fetch issues of {}", config.project_key))
}
