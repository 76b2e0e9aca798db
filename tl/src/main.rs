//! toolloop - sandboxed tool-calling agent
//!
//! CLI entry point: one task, one run.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use toolloop::cli::Cli;
use toolloop::config::Config;
use toolloop::llm::create_client;
use toolloop::r#loop::{LoopConfig, LoopEngine, RunOutcome};
use toolloop::tools::{TRACE_TARGET, ToolExecutor};

/// Exit code when the iteration budget runs out without an answer
const EXIT_EXHAUSTED: u8 = 2;

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolloop")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Everything goes to the log file; only the call trace reaches stderr
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("toolloop.log")).context("Failed to create log file")?;

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env().add_directive(level.into()));

    let trace_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(Targets::new().with_target(TRACE_TARGET, LevelFilter::INFO));

    tracing_subscriber::registry().with(file_layer).with(trace_layer).init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let Some(prompt) = cli.prompt() else {
        println!("Please provide a prompt as a command-line argument.");
        return Ok(ExitCode::FAILURE);
    };

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    // Load configuration, then apply CLI overrides
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(root) = &cli.root {
        config.sandbox.root = root.clone();
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.agent.max_iterations = max_iterations;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        "toolloop loaded config: provider={}, model={}, root={}",
        config.llm.provider,
        config.llm.model,
        config.sandbox.root.display()
    );

    let ctx = config.tool_context()?;
    let executor = ToolExecutor::new(ctx).with_verbose(cli.verbose);
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let engine = LoopEngine::new(llm, executor, LoopConfig::from(&config));

    let report = engine.run(&prompt).await.context("Run failed")?;

    if cli.verbose {
        println!("User prompt: {}", prompt);
        println!("Prompt tokens: {}", report.usage.input_tokens);
        println!("Response tokens: {}", report.usage.output_tokens);
    }

    match report.outcome {
        RunOutcome::Answered { answer } => {
            println!("{}", answer);
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Exhausted { iterations } => {
            eprintln!(
                "{}",
                format!("Maximum iterations ({}) reached without a final answer.", iterations).yellow()
            );
            Ok(ExitCode::from(EXIT_EXHAUSTED))
        }
    }
}
