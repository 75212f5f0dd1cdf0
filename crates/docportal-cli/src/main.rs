//! DocPortal CLI
//!
//! Upload, read and analyze PDF documents with LLMs.

use anyhow::Result;
use clap::Parser;
use docportal_core::error::exit_codes;
use docportal_core::DocPortalError;

mod app;
mod commands;

use app::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Load .env first so it can supply RUST_LOG and DOCPORTAL_CONFIG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Save(args) => commands::save::run(args, cli.format).await,
        Commands::Read(args) => commands::read::run(args, cli.format).await,
        Commands::Analyze(args) => commands::analyze::run(args, config, cli.format).await,
        Commands::Embed(args) => commands::embed::run(args, config, cli.format).await,
        Commands::Chat(args) => commands::chat::run(args, config, cli.format).await,
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<DocPortalError>()
        .map(DocPortalError::exit_code)
        .unwrap_or(exit_codes::GENERAL_ERROR)
}
