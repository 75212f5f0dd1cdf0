//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docportal")]
#[command(
    author,
    version,
    about = "Upload, read and analyze PDF documents with LLMs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to config/config.yaml)
    #[arg(long, global = true, env = "DOCPORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a PDF in a session directory
    Save(DocumentArgs),

    /// Store a PDF and print its page-tagged text
    Read(DocumentArgs),

    /// Store, read and extract metadata from a PDF
    Analyze(AnalyzeArgs),

    /// Embed text with the configured embedding model
    Embed(EmbedArgs),

    /// Send a single prompt to the configured chat model
    Chat(ChatArgs),
}

#[derive(Args)]
pub struct SessionArgs {
    /// Storage root (defaults to DATA_STORAGE_PATH, then data/document_analysis)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Reuse an existing session id instead of generating one
    #[arg(long)]
    pub session: Option<String>,
}

#[derive(Args)]
pub struct DocumentArgs {
    /// PDF file to upload
    pub file: PathBuf,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// LLM provider key from the config (overrides LLM_PROVIDER)
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Args)]
pub struct EmbedArgs {
    /// Texts to embed
    #[arg(required = true)]
    pub texts: Vec<String>,
}

#[derive(Args)]
pub struct ChatArgs {
    /// Prompt text
    #[arg(required = true)]
    pub prompt: Vec<String>,

    /// LLM provider key from the config (overrides LLM_PROVIDER)
    #[arg(long)]
    pub provider: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
