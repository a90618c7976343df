use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

/// Top-level CLI parser for the `blueprint` binary.
#[derive(Debug, Parser)]
#[command(
    name = "blueprint",
    version,
    about = "Turn a data source into a SQL schema, an OpenAPI spec and an ERD"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log progress (info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate artifacts for one data source
    Generate(GenerateArgs),
    /// Render an API explorer page from a saved bundle.json
    Explorer(ExplorerArgs),
    /// Show or change settings in ~/.blueprint/settings.json
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "url", "text"])))]
pub struct GenerateArgs {
    /// Image, PDF or CSV file to analyze
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Public URL (e.g. a Google Sheet) to analyze
    #[arg(long)]
    pub url: Option<String>,

    /// Free-text description of the data
    #[arg(long)]
    pub text: Option<String>,

    /// Directory the artifacts are written to
    #[arg(long, default_value = "blueprint-out")]
    pub out: PathBuf,

    /// Run the simulated deployment and write explorer.html
    #[arg(long)]
    pub deploy: bool,

    /// Open explorer.html once written
    #[arg(long, requires = "deploy")]
    pub open: bool,
}

#[derive(Debug, Args)]
pub struct ExplorerArgs {
    /// bundle.json written by `blueprint generate`
    #[arg(long)]
    pub bundle: PathBuf,

    /// Deployment URL, e.g. https://api-abc123.prod.dev-cloud.run/v1/docs
    #[arg(long)]
    pub url: String,

    /// Output file (defaults to explorer.html next to the bundle)
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Open the page once written
    #[arg(long)]
    pub open: bool,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print settings (the API key is masked)
    Show,
    /// Update settings; omitted or empty values keep the current ones
    Set {
        #[arg(long)]
        api_key: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        deploy_delay_ms: Option<u64>,
    },
}
