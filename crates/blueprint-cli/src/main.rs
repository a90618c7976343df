use clap::Parser;

mod cli;
mod commands;
mod opener;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("blueprint error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        cli::Commands::Generate(args) => commands::generate::handle(&args).await,
        cli::Commands::Explorer(args) => commands::explorer::handle(&args),
        cli::Commands::Settings { action } => commands::settings::handle(&action),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BLUEPRINT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
