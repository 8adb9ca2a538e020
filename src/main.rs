use clap::Parser;

use finlens::cli::{Cli, Commands};
use finlens::commands;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("finlens error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::handle(args, cli.quiet).await,
        Commands::Key { action } => commands::key::handle(action),
        Commands::History { action } => commands::history::handle(action).await,
        Commands::Config { action } => commands::config::handle(action),
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
