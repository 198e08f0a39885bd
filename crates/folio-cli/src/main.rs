//! Folio CLI - Extract structured metadata from PDF files.

use clap::Parser;
use folio_cli::commands;
use folio_cli::{Cli, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> folio_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(color_enabled);

    println!("{}", formatter.title("Folio PDF metadata extraction"));
    commands::execute_extract(&cli, &config, &formatter).await
}

/// Log to stderr; `RUST_LOG` overrides `--verbose`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
