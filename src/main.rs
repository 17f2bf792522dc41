use std::process;

use clap::Parser;
use scripts_sync::error::exit_code_for;
use scripts_sync::Cli;

fn main() {
    // Default to "warn" level if RUST_LOG is not set
    // Write to stderr so logs don't interleave with git's own output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(exit_code_for(&e));
    }
}
