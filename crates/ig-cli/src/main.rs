mod commands;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    // Use RUST_LOG env var to control log levels, defaulting to info.
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = commands::Cli::parse();

    match commands::run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("inputguard failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
