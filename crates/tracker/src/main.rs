//! trophytrack command line

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trophytrack::cli::Cli;
use trophytrack::commands::{self, Context};
use trophytrack::config::Config;

fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "trophytrack=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load_from(&cli.config);
    let ctx = Context::new(config, &cli);

    match commands::run(&ctx, &cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
