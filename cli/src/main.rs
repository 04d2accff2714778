mod commands;

use abit_config::{Config, ConfigError, ErrorFormatter};
use anyhow::Result;
use clap::Parser;
use commands::{Cli, Commands};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", ErrorFormatter::new(err));
            std::process::exit(2);
        }
    };

    match cli.command {
        Commands::Build { quiet } => commands::handle_build(&config, !quiet).await?,
        Commands::Serve => commands::handle_serve(config).await?,
        Commands::Ask { question } => commands::handle_ask(config, &question.join(" ")).await?,
        Commands::Search { query, top } => {
            commands::handle_search(config, &query.join(" "), top).await?
        }
        Commands::Status => commands::handle_status(&config)?,
        Commands::Recommend => commands::handle_recommend()?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
}
