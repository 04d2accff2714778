pub mod ask;
pub mod build;
pub mod recommend;
pub mod search;
pub mod serve;
pub mod status;
pub mod ui;

pub use ask::handle_ask;
pub use build::handle_build;
pub use recommend::handle_recommend;
pub use search::handle_search;
pub use serve::handle_serve;
pub use status::handle_status;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "abit")]
#[command(about = "Admissions assistant for the ITMO AI master's programs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chunk and embed the scraped corpus, then write the knowledge base
    Build {
        /// Hide the progress bar
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Run the Telegram bot (needs TELEGRAM_BOT_TOKEN)
    Serve,
    /// Answer one question the way the bot would
    Ask {
        /// The question
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Show the nearest chunks and their distances for a query
    Search {
        /// The query string
        #[arg(required = true)]
        query: Vec<String>,

        /// Number of results
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
    /// Show configuration and knowledge base state
    Status,
    /// Run the program recommendation dialog in the terminal
    Recommend,
}
