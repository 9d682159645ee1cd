//! CLI module for Atlas
//!
//! Command-line interface definitions and handlers for the Atlas travel planner.
//!
//! # Commands
//!
//! - `serve` - Start the Atlas HTTP server
//! - `attractions` - Print ranked attractions for a city
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! atlas serve
//!
//! # Top five cheapest attractions in Medellín
//! atlas attractions Medellín --number 5 --sort-by price
//!
//! # Generate shell completions
//! atlas completions bash > ~/.bash_completion.d/atlas
//! ```

pub mod attractions;
pub mod completions;
pub mod config;
pub mod output;
pub mod serve;

pub use attractions::handle_attractions;
pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::recommend::SortKey;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Atlas - Conversational travel planner
#[derive(Parser, Debug)]
#[command(
    name = "atlas",
    version,
    about = "Conversational trip intake and attraction recommendations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Atlas server
    Serve(ServeArgs),
    /// Recommend attractions for a city
    Attractions(AttractionsArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "atlas.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "ATLAS_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "ATLAS_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ATLAS_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct AttractionsArgs {
    /// City to search
    pub city: String,

    /// Number of attractions to return
    #[arg(short, long)]
    pub number: Option<usize>,

    /// Ordering when no model re-ranks (rating, price, none)
    #[arg(short, long, default_value = "rating")]
    pub sort_by: SortKey,

    /// Hobbies used to re-rank results when a model is configured
    #[arg(long)]
    pub hobbies: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "atlas.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "atlas.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
