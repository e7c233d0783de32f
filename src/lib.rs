//! clockblocks library root.
//! Exposes the CLI parser, the high-level run() function, and the
//! tracking core (reconciler, window resolver, tracker, summaries).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use utils::path::expand_to_string;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Category { .. } => cli::commands::category::handle(&cli.command, cfg),
        Commands::Start { .. } => cli::commands::start::handle(&cli.command, cfg),
        Commands::Stop { .. } => cli::commands::stop::handle(&cli.command, cfg),
        Commands::Status { .. } => cli::commands::status::handle(&cli.command, cfg),
        Commands::List { .. } => cli::commands::list::handle(&cli.command, cfg),
        Commands::Edit { .. } => cli::commands::edit::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // `RUST_LOG` wins over the configured level.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cfg.log_level))
        .format_timestamp(None)
        .try_init()
        .ok();

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    cfg.database = expand_to_string(&cfg.database);

    log::debug!("using database {}", cfg.database);
    dispatch(&cli, &cfg)
}
