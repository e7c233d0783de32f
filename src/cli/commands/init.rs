use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries::{count_categories, get_metadata};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database with all pending migrations
///  - the default time boxes, when none exist yet
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let db_path = cfg.init_all(cli.test)?;

    info("Initializing clockblocks…");
    if !cli.test {
        info(format!("Config file : {}", Config::config_file().display()));
    }
    info(format!("Database    : {}", db_path.display()));

    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn, &cfg.default_time_boxes)?;

    let version = get_metadata(&pool.conn, "sql_schema_version")?.unwrap_or_default();
    success(format!(
        "Database initialized at {} (schema v{version}, {} time boxes)",
        db_path.display(),
        count_categories(&pool.conn)?
    ));
    Ok(())
}
