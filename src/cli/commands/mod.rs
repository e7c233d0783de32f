pub mod category;
pub mod config;
pub mod edit;
pub mod export;
pub mod init;
pub mod list;
pub mod start;
pub mod status;
pub mod stop;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::time::{now, parse_optional_timestamp, resolve_offset};
use chrono::{DateTime, FixedOffset, Utc};

/// Open the configured database, bringing the schema up to date.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn, &cfg.default_time_boxes)?;
    Ok(pool)
}

/// `--at` value, or the current instant.
pub(crate) fn instant(at: &Option<String>) -> AppResult<DateTime<Utc>> {
    Ok(parse_optional_timestamp(at.as_ref())?.unwrap_or_else(now))
}

/// `--utc-offset`, then the config value, then the system offset.
pub(crate) fn offset(cli_minutes: Option<i32>, cfg: &Config) -> AppResult<FixedOffset> {
    resolve_offset(cli_minutes.or(cfg.utc_offset_minutes))
}
