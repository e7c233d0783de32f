use crate::db::migrate::run_pending_migrations;
use crate::db::queries::{count_categories, insert_category, set_metadata};
use crate::errors::AppResult;
use crate::models::category::{PALETTE, TimeBox};
use log::info;
use rusqlite::Connection;

/// Time boxes created on first run when the config does not list any.
pub const DEFAULT_TIME_BOXES: [&str; 6] = ["Code", "Read", "Calls", "Write", "Chess", "Exercise"];

/// Initialize the database.
///
/// Schema comes from the migration engine; afterwards the time-box table is
/// seeded (only when empty) and the running app version is recorded.
pub fn init_db(conn: &Connection, seed: &[String]) -> AppResult<()> {
    run_pending_migrations(conn)?;

    if count_categories(conn)? == 0 {
        for (i, name) in seed.iter().enumerate() {
            let tb = TimeBox::new(name, PALETTE[i % PALETTE.len()]);
            insert_category(conn, &tb)?;
        }
        info!("seeded {} time boxes", seed.len());
    }

    set_metadata(conn, "app_version", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
