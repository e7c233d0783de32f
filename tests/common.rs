#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Utc};
use clockblocks::db::initialize::{DEFAULT_TIME_BOXES, init_db};
use clockblocks::db::pool::DbPool;
use clockblocks::db::queries::list_categories;
use clockblocks::models::interval::Interval;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, isolated from the user's real config directory.
pub fn cb() -> Command {
    let mut cmd = cargo_bin_cmd!("clockblocks");
    let home = env::temp_dir().join("clockblocks_test_home");
    cmd.env("HOME", &home).env("APPDATA", &home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_clockblocks.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// `init` in test mode (no config file written).
pub fn init_cli_db(db_path: &str) {
    cb().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// In-memory database with the default time boxes.
pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    let seed: Vec<String> = DEFAULT_TIME_BOXES.iter().map(|s| s.to_string()).collect();
    init_db(&pool.conn, &seed).expect("init db");
    pool
}

/// Id of a seeded time box by name.
pub fn box_id(pool: &DbPool, name: &str) -> String {
    list_categories(&pool.conn, true)
        .expect("list boxes")
        .into_iter()
        .find(|b| b.name == name)
        .map(|b| b.id)
        .unwrap_or_else(|| panic!("no time box named {name}"))
}

pub fn at(s: &str) -> DateTime<Utc> {
    s.parse().expect("RFC 3339 timestamp")
}

/// `2024-06-01T<hh:mm>:00Z`
pub fn hm(t: &str) -> DateTime<Utc> {
    at(&format!("2024-06-01T{t}:00Z"))
}

pub fn closed(session: &str, category: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Interval {
    let mut i = Interval::start_running(session, category, start);
    i.end = Some(end);
    i.seconds = (end - start).num_seconds();
    i
}
