use crate::cli::commands::{instant, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::summary::{BREAK, summarize_session};
use crate::core::tracker::tick;
use crate::db::queries::{find_active_session, list_categories, list_intervals, list_sessions};
use crate::errors::AppResult;
use crate::models::category::find_box;
use crate::ui::messages::{header, info, running};
use crate::utils::formatting::swatch;
use crate::utils::table::Table;
use crate::utils::time::{format_hms, format_short};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Status { at } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let now = instant(at)?;

    let Some(mut session) = find_active_session(&pool.conn)? else {
        info("No active session.");
        return Ok(());
    };

    let mut intervals = list_intervals(&pool.conn, &session.id)?;
    tick(&mut session, &mut intervals, now);

    let boxes = list_categories(&pool.conn, true)?;
    let number = list_sessions(&pool.conn)?
        .iter()
        .position(|s| s.id == session.id)
        .map(|p| p + 1)
        .unwrap_or(0);

    header(format!("Session {number}"));
    match intervals.iter().find(|i| i.is_running()) {
        Some(live) => {
            let label = find_box(&boxes, &live.category_id)
                .map(|b| swatch(&b.colour, &b.name))
                .unwrap_or_else(|| "Unknown".to_string());
            running(format!("{label} for {}", format_short(live.seconds)));
        }
        None => info("Nothing running."),
    }

    let summary = summarize_session(number, &session, &intervals, &boxes, now);
    let mut table = Table::new(["Time box", "Time"]);
    for (name, seconds) in &summary.totals.0 {
        table.add_row(vec![name.clone(), format_hms(*seconds)]);
    }
    table.add_row(vec![BREAK.to_string(), format_hms(summary.break_seconds)]);
    print!("{}", table.render());
    info(format!("Session time: {}", format_hms(session.duration)));

    Ok(())
}
