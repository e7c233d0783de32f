use crate::cli::commands::{instant, offset, open_db};
use crate::cli::parser::{Commands, GroupBy};
use crate::config::Config;
use crate::core::summary::{
    BREAK, box_name, column_names, summarize_by_date, summarize_sessions,
};
use crate::db::queries::{list_all_intervals, list_categories, list_intervals, list_sessions};
use crate::errors::{AppError, AppResult};
use crate::models::category::TimeBox;
use crate::models::interval::Interval;
use crate::models::session::{Session, find_session};
use crate::ui::messages::{header, info};
use crate::utils::colors::colorize_running;
use crate::utils::table::Table;
use crate::utils::time::{format_hms, format_local};
use chrono::{DateTime, FixedOffset, Utc};

const STAMP: &str = "%Y-%m-%d %H:%M";

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::List {
        session,
        by,
        utc_offset,
        at,
    } = cmd
    else {
        return Ok(());
    };

    let pool = open_db(cfg)?;
    let now = instant(at)?;
    let offset = offset(*utc_offset, cfg)?;

    let sessions = list_sessions(&pool.conn)?;
    if sessions.is_empty() {
        info("No sessions recorded yet.");
        return Ok(());
    }
    let boxes = list_categories(&pool.conn, true)?;

    if let Some(reference) = session {
        let (number, s) = find_session(&sessions, reference)
            .ok_or_else(|| AppError::NotFound(format!("session '{reference}'")))?;
        let intervals = list_intervals(&pool.conn, &s.id)?;
        print_session(number, s, &intervals, &boxes, offset, now);
        return Ok(());
    }

    let intervals = list_all_intervals(&pool.conn)?;
    let summaries = summarize_sessions(&sessions, &intervals, &boxes, now);

    match by {
        GroupBy::Session => {
            let names = column_names(&boxes, &summaries.iter().map(|s| &s.totals).collect::<Vec<_>>());
            let mut headers = vec!["#".to_string(), "Start".into(), "End".into()];
            headers.extend(names.iter().cloned());
            headers.push(BREAK.into());

            let mut table = Table::new(headers);
            for s in &summaries {
                let mut row = vec![
                    s.number.to_string(),
                    s.start.map(|d| format_local(&d, offset, STAMP)).unwrap_or_default(),
                    match s.end {
                        Some(d) => format_local(&d, offset, STAMP),
                        None => colorize_running("active", true),
                    },
                ];
                row.extend(names.iter().map(|n| format_hms(s.totals.get(n))));
                row.push(format_hms(s.break_seconds));
                table.add_row(row);
            }
            print!("{}", table.render());
        }
        GroupBy::Date => {
            let dates = summarize_by_date(&summaries, offset);
            let names = column_names(&boxes, &dates.iter().map(|d| &d.totals).collect::<Vec<_>>());
            let mut headers = vec!["Date".to_string(), "Sessions".into()];
            headers.extend(names.iter().cloned());
            headers.push(BREAK.into());

            let mut table = Table::new(headers);
            for d in &dates {
                let mut row = vec![d.date.to_string(), d.sessions.to_string()];
                row.extend(names.iter().map(|n| format_hms(d.totals.get(n))));
                row.push(format_hms(d.break_seconds));
                table.add_row(row);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}

/// Intervals of one session, in local time.
pub(crate) fn print_session(
    number: usize,
    session: &Session,
    intervals: &[Interval],
    boxes: &[TimeBox],
    offset: FixedOffset,
    now: DateTime<Utc>,
) {
    header(format!("Session {number}"));

    let mut table = Table::new(["#", "Time box", "Start", "End", "Duration"]);
    for (i, iv) in intervals.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            box_name(boxes, &iv.category_id).to_string(),
            format_local(&iv.start, offset, STAMP),
            match iv.end {
                Some(e) => format_local(&e, offset, STAMP),
                None => colorize_running("running", true),
            },
            format_hms(iv.effective_seconds(now)),
        ]);
    }
    print!("{}", table.render());
    info(format!("Session time: {}", format_hms(session.duration)));
}
