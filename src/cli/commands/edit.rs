use crate::cli::commands::list::print_session;
use crate::cli::commands::{instant, offset, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::edit::EditLogic;
use crate::db::queries::list_categories;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        session,
        from,
        to,
        category,
        utc_offset,
        at,
    } = cmd
    {
        let mut pool = open_db(cfg)?;
        let now = instant(at)?;
        let offset = offset(*utc_offset, cfg)?;

        let report = EditLogic::apply(
            &mut pool,
            session,
            from,
            to,
            category.as_deref(),
            offset,
            now,
        )?;

        success(format!(
            "Session {} updated: {} removed, {} adjusted, {} added",
            report.session_number, report.deleted, report.updated, report.inserted
        ));
        if report.dropped > 0 {
            warning(format!(
                "{} zero-length piece(s) were skipped",
                report.dropped
            ));
        }

        let boxes = list_categories(&pool.conn, true)?;
        print_session(
            report.session_number,
            &report.session,
            &report.intervals,
            &boxes,
            offset,
            now,
        );
    }
    Ok(())
}
