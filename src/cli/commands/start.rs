use crate::cli::commands::{instant, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::summary::box_name;
use crate::core::tracker::{Activation, activate};
use crate::db::queries::list_categories;
use crate::errors::AppResult;
use crate::ui::messages::{info, running, success};
use crate::utils::formatting::swatch;
use crate::utils::time::{format_short, format_timestamp};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start { category, at } = cmd {
        let mut pool = open_db(cfg)?;
        let now = instant(at)?;

        match activate(&mut pool, category, now)? {
            Activation::AlreadyRunning { time_box, interval } => {
                running(format!(
                    "{} is already running ({})",
                    swatch(&time_box.colour, &time_box.name),
                    format_short(interval.effective_seconds(now))
                ));
            }
            Activation::Started {
                time_box,
                closed,
                new_session,
                ..
            } => {
                if let Some(c) = closed {
                    let boxes = list_categories(&pool.conn, true)?;
                    info(format!(
                        "Stopped {} after {}",
                        box_name(&boxes, &c.category_id),
                        format_short(c.seconds)
                    ));
                }
                if new_session {
                    info(format!("New session started at {}", format_timestamp(&now)));
                }
                success(format!("Tracking {}", swatch(&time_box.colour, &time_box.name)));
            }
        }
    }
    Ok(())
}
