use crate::cli::commands::{instant, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::tracker::stop;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::time::format_hms;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop { at } = cmd {
        let mut pool = open_db(cfg)?;
        let stopped = stop(&mut pool, instant(at)?)?;
        success(format!(
            "Session stopped after {}",
            format_hms(stopped.session.duration)
        ));
    }
    Ok(())
}
