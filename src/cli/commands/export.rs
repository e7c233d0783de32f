use crate::cli::commands::{offset, open_db};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::path::expand_to_string;
use crate::utils::time::now;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        table,
        format,
        file,
        utc_offset,
        force,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let offset = offset(*utc_offset, cfg)?;
        ExportLogic::export(
            &pool,
            *table,
            *format,
            &expand_to_string(file),
            offset,
            now(),
            *force,
        )?;
    }
    Ok(())
}
