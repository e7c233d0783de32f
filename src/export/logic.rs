// src/export/logic.rs

use crate::core::summary::{summarize_by_date, summarize_sessions};
use crate::db::pool::DbPool;
use crate::db::queries::{list_all_intervals, list_categories, list_sessions};
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{self, TableData};
use crate::export::{ExportFormat, ExportTable};
use crate::ui::messages::warning;
use chrono::{DateTime, FixedOffset, Utc};
use log::debug;
use std::path::Path;

/// High-level export entry point.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `table` to `file` (must be absolute) as CSV or JSON.
    ///
    /// An empty table is reported and nothing is written.
    pub fn export(
        pool: &DbPool,
        table: ExportTable,
        format: ExportFormat,
        file: &str,
        offset: FixedOffset,
        now: DateTime<Utc>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;
        debug!("exporting {} as {} to {}", table.as_str(), format.as_str(), file);

        let data = Self::build(pool, table, offset, now)?;

        if data.rows.is_empty() {
            warning(format!("No rows to export for {}.", table.as_str()));
            return Ok(());
        }

        match format {
            ExportFormat::Csv => export_csv(&data, path)?,
            ExportFormat::Json => export_json(&data, path)?,
        }

        Ok(())
    }

    /// Assemble one of the export tables from storage.
    pub fn build(
        pool: &DbPool,
        table: ExportTable,
        offset: FixedOffset,
        now: DateTime<Utc>,
    ) -> AppResult<TableData> {
        let boxes = list_categories(&pool.conn, true)?;
        let sessions = list_sessions(&pool.conn)?;
        let intervals = list_all_intervals(&pool.conn)?;

        let data = match table {
            ExportTable::SummaryBySession => {
                let summaries = summarize_sessions(&sessions, &intervals, &boxes, now);
                model::summary_by_session(&summaries, &boxes)
            }
            ExportTable::SummaryByDate => {
                let summaries = summarize_sessions(&sessions, &intervals, &boxes, now);
                model::summary_by_date(&summarize_by_date(&summaries, offset), &boxes)
            }
            ExportTable::DetailsSessions => model::details_sessions(&sessions),
            ExportTable::DetailsSessionEvents => {
                model::details_session_events(&sessions, &intervals, &boxes, now)
            }
        };

        Ok(data)
    }
}
