// src/export/json_csv.rs

use crate::errors::AppResult;
use crate::export::{TableData, notify_export_success};
use crate::ui::messages::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Export JSON pretty-printed, one object per row.
pub(crate) fn export_json(table: &TableData, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(&table.to_records())?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", table.rows.len(), path);
    Ok(())
}

/// Export CSV with the header row first.
pub(crate) fn export_csv(table: &TableData, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    notify_export_success("CSV", table.rows.len(), path);
    Ok(())
}
