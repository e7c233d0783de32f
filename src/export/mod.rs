// src/export/mod.rs

mod fs_utils;
mod json_csv;
pub mod logic;
pub mod model;

pub use logic::ExportLogic;
pub use model::TableData;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for every export.
pub(crate) fn notify_export_success(label: &str, rows: usize, path: &Path) {
    success(format!(
        "{label} export completed ({rows} rows): {}",
        path.display()
    ));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportTable {
    SummaryByDate,
    SummaryBySession,
    DetailsSessions,
    DetailsSessionEvents,
}

impl ExportTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportTable::SummaryByDate => "SummaryByDate",
            ExportTable::SummaryBySession => "SummaryBySession",
            ExportTable::DetailsSessions => "DetailsSessions",
            ExportTable::DetailsSessionEvents => "DetailsSessionEvents",
        }
    }
}
