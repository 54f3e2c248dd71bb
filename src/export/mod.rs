pub mod document;
pub mod excel;
pub mod table;

use crate::error::Result;
use chrono::Local;
use procure_scope_common::AnnotatedItem;
use std::path::{Path, PathBuf};

pub const SHEET_NAME: &str = "Scoped Items";

/// 表データの出力形式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Excel];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(format!("Unknown format: {}. Use csv, json, or excel", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 同じ時刻印で複数形式に出力
///
/// `{base}_{YYYYmmdd_HHMMSS}.{ext}` を `output_dir` に作成し、形式ごとのパスを返す。
pub fn export_to_multiple_formats(
    items: &[AnnotatedItem],
    output_dir: &Path,
    base_filename: &str,
    formats: &[ExportFormat],
) -> Result<Vec<(ExportFormat, PathBuf)>> {
    std::fs::create_dir_all(output_dir)?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    let mut exports = Vec::new();
    for format in formats {
        let path = output_dir.join(format!("{}_{}.{}", base_filename, timestamp, format.extension()));
        match format {
            ExportFormat::Csv => table::write_annotated_csv(&path, items)?,
            ExportFormat::Json => table::write_json(&path, items)?,
            ExportFormat::Excel => excel::generate_excel(items, &path, SHEET_NAME)?,
        }
        exports.push((*format, path));
    }

    Ok(exports)
}
