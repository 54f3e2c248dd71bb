//! 入力ファイル読み込みモジュール
//!
//! CSV（csvクレート）とExcel/ODS（calamine）を同じ `RawTable` に変換し、
//! 共通ライブラリの境界パーサーで型付きレコードにする。

use crate::error::{ProcureError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use procure_scope_common::{
    parse_historical, parse_items, parse_vendors, HistoricalRecord, Item, RawTable, Vendor,
};
use std::path::Path;
use tracing::debug;

/// 入力ファイルの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            _ => Err(ProcureError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// 表ファイルを読み込む
///
/// # Arguments
/// * `path` - CSVまたはExcelファイル
/// * `name` - エラーメッセージ用の表名
pub fn load_table(path: &Path, name: &str) -> Result<RawTable> {
    if !path.exists() {
        return Err(ProcureError::FileNotFound(path.display().to_string()));
    }

    let table = match TableFormat::from_path(path)? {
        TableFormat::Csv => {
            let content = std::fs::read_to_string(path)?;
            RawTable::from_csv_str(name, &content)?
        }
        TableFormat::Spreadsheet => load_spreadsheet(path, name)?,
    };

    debug!(table = name, rows = table.len(), path = %path.display(), "表を読み込み");
    Ok(table)
}

fn load_spreadsheet(path: &Path, name: &str) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ProcureError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ProcureError::Spreadsheet(format!("シートがありません: {}", path.display())))?
        .map_err(|e| ProcureError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let rows = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        // 全セル空の行は読み飛ばす
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    Ok(RawTable::new(name, headers, rows))
}

/// セル値を文字列化（整数値の小数は "20" のように出力）
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    Ok(parse_items(&load_table(path, "items")?)?)
}

pub fn load_vendors(path: &Path) -> Result<Vec<Vendor>> {
    Ok(parse_vendors(&load_table(path, "vendors")?)?)
}

pub fn load_historical(path: &Path) -> Result<Vec<HistoricalRecord>> {
    Ok(parse_historical(&load_table(path, "historical")?)?)
}

/// プロジェクト規定文書（Markdown/テキスト）
pub fn load_rules(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ProcureError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

/// 必須列の検証結果（成否, メッセージ）
pub fn validate_table(path: &Path, required_columns: &[&str]) -> (bool, String) {
    let table = match load_table(path, "validation") {
        Ok(t) => t,
        Err(e) => return (false, format!("Validation error: {}", e)),
    };

    let missing = table.missing_columns(required_columns);
    if missing.is_empty() {
        (true, format!("File validated successfully with {} rows", table.len()))
    } else {
        (false, format!("Validation error: Missing required columns: {:?}", missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_format_from_path() {
        assert_eq!(TableFormat::from_path(Path::new("a.CSV")).unwrap(), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(Path::new("a.xlsx")).unwrap(), TableFormat::Spreadsheet);
        assert!(matches!(
            TableFormat::from_path(Path::new("a.txt")),
            Err(ProcureError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Float(20.0)), "20");
        assert_eq!(cell_to_string(&Data::Float(20.5)), "20.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("Pipe".into())), "Pipe");
    }
}
