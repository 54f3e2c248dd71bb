//! CSV/JSON出力

use crate::error::Result;
use procure_scope_common::AnnotatedItem;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// レコードをCSVに保存（列名はserdeの名前）
///
/// serializeは最初のレコードでヘッダーを書くため、0件のときは`columns`を明示的に書く。
pub fn write_records<T: Serialize>(path: &Path, columns: &[&str], records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(columns)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// write_recordsで保存したCSVを読み込む
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// 評価付き品目のCSV（0件でもヘッダーは出力）
pub fn write_annotated_csv(path: &Path, items: &[AnnotatedItem]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(AnnotatedItem::columns())?;
    for item in items {
        writer.write_record(item.values())?;
    }
    writer.flush()?;
    Ok(())
}

/// 評価付き品目のJSON（レコード配列）
pub fn write_json(path: &Path, items: &[AnnotatedItem]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(path, json)?;
    Ok(())
}
