//! 表データの境界パーサー
//!
//! CSV/Excelから読み込んだ生の行（文字列セル）を型付きレコードへ変換する。
//! - 必須列がなければ `Error::Schema`
//! - 行単位の欠損は空文字・0で補完（エラーにしない）

use crate::error::{Error, Result};
use crate::types::{HistoricalRecord, Item, Vendor};

pub const COL_ITEM_NAME: &str = "Item Name";
pub const COL_SPECIFICATION: &str = "Specification";
pub const COL_VENDOR_NAME: &str = "Vendor Name";
pub const COL_REGION: &str = "Region";
pub const COL_CONTACT_NAME: &str = "Contact Name";
pub const COL_CONTACT_EMAIL: &str = "Contact Email";
pub const COL_LEAD_TIME: &str = "Avg Lead Time (days)";
pub const COL_EXPERTISE: &str = "Expertise";
pub const COL_CERTIFICATIONS: &str = "Certifications";

/// 品目表の必須列
pub const ITEM_COLUMNS: &[&str] = &[COL_ITEM_NAME, COL_SPECIFICATION];
/// ベンダー表の必須列
pub const VENDOR_COLUMNS: &[&str] = &[COL_VENDOR_NAME];
/// 実績表の必須列
pub const HISTORICAL_COLUMNS: &[&str] = &[COL_ITEM_NAME, COL_SPECIFICATION];

/// ヘッダー行＋文字列セルの表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// エラーメッセージ用の表名
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(name: &str, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.to_string(),
            headers,
            rows,
        }
    }

    /// CSV文字列から読み込み（1行目はヘッダー）
    pub fn from_csv_str(name: &str, content: &str) -> Result<Self> {
        // Excel出力のCSVはBOM付きのことがある
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }

        Ok(Self::new(name, headers, rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列インデックス（列名は大文字小文字を区別）
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == column)
    }

    /// 必須列のインデックス
    pub fn require(&self, column: &str) -> Result<usize> {
        self.column_index(column)
            .ok_or_else(|| Error::schema(&self.name, column))
    }

    /// 不足している列の一覧
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| self.column_index(c).is_none())
            .map(|c| c.to_string())
            .collect()
    }

    fn cell<'a>(row: &'a [String], index: Option<usize>) -> &'a str {
        index
            .and_then(|i| row.get(i))
            .map(|s| s.as_str())
            .unwrap_or("")
    }
}

/// 品目表を変換
pub fn parse_items(table: &RawTable) -> Result<Vec<Item>> {
    let name = table.require(COL_ITEM_NAME)?;
    let spec = table.require(COL_SPECIFICATION)?;

    Ok(table
        .rows
        .iter()
        .map(|row| Item {
            name: RawTable::cell(row, Some(name)).to_string(),
            specification: RawTable::cell(row, Some(spec)).to_string(),
        })
        .collect())
}

/// ベンダー表を変換（ベンダー名以外の列は省略可）
pub fn parse_vendors(table: &RawTable) -> Result<Vec<Vendor>> {
    let name = Some(table.require(COL_VENDOR_NAME)?);
    let region = table.column_index(COL_REGION);
    let contact = table.column_index(COL_CONTACT_NAME);
    let email = table.column_index(COL_CONTACT_EMAIL);
    let lead_time = table.column_index(COL_LEAD_TIME);
    let expertise = table.column_index(COL_EXPERTISE);
    let certifications = table.column_index(COL_CERTIFICATIONS);

    Ok(table
        .rows
        .iter()
        .map(|row| Vendor {
            name: RawTable::cell(row, name).to_string(),
            region: RawTable::cell(row, region).to_string(),
            contact_name: RawTable::cell(row, contact).to_string(),
            contact_email: RawTable::cell(row, email).to_string(),
            lead_time_days: parse_lead_time(RawTable::cell(row, lead_time)),
            expertise: RawTable::cell(row, expertise).to_string(),
            certifications: RawTable::cell(row, certifications).to_string(),
        })
        .collect())
}

/// 実績表を変換
pub fn parse_historical(table: &RawTable) -> Result<Vec<HistoricalRecord>> {
    let name = table.require(COL_ITEM_NAME)?;
    let spec = table.require(COL_SPECIFICATION)?;

    Ok(table
        .rows
        .iter()
        .map(|row| HistoricalRecord {
            item_name: RawTable::cell(row, Some(name)).to_string(),
            specification: RawTable::cell(row, Some(spec)).to_string(),
        })
        .collect())
}

/// リードタイム（日数）を解釈
///
/// "20", "20.0", " 21.6 " を受け付ける。端数は丸めずに保持する。
/// 空・数値以外・負数は0。
pub fn parse_lead_time(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(days) if days.is_finite() && days >= 0.0 => days,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENDORS_CSV: &str = "\
Vendor Name,Region,Contact Name,Contact Email,Avg Lead Time (days),Expertise,Certifications
AcmeSteel,Asia,J. Lee,jl@acme.com,20,steel pipe manufacturing,ISO9001
ValveCo,Europe,M. Rossi,mr@valveco.eu,,\"valves, fittings\",API 6D
";

    #[test]
    fn test_from_csv_str() {
        let table = RawTable::from_csv_str("vendors", VENDORS_CSV).unwrap();
        assert_eq!(table.headers.len(), 7);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][5], "valves, fittings");
    }

    #[test]
    fn test_from_csv_str_strips_bom() {
        let table = RawTable::from_csv_str("items", "\u{feff}Item Name,Specification\nPipe,A53\n").unwrap();
        assert_eq!(table.column_index("Item Name"), Some(0));
    }

    #[test]
    fn test_parse_vendors_defaults_missing_values() {
        let table = RawTable::from_csv_str("vendors", VENDORS_CSV).unwrap();
        let vendors = parse_vendors(&table).unwrap();
        assert_eq!(vendors[0].lead_time_days, 20.0);
        assert_eq!(vendors[1].lead_time_days, 0.0);
        assert_eq!(vendors[1].expertise, "valves, fittings");
    }

    #[test]
    fn test_parse_vendors_optional_columns() {
        let table = RawTable::from_csv_str("vendors", "Vendor Name\nSolo\n").unwrap();
        let vendors = parse_vendors(&table).unwrap();
        assert_eq!(vendors[0].name, "Solo");
        assert_eq!(vendors[0].region, "");
        assert_eq!(vendors[0].certifications, "");
    }

    #[test]
    fn test_parse_items_short_row() {
        let table = RawTable::from_csv_str("items", "Item Name,Specification\nGasket\n").unwrap();
        let items = parse_items(&table).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Gasket");
        assert_eq!(items[0].specification, "");
    }

    #[test]
    fn test_parse_items_missing_specification_column() {
        let table = RawTable::from_csv_str("items", "Item Name\nGasket\n").unwrap();
        let err = parse_items(&table).unwrap_err();
        match err {
            Error::Schema { table, column } => {
                assert_eq!(table, "items");
                assert_eq!(column, "Specification");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_historical_missing_specification_column() {
        let table = RawTable::from_csv_str("historical", "Item Name,Spec\nPipe,A53\n").unwrap();
        assert!(matches!(parse_historical(&table), Err(Error::Schema { .. })));
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let table = RawTable::from_csv_str("items", "item name,specification\nPipe,A53\n").unwrap();
        assert_eq!(
            table.missing_columns(ITEM_COLUMNS),
            vec!["Item Name".to_string(), "Specification".to_string()]
        );
    }

    #[test]
    fn test_parse_lead_time() {
        assert_eq!(parse_lead_time("20"), 20.0);
        assert_eq!(parse_lead_time("20.0"), 20.0);
        assert_eq!(parse_lead_time(" 21.6 "), 21.6);
        assert_eq!(parse_lead_time("30.4"), 30.4);
        assert_eq!(parse_lead_time(""), 0.0);
        assert_eq!(parse_lead_time("n/a"), 0.0);
        assert_eq!(parse_lead_time("-5"), 0.0);
        assert_eq!(parse_lead_time("inf"), 0.0);
    }
}
