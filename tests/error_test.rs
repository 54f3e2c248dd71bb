//! エラーケーステスト
//!
//! 入力不備・設定不備でのエラーハンドリングを検証

use procure_scope::config::{check_threshold, Config};
use procure_scope::error::ProcureError;
use procure_scope::loader;
use procure_scope_common::table::{ITEM_COLUMNS, VENDOR_COLUMNS};
use procure_scope_common::{match_vendors, Error, Item, Vendor};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないファイルを読み込んだ場合
#[test]
fn test_load_nonexistent_file() {
    let result = loader::load_items(Path::new("/nonexistent/path/items.csv"));
    assert!(matches!(result, Err(ProcureError::FileNotFound(_))));
}

/// 未対応の拡張子
#[test]
fn test_load_unsupported_format() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("items.txt");
    std::fs::write(&path, "Item Name,Specification\n").unwrap();

    let result = loader::load_items(&path);
    assert!(matches!(result, Err(ProcureError::UnsupportedFormat(_))));
}

/// ヘッダーのみのファイルは0件
#[test]
fn test_load_header_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("items.csv");
    std::fs::write(&path, "Item Name,Specification\n").unwrap();

    let items = loader::load_items(&path).expect("ヘッダーのみはエラーにしない");
    assert!(items.is_empty());
}

/// ベンダー表は名前列だけでも読める
#[test]
fn test_vendor_optional_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("vendors.csv");
    std::fs::write(&path, "Vendor Name,Avg Lead Time (days)\nPipeWorks,abc\nWireCo,14.6\n").unwrap();

    let vendors = loader::load_vendors(&path).expect("読み込み失敗");
    assert_eq!(vendors.len(), 2);
    assert_eq!(vendors[0].lead_time_days, 0.0);
    // 端数は丸めない
    assert_eq!(vendors[1].lead_time_days, 14.6);
    assert_eq!(vendors[1].region, "");
}

#[test]
fn test_validate_table_messages() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("items.csv");
    std::fs::write(&path, "Item Name,Specification\nPipe,A\nValve,B\n").unwrap();

    let (ok, message) = loader::validate_table(&path, ITEM_COLUMNS);
    assert!(ok);
    assert_eq!(message, "File validated successfully with 2 rows");

    let (ok, message) = loader::validate_table(&path, VENDOR_COLUMNS);
    assert!(!ok);
    assert!(message.contains("Vendor Name"), "{}", message);

    let (ok, message) = loader::validate_table(&dir.path().join("missing.csv"), ITEM_COLUMNS);
    assert!(!ok);
    assert!(message.starts_with("Validation error:"));
}

/// 共通ライブラリのエラーはそのまま表示される
#[test]
fn test_common_error_is_transparent() {
    let err: ProcureError = Error::schema("items", "Item Name").into();
    assert_eq!(
        err.to_string(),
        "Schema error: table 'items' is missing required column 'Item Name'"
    );
}

#[test]
fn test_invalid_threshold() {
    let items = vec![Item {
        name: "Pipe".to_string(),
        specification: String::new(),
    }];
    let vendors = vec![Vendor {
        name: "PipeWorks".to_string(),
        ..Default::default()
    }];

    assert!(matches!(
        match_vendors(&items, &vendors, 1.5),
        Err(Error::InvalidThreshold(_))
    ));
    assert!(matches!(check_threshold("threshold", -0.1), Err(ProcureError::Config(_))));
    assert!(check_threshold("threshold", 0.0).is_ok());
}

#[test]
fn test_config_rejects_invalid_values() {
    let config = Config {
        workflow_threshold: 2.0,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ProcureError::Config(_))));

    let config = Config {
        timeout_seconds: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_timeout_message() {
    assert_eq!(
        ProcureError::Timeout(300).to_string(),
        "AI CLIがタイムアウトしました（300秒）"
    );
}
