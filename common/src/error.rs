//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 必須列が入力表に存在しない
    #[error("Schema error: table '{table}' is missing required column '{column}'")]
    Schema { table: String, column: String },

    /// 類似度計算に必要なデータが不足
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// 閾値が[0,1]の範囲外
    #[error("Invalid threshold: {0} (expected 0.0..=1.0)")]
    InvalidThreshold(f64),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub fn schema(table: &str, column: &str) -> Self {
        Error::Schema {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
