use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcureError {
    #[error(transparent)]
    Common(#[from] procure_scope_common::Error),

    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("未対応のファイル形式: {0}（csv/xlsx/xls/ods に対応）")]
    UnsupportedFormat(String),

    #[error("スプレッドシート読み込みエラー: {0}")]
    Spreadsheet(String),

    #[error("CSVエラー: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("AI CLI呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("AI CLIがタイムアウトしました（{0}秒）")]
    Timeout(u64),

    #[error("入力操作エラー: {0}")]
    Prompt(String),

    #[error("非同期タスクエラー: {0}")]
    Task(String),
}

impl From<rust_xlsxwriter::XlsxError> for ProcureError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ProcureError::ExcelGeneration(e.to_string())
    }
}

impl From<dialoguer::Error> for ProcureError {
    fn from(e: dialoguer::Error) -> Self {
        ProcureError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProcureError>;
