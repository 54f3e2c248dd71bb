//! スコープ文書（Markdown）出力

use crate::error::Result;
use std::path::{Path, PathBuf};

pub const DOCUMENT_FILE: &str = "scope_document.md";

/// 文書を保存して出力パスを返す
pub fn write_document(content: &str, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(DOCUMENT_FILE);
    std::fs::write(&path, content)?;
    Ok(path)
}
