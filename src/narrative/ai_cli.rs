//! AI CLI連携モジュール
//!
//! claude / codex / gemini のCLIにプロンプトを渡し、標準出力を文書として受け取る。

use crate::ai_provider::AiProvider;
use crate::error::{ProcureError, Result};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// AI CLIを実行
///
/// `program` を渡すとプロバイダ既定のコマンド名の代わりに実行する（引数は同じ）。
pub async fn run_ai_cli(
    provider: AiProvider,
    program: Option<&Path>,
    model: Option<&str>,
    prompt: &str,
    timeout_seconds: u64,
) -> Result<String> {
    let args = provider.args(prompt, model);
    let program = program
        .map(Path::as_os_str)
        .unwrap_or_else(|| OsStr::new(provider.command_name()));

    // Windowsではcmd /c経由
    #[cfg(windows)]
    let mut command = {
        let mut c = Command::new("cmd");
        c.arg("/c").arg(program).args(&args);
        c
    };

    #[cfg(not(windows))]
    let mut command = {
        let mut c = Command::new(program);
        c.args(&args);
        c
    };

    command.kill_on_drop(true);

    debug!(provider = %provider, prompt_len = prompt.len(), "AI CLI呼び出し");

    let output = tokio::time::timeout(Duration::from_secs(timeout_seconds), command.output())
        .await
        .map_err(|_| ProcureError::Timeout(timeout_seconds))?
        .map_err(|e| ProcureError::ApiCall(format!("{} 実行エラー: {}", provider, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProcureError::ApiCall(format!(
            "{} failed (code {:?}): {}",
            provider,
            output.status.code(),
            stderr.trim()
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if response.is_empty() {
        return Err(ProcureError::ApiCall(format!("{} の応答が空です", provider)));
    }

    debug!(response_len = response.len(), "AI CLI応答");
    Ok(response)
}
