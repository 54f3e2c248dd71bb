//! スコープ文書生成
//!
//! AI CLIで文書を生成し、失敗時は生データのサマリーを代替文書にする。
//! 失敗でワークフロー全体を止めない。

mod ai_cli;
pub mod cache;

pub use cache::NarrativeCache;

use crate::ai_provider::AiProvider;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use procure_scope_common::degraded_document;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// 文書生成の設定
#[derive(Debug, Clone)]
pub struct NarrativeOptions {
    pub provider: AiProvider,
    /// 実行ファイル（Noneならプロバイダ既定のコマンド）
    pub command: Option<PathBuf>,
    pub model: Option<String>,
    pub timeout_seconds: u64,
    /// キャッシュを置くディレクトリ（Noneなら使わない）
    pub cache_dir: Option<PathBuf>,
    pub show_progress: bool,
}

/// 生成結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeDocument {
    pub content: String,
    /// AI生成に失敗し代替文書になった
    pub degraded: bool,
    /// キャッシュから取得した
    pub cached: bool,
}

/// スコープ文書を生成
///
/// # Arguments
/// * `prompt` - build_scope_promptの出力
/// * `workflow_summary` - 失敗時に代替文書へ埋め込むサマリー
pub async fn generate_document(prompt: &str, workflow_summary: &str, options: &NarrativeOptions) -> ScopeDocument {
    let key = cache::cache_key(options.provider.command_name(), options.model.as_deref(), prompt);

    if let Some(dir) = &options.cache_dir {
        if let Some(entry) = NarrativeCache::load(dir).get(&key) {
            info!("キャッシュから文書を取得");
            return ScopeDocument {
                content: entry.content.clone(),
                degraded: false,
                cached: true,
            };
        }
    }

    let spinner = options.show_progress.then(|| spinner(options.provider));

    let result = ai_cli::run_ai_cli(
        options.provider,
        options.command.as_deref(),
        options.model.as_deref(),
        prompt,
        options.timeout_seconds,
    )
    .await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(content) => {
            if let Some(dir) = &options.cache_dir {
                store(dir, key, options.provider, &content);
            }
            ScopeDocument {
                content,
                degraded: false,
                cached: false,
            }
        }
        Err(e) => {
            warn!(error = %e, "文書生成に失敗、サマリーで代替");
            ScopeDocument {
                content: degraded_document(&e.to_string(), workflow_summary),
                degraded: true,
                cached: false,
            }
        }
    }
}

fn store(dir: &Path, key: String, provider: AiProvider, content: &str) {
    let mut cache = NarrativeCache::load(dir);
    cache.insert(
        key,
        cache::CacheEntry {
            provider: provider.command_name().to_string(),
            created_at: Local::now().to_rfc3339(),
            content: content.to_string(),
        },
    );
    // 保存失敗は文書生成の結果に影響させない
    if let Err(e) = cache.save(dir) {
        warn!(error = %e, "キャッシュ保存に失敗");
    }
}

fn spinner(provider: AiProvider) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!("{} で文書を生成中...", provider));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
