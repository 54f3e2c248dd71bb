use anyhow::{Context, Result};
use clap::Parser;
use procure_scope::{cli, config, export, loader, narrative, review, workflow};
use procure_scope::config::check_threshold;
use procure_scope_common::table::{HISTORICAL_COLUMNS, ITEM_COLUMNS, VENDOR_COLUMNS};
use procure_scope_common::{
    annotate_all, build_scope_prompt, build_workflow_summary, match_vendors, recommend_specs,
    SpecRecommendation, VendorMapping,
};
use cli::{Cli, Commands};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "procure_scope=debug,procure_scope_common=debug"
    } else {
        "procure_scope=info,procure_scope_common=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Run { inputs, historical, rules, output, prompt, threshold, format, provider, no_ai, no_cache } => {
            println!("📦 procure-scope - 一括処理\n");

            let threshold = threshold.unwrap_or(config.workflow_threshold);
            check_threshold("threshold", threshold)?;

            // 1. 照合・推薦・マージ
            println!("[1/4] 照合・仕様推薦中... (閾値: {})", threshold);
            let workflow_inputs = workflow::WorkflowInputs {
                items_path: inputs.items.clone(),
                vendors_path: inputs.vendors.clone(),
                historical_path: historical.clone(),
            };
            let result = workflow::execute_complete_workflow(&workflow_inputs, threshold).await?;
            let matched = result.mappings.iter().filter(|m| m.is_matched()).count();
            println!(
                "✔ {}品目を処理（ベンダー割当 {}件 / 要確認 {}件）\n",
                result.summary.total_items,
                matched,
                result.summary.total_items - matched
            );

            // 2. 中間結果の保存
            println!("[2/4] 中間結果を保存中...");
            for path in workflow::persist_intermediates(&result, &output)? {
                println!("✔ {}", path.display());
            }
            println!();

            // 3. 文書生成
            println!("[3/4] スコープ文書を生成中...");
            let summary_text = build_workflow_summary(&result.summary, &result.scoped_items);
            let document = if no_ai {
                summary_text.clone()
            } else {
                let rules_text = loader::load_rules(&rules)
                    .with_context(|| format!("規定文書の読み込みに失敗: {}", rules.display()))?;
                let scope_prompt = build_scope_prompt(&prompt, &rules_text, &summary_text, config.rules_char_limit);
                let options = narrative::NarrativeOptions {
                    provider: provider.unwrap_or(config.ai_provider),
                    command: config.ai_command.clone(),
                    model: config.model.clone(),
                    timeout_seconds: config.timeout_seconds,
                    cache_dir: (!no_cache).then(|| output.clone()),
                    show_progress: true,
                };
                let doc = narrative::generate_document(&scope_prompt, &summary_text, &options).await;
                if doc.degraded {
                    println!("⚠ AI文書生成に失敗したため、サマリーを出力します");
                } else if doc.cached {
                    println!("✔ キャッシュから取得");
                }
                doc.content
            };
            let doc_path = export::document::write_document(&document, &output)?;
            println!("✔ 文書: {}\n", doc_path.display());

            // 4. 表データ出力
            println!("[4/4] エクスポート中...");
            let annotated = annotate_all(&result.scoped_items, &config.cost_factors);
            for (format, path) in export::export_to_multiple_formats(&annotated, &output, "scope_document", &format)? {
                println!("✔ {}: {}", format, path.display());
            }

            println!("\n✅ 完了");
        }

        Commands::Match { inputs, threshold, output } => {
            println!("🔗 procure-scope - ベンダー照合\n");

            let threshold = threshold.unwrap_or(config.match_threshold);
            check_threshold("threshold", threshold)?;

            let items = loader::load_items(&inputs.items)?;
            let vendors = loader::load_vendors(&inputs.vendors)?;
            let mappings = match_vendors(&items, &vendors, threshold)?;

            for m in &mappings {
                println!("  {} → {} ({:.3})", m.item_name, m.recommended_vendor, m.similarity_score);
            }
            export::table::write_records(&output, &VendorMapping::COLUMNS, &mappings)?;
            println!("\n✔ {}件を保存: {}", mappings.len(), output.display());
        }

        Commands::Specs { items, historical, output } => {
            println!("📐 procure-scope - 仕様推薦\n");

            let items = loader::load_items(&items)?;
            let historical = loader::load_historical(&historical)?;
            let specs = recommend_specs(&items, &historical);

            for s in &specs {
                println!(
                    "  {} → {} (信頼度 {:.3}, 実績 {}件)",
                    s.item_name, s.recommended_specification, s.confidence_score, s.historical_matches
                );
            }
            export::table::write_records(&output, &SpecRecommendation::COLUMNS, &specs)?;
            println!("\n✔ {}件を保存: {}", specs.len(), output.display());
        }

        Commands::Validate { items, vendors, historical } => {
            let targets: [(&str, Option<PathBuf>, &[&str]); 3] = [
                ("品目", items, ITEM_COLUMNS),
                ("ベンダー", vendors, VENDOR_COLUMNS),
                ("過去実績", historical, HISTORICAL_COLUMNS),
            ];

            let mut all_ok = true;
            for (label, path, columns) in targets {
                if let Some(path) = path {
                    let (ok, message) = loader::validate_table(&path, columns);
                    println!("{} {}: {}", if ok { "✔" } else { "✘" }, label, message);
                    all_ok &= ok;
                }
            }

            if !all_ok {
                anyhow::bail!("検証に失敗したファイルがあります");
            }
        }

        Commands::Status { dir } => {
            println!("ファイル状況: {}", dir.display());
            for (name, exists) in workflow::workflow_status(&dir) {
                println!("  {} {}", if exists { "✔" } else { "-" }, name);
            }
        }

        Commands::Review { scoped, inputs, output } => {
            println!("🔍 procure-scope - ベンダー確認\n");
            let items = loader::load_items(&inputs.items)?;
            let vendors = loader::load_vendors(&inputs.vendors)?;
            review::run_interactive_review(&scoped, &items, &vendors, output.as_deref())?;
        }

        Commands::Config { set_provider, set_model, set_threshold, set_workflow_threshold, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(provider) = set_provider {
                config.ai_provider = provider;
                changed = true;
            }
            if let Some(model) = set_model {
                config.model = if model.trim().is_empty() { None } else { Some(model) };
                changed = true;
            }
            if let Some(threshold) = set_threshold {
                config.match_threshold = threshold;
                changed = true;
            }
            if let Some(threshold) = set_workflow_threshold {
                config.workflow_threshold = threshold;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  AIプロバイダ: {}", config.ai_provider);
                println!("  モデル: {}", config.model.as_deref().unwrap_or("(CLI既定)"));
                if let Some(command) = &config.ai_command {
                    println!("  AI CLIのパス: {}", command.display());
                }
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  照合閾値: {}", config.match_threshold);
                println!("  一括処理閾値: {}", config.workflow_threshold);
                println!("  規定文書の上限: {}文字", config.rules_char_limit);
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("output"));
            let cache_path = narrative::NarrativeCache::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = narrative::NarrativeCache::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match narrative::NarrativeCache::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}
