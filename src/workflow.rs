//! 一括ワークフロー
//!
//! ## 処理フロー
//! 1. 品目・ベンダー・実績を読み込み
//! 2. ベンダー照合と仕様推薦を並列実行（互いに依存しない）
//! 3. 両方の完了を待ってマージ
//! 4. 中間結果をCSVとして明示的に保存

use crate::error::{ProcureError, Result};
use crate::export::table::write_records;
use crate::loader;
use chrono::Local;
use procure_scope_common::{
    match_vendors, merge_results, recommend_specs, HistoricalRecord, Item, ScopedItem,
    SpecRecommendation, Vendor, VendorMapping, WorkflowSummary,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const MAPPING_FILE: &str = "item_vendor_mapping_final.csv";
pub const SPECS_FILE: &str = "recommended_specs.csv";
pub const SCOPED_FILE: &str = "scoped_items.csv";

/// 入力ファイル一式
#[derive(Debug, Clone)]
pub struct WorkflowInputs {
    pub items_path: PathBuf,
    pub vendors_path: PathBuf,
    pub historical_path: PathBuf,
}

/// ワークフロー結果
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowResult {
    pub mappings: Vec<VendorMapping>,
    pub specifications: Vec<SpecRecommendation>,
    pub scoped_items: Vec<ScopedItem>,
    pub summary: WorkflowSummary,
}

/// 照合・推薦・マージを実行（ファイルI/Oなし）
pub async fn run_core(
    items: Vec<Item>,
    vendors: Vec<Vendor>,
    historical: Vec<HistoricalRecord>,
    threshold: f64,
) -> Result<WorkflowResult> {
    let items = Arc::new(items);

    let match_items = Arc::clone(&items);
    let matcher = tokio::task::spawn_blocking(move || match_vendors(&match_items, &vendors, threshold));

    let spec_items = Arc::clone(&items);
    let recommender = tokio::task::spawn_blocking(move || recommend_specs(&spec_items, &historical));

    let (mappings, specifications) = tokio::try_join!(matcher, recommender)
        .map_err(|e| ProcureError::Task(e.to_string()))?;
    let mappings = mappings?;

    let scoped_items = merge_results(&mappings, &specifications);

    let summary = WorkflowSummary {
        total_items: items.len(),
        vendor_mappings: mappings.len(),
        specs_generated: specifications.len(),
        final_items: scoped_items.len(),
        completion_time: Local::now().to_rfc3339(),
    };

    info!(
        items = summary.total_items,
        matched = mappings.iter().filter(|m| m.is_matched()).count(),
        "ワークフロー完了"
    );

    Ok(WorkflowResult {
        mappings,
        specifications,
        scoped_items,
        summary,
    })
}

/// ファイルを読み込んで一括実行
pub async fn execute_complete_workflow(inputs: &WorkflowInputs, threshold: f64) -> Result<WorkflowResult> {
    let items = loader::load_items(&inputs.items_path)?;
    let vendors = loader::load_vendors(&inputs.vendors_path)?;
    let historical = loader::load_historical(&inputs.historical_path)?;

    info!(
        items = items.len(),
        vendors = vendors.len(),
        historical = historical.len(),
        "入力を読み込み"
    );

    run_core(items, vendors, historical, threshold).await
}

/// 中間結果を保存（照合・推薦・スコープの3ファイル）
pub fn persist_intermediates(result: &WorkflowResult, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mapping_path = output_dir.join(MAPPING_FILE);
    let specs_path = output_dir.join(SPECS_FILE);
    let scoped_path = output_dir.join(SCOPED_FILE);

    write_records(&mapping_path, &VendorMapping::COLUMNS, &result.mappings)?;
    write_records(&specs_path, &SpecRecommendation::COLUMNS, &result.specifications)?;
    write_records(&scoped_path, &ScopedItem::COLUMNS, &result.scoped_items)?;

    Ok(vec![mapping_path, specs_path, scoped_path])
}

/// ディレクトリ内の標準ファイルの有無
pub fn workflow_status(dir: &Path) -> Vec<(&'static str, bool)> {
    [
        "items.csv",
        "vendors.csv",
        "historical_df_items.csv",
        "project_rules.md",
        MAPPING_FILE,
        SPECS_FILE,
        SCOPED_FILE,
    ]
    .into_iter()
    .map(|name| (name, dir.join(name).exists()))
    .collect()
}
