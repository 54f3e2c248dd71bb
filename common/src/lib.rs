//! Procure Scope Common Library
//!
//! 調達スコープ生成のコアロジック（ファイルI/Oなし）:
//! - 品目→ベンダー照合（TF-IDF＋コサイン類似度＋閾値）
//! - 過去実績からの仕様推薦
//! - 両者のマージ、コスト・リスク評価、プロンプト生成

pub mod types;
pub mod error;
pub mod table;
pub mod stopwords;
pub mod tfidf;
pub mod matcher;
pub mod recommender;
pub mod merger;
pub mod assessment;
pub mod prompts;

pub use types::{
    HistoricalRecord, Item, ScopedItem, SpecRecommendation, Vendor, VendorMapping, WorkflowSummary,
    MANUAL_REVIEW, NO_MATCH_VENDOR, TBD,
};
pub use error::{Error, Result};
pub use table::{parse_historical, parse_items, parse_vendors, RawTable};
pub use matcher::{match_vendors, rank_vendors};
pub use recommender::recommend_specs;
pub use merger::merge_results;
pub use assessment::{annotate_all, AnnotatedItem, CostFactors, RiskLevel};
pub use prompts::{build_scope_prompt, build_workflow_summary, degraded_document, render_items_table};
