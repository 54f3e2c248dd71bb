//! 調達スコープ文書のプロンプト生成
//!
//! - render_items_table: 全スコープ品目のMarkdown表（間引きなし）
//! - build_workflow_summary: 統計＋全品目表
//! - build_scope_prompt: AIに渡すプロンプト
//! - degraded_document: AI生成失敗時の代替文書

use crate::types::{ScopedItem, WorkflowSummary};

/// 文書に含める章立て
pub const SCOPE_SECTIONS: &[&str] = &[
    "Executive Summary",
    "Project Overview",
    "Scope of Work",
    "Item Specifications and Vendor Recommendations",
    "Delivery Timeline and Requirements",
    "Quality Standards and Certifications",
    "Risk Assessment and Mitigation",
    "Procurement Strategy and Next Steps",
];

/// 依頼文が空のときの既定値
pub const DEFAULT_REQUEST: &str = "generate a complete procurement scope document";

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// 全品目をMarkdown表に変換
pub fn render_items_table(items: &[ScopedItem]) -> String {
    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push(format!("| {} |", ScopedItem::COLUMNS.join(" | ")));
    lines.push(format!("|{}", "---|".repeat(ScopedItem::COLUMNS.len())));

    for item in items {
        let cells: Vec<String> = item.values().iter().map(|v| escape_cell(v)).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

/// 統計と全品目表をまとめたサマリー
pub fn build_workflow_summary(summary: &WorkflowSummary, items: &[ScopedItem]) -> String {
    let mut parts = vec![format!(
        "WORKFLOW STATISTICS:\n\
         - Items Processed: {}\n\
         - Vendor Mappings: {}\n\
         - Specifications Generated: {}\n\
         - Final Scope Items: {}",
        summary.total_items, summary.vendor_mappings, summary.specs_generated, summary.final_items
    )];

    if !items.is_empty() {
        parts.push(format!(
            "ALL PROCESSED ITEMS FOR SCOPE DOCUMENT:\n{}",
            render_items_table(items)
        ));
    }

    parts.join("\n\n")
}

/// 文字数上限で切り詰め（文字境界を守る）
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// スコープ文書生成プロンプト
///
/// # Arguments
/// * `request` - ユーザーの依頼文（空なら既定値）
/// * `rules` - プロジェクト規定文書
/// * `workflow_summary` - build_workflow_summaryの出力
/// * `rules_char_limit` - 規定文書の最大文字数
pub fn build_scope_prompt(
    request: &str,
    rules: &str,
    workflow_summary: &str,
    rules_char_limit: usize,
) -> String {
    let request = if request.trim().is_empty() { DEFAULT_REQUEST } else { request.trim() };

    let sections = SCOPE_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a senior procurement specialist. Create a comprehensive, professional procurement scope document that includes:

{sections}

CRITICAL REQUIREMENT: In section 4, include a complete table with EVERY item from the processed workflow data. Do not summarize or sample. Include all items with their specifications, recommended vendors, regions, contacts and lead times.

Format the output as professional Markdown with tables, bullet points and clear sections.

Based on the following processed procurement workflow data, please {request}.

PROJECT CONTEXT:
{rules}

PROCESSED WORKFLOW DATA:
{workflow_summary}
"#,
        rules = truncate_chars(rules, rules_char_limit),
    )
}

/// AI生成失敗時の代替文書
pub fn degraded_document(error: &str, workflow_summary: &str) -> String {
    format!(
        "Error generating AI-enhanced content: {}\n\nWorkflow Summary:\n{}",
        error, workflow_summary
    )
}
