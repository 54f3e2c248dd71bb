//! 対話式ベンダー確認モジュール
//!
//! 閾値未満で「No optimal match found」になった品目について、
//! 類似度順のベンダー候補から手動で割り当てる。

use crate::error::Result;
use crate::export::table::{read_records, write_records};
use dialoguer::Select;
use procure_scope_common::{rank_vendors, Item, ScopedItem, Vendor};
use std::path::Path;

/// 候補として表示するベンダー数
const MAX_CANDIDATES: usize = 5;

/// 確認が必要な品目のインデックス
pub fn extract_review_targets(items: &[ScopedItem]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.needs_review())
        .map(|(i, _)| i)
        .collect()
}

/// 選んだベンダーを品目に反映
pub fn apply_vendor(item: &mut ScopedItem, vendor: &Vendor, similarity_score: f64) {
    item.recommended_vendor = vendor.name.clone();
    item.vendor_region = vendor.region.clone();
    item.vendor_contact = vendor.contact_name.clone();
    item.vendor_email = vendor.contact_email.clone();
    item.lead_time_days = vendor.lead_time_days;
    item.vendor_certifications = vendor.certifications.clone();
    item.similarity_score = similarity_score;
}

/// 対話アクション
enum ReviewAction {
    Assign(usize, f64),
    Skip,
    Quit,
}

/// 対話式で確認
///
/// # Arguments
/// * `scoped_path` - scoped_items.csv
/// * `items` - 照合に使った品目（類似度順位の計算に使用）
/// * `vendors` - ベンダー一覧
/// * `output_path` - 出力先（Noneなら上書き）
pub fn run_interactive_review(
    scoped_path: &Path,
    items: &[Item],
    vendors: &[Vendor],
    output_path: Option<&Path>,
) -> Result<usize> {
    let mut scoped: Vec<ScopedItem> = read_records(scoped_path)?;
    let targets = extract_review_targets(&scoped);

    if targets.is_empty() {
        println!("✓ すべての品目にベンダーが割り当てられています");
        return Ok(0);
    }

    println!("🔍 ベンダー未割当の品目: {}件", targets.len());
    println!("---\n");

    let mut assigned = 0;
    for (n, &idx) in targets.iter().enumerate() {
        let item = &scoped[idx];
        println!(
            "[{}/{}] {} ({})",
            n + 1,
            targets.len(),
            item.item_name,
            if item.final_specification.is_empty() { "-" } else { item.final_specification.as_str() }
        );

        match prompt_action(item, items, vendors)? {
            ReviewAction::Assign(vendor_idx, score) => {
                apply_vendor(&mut scoped[idx], &vendors[vendor_idx], score);
                println!("  → {}\n", vendors[vendor_idx].name);
                assigned += 1;
            }
            ReviewAction::Skip => println!("  → スキップ\n"),
            ReviewAction::Quit => break,
        }
    }

    let output = output_path.unwrap_or(scoped_path);
    write_records(output, &ScopedItem::COLUMNS, &scoped)?;
    println!("✔ {}件を割り当てて保存: {}", assigned, output.display());

    Ok(assigned)
}

fn prompt_action(item: &ScopedItem, items: &[Item], vendors: &[Vendor]) -> Result<ReviewAction> {
    // 品目一覧にない場合は単独で順位付け
    let (ranking_items, item_index) = match items.iter().position(|i| i.name == item.item_name) {
        Some(pos) => (items.to_vec(), pos),
        None => (
            vec![Item {
                name: item.item_name.clone(),
                specification: item.final_specification.clone(),
            }],
            0,
        ),
    };

    let candidates: Vec<(usize, f64)> = rank_vendors(&ranking_items, vendors, item_index)?
        .into_iter()
        .take(MAX_CANDIDATES)
        .collect();

    let mut labels: Vec<String> = candidates
        .iter()
        .map(|(v, score)| format!("{} [{}] 類似度 {:.3}", vendors[*v].name, vendors[*v].region, score))
        .collect();
    labels.push("スキップ".to_string());
    labels.push("保存して終了".to_string());

    let selection = Select::new()
        .with_prompt("ベンダーを選択")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(match selection {
        s if s < candidates.len() => ReviewAction::Assign(candidates[s].0, candidates[s].1),
        s if s == candidates.len() => ReviewAction::Skip,
        _ => ReviewAction::Quit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use procure_scope_common::NO_MATCH_VENDOR;

    #[test]
    fn test_extract_review_targets() {
        let items = vec![
            ScopedItem {
                recommended_vendor: "AcmeSteel".to_string(),
                ..Default::default()
            },
            ScopedItem {
                recommended_vendor: NO_MATCH_VENDOR.to_string(),
                ..Default::default()
            },
        ];
        assert_eq!(extract_review_targets(&items), vec![1]);
    }

    #[test]
    fn test_apply_vendor() {
        let mut item = ScopedItem {
            item_name: "Tile".to_string(),
            recommended_vendor: NO_MATCH_VENDOR.to_string(),
            ..Default::default()
        };
        let vendor = Vendor {
            name: "TileCo".to_string(),
            region: "Europe".to_string(),
            lead_time_days: 14.5,
            certifications: "CE".to_string(),
            ..Default::default()
        };
        apply_vendor(&mut item, &vendor, 0.05);
        assert!(!item.needs_review());
        assert_eq!(item.vendor_region, "Europe");
        assert_eq!(item.lead_time_days, 14.5);
        assert_eq!(item.similarity_score, 0.05);
    }
}
