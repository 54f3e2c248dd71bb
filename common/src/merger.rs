//! 照合結果と仕様推薦のマージ

use crate::types::{ScopedItem, SpecRecommendation, VendorMapping};
use std::collections::HashMap;

/// 照合結果ごとに最終スコープ品目を生成
///
/// 品名が完全一致する最初の推薦仕様を採用し、なければ照合結果の仕様のまま。
/// 出力は `mappings` と同順・同数。
pub fn merge_results(mappings: &[VendorMapping], specs: &[SpecRecommendation]) -> Vec<ScopedItem> {
    // 品名→推薦のマップ（重複時は先頭を優先）
    let mut spec_map: HashMap<&str, &SpecRecommendation> = HashMap::new();
    for spec in specs {
        spec_map.entry(spec.item_name.as_str()).or_insert(spec);
    }

    mappings
        .iter()
        .map(|mapping| {
            let final_specification = spec_map
                .get(mapping.item_name.as_str())
                .map(|s| s.recommended_specification.clone())
                .unwrap_or_else(|| mapping.item_specification.clone());

            ScopedItem {
                item_name: mapping.item_name.clone(),
                final_specification,
                recommended_vendor: mapping.recommended_vendor.clone(),
                vendor_region: mapping.vendor_region.clone(),
                vendor_contact: mapping.vendor_contact.clone(),
                vendor_email: mapping.vendor_email.clone(),
                lead_time_days: mapping.lead_time_days,
                vendor_certifications: mapping.vendor_certifications.clone(),
                similarity_score: mapping.similarity_score,
            }
        })
        .collect()
}
