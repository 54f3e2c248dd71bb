//! 品目→ベンダー照合
//!
//! ## 処理フロー
//! 1. 品目文書（品名＋仕様）とベンダー文書（専門分野＋認証）を小文字化
//! 2. 全文書で共有のTF-IDF空間を学習
//! 3. 品目ごとに全ベンダーとのコサイン類似度を計算し最大を選ぶ
//!    （同点は入力順で先のベンダー）
//! 4. 閾値以上ならベンダー情報、未満なら代替値を出力
//!
//! 閾値未満でも類似度は実際の最大値を記録する。品目は決して落とさない。

use crate::error::{Error, Result};
use crate::tfidf::{cosine_similarity, TfidfSpace};
use crate::types::{round_score, Item, Vendor, VendorMapping, MANUAL_REVIEW, NO_MATCH_VENDOR, TBD};
use rayon::prelude::*;
use tracing::debug;

/// 品目の照合用テキスト
pub fn item_document(item: &Item) -> String {
    format!("{} {}", item.name, item.specification).to_lowercase()
}

/// ベンダーの照合用テキスト
pub fn vendor_document(vendor: &Vendor) -> String {
    format!("{} {}", vendor.expertise, vendor.certifications).to_lowercase()
}

/// 品目×ベンダーの類似度行列（丸め前）
///
/// ベンダーが空なら `Error::InsufficientData`。
pub fn similarity_matrix(items: &[Item], vendors: &[Vendor]) -> Result<Vec<Vec<f64>>> {
    if vendors.is_empty() {
        return Err(Error::InsufficientData(
            "vendor list is empty; similarity cannot be computed".to_string(),
        ));
    }

    let documents: Vec<String> = items
        .iter()
        .map(item_document)
        .chain(vendors.iter().map(vendor_document))
        .collect();

    let (space, vectors) = TfidfSpace::fit_transform(&documents);
    debug!(
        items = items.len(),
        vendors = vendors.len(),
        vocabulary = space.vocabulary_len(),
        "TF-IDF空間を学習"
    );

    let (item_vectors, vendor_vectors) = vectors.split_at(items.len());

    // par_iterでも出力順は入力順
    Ok(item_vectors
        .par_iter()
        .map(|iv| {
            vendor_vectors
                .iter()
                .map(|vv| cosine_similarity(iv, vv))
                .collect()
        })
        .collect())
}

/// 最大類似度のインデックス（同点は先勝ち）
pub fn best_index(similarities: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &score) in similarities.iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}

/// 品目ごとの推奨ベンダーを求める
///
/// # Arguments
/// * `items` - 品目（出力はこの順序で1件ずつ）
/// * `vendors` - ベンダー
/// * `threshold` - 採用閾値（0.0〜1.0）
pub fn match_vendors(items: &[Item], vendors: &[Vendor], threshold: f64) -> Result<Vec<VendorMapping>> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::InvalidThreshold(threshold));
    }
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let matrix = similarity_matrix(items, vendors)?;

    let mappings: Vec<VendorMapping> = items
        .iter()
        .zip(matrix.iter())
        .map(|(item, similarities)| {
            // vendorsが空でないので必ずSome
            let (idx, score) = best_index(similarities).unwrap_or((0, 0.0));
            build_mapping(item, &vendors[idx], score, threshold)
        })
        .collect();

    debug!(
        matched = mappings.iter().filter(|m| m.is_matched()).count(),
        total = mappings.len(),
        threshold,
        "ベンダー照合完了"
    );

    Ok(mappings)
}

/// 品目に対するベンダーの順位（類似度降順、同点は入力順）
pub fn rank_vendors(items: &[Item], vendors: &[Vendor], item_index: usize) -> Result<Vec<(usize, f64)>> {
    let matrix = similarity_matrix(items, vendors)?;
    let row = matrix
        .get(item_index)
        .ok_or_else(|| Error::Parse(format!("item index out of range: {}", item_index)))?;

    let mut ranked: Vec<(usize, f64)> = row.iter().copied().map(round_score).enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(ranked)
}

fn build_mapping(item: &Item, vendor: &Vendor, score: f64, threshold: f64) -> VendorMapping {
    let similarity_score = round_score(score);

    if score >= threshold {
        VendorMapping {
            item_name: item.name.clone(),
            item_specification: item.specification.clone(),
            recommended_vendor: vendor.name.clone(),
            vendor_region: vendor.region.clone(),
            vendor_contact: vendor.contact_name.clone(),
            vendor_email: vendor.contact_email.clone(),
            lead_time_days: vendor.lead_time_days,
            similarity_score,
            vendor_expertise: vendor.expertise.clone(),
            vendor_certifications: vendor.certifications.clone(),
        }
    } else {
        VendorMapping {
            item_name: item.name.clone(),
            item_specification: item.specification.clone(),
            recommended_vendor: NO_MATCH_VENDOR.to_string(),
            vendor_region: TBD.to_string(),
            vendor_contact: TBD.to_string(),
            vendor_email: TBD.to_string(),
            lead_time_days: 0.0,
            similarity_score,
            vendor_expertise: MANUAL_REVIEW.to_string(),
            vendor_certifications: MANUAL_REVIEW.to_string(),
        }
    }
}
