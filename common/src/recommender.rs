//! 過去実績からの仕様推薦
//!
//! - 実績の品名に品目名を含む行（大文字小文字無視の部分一致）を抽出
//! - 最頻出の仕様を推薦、信頼度 = 最頻出件数 / 一致件数
//! - 一致なしなら現在の仕様を信頼度0.3で返す

use crate::types::{
    round_score, HistoricalRecord, Item, SpecRecommendation, FALLBACK_CONFIDENCE, UNSPECIFIED_CONFIDENCE,
};
use tracing::debug;

/// 品名の部分一致判定
///
/// 実績側の品名が空なら一致しない。品目名が空なら空でない実績全てに一致する。
pub fn name_contains(historical_name: &str, item_name: &str) -> bool {
    if historical_name.is_empty() {
        return false;
    }
    historical_name.to_lowercase().contains(&item_name.to_lowercase())
}

/// 最頻出の仕様とその件数（空文字は数えない、同点は先に出現した値）
pub fn most_frequent_spec<'a>(specs: impl Iterator<Item = &'a str>) -> Option<(&'a str, usize)> {
    // 出現順を保持するためVecで数える
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for spec in specs.filter(|s| !s.is_empty()) {
        match counts.iter_mut().find(|(value, _)| *value == spec) {
            Some((_, count)) => *count += 1,
            None => counts.push((spec, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }
    best
}

/// 1品目分の推薦
pub fn recommend_spec(item: &Item, historical: &[HistoricalRecord]) -> SpecRecommendation {
    let matches: Vec<&HistoricalRecord> = historical
        .iter()
        .filter(|h| name_contains(&h.item_name, &item.name))
        .collect();

    let (recommended, confidence) = if matches.is_empty() {
        (item.specification.clone(), FALLBACK_CONFIDENCE)
    } else {
        match most_frequent_spec(matches.iter().map(|h| h.specification.as_str())) {
            Some((spec, count)) => (spec.to_string(), count as f64 / matches.len() as f64),
            // 一致した実績の仕様が全て空
            None => (item.specification.clone(), UNSPECIFIED_CONFIDENCE),
        }
    };

    SpecRecommendation {
        item_name: item.name.clone(),
        current_specification: item.specification.clone(),
        recommended_specification: recommended,
        confidence_score: round_score(confidence),
        historical_matches: matches.len(),
    }
}

/// 品目ごとの推薦仕様を求める（出力は入力と同順・同数）
pub fn recommend_specs(items: &[Item], historical: &[HistoricalRecord]) -> Vec<SpecRecommendation> {
    let recommendations: Vec<SpecRecommendation> =
        items.iter().map(|item| recommend_spec(item, historical)).collect();

    debug!(
        items = items.len(),
        historical = historical.len(),
        with_history = recommendations.iter().filter(|r| r.historical_matches > 0).count(),
        "仕様推薦完了"
    );

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, spec: &str) -> Item {
        Item {
            name: name.to_string(),
            specification: spec.to_string(),
        }
    }

    fn record(name: &str, spec: &str) -> HistoricalRecord {
        HistoricalRecord {
            item_name: name.to_string(),
            specification: spec.to_string(),
        }
    }

    #[test]
    fn test_substring_matches() {
        let historical = vec![record("Steel Pipe A", "ASTM A53"), record("Steel Pipe B", "ASTM A53")];
        let recs = recommend_specs(&[item("Steel Pipe", "ASTM A106")], &historical);

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].recommended_specification, "ASTM A53");
        assert_eq!(recs[0].confidence_score, 1.0);
        assert_eq!(recs[0].historical_matches, 2);
        assert_eq!(recs[0].current_specification, "ASTM A106");
    }

    #[test]
    fn test_no_history_falls_back() {
        let recs = recommend_specs(&[item("Gasket", "ASME B16.20")], &[record("Steel Pipe", "ASTM A53")]);
        assert_eq!(recs[0].recommended_specification, "ASME B16.20");
        assert_eq!(recs[0].confidence_score, 0.3);
        assert_eq!(recs[0].historical_matches, 0);
    }

    #[test]
    fn test_empty_historical() {
        let items = vec![item("Gasket", "A"), item("Valve", "B")];
        let recs = recommend_specs(&items, &[]);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.confidence_score == 0.3));
    }

    #[test]
    fn test_case_insensitive() {
        let recs = recommend_specs(&[item("steel PIPE", "")], &[record("STEEL pipe 2in", "Sch 40")]);
        assert_eq!(recs[0].historical_matches, 1);
        assert_eq!(recs[0].recommended_specification, "Sch 40");
    }

    #[test]
    fn test_confidence_is_mode_ratio() {
        let historical = vec![
            record("Pipe", "A53"),
            record("Pipe", "A106"),
            record("Pipe", "A53"),
        ];
        let recs = recommend_specs(&[item("Pipe", "")], &historical);
        assert_eq!(recs[0].recommended_specification, "A53");
        assert_eq!(recs[0].confidence_score, 0.667);
    }

    #[test]
    fn test_mode_tie_first_encountered() {
        let historical = vec![record("Pipe", "A106"), record("Pipe", "A53")];
        let recs = recommend_specs(&[item("Pipe", "")], &historical);
        assert_eq!(recs[0].recommended_specification, "A106");
        assert_eq!(recs[0].confidence_score, 0.5);
    }

    #[test]
    fn test_blank_specs_count_as_matches_only() {
        let historical = vec![record("Pipe", ""), record("Pipe", "A53")];
        let recs = recommend_specs(&[item("Pipe", "")], &historical);
        assert_eq!(recs[0].recommended_specification, "A53");
        assert_eq!(recs[0].confidence_score, 0.5);
        assert_eq!(recs[0].historical_matches, 2);

        let recs = recommend_specs(&[item("Pipe", "Current")], &[record("Pipe", "")]);
        assert_eq!(recs[0].recommended_specification, "Current");
        assert_eq!(recs[0].confidence_score, 0.5);
    }

    #[test]
    fn test_name_contains_special_characters_literal() {
        assert!(name_contains("Fitting (C++) 2in", "(c++)"));
        assert!(!name_contains("", "pipe"));
        assert!(name_contains("anything", ""));
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let historical = vec![record("Pipe A", "X"), record("Pipe B", "Y"), record("Valve", "Z")];
        let items = vec![item("Pipe", ""), item("Valve", "")];
        assert_eq!(recommend_specs(&items, &historical), recommend_specs(&items, &historical));
    }
}
