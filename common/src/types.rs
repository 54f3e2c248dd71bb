//! 調達データの型定義
//!
//! 入力レコード:
//! - Item: 品目（BOM）
//! - Vendor: ベンダーマスタ
//! - HistoricalRecord: 過去の調達実績
//!
//! 出力レコード:
//! - VendorMapping: 照合結果
//! - SpecRecommendation: 仕様推薦結果
//! - ScopedItem: 最終スコープ（照合+推薦をマージ）
//!
//! serdeの列名は表出力の列名と一致させている。

use serde::{Deserialize, Serialize};

/// 閾値未満のときのベンダー名
pub const NO_MATCH_VENDOR: &str = "No optimal match found";
/// 閾値未満のときの地域・連絡先
pub const TBD: &str = "TBD";
/// 閾値未満のときの専門分野・認証
pub const MANUAL_REVIEW: &str = "Manual review required";
/// 過去実績がない場合の信頼度
pub const FALLBACK_CONFIDENCE: f64 = 0.3;
/// 実績はあるが仕様が全て空の場合の信頼度
pub const UNSPECIFIED_CONFIDENCE: f64 = 0.5;

/// 品目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "Item Name")]
    pub name: String,
    #[serde(rename = "Specification")]
    pub specification: String,
}

/// ベンダー
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(rename = "Vendor Name")]
    pub name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Contact Name")]
    pub contact_name: String,
    #[serde(rename = "Contact Email")]
    pub contact_email: String,
    #[serde(rename = "Avg Lead Time (days)")]
    pub lead_time_days: f64,
    #[serde(rename = "Expertise")]
    pub expertise: String,
    #[serde(rename = "Certifications")]
    pub certifications: String,
}

/// 過去の調達実績
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Specification")]
    pub specification: String,
}

/// 品目→ベンダー照合結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorMapping {
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Item Specification")]
    pub item_specification: String,
    #[serde(rename = "Recommended Vendor")]
    pub recommended_vendor: String,
    #[serde(rename = "Vendor Region")]
    pub vendor_region: String,
    #[serde(rename = "Vendor Contact")]
    pub vendor_contact: String,
    #[serde(rename = "Vendor Email")]
    pub vendor_email: String,
    #[serde(rename = "Vendor Lead Time")]
    pub lead_time_days: f64,
    #[serde(rename = "Similarity Score")]
    pub similarity_score: f64,
    #[serde(rename = "Vendor Expertise")]
    pub vendor_expertise: String,
    #[serde(rename = "Vendor Certifications")]
    pub vendor_certifications: String,
}

impl VendorMapping {
    /// 表出力の列名
    pub const COLUMNS: [&'static str; 10] = [
        "Item Name",
        "Item Specification",
        "Recommended Vendor",
        "Vendor Region",
        "Vendor Contact",
        "Vendor Email",
        "Vendor Lead Time",
        "Similarity Score",
        "Vendor Expertise",
        "Vendor Certifications",
    ];

    /// 閾値以上でベンダーが割り当てられたか
    pub fn is_matched(&self) -> bool {
        self.recommended_vendor != NO_MATCH_VENDOR
    }
}

/// 仕様推薦結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecRecommendation {
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Current Specification")]
    pub current_specification: String,
    #[serde(rename = "Recommended Specification")]
    pub recommended_specification: String,
    #[serde(rename = "Confidence Score")]
    pub confidence_score: f64,
    #[serde(rename = "Historical Matches")]
    pub historical_matches: usize,
}

impl SpecRecommendation {
    pub const COLUMNS: [&'static str; 5] = [
        "Item Name",
        "Current Specification",
        "Recommended Specification",
        "Confidence Score",
        "Historical Matches",
    ];
}

/// 最終スコープ品目（列順は表出力の順序）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopedItem {
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Final Specification")]
    pub final_specification: String,
    #[serde(rename = "Recommended Vendor")]
    pub recommended_vendor: String,
    #[serde(rename = "Vendor Region")]
    pub vendor_region: String,
    #[serde(rename = "Vendor Contact")]
    pub vendor_contact: String,
    #[serde(rename = "Vendor Email")]
    pub vendor_email: String,
    #[serde(rename = "Lead Time (days)")]
    pub lead_time_days: f64,
    #[serde(rename = "Vendor Certifications")]
    pub vendor_certifications: String,
    #[serde(rename = "Similarity Score")]
    pub similarity_score: f64,
}

impl ScopedItem {
    /// 表出力の列名
    pub const COLUMNS: [&'static str; 9] = [
        "Item Name",
        "Final Specification",
        "Recommended Vendor",
        "Vendor Region",
        "Vendor Contact",
        "Vendor Email",
        "Lead Time (days)",
        "Vendor Certifications",
        "Similarity Score",
    ];

    /// COLUMNSと同じ順序で値を文字列化
    pub fn values(&self) -> [String; 9] {
        [
            self.item_name.clone(),
            self.final_specification.clone(),
            self.recommended_vendor.clone(),
            self.vendor_region.clone(),
            self.vendor_contact.clone(),
            self.vendor_email.clone(),
            format!("{}", self.lead_time_days),
            self.vendor_certifications.clone(),
            format!("{}", self.similarity_score),
        ]
    }

    pub fn needs_review(&self) -> bool {
        self.recommended_vendor == NO_MATCH_VENDOR
    }
}

/// ワークフロー実行の統計
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub total_items: usize,
    pub vendor_mappings: usize,
    pub specs_generated: usize,
    pub final_items: usize,
    /// RFC 3339
    pub completion_time: String,
}

/// スコアを[0,1]に収めて小数第3位で丸める
pub fn round_score(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123456), 0.123);
        assert_eq!(round_score(0.9996), 1.0);
        assert_eq!(round_score(1.0000002), 1.0);
        assert_eq!(round_score(-0.0001), 0.0);
        assert_eq!(round_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_scoped_item_values_follow_columns() {
        let item = ScopedItem {
            item_name: "Steel Pipe".to_string(),
            lead_time_days: 20.0,
            similarity_score: 0.25,
            ..Default::default()
        };
        let values = item.values();
        assert_eq!(values.len(), ScopedItem::COLUMNS.len());
        assert_eq!(values[0], "Steel Pipe");
        assert_eq!(values[6], "20");
        assert_eq!(values[8], "0.25");

        let fractional = ScopedItem {
            lead_time_days: 30.4,
            ..Default::default()
        };
        assert_eq!(fractional.values()[6], "30.4");
    }

    #[test]
    fn test_scoped_item_serializes_with_column_names() {
        let item = ScopedItem::default();
        let json = serde_json::to_value(&item).unwrap();
        for column in ScopedItem::COLUMNS {
            assert!(json.get(column).is_some(), "列がない: {}", column);
        }
    }

    #[test]
    fn test_record_columns_match_serde_names() {
        let mapping = serde_json::to_value(VendorMapping::default()).unwrap();
        for column in VendorMapping::COLUMNS {
            assert!(mapping.get(column).is_some(), "列がない: {}", column);
        }
        let spec = serde_json::to_value(SpecRecommendation::default()).unwrap();
        for column in SpecRecommendation::COLUMNS {
            assert!(spec.get(column).is_some(), "列がない: {}", column);
        }
    }

    #[test]
    fn test_mapping_is_matched() {
        let mut mapping = VendorMapping {
            recommended_vendor: NO_MATCH_VENDOR.to_string(),
            ..Default::default()
        };
        assert!(!mapping.is_matched());
        mapping.recommended_vendor = "AcmeSteel".to_string();
        assert!(mapping.is_matched());
    }
}
