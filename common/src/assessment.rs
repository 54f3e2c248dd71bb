//! コスト見積・リスク評価
//!
//! スコープ品目に概算コストとリスク区分を付与する。

use crate::types::ScopedItem;
use serde::{Deserialize, Serialize};

/// 地域係数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMultiplier {
    pub region: String,
    pub multiplier: f64,
}

/// コスト係数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostFactors {
    pub base_cost_per_item: f64,
    /// 先頭から順に照合する
    pub region_multipliers: Vec<RegionMultiplier>,
}

impl Default for CostFactors {
    fn default() -> Self {
        let region = |region: &str, multiplier: f64| RegionMultiplier {
            region: region.to_string(),
            multiplier,
        };
        Self {
            base_cost_per_item: 1000.0,
            region_multipliers: vec![
                region("USA", 1.2),
                region("Europe", 1.1),
                region("Asia", 0.9),
                region("Middle East", 1.0),
            ],
        }
    }
}

impl CostFactors {
    /// ベンダー地域に一致する係数（部分一致・大文字小文字無視、なければ1.0）
    pub fn multiplier_for(&self, region: &str) -> f64 {
        let region = region.to_lowercase();
        self.region_multipliers
            .iter()
            .find(|m| region.contains(&m.region.to_lowercase()))
            .map(|m| m.multiplier)
            .unwrap_or(1.0)
    }

    pub fn estimate(&self, region: &str) -> f64 {
        ((self.base_cost_per_item * self.multiplier_for(region)) * 100.0).round() / 100.0
    }
}

/// リスク区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// リードタイムのリスク
pub fn time_risk(lead_time_days: f64) -> RiskLevel {
    if lead_time_days > 60.0 {
        RiskLevel::High
    } else if lead_time_days > 30.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// ベンダー適合度のリスク
pub fn vendor_risk(similarity_score: f64) -> RiskLevel {
    if similarity_score > 0.7 {
        RiskLevel::Low
    } else if similarity_score > 0.4 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// コスト・リスク付きスコープ品目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedItem {
    #[serde(flatten)]
    pub item: ScopedItem,
    #[serde(rename = "Estimated Cost (USD)")]
    pub estimated_cost_usd: f64,
    #[serde(rename = "Time Risk")]
    pub time_risk: RiskLevel,
    #[serde(rename = "Vendor Risk")]
    pub vendor_risk: RiskLevel,
    #[serde(rename = "Overall Risk")]
    pub overall_risk: RiskLevel,
}

impl AnnotatedItem {
    pub const EXTRA_COLUMNS: [&'static str; 4] =
        ["Estimated Cost (USD)", "Time Risk", "Vendor Risk", "Overall Risk"];

    /// 表出力の列名（ScopedItemの列＋付与列）
    pub fn columns() -> Vec<&'static str> {
        ScopedItem::COLUMNS
            .iter()
            .chain(Self::EXTRA_COLUMNS.iter())
            .copied()
            .collect()
    }

    pub fn values(&self) -> Vec<String> {
        let mut values = self.item.values().to_vec();
        values.push(format!("{:.2}", self.estimated_cost_usd));
        values.push(self.time_risk.to_string());
        values.push(self.vendor_risk.to_string());
        values.push(self.overall_risk.to_string());
        values
    }
}

/// 1品目を評価
pub fn annotate(item: &ScopedItem, factors: &CostFactors) -> AnnotatedItem {
    let time = time_risk(item.lead_time_days);
    let vendor = vendor_risk(item.similarity_score);

    AnnotatedItem {
        item: item.clone(),
        estimated_cost_usd: factors.estimate(&item.vendor_region),
        time_risk: time,
        vendor_risk: vendor,
        // High > Medium > Low の順で厳しい方
        overall_risk: time.max(vendor),
    }
}

/// 全品目を評価
pub fn annotate_all(items: &[ScopedItem], factors: &CostFactors) -> Vec<AnnotatedItem> {
    items.iter().map(|item| annotate(item, factors)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(region: &str, lead: f64, score: f64) -> ScopedItem {
        ScopedItem {
            item_name: "Pipe".to_string(),
            vendor_region: region.to_string(),
            lead_time_days: lead,
            similarity_score: score,
            ..Default::default()
        }
    }

    #[test]
    fn test_region_multiplier() {
        let factors = CostFactors::default();
        assert_eq!(factors.estimate("USA"), 1200.0);
        assert_eq!(factors.estimate("Western Europe"), 1100.0);
        assert_eq!(factors.estimate("southeast asia"), 900.0);
        assert_eq!(factors.estimate("TBD"), 1000.0);
    }

    #[test]
    fn test_time_risk_boundaries() {
        assert_eq!(time_risk(30.0), RiskLevel::Low);
        assert_eq!(time_risk(31.0), RiskLevel::Medium);
        assert_eq!(time_risk(60.0), RiskLevel::Medium);
        assert_eq!(time_risk(61.0), RiskLevel::High);
    }

    #[test]
    fn test_time_risk_fractional_days() {
        assert_eq!(time_risk(30.4), RiskLevel::Medium);
        assert_eq!(time_risk(29.9), RiskLevel::Low);
        assert_eq!(time_risk(60.4), RiskLevel::High);
        assert_eq!(time_risk(59.6), RiskLevel::Medium);

        let annotated = annotate(&scoped("Asia", 30.4, 0.9), &CostFactors::default());
        assert_eq!(annotated.time_risk, RiskLevel::Medium);
        assert_eq!(annotated.overall_risk, RiskLevel::Medium);
        assert_eq!(annotated.values()[6], "30.4");
    }

    #[test]
    fn test_vendor_risk_boundaries() {
        assert_eq!(vendor_risk(0.71), RiskLevel::Low);
        assert_eq!(vendor_risk(0.7), RiskLevel::Medium);
        assert_eq!(vendor_risk(0.4), RiskLevel::High);
    }

    #[test]
    fn test_overall_risk() {
        let factors = CostFactors::default();
        assert_eq!(annotate(&scoped("Asia", 10.0, 0.9), &factors).overall_risk, RiskLevel::Low);
        assert_eq!(annotate(&scoped("Asia", 45.0, 0.9), &factors).overall_risk, RiskLevel::Medium);
        assert_eq!(annotate(&scoped("Asia", 10.0, 0.1), &factors).overall_risk, RiskLevel::High);
    }

    #[test]
    fn test_annotated_values_follow_columns() {
        let annotated = annotate(&scoped("USA", 90.0, 0.5), &CostFactors::default());
        let values = annotated.values();
        assert_eq!(values.len(), AnnotatedItem::columns().len());
        assert_eq!(values[9], "1200.00");
        assert_eq!(values[10], "High");
        assert_eq!(values[11], "Medium");
        assert_eq!(values[12], "High");
    }

    #[test]
    fn test_annotated_json_is_flat() {
        let annotated = annotate(&scoped("USA", 10.0, 0.9), &CostFactors::default());
        let json = serde_json::to_value(&annotated).unwrap();
        assert_eq!(json["Item Name"], "Pipe");
        assert_eq!(json["Overall Risk"], "Low");
    }
}
