use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Form fields sent alongside an analysis image.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisUpload {
    pub farm_id: String,
    pub field_id: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeansMetrics {
    #[serde(default)]
    pub total_beans: u32,
    #[serde(default)]
    pub good_beans: Option<u32>,
    #[serde(default)]
    pub defect_beans: Option<u32>,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default, alias = "defect_counts")]
    pub defects_breakdown: BTreeMap<String, u32>,
    #[serde(default)]
    pub weight_estimate: Option<f64>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl BeansMetrics {
    pub fn good(&self) -> u32 {
        self.good_beans.unwrap_or(0)
    }

    pub fn defective(&self) -> u32 {
        self.defect_beans.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoffeeBeansAnalysis {
    pub id: String,
    #[serde(default)]
    pub analysis: BeansMetrics,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub field_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseDetection {
    pub disease: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeavesMetrics {
    #[serde(default)]
    pub total_leaves: u32,
    #[serde(default)]
    pub healthy_leaves: Option<u32>,
    #[serde(default)]
    pub infected_leaves: u32,
    #[serde(default)]
    pub health_score: f64,
    #[serde(default)]
    pub diseases_detected: Vec<DiseaseDetection>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl LeavesMetrics {
    /// Healthy count as reported, or derived from total minus infected.
    pub fn healthy(&self) -> u32 {
        self.healthy_leaves
            .unwrap_or_else(|| self.total_leaves.saturating_sub(self.infected_leaves))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoffeeLeavesAnalysis {
    pub id: String,
    #[serde(default)]
    pub analysis: LeavesMetrics,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub field_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn beans_accept_defect_counts_spelling() {
        let result: CoffeeBeansAnalysis = serde_json::from_value(json!({
            "id": "b1",
            "analysis": {
                "total_beans": 120,
                "quality_score": 86.5,
                "defect_counts": { "broken": 4, "black": 2 },
                "recommendations": ["Dry longer"]
            },
            "image_url": "https://example.com/b1.jpg"
        }))
        .unwrap();
        assert_eq!(result.analysis.defects_breakdown["broken"], 4);
        assert_eq!(result.analysis.good(), 0);
    }

    #[test]
    fn healthy_leaves_derived_when_absent() {
        let metrics = LeavesMetrics {
            total_leaves: 10,
            infected_leaves: 3,
            ..Default::default()
        };
        assert_eq!(metrics.healthy(), 7);
    }
}
