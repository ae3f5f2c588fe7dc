//! Coffee beans and leaves analysis: one upload, one result view.

use std::sync::Arc;

use log::info;

use crate::api::FarmBackend;
use crate::error::FlowError;
use crate::media::ImagePayload;
use crate::models::{AnalysisUpload, CoffeeBeansAnalysis, CoffeeLeavesAnalysis, DiseaseDetection};

pub const ANALYSIS_NOT_FOUND: &str = "Analysis not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisKind {
    Beans,
    Leaves,
}

impl AnalysisKind {
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisKind::Beans => "Coffee Beans Analysis",
            AnalysisKind::Leaves => "Coffee Leaves Analysis",
        }
    }

    fn failure(&self) -> &'static str {
        match self {
            AnalysisKind::Beans => "Failed to analyze coffee beans",
            AnalysisKind::Leaves => "Failed to analyze coffee leaves",
        }
    }
}

impl std::str::FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beans" => Ok(AnalysisKind::Beans),
            "leaves" => Ok(AnalysisKind::Leaves),
            other => Err(format!("unknown analysis '{}' (expected beans or leaves)", other)),
        }
    }
}

/// Color band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Good
        } else if score >= 60.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::Poor => "Poor",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ScoreBand::Good => "#10B981",
            ScoreBand::Fair => "#F59E0B",
            ScoreBand::Poor => "#EF4444",
        }
    }
}

/// Chip style for a disease detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Moderate,
}

impl ConfidenceLevel {
    /// `High` only strictly above `threshold`.
    pub fn classify(confidence: f64, threshold: f64) -> Self {
        if confidence > threshold {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Moderate
        }
    }
}

/// One counted category with its share of the total.
#[derive(Debug, Clone, PartialEq)]
pub struct CountRow {
    pub label: &'static str,
    pub count: u32,
    pub percent: f64,
}

fn share(count: u32, total: u32) -> f64 {
    f64::from(count) * 100.0 / f64::from(total.max(1))
}

/// A result ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisView {
    Beans(CoffeeBeansAnalysis),
    Leaves(CoffeeLeavesAnalysis),
}

impl AnalysisView {
    pub fn id(&self) -> &str {
        match self {
            AnalysisView::Beans(a) => &a.id,
            AnalysisView::Leaves(a) => &a.id,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisView::Beans(_) => AnalysisKind::Beans,
            AnalysisView::Leaves(_) => AnalysisKind::Leaves,
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        let (timestamp, created_at) = match self {
            AnalysisView::Beans(a) => (&a.timestamp, &a.created_at),
            AnalysisView::Leaves(a) => (&a.timestamp, &a.created_at),
        };
        timestamp.as_deref().or(created_at.as_deref())
    }

    /// Quality score for beans, health score for leaves.
    pub fn score(&self) -> f64 {
        match self {
            AnalysisView::Beans(a) => a.analysis.quality_score,
            AnalysisView::Leaves(a) => a.analysis.health_score,
        }
    }

    pub fn score_text(&self) -> String {
        format!("{:.1}%", self.score())
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score())
    }

    pub fn total(&self) -> u32 {
        match self {
            AnalysisView::Beans(a) => a.analysis.total_beans,
            AnalysisView::Leaves(a) => a.analysis.total_leaves,
        }
    }

    pub fn counts(&self) -> Vec<CountRow> {
        let total = self.total();
        let rows: [(&'static str, u32); 2] = match self {
            AnalysisView::Beans(a) => [
                ("Good", a.analysis.good()),
                ("Defective", a.analysis.defective()),
            ],
            AnalysisView::Leaves(a) => [
                ("Healthy", a.analysis.healthy()),
                ("Infected", a.analysis.infected_leaves),
            ],
        };
        rows.into_iter()
            .map(|(label, count)| CountRow {
                label,
                count,
                percent: share(count, total),
            })
            .collect()
    }

    /// Defect name and count, beans only.
    pub fn defects(&self) -> Vec<(&str, u32)> {
        match self {
            AnalysisView::Beans(a) => a
                .analysis
                .defects_breakdown
                .iter()
                .map(|(name, count)| (name.as_str(), *count))
                .collect(),
            AnalysisView::Leaves(_) => Vec::new(),
        }
    }

    /// Detected diseases with their chip style, leaves only.
    pub fn diseases(&self, threshold: f64) -> Vec<(&DiseaseDetection, ConfidenceLevel)> {
        match self {
            AnalysisView::Leaves(a) => a
                .analysis
                .diseases_detected
                .iter()
                .map(|d| (d, ConfidenceLevel::classify(d.confidence, threshold)))
                .collect(),
            AnalysisView::Beans(_) => Vec::new(),
        }
    }

    pub fn recommendations(&self) -> &[String] {
        match self {
            AnalysisView::Beans(a) => &a.analysis.recommendations,
            AnalysisView::Leaves(a) => &a.analysis.recommendations,
        }
    }
}

pub struct AnalysisScreen<B: FarmBackend> {
    backend: Arc<B>,
    kind: AnalysisKind,
    pub upload: AnalysisUpload,
    high_confidence: f64,
}

impl<B: FarmBackend> AnalysisScreen<B> {
    pub fn new(
        backend: Arc<B>,
        kind: AnalysisKind,
        upload: AnalysisUpload,
        high_confidence: f64,
    ) -> Self {
        Self {
            backend,
            kind,
            upload,
            high_confidence,
        }
    }

    pub fn kind(&self) -> AnalysisKind {
        self.kind
    }

    pub fn high_confidence(&self) -> f64 {
        self.high_confidence
    }

    pub async fn analyze(&self, image: &ImagePayload) -> Result<AnalysisView, FlowError> {
        let view = match self.kind {
            AnalysisKind::Beans => self
                .backend
                .analyze_beans(image, &self.upload)
                .await
                .map(AnalysisView::Beans),
            AnalysisKind::Leaves => self
                .backend
                .analyze_leaves(image, &self.upload)
                .await
                .map(AnalysisView::Leaves),
        }
        .map_err(|e| FlowError::api(e, self.kind.failure()))?;
        info!("{} result {} scored {}", self.kind.title(), view.id(), view.score_text());
        Ok(view)
    }

    pub async fn history(&self) -> Result<Vec<AnalysisView>, FlowError> {
        let views = match self.kind {
            AnalysisKind::Beans => self
                .backend
                .beans_history()
                .await
                .map(|items| items.into_iter().map(AnalysisView::Beans).collect()),
            AnalysisKind::Leaves => self
                .backend
                .leaves_history()
                .await
                .map(|items| items.into_iter().map(AnalysisView::Leaves).collect()),
        };
        views.map_err(|e| FlowError::api(e, "Failed to load analysis history"))
    }

    /// `Ok(None)` when the server does not know `id`.
    pub async fn get(&self, id: &str) -> Result<Option<AnalysisView>, FlowError> {
        let view = match self.kind {
            AnalysisKind::Beans => self
                .backend
                .get_beans_analysis(id)
                .await
                .map(AnalysisView::Beans),
            AnalysisKind::Leaves => self
                .backend
                .get_leaves_analysis(id)
                .await
                .map(AnalysisView::Leaves),
        };
        match view {
            Ok(view) => Ok(Some(view)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(FlowError::api(e, ANALYSIS_NOT_FOUND)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn beans(total: u32, good: u32, defect: u32, score: f64) -> AnalysisView {
        AnalysisView::Beans(
            serde_json::from_value(json!({
                "id": "b1",
                "analysis": {
                    "total_beans": total,
                    "good_beans": good,
                    "defect_beans": defect,
                    "quality_score": score,
                    "defects_breakdown": { "broken": defect }
                }
            }))
            .unwrap(),
        )
    }

    #[test]
    fn bands() {
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(79.9), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(59.99), ScoreBand::Poor);
        assert_eq!(ScoreBand::Poor.color(), "#EF4444");
    }

    #[test]
    fn confidence_is_strictly_above_threshold() {
        assert_eq!(ConfidenceLevel::classify(0.81, 0.8), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::classify(0.8, 0.8), ConfidenceLevel::Moderate);
    }

    #[test]
    fn bean_shares_and_score_text() {
        let view = beans(200, 150, 50, 86.54);
        let rows = view.counts();
        assert_eq!(rows[0].count, 150);
        assert!((rows[0].percent - 75.0).abs() < 1e-9);
        assert!((rows[1].percent - 25.0).abs() < 1e-9);
        assert_eq!(view.score_text(), "86.5%");
        assert_eq!(view.band(), ScoreBand::Good);
        assert_eq!(view.defects(), vec![("broken", 50)]);
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        let view = beans(0, 0, 0, 0.0);
        assert!(view.counts().iter().all(|r| r.percent == 0.0));
    }

    #[test]
    fn leaves_disease_chips() {
        let view = AnalysisView::Leaves(
            serde_json::from_value(json!({
                "id": "l1",
                "analysis": {
                    "total_leaves": 10,
                    "infected_leaves": 4,
                    "health_score": 61.0,
                    "diseases_detected": [
                        { "disease": "rust", "confidence": 0.93, "severity": "high" },
                        { "disease": "cercospora", "confidence": 0.55 }
                    ]
                }
            }))
            .unwrap(),
        );
        let chips = view.diseases(0.8);
        assert_eq!(chips[0].1, ConfidenceLevel::High);
        assert_eq!(chips[1].1, ConfidenceLevel::Moderate);
        assert_eq!(view.counts()[0].count, 6);
        assert_eq!(view.band(), ScoreBand::Fair);
    }

    #[test]
    fn parse_kind() {
        assert_eq!("Beans".parse::<AnalysisKind>(), Ok(AnalysisKind::Beans));
        assert!("roots".parse::<AnalysisKind>().is_err());
    }
}
