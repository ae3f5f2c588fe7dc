//! Responses of the development-only seed/reset endpoints.

use serde::{Deserialize, Serialize};

use super::statistics::{FarmCounts, SystemInfo};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedCounts {
    #[serde(default)]
    pub farms_created: u32,
    #[serde(default)]
    pub farmers_created: u32,
    #[serde(default)]
    pub attendances_created: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleDataResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: CreatedCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveCounts {
    #[serde(default)]
    pub today: u32,
    #[serde(default)]
    pub active: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatistics {
    #[serde(default)]
    pub farms: FarmCounts,
    #[serde(default)]
    pub farmers: FarmCounts,
    #[serde(default)]
    pub attendances: ActiveCounts,
    #[serde(default)]
    pub system: SystemInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedVerification {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub farmer_id: Option<String>,
    #[serde(default)]
    pub farmer_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClearDataResponse {
    #[serde(default)]
    pub message: String,
}
