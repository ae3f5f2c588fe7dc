use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemMode {
    Mock,
    #[default]
    Production,
    Firebase,
    #[serde(other)]
    Unknown,
}

impl SystemMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemMode::Mock => "mock",
            SystemMode::Production => "production",
            SystemMode::Firebase => "firebase",
            SystemMode::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmerCounts {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub active: u32,
    #[serde(default)]
    pub with_face_enrolled: u32,
    #[serde(default)]
    pub enrollment_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceCounts {
    #[serde(default)]
    pub today: u32,
    #[serde(default)]
    pub active: u32,
    #[serde(default)]
    pub checked_out_today: u32,
    #[serde(default)]
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmCounts {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub active: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub mode: SystemMode,
    #[serde(default)]
    pub face_service: SystemMode,
    #[serde(default)]
    pub database: SystemMode,
}

/// Response from `GET /statistics/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStatistics {
    #[serde(default)]
    pub farmers: FarmerCounts,
    #[serde(default)]
    pub attendances: AttendanceCounts,
    #[serde(default)]
    pub farms: FarmCounts,
    #[serde(default)]
    pub system: SystemInfo,
}

impl DashboardStatistics {
    pub fn is_mock(&self) -> bool {
        self.system.mode == SystemMode::Mock
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryBlock {
    #[serde(default)]
    pub total_entities: u32,
    #[serde(default)]
    pub system_health: String,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Response from `GET /statistics/summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    #[serde(flatten)]
    pub dashboard: DashboardStatistics,
    #[serde(default)]
    pub summary: SummaryBlock,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mock_mode_detected() {
        let stats: DashboardStatistics = serde_json::from_value(json!({
            "farmers": { "total": 3, "active": 3, "with_face_enrolled": 1, "enrollment_rate": 0.33 },
            "system": { "mode": "mock", "face_service": "mock", "database": "mock" }
        }))
        .unwrap();
        assert!(stats.is_mock());
        assert_eq!(stats.farmers.with_face_enrolled, 1);
        assert_eq!(stats.farms.total, 0);
    }

    #[test]
    fn summary_flattens_dashboard() {
        let stats: SummaryStatistics = serde_json::from_value(json!({
            "farms": { "total": 2, "active": 2 },
            "system": { "mode": "production", "database": "firebase" },
            "summary": { "total_entities": 9, "system_health": "healthy" }
        }))
        .unwrap();
        assert_eq!(stats.dashboard.farms.total, 2);
        assert_eq!(stats.dashboard.system.database, SystemMode::Firebase);
        assert_eq!(stats.summary.system_health, "healthy");
    }
}
