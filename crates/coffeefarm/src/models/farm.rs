use serde::{Deserialize, Serialize};

use super::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FarmLocation {
    pub lat: f64,
    pub lng: f64,
}

/// Alternate coordinate spelling used by older farm records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: String,
    #[serde(default)]
    pub farm_code: Option<String>,
    #[serde(default, alias = "name")]
    pub farm_name: Option<String>,
    #[serde(default)]
    pub location: Option<FarmLocation>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub area_hectares: Option<f64>,
    #[serde(default, alias = "owner")]
    pub manager_name: Option<String>,
    #[serde(default, alias = "contact")]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Farm {
    pub fn display_name(&self) -> &str {
        self.farm_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.id)
    }

    /// Position from either coordinate spelling. Zero components count as
    /// missing, matching how unset coordinates are stored server-side.
    pub fn position(&self) -> Option<GeoPoint> {
        if let Some(loc) = self.location {
            if loc.lat != 0.0 && loc.lng != 0.0 {
                return Some(GeoPoint::new(loc.lat, loc.lng));
            }
        }
        if let Some(coords) = self.coordinates {
            if coords.latitude != 0.0 && coords.longitude != 0.0 {
                return Some(GeoPoint::new(coords.latitude, coords.longitude));
            }
        }
        None
    }

    /// Case-insensitive match on name, code or manager.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&self.farm_name, &self.farm_code, &self.manager_name]
            .iter()
            .filter_map(|field| field.as_deref())
            .any(|value| value.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFarm {
    pub farm_code: String,
    pub farm_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<FarmLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_hectares: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFarm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<FarmLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_hectares: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Response from `GET /farms/{id}/statistics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmStatistics {
    #[serde(default)]
    pub total_farmers: u32,
    #[serde(default)]
    pub active_farmers: u32,
    #[serde(default)]
    pub total_attendances_today: u32,
    #[serde(default)]
    pub total_attendances_month: u32,
    #[serde(default)]
    pub average_work_hours: f64,
}
