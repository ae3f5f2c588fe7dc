use serde::{Deserialize, Serialize};

use crate::models::GeoPoint;

pub const DEFAULT_API_URL: &str = "http://kmou.n2nai.io:5200/api/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub check_in: CheckInConfig,
    #[serde(default)]
    pub enrollment: EnrollmentConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            http: HttpConfig::default(),
            cache: CacheConfig::default(),
            defaults: DefaultsConfig::default(),
            check_in: CheckInConfig::default(),
            enrollment: EnrollmentConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Image analysis runs inference server-side, so this is generous.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    120
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// How long an unused query result stays cached.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
}

fn default_cache_ttl() -> u64 {
    60
}

fn default_cache_entries() -> u64 {
    256
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_entries: default_cache_entries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsConfig {
    #[serde(default = "default_farm_id")]
    pub farm_id: String,
    #[serde(default = "default_field_id")]
    pub field_id: String,
}

fn default_farm_id() -> String {
    "default_farm".to_string()
}

fn default_field_id() -> String {
    "default_field".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            farm_id: default_farm_id(),
            field_id: default_field_id(),
        }
    }
}

/// Location attached to every check-in and check-out. This is a fixed
/// value, not a device reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInConfig {
    #[serde(default = "default_check_in_location")]
    pub location: GeoPoint,
}

fn default_check_in_location() -> GeoPoint {
    GeoPoint::new(10.7769, 106.7009)
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            location: default_check_in_location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentConfig {
    /// Captures scoring below this are rejected.
    #[serde(default = "default_min_quality")]
    pub min_quality_score: f64,
}

fn default_min_quality() -> f64 {
    0.7
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self {
            min_quality_score: default_min_quality(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Disease detections above this confidence get the high-confidence chip.
    #[serde(default = "default_high_confidence")]
    pub high_confidence_threshold: f64,
}

fn default_high_confidence() -> f64 {
    0.8
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            high_confidence_threshold: default_high_confidence(),
        }
    }
}
