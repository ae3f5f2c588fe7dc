//! Wire types for the farm service REST API.
//!
//! Every response type is deserialized leniently: the backend omits or
//! renames fields between endpoints, so optional fields default instead of
//! failing the whole response.

pub mod attendance;
pub mod auth;
pub mod coffee;
pub mod face;
pub mod farm;
pub mod farmer;
pub mod statistics;
pub mod testdata;

pub use attendance::{
    Attendance, AttendanceQuery, AttendanceReceipt, AttendanceStats, AttendanceStatus,
    CheckInRequest, CheckOutRequest, HistoryQuery, TodayAttendance, TodayAttendances,
};
pub use auth::{LoginResponse, User};
pub use coffee::{
    AnalysisUpload, BeansMetrics, CoffeeBeansAnalysis, CoffeeLeavesAnalysis, DiseaseDetection,
    LeavesMetrics,
};
pub use face::{
    EnrollmentImages, FaceAngle, FaceEnrollResponse, FaceQualityResponse, FaceVerifyResponse,
    Pose, QualityDetails,
};
pub use farm::{Coordinates, CreateFarm, Farm, FarmLocation, FarmStatistics, UpdateFarm};
pub use farmer::{
    CreateFarmer, Farmer, FarmerAttendanceHistory, FarmerQuery, Gender, UpdateFarmer,
};
pub use statistics::{DashboardStatistics, SummaryStatistics, SystemMode};
pub use testdata::{ClearDataResponse, SampleDataResponse, SimulatedVerification, SystemStatistics};

use serde::{Deserialize, Serialize};

/// A point on the earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::str::FromStr for GeoPoint {
    type Err = String;

    /// Parses `"LAT,LNG"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG but got '{}'", s))?;
        let latitude: f64 = lat
            .trim()
            .parse()
            .map_err(|e| format!("invalid latitude '{}': {}", lat.trim(), e))?;
        let longitude: f64 = lng
            .trim()
            .parse()
            .map_err(|e| format!("invalid longitude '{}': {}", lng.trim(), e))?;
        let point = GeoPoint::new(latitude, longitude);
        if !point.is_valid() {
            return Err(format!("coordinates out of range: {}", s));
        }
        Ok(point)
    }
}
