use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Working,
    Completed,
    #[serde(other)]
    Unknown,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Working => "working",
            AttendanceStatus::Completed => "completed",
            AttendanceStatus::Unknown => "unknown",
        }
    }
}

/// One working session, as returned by the attendance listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: String,
    pub farmer_id: String,
    #[serde(default)]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub check_in_location: Option<GeoPoint>,
    #[serde(default)]
    pub check_out_location: Option<GeoPoint>,
    #[serde(default, alias = "face_confidence")]
    pub check_in_face_score: Option<f64>,
    #[serde(default)]
    pub check_out_face_score: Option<f64>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub work_hours: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Attendance {
    pub fn is_open(&self) -> bool {
        self.status == AttendanceStatus::Working
    }
}

/// Row of `GET /attendance/today`, already joined with farmer and farm names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayAttendance {
    pub id: String,
    #[serde(default)]
    pub farmer_id: Option<String>,
    #[serde(default)]
    pub farmer_name: Option<String>,
    #[serde(default)]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub farm_name: Option<String>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub work_hours: Option<f64>,
    #[serde(default)]
    pub face_confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodayAttendances {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub attendances: Vec<TodayAttendance>,
}

impl TodayAttendances {
    pub fn active_count(&self) -> usize {
        self.attendances
            .iter()
            .filter(|a| a.status == AttendanceStatus::Working)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInRequest {
    pub farmer_id: String,
    pub farm_id: String,
    /// Base64 data URI.
    pub face_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutRequest {
    pub farmer_id: String,
    /// Base64 data URI.
    pub face_image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Response of check-in and check-out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub attendance_id: Option<String>,
    #[serde(default)]
    pub farmer_id: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub check_in_time: Option<String>,
    #[serde(default)]
    pub check_out_time: Option<String>,
    #[serde(default)]
    pub work_duration: Option<String>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farmer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceStats {
    #[serde(default)]
    pub total_attendances: u32,
    #[serde(default)]
    pub active_workers: u32,
    #[serde(default)]
    pub completed_shifts: u32,
    #[serde(default)]
    pub average_work_hours: f64,
}

/// Parses the backend's timestamps, which are RFC 3339 or naive ISO 8601
/// depending on which code path wrote the record.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// `HH:MM` of a backend timestamp, or the raw value when it does not parse.
pub fn format_clock_time(value: &str) -> String {
    parse_timestamp(value)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| value.to_string())
}
