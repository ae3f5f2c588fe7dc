use reqwest::Method;
use serde::Serialize;

use crate::api::cache::{Tag, TagId, TagKind};
use crate::api::client::{json_body, ApiClient};
use crate::error::ApiError;
use crate::models::{
    Attendance, AttendanceQuery, AttendanceReceipt, AttendanceStats, CheckInRequest,
    CheckOutRequest, HistoryQuery, TodayAttendances,
};

#[derive(Debug, Clone, Default, Serialize)]
struct FarmFilter<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    farm_id: Option<&'a str>,
}

fn open_attendance_tags() -> Vec<Tag> {
    vec![
        Tag::list(TagKind::Attendance),
        Tag::new(TagKind::Attendance, TagId::Today),
        Tag::new(TagKind::Attendance, TagId::Active),
    ]
}

impl ApiClient {
    pub async fn list_attendances(&self, query: &AttendanceQuery) -> Result<Vec<Attendance>, ApiError> {
        self.query("/attendance", Some(query), |rows: &Vec<Attendance>| {
            let mut tags: Vec<Tag> = rows
                .iter()
                .map(|a| Tag::entity(TagKind::Attendance, &a.id))
                .collect();
            tags.push(Tag::list(TagKind::Attendance));
            tags
        })
        .await
    }

    pub async fn get_attendance(&self, id: &str) -> Result<Attendance, ApiError> {
        self.query(&format!("/attendance/{}", id), None::<&()>, |_: &Attendance| {
            vec![Tag::entity(TagKind::Attendance, id)]
        })
        .await
    }

    pub async fn today_attendance(&self, farm_id: Option<&str>) -> Result<TodayAttendances, ApiError> {
        self.query(
            "/attendance/today",
            Some(&FarmFilter { farm_id }),
            |_: &TodayAttendances| vec![Tag::new(TagKind::Attendance, TagId::Today)],
        )
        .await
    }

    pub async fn active_attendance(&self, farm_id: Option<&str>) -> Result<Vec<Attendance>, ApiError> {
        self.query(
            "/attendance/active",
            Some(&FarmFilter { farm_id }),
            |_: &Vec<Attendance>| vec![Tag::new(TagKind::Attendance, TagId::Active)],
        )
        .await
    }

    pub async fn check_in(&self, request: &CheckInRequest) -> Result<AttendanceReceipt, ApiError> {
        self.mutate(
            Method::POST,
            "/attendance/check-in",
            json_body(request)?,
            |_| open_attendance_tags(),
        )
        .await
    }

    /// `attendance_id` is the open record being closed; it only scopes
    /// cache invalidation, the server finds the record by farmer.
    pub async fn check_out(
        &self,
        attendance_id: &str,
        request: &CheckOutRequest,
    ) -> Result<AttendanceReceipt, ApiError> {
        self.mutate(
            Method::POST,
            "/attendance/check-out",
            json_body(request)?,
            |_| {
                let mut tags = open_attendance_tags();
                tags.push(Tag::entity(TagKind::Attendance, attendance_id));
                tags
            },
        )
        .await
    }

    pub async fn attendance_statistics(&self, farm_id: Option<&str>) -> Result<AttendanceStats, ApiError> {
        self.fetch("/attendance/statistics", Some(&FarmFilter { farm_id }))
            .await
    }

    pub async fn attendance_history(&self, query: &HistoryQuery) -> Result<Vec<serde_json::Value>, ApiError> {
        self.query(
            "/attendance/history",
            Some(query),
            |_: &Vec<serde_json::Value>| vec![Tag::new(TagKind::Attendance, TagId::History)],
        )
        .await
    }
}
