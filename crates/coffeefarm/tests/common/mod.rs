//! Shared test utilities for coffeefarm integration tests.
//!
//! This module provides:
//! - `FakeBackend`, a scripted in-memory `FarmBackend` that records calls
//! - Fixture builders for farmers, farms and images
//! - `StubServer`, a loopback HTTP server that records what `ApiClient` sends

#![allow(dead_code)]

pub mod fixtures;
pub mod http;

pub use fixtures::*;

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use coffeefarm::api::FarmQuery;
use coffeefarm::models::{
    AnalysisUpload, Attendance, AttendanceReceipt, CheckInRequest, CheckOutRequest,
    CoffeeBeansAnalysis, CoffeeLeavesAnalysis, CreateFarmer, DashboardStatistics,
    EnrollmentImages, FaceAngle, FaceEnrollResponse, FaceQualityResponse, FaceVerifyResponse,
    Farm, Farmer, FarmerAttendanceHistory, FarmerQuery, LoginResponse, TodayAttendances,
    UpdateFarmer,
};
use coffeefarm::{ApiError, FarmBackend, ImagePayload, Session, Tag};

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub args: Value,
}

/// Backend whose answers are queued per method ahead of time.
///
/// A method without a queued answer fails with a transport error, so a test
/// that forgets to script a call sees it fail loudly.
pub struct FakeBackend {
    session: Session,
    replies: Mutex<HashMap<&'static str, VecDeque<Result<Value, ApiError>>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::with_session(Session::new())
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Queue a successful answer for `method`.
    pub fn reply(&self, method: &'static str, value: Value) -> &Self {
        self.push(method, Ok(value))
    }

    /// Queue a server rejection for `method`.
    pub fn reject(&self, method: &'static str, status: u16, detail: &str) -> &Self {
        self.push(
            method,
            Err(ApiError::Rejected {
                status,
                detail: (!detail.is_empty()).then(|| detail.to_string()),
            }),
        )
    }

    /// Queue a transport failure for `method`.
    pub fn fail(&self, method: &'static str, message: &str) -> &Self {
        self.push(method, Err(ApiError::Transport(message.to_string())))
    }

    fn push(&self, method: &'static str, reply: Result<Value, ApiError>) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls_to(method).len()
    }

    fn answer<T: DeserializeOwned>(&self, method: &'static str, args: Value) -> Result<T, ApiError> {
        self.calls.lock().unwrap().push(Call { method, args });
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ApiError::Transport(format!("no reply scripted for {}", method))))?;
        serde_json::from_value(reply).map_err(|e| ApiError::Decode {
            endpoint: method.to_string(),
            message: e.to_string(),
        })
    }
}

fn image_args(image: &ImagePayload) -> Value {
    json!({ "file_name": image.file_name(), "len": image.len() })
}

#[async_trait]
impl FarmBackend for FakeBackend {
    async fn login(&self, email: &str, _password: &SecretString) -> Result<LoginResponse, ApiError> {
        self.answer("login", json!({ "email": email }))
    }

    fn logout(&self) {
        self.calls.lock().unwrap().push(Call {
            method: "logout",
            args: Value::Null,
        });
        self.session.logout();
    }

    fn invalidate(&self, tags: &[Tag]) -> usize {
        let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
        self.calls.lock().unwrap().push(Call {
            method: "invalidate",
            args: json!(tags),
        });
        0
    }

    async fn list_farmers(&self, query: &FarmerQuery) -> Result<Vec<Farmer>, ApiError> {
        self.answer("list_farmers", json!(query))
    }

    async fn get_farmer(&self, id: &str) -> Result<Farmer, ApiError> {
        self.answer("get_farmer", json!({ "id": id }))
    }

    async fn create_farmer(&self, farmer: &CreateFarmer) -> Result<Farmer, ApiError> {
        self.answer("create_farmer", json!(farmer))
    }

    async fn update_farmer(&self, id: &str, update: &UpdateFarmer) -> Result<Farmer, ApiError> {
        self.answer("update_farmer", json!({ "id": id, "update": update }))
    }

    async fn delete_farmer(&self, id: &str) -> Result<(), ApiError> {
        self.answer("delete_farmer", json!({ "id": id }))
    }

    async fn farmer_attendances(&self, id: &str) -> Result<FarmerAttendanceHistory, ApiError> {
        self.answer("farmer_attendances", json!({ "id": id }))
    }

    async fn list_farms(&self, query: &FarmQuery) -> Result<Vec<Farm>, ApiError> {
        self.answer("list_farms", json!(query))
    }

    async fn today_attendance(&self, farm_id: Option<&str>) -> Result<TodayAttendances, ApiError> {
        self.answer("today_attendance", json!({ "farm_id": farm_id }))
    }

    async fn active_attendance(&self, farm_id: Option<&str>) -> Result<Vec<Attendance>, ApiError> {
        self.answer("active_attendance", json!({ "farm_id": farm_id }))
    }

    async fn check_in(&self, request: &CheckInRequest) -> Result<AttendanceReceipt, ApiError> {
        self.answer("check_in", json!(request))
    }

    async fn check_out(
        &self,
        attendance_id: &str,
        request: &CheckOutRequest,
    ) -> Result<AttendanceReceipt, ApiError> {
        self.answer(
            "check_out",
            json!({ "attendance_id": attendance_id, "request": request }),
        )
    }

    async fn verify_face(&self, image: &ImagePayload) -> Result<FaceVerifyResponse, ApiError> {
        self.answer("verify_face", image_args(image))
    }

    async fn check_face_quality(
        &self,
        image: &ImagePayload,
        expected_angle: Option<FaceAngle>,
    ) -> Result<FaceQualityResponse, ApiError> {
        let mut args = image_args(image);
        args["expected_angle"] = json!(expected_angle.map(|a| a.to_string()));
        self.answer("check_face_quality", args)
    }

    async fn enroll_face(
        &self,
        farmer_id: &str,
        images: &EnrollmentImages,
    ) -> Result<FaceEnrollResponse, ApiError> {
        self.answer(
            "enroll_face",
            json!({ "farmer_id": farmer_id, "images": images }),
        )
    }

    async fn delete_face_enrollment(&self, farmer_id: &str) -> Result<(), ApiError> {
        self.answer("delete_face_enrollment", json!({ "farmer_id": farmer_id }))
    }

    async fn analyze_beans(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeBeansAnalysis, ApiError> {
        let mut args = image_args(image);
        args["farm_id"] = json!(upload.farm_id);
        args["field_id"] = json!(upload.field_id);
        self.answer("analyze_beans", args)
    }

    async fn analyze_leaves(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeLeavesAnalysis, ApiError> {
        let mut args = image_args(image);
        args["farm_id"] = json!(upload.farm_id);
        args["field_id"] = json!(upload.field_id);
        self.answer("analyze_leaves", args)
    }

    async fn beans_history(&self) -> Result<Vec<CoffeeBeansAnalysis>, ApiError> {
        self.answer("beans_history", Value::Null)
    }

    async fn leaves_history(&self) -> Result<Vec<CoffeeLeavesAnalysis>, ApiError> {
        self.answer("leaves_history", Value::Null)
    }

    async fn get_beans_analysis(&self, id: &str) -> Result<CoffeeBeansAnalysis, ApiError> {
        self.answer("get_beans_analysis", json!({ "id": id }))
    }

    async fn get_leaves_analysis(&self, id: &str) -> Result<CoffeeLeavesAnalysis, ApiError> {
        self.answer("get_leaves_analysis", json!({ "id": id }))
    }

    async fn dashboard_statistics(&self) -> Result<DashboardStatistics, ApiError> {
        self.answer("dashboard_statistics", Value::Null)
    }
}
