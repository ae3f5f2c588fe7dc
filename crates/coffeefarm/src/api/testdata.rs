//! Development-only seed and reset endpoints.

use reqwest::Method;
use serde::Serialize;

use crate::api::cache::{Tag, TagKind};
use crate::api::client::{ApiClient, RequestBody};
use crate::error::ApiError;
use crate::models::{ClearDataResponse, SampleDataResponse, SimulatedVerification, SystemStatistics};

#[derive(Serialize)]
struct SimulateParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    farmer_id: Option<&'a str>,
}

impl ApiClient {
    pub async fn create_sample_data(&self) -> Result<SampleDataResponse, ApiError> {
        self.mutate(
            Method::POST,
            "/test/create-sample-data",
            RequestBody::Empty,
            |_| {
                vec![
                    Tag::list(TagKind::Farmer),
                    Tag::list(TagKind::Farm),
                    Tag::list(TagKind::Attendance),
                ]
            },
        )
        .await
    }

    pub async fn system_statistics(&self) -> Result<SystemStatistics, ApiError> {
        self.fetch("/test/statistics", None::<&()>).await
    }

    pub async fn simulate_face_verify(
        &self,
        farmer_id: Option<&str>,
    ) -> Result<SimulatedVerification, ApiError> {
        self.mutate_with_params(
            Method::POST,
            "/test/simulate-face-verify",
            &SimulateParams { farmer_id },
            &[],
        )
        .await
    }

    pub async fn clear_all_data(&self) -> Result<ClearDataResponse, ApiError> {
        self.mutate(
            Method::DELETE,
            "/test/clear-all-data",
            RequestBody::Empty,
            |_| {
                vec![
                    Tag::list(TagKind::Farmer),
                    Tag::list(TagKind::Farm),
                    Tag::list(TagKind::Attendance),
                    Tag::list(TagKind::Performance),
                ]
            },
        )
        .await
    }
}
