use reqwest::Method;
use serde::Serialize;

use crate::api::cache::{Tag, TagKind};
use crate::api::client::{json_body, ApiClient};
use crate::error::ApiError;
use crate::media::ImagePayload;
use crate::models::{
    EnrollmentImages, FaceAngle, FaceEnrollResponse, FaceQualityResponse, FaceVerifyResponse,
};

#[derive(Serialize)]
struct EnrollBody<'a> {
    farmer_id: &'a str,
    images: &'a EnrollmentImages,
}

#[derive(Serialize)]
struct VerifyBody {
    image: String,
}

#[derive(Serialize)]
struct QualityBody {
    image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_angle: Option<FaceAngle>,
}

impl ApiClient {
    pub async fn enroll_face(
        &self,
        farmer_id: &str,
        images: &EnrollmentImages,
    ) -> Result<FaceEnrollResponse, ApiError> {
        self.mutate(
            Method::POST,
            "/face/enroll",
            json_body(&EnrollBody { farmer_id, images })?,
            |response: &FaceEnrollResponse| {
                let id = response.farmer_id.as_deref().unwrap_or(farmer_id);
                vec![
                    Tag::entity(TagKind::Farmer, id),
                    Tag::list(TagKind::Farmer),
                    Tag::entity(TagKind::FaceEnrollment, id),
                ]
            },
        )
        .await
    }

    pub async fn verify_face(&self, image: &ImagePayload) -> Result<FaceVerifyResponse, ApiError> {
        let body = VerifyBody {
            image: image.to_data_uri(),
        };
        self.mutate(Method::POST, "/face/verify-json", json_body(&body)?, |_| {
            Vec::new()
        })
        .await
    }

    pub async fn check_face_quality(
        &self,
        image: &ImagePayload,
        expected_angle: Option<FaceAngle>,
    ) -> Result<FaceQualityResponse, ApiError> {
        let body = QualityBody {
            image: image.to_data_uri(),
            expected_angle,
        };
        self.mutate(Method::POST, "/face/quality-json", json_body(&body)?, |_| {
            Vec::new()
        })
        .await
    }

    pub async fn delete_face_enrollment(&self, farmer_id: &str) -> Result<(), ApiError> {
        self.execute(
            Method::DELETE,
            &format!("/face/farmer/{}", farmer_id),
            &[
                Tag::entity(TagKind::Farmer, farmer_id),
                Tag::list(TagKind::Farmer),
                Tag::entity(TagKind::FaceEnrollment, farmer_id),
            ],
        )
        .await
    }
}
