use reqwest::Method;

use crate::api::cache::{Tag, TagKind};
use crate::api::client::{json_body, ApiClient};
use crate::error::ApiError;
use crate::models::{CreateFarmer, Farmer, FarmerAttendanceHistory, FarmerQuery, UpdateFarmer};

impl ApiClient {
    pub async fn list_farmers(&self, query: &FarmerQuery) -> Result<Vec<Farmer>, ApiError> {
        self.query("/farmers/", Some(query), |farmers: &Vec<Farmer>| {
            let mut tags: Vec<Tag> = farmers
                .iter()
                .map(|f| Tag::entity(TagKind::Farmer, &f.id))
                .collect();
            tags.push(Tag::list(TagKind::Farmer));
            tags
        })
        .await
    }

    pub async fn get_farmer(&self, id: &str) -> Result<Farmer, ApiError> {
        self.query(&format!("/farmers/{}", id), None::<&()>, |_: &Farmer| {
            vec![Tag::entity(TagKind::Farmer, id)]
        })
        .await
    }

    pub async fn create_farmer(&self, farmer: &CreateFarmer) -> Result<Farmer, ApiError> {
        self.mutate(Method::POST, "/farmers/", json_body(farmer)?, |_| {
            vec![Tag::list(TagKind::Farmer)]
        })
        .await
    }

    pub async fn update_farmer(&self, id: &str, update: &UpdateFarmer) -> Result<Farmer, ApiError> {
        self.mutate(
            Method::PUT,
            &format!("/farmers/{}", id),
            json_body(update)?,
            |_| vec![Tag::entity(TagKind::Farmer, id), Tag::list(TagKind::Farmer)],
        )
        .await
    }

    pub async fn delete_farmer(&self, id: &str) -> Result<(), ApiError> {
        self.execute(
            Method::DELETE,
            &format!("/farmers/{}", id),
            &[Tag::entity(TagKind::Farmer, id), Tag::list(TagKind::Farmer)],
        )
        .await
    }

    pub async fn farmer_embeddings(&self, id: &str) -> Result<Vec<serde_json::Value>, ApiError> {
        self.query(
            &format!("/farmers/{}/embeddings", id),
            None::<&()>,
            |_: &Vec<serde_json::Value>| vec![Tag::entity(TagKind::FaceEnrollment, id)],
        )
        .await
    }

    pub async fn farmer_attendances(&self, id: &str) -> Result<FarmerAttendanceHistory, ApiError> {
        self.query(
            &format!("/farmers/{}/attendances", id),
            None::<&()>,
            |_: &FarmerAttendanceHistory| vec![Tag::all(TagKind::Attendance)],
        )
        .await
    }
}
