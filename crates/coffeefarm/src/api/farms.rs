use reqwest::Method;
use serde::Serialize;

use crate::api::cache::{Tag, TagKind};
use crate::api::client::{json_body, ApiClient};
use crate::error::ApiError;
use crate::models::{CreateFarm, Farm, FarmStatistics, UpdateFarm};

#[derive(Debug, Clone, Default, Serialize)]
pub struct FarmQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ApiClient {
    pub async fn list_farms(&self, query: &FarmQuery) -> Result<Vec<Farm>, ApiError> {
        self.query("/farms", Some(query), |farms: &Vec<Farm>| {
            let mut tags: Vec<Tag> = farms
                .iter()
                .map(|f| Tag::entity(TagKind::Farm, &f.id))
                .collect();
            tags.push(Tag::list(TagKind::Farm));
            tags
        })
        .await
    }

    pub async fn get_farm(&self, id: &str) -> Result<Farm, ApiError> {
        self.query(&format!("/farms/{}", id), None::<&()>, |_: &Farm| {
            vec![Tag::entity(TagKind::Farm, id)]
        })
        .await
    }

    pub async fn create_farm(&self, farm: &CreateFarm) -> Result<Farm, ApiError> {
        self.mutate(Method::POST, "/farms", json_body(farm)?, |_| {
            vec![Tag::list(TagKind::Farm)]
        })
        .await
    }

    pub async fn update_farm(&self, id: &str, update: &UpdateFarm) -> Result<Farm, ApiError> {
        self.mutate(
            Method::PUT,
            &format!("/farms/{}", id),
            json_body(update)?,
            |_| vec![Tag::entity(TagKind::Farm, id), Tag::list(TagKind::Farm)],
        )
        .await
    }

    pub async fn delete_farm(&self, id: &str) -> Result<(), ApiError> {
        self.execute(
            Method::DELETE,
            &format!("/farms/{}", id),
            &[Tag::entity(TagKind::Farm, id), Tag::list(TagKind::Farm)],
        )
        .await
    }

    pub async fn farm_statistics(&self, id: &str) -> Result<FarmStatistics, ApiError> {
        self.query(
            &format!("/farms/{}/statistics", id),
            None::<&()>,
            |_: &FarmStatistics| vec![Tag::entity(TagKind::Farm, id)],
        )
        .await
    }
}
