//! Coffee bean and leaf image analysis. Both resources share the same
//! shape: one multipart upload, a history listing and fetch-by-id.

use reqwest::multipart::Form;
use reqwest::Method;

use crate::api::cache::{Tag, TagKind};
use crate::api::client::{ApiClient, RequestBody};
use crate::error::ApiError;
use crate::media::ImagePayload;
use crate::models::{AnalysisUpload, CoffeeBeansAnalysis, CoffeeLeavesAnalysis};

const BEANS: &str = "/coffee-beans";
const LEAVES: &str = "/coffee-leaves";

// Analysis records hang off the Farmer tag type, so any new upload
// refreshes both histories.
fn analysis_tags() -> Vec<Tag> {
    vec![Tag::all(TagKind::Farmer)]
}

fn analysis_form(image: &ImagePayload, upload: &AnalysisUpload) -> Result<Form, ApiError> {
    let part = image
        .to_multipart_part()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    Ok(Form::new()
        .part("file", part)
        .text("farm_id", upload.farm_id.clone())
        .text("field_id", upload.field_id.clone())
        .text("notes", upload.notes.clone()))
}

impl ApiClient {
    pub async fn analyze_beans(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeBeansAnalysis, ApiError> {
        let form = analysis_form(image, upload)?;
        self.mutate(
            Method::POST,
            &format!("{}/analyze", BEANS),
            RequestBody::Multipart(form),
            |_| analysis_tags(),
        )
        .await
    }

    pub async fn beans_history(&self) -> Result<Vec<CoffeeBeansAnalysis>, ApiError> {
        self.query(
            &format!("{}/history", BEANS),
            None::<&()>,
            |_: &Vec<CoffeeBeansAnalysis>| analysis_tags(),
        )
        .await
    }

    pub async fn get_beans_analysis(&self, id: &str) -> Result<CoffeeBeansAnalysis, ApiError> {
        self.query(
            &format!("{}/{}", BEANS, id),
            None::<&()>,
            |_: &CoffeeBeansAnalysis| analysis_tags(),
        )
        .await
    }

    pub async fn analyze_leaves(
        &self,
        image: &ImagePayload,
        upload: &AnalysisUpload,
    ) -> Result<CoffeeLeavesAnalysis, ApiError> {
        let form = analysis_form(image, upload)?;
        self.mutate(
            Method::POST,
            &format!("{}/analyze", LEAVES),
            RequestBody::Multipart(form),
            |_| analysis_tags(),
        )
        .await
    }

    pub async fn leaves_history(&self) -> Result<Vec<CoffeeLeavesAnalysis>, ApiError> {
        self.query(
            &format!("{}/history", LEAVES),
            None::<&()>,
            |_: &Vec<CoffeeLeavesAnalysis>| analysis_tags(),
        )
        .await
    }

    pub async fn get_leaves_analysis(&self, id: &str) -> Result<CoffeeLeavesAnalysis, ApiError> {
        self.query(
            &format!("{}/{}", LEAVES, id),
            None::<&()>,
            |_: &CoffeeLeavesAnalysis| analysis_tags(),
        )
        .await
    }
}
