use crate::api::cache::{Tag, TagKind};
use crate::api::client::ApiClient;
use crate::error::ApiError;
use crate::models::{DashboardStatistics, SummaryStatistics};

impl ApiClient {
    pub async fn dashboard_statistics(&self) -> Result<DashboardStatistics, ApiError> {
        self.query(
            "/statistics/dashboard",
            None::<&()>,
            |_: &DashboardStatistics| vec![Tag::all(TagKind::Statistics)],
        )
        .await
    }

    pub async fn summary_statistics(&self) -> Result<SummaryStatistics, ApiError> {
        self.query(
            "/statistics/summary",
            None::<&()>,
            |_: &SummaryStatistics| vec![Tag::all(TagKind::Statistics)],
        )
        .await
    }
}
