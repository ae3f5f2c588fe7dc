use std::sync::Arc;

use log::info;

use crate::api::FarmBackend;
use crate::error::FlowError;
use crate::models::{Farmer, FarmerAttendanceHistory, FarmerQuery, UpdateFarmer};
use crate::screens::{FormErrors, Navigation};

pub const FARMER_NOT_FOUND: &str = "Farmer not found";

#[derive(Debug, Clone, PartialEq)]
pub enum FarmerDetail {
    Found {
        farmer: Farmer,
        history: FarmerAttendanceHistory,
    },
    /// Rendered inline instead of as an error.
    NotFound,
}

impl FarmerDetail {
    pub fn farmer(&self) -> Option<&Farmer> {
        match self {
            FarmerDetail::Found { farmer, .. } => Some(farmer),
            FarmerDetail::NotFound => None,
        }
    }
}

pub struct FarmersScreen<B: FarmBackend> {
    backend: Arc<B>,
}

impl<B: FarmBackend> FarmersScreen<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn list(&self, search: &str) -> Result<Vec<Farmer>, FlowError> {
        let farmers = self
            .backend
            .list_farmers(&FarmerQuery::default())
            .await
            .map_err(|e| FlowError::api(e, "Failed to load farmers"))?;
        Ok(farmers
            .into_iter()
            .filter(|f| f.matches_search(search))
            .collect())
    }

    pub async fn detail(&self, id: &str) -> Result<FarmerDetail, FlowError> {
        let farmer = match self.backend.get_farmer(id).await {
            Ok(farmer) => farmer,
            Err(e) if e.is_not_found() => return Ok(FarmerDetail::NotFound),
            Err(e) => return Err(FlowError::api(e, FARMER_NOT_FOUND)),
        };
        let history = match self.backend.farmer_attendances(id).await {
            Ok(history) => history,
            Err(e) if e.is_not_found() => FarmerAttendanceHistory::default(),
            Err(e) => return Err(FlowError::api(e, "Failed to load attendance history")),
        };
        Ok(FarmerDetail::Found { farmer, history })
    }

    pub async fn update(&self, id: &str, update: &UpdateFarmer) -> Result<Farmer, FlowError> {
        if update.is_empty() {
            return Err(FormErrors::single("update", "Nothing to update").into());
        }
        if matches!(update.full_name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(FormErrors::single("full_name", "Full name is required").into());
        }
        let farmer = self
            .backend
            .update_farmer(id, update)
            .await
            .map_err(|e| FlowError::api(e, "Failed to update farmer"))?;
        info!("Updated farmer {}", id);
        Ok(farmer)
    }

    pub async fn delete(&self, id: &str) -> Result<Navigation, FlowError> {
        self.backend
            .delete_farmer(id)
            .await
            .map_err(|e| FlowError::api(e, "Failed to delete farmer"))?;
        info!("Deleted farmer {}", id);
        Ok(Navigation::Back {
            message: Some("Farmer deleted".to_string()),
        })
    }
}
