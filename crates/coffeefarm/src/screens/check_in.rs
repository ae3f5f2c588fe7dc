use std::sync::Arc;

use log::{debug, info};

use crate::api::FarmBackend;
use crate::error::FlowError;
use crate::media::ImagePayload;
use crate::models::{Attendance, AttendanceReceipt, CheckInRequest, CheckOutRequest, GeoPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckMode {
    #[default]
    CheckIn,
    CheckOut,
}

impl CheckMode {
    pub fn toggled(self) -> Self {
        match self {
            CheckMode::CheckIn => CheckMode::CheckOut,
            CheckMode::CheckOut => CheckMode::CheckIn,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckMode::CheckIn => "Check In",
            CheckMode::CheckOut => "Check Out",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckInOutcome {
    pub mode: CheckMode,
    pub farmer_id: String,
    pub farmer_name: String,
    pub confidence: Option<f64>,
    pub message: String,
    pub receipt: AttendanceReceipt,
}

pub struct CheckInScreen<B: FarmBackend> {
    backend: Arc<B>,
    pub mode: CheckMode,
    default_farm_id: String,
    location: GeoPoint,
    active: Option<Vec<Attendance>>,
}

impl<B: FarmBackend> CheckInScreen<B> {
    /// `location` is attached to every record as-is.
    pub fn new(backend: Arc<B>, default_farm_id: &str, location: GeoPoint) -> Self {
        Self {
            backend,
            mode: CheckMode::default(),
            default_farm_id: default_farm_id.to_string(),
            location,
            active: None,
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Loads the currently open attendances used to match check-outs.
    pub async fn load_active(&mut self) -> Result<&[Attendance], FlowError> {
        let active = self
            .backend
            .active_attendance(None)
            .await
            .map_err(|e| FlowError::api(e, "Failed to load active attendance"))?;
        Ok(self.active.insert(active).as_slice())
    }

    /// Verifies the face in `photo`, then checks the identified farmer in
    /// or out depending on `mode`.
    pub async fn capture(&mut self, photo: &ImagePayload) -> Result<CheckInOutcome, FlowError> {
        let verification = self
            .backend
            .verify_face(photo)
            .await
            .map_err(|e| FlowError::api(e, "An error occurred"))?;

        if !verification.verified {
            let message = verification
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Face not recognized".to_string());
            return Err(FlowError::NotVerified(message));
        }

        let farmer_id = verification
            .farmer_id
            .filter(|id| !id.is_empty())
            .ok_or(FlowError::MissingFarmerId)?;
        let farmer_name = verification.farmer_name.unwrap_or_else(|| farmer_id.clone());
        let farm_id = verification
            .farm_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.default_farm_id.clone());
        debug!(
            "Verified {} (confidence {:?})",
            farmer_id, verification.confidence
        );

        let face_image = photo.to_data_uri();
        let (receipt, message) = match self.mode {
            CheckMode::CheckIn => {
                let request = CheckInRequest {
                    farmer_id: farmer_id.clone(),
                    farm_id,
                    face_image,
                    location: Some(self.location),
                    notes: None,
                };
                let receipt = self
                    .backend
                    .check_in(&request)
                    .await
                    .map_err(|e| FlowError::api(e, "An error occurred"))?;
                (
                    receipt,
                    format!("Check-in successful! Welcome {}!", farmer_name),
                )
            }
            CheckMode::CheckOut => {
                if self.active.is_none() {
                    self.load_active().await?;
                }
                let open = self
                    .active
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .find(|a| a.farmer_id == farmer_id)
                    .map(|a| a.id.clone())
                    .ok_or_else(|| FlowError::NoActiveCheckIn {
                        farmer_id: farmer_id.clone(),
                    })?;

                let request = CheckOutRequest {
                    farmer_id: farmer_id.clone(),
                    face_image,
                    location: Some(self.location),
                    notes: None,
                };
                let receipt = self
                    .backend
                    .check_out(&open, &request)
                    .await
                    .map_err(|e| FlowError::api(e, "An error occurred"))?;
                // The open list is stale after a successful check-out.
                self.active = None;
                (
                    receipt,
                    format!("Check-out successful! Have a great day {}!", farmer_name),
                )
            }
        };

        info!("{} for {}", self.mode.label(), farmer_id);
        Ok(CheckInOutcome {
            mode: self.mode,
            farmer_id,
            farmer_name,
            confidence: verification.confidence,
            message,
            receipt,
        })
    }
}
