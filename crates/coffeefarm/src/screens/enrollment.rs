//! Three-angle face enrollment wizard and the farmer picker in front of it.
//!
//! The wizard walks front, left, right in that order. Each capture goes
//! through the backend quality check and only fills its slot when a face
//! was found and the score clears the threshold. Submission needs all
//! three slots and is a single enrollment call.

use std::sync::Arc;

use log::{debug, info};

use crate::api::{FarmBackend, FarmQuery};
use crate::error::FlowError;
use crate::media::ImagePayload;
use crate::models::{EnrollmentImages, FaceAngle, FaceEnrollResponse, Farmer, FarmerQuery};
use crate::screens::{Navigation, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStep {
    Capturing(FaceAngle),
    Review,
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Slot filled. `next` is the angle now being captured, or `None` when
    /// the wizard moved to review.
    Accepted {
        angle: FaceAngle,
        next: Option<FaceAngle>,
    },
    NoFace,
    LowQuality {
        score: f64,
        yaw: f64,
        recommendations: Vec<String>,
    },
}

impl CaptureOutcome {
    pub fn title(&self) -> &'static str {
        match self {
            CaptureOutcome::Accepted { .. } => "Captured",
            CaptureOutcome::NoFace => "No Face Detected",
            CaptureOutcome::LowQuality { .. } => "Image Quality Too Low",
        }
    }

    pub fn message(&self) -> String {
        match self {
            CaptureOutcome::Accepted { angle, .. } => {
                format!("{} photo saved", angle.display_label())
            }
            CaptureOutcome::NoFace => {
                "Please make sure your face is clearly visible in the frame.".to_string()
            }
            CaptureOutcome::LowQuality {
                score,
                yaw,
                recommendations,
            } => {
                let advice = if recommendations.is_empty() {
                    "Please improve image quality".to_string()
                } else {
                    recommendations.join("\n")
                };
                format!(
                    "Quality Score: {:.0}%\nCurrent angle: {:.1}°\n\n{}\n\nPlease try again.",
                    score * 100.0,
                    yaw,
                    advice
                )
            }
        }
    }
}

pub struct EnrollmentScreen<B: FarmBackend> {
    backend: Arc<B>,
    farmer_id: String,
    farmer_name: String,
    already_enrolled: bool,
    min_quality: f64,
    step: EnrollmentStep,
    slots: [Option<ImagePayload>; 3],
}

impl<B: FarmBackend> EnrollmentScreen<B> {
    pub fn new(
        backend: Arc<B>,
        farmer_id: &str,
        farmer_name: &str,
        already_enrolled: bool,
        min_quality: f64,
    ) -> Self {
        Self {
            backend,
            farmer_id: farmer_id.to_string(),
            farmer_name: farmer_name.to_string(),
            already_enrolled,
            min_quality,
            step: EnrollmentStep::Capturing(FaceAngle::Front),
            slots: [None, None, None],
        }
    }

    pub fn farmer_name(&self) -> &str {
        &self.farmer_name
    }

    pub fn step(&self) -> EnrollmentStep {
        self.step
    }

    /// Shown before the first capture when this replaces existing data.
    pub fn replace_warning(&self) -> Option<String> {
        self.already_enrolled.then(|| {
            format!(
                "{} already has face data enrolled. New photos will replace it.",
                self.farmer_name
            )
        })
    }

    pub fn current_angle(&self) -> Option<FaceAngle> {
        match self.step {
            EnrollmentStep::Capturing(angle) => Some(angle),
            _ => None,
        }
    }

    pub fn captured(&self, angle: FaceAngle) -> Option<&ImagePayload> {
        self.slots[angle.index()].as_ref()
    }

    pub fn missing(&self) -> Vec<FaceAngle> {
        FaceAngle::ORDER
            .into_iter()
            .filter(|a| self.slots[a.index()].is_none())
            .collect()
    }

    /// Filled slots over three.
    pub fn progress(&self) -> f64 {
        (FaceAngle::ORDER.len() - self.missing().len()) as f64 / FaceAngle::ORDER.len() as f64
    }

    /// Quality-checks `photo` for the current angle. Rejections leave the
    /// slot empty and the wizard on the same angle.
    pub async fn capture(&mut self, photo: ImagePayload) -> Result<CaptureOutcome, FlowError> {
        let angle = self.current_angle().ok_or_else(|| {
            FlowError::InvalidState("Not capturing; retake an angle first".to_string())
        })?;

        let quality = self
            .backend
            .check_face_quality(&photo, Some(angle))
            .await
            .map_err(|e| FlowError::api(e, "Failed to check image quality. Please try again."))?;

        if !quality.face_detected {
            debug!("No face in {} capture", angle);
            return Ok(CaptureOutcome::NoFace);
        }

        let score = quality.score();
        if score < self.min_quality {
            debug!("{} capture scored {:.2}, below {:.2}", angle, score, self.min_quality);
            return Ok(CaptureOutcome::LowQuality {
                score,
                yaw: quality.yaw(),
                recommendations: quality.recommendations,
            });
        }

        self.slots[angle.index()] = Some(photo);
        let next = self.next_empty_after(angle);
        self.step = match next {
            Some(next) => EnrollmentStep::Capturing(next),
            None => EnrollmentStep::Review,
        };
        Ok(CaptureOutcome::Accepted { angle, next })
    }

    // After a single retake the later slots may already be filled.
    fn next_empty_after(&self, angle: FaceAngle) -> Option<FaceAngle> {
        let mut candidate = angle.next();
        while let Some(a) = candidate {
            if self.slots[a.index()].is_none() {
                return Some(a);
            }
            candidate = a.next();
        }
        self.missing().first().copied()
    }

    /// Clears one slot and goes back to capturing it.
    pub fn retake(&mut self, angle: FaceAngle) {
        self.slots[angle.index()] = None;
        self.step = EnrollmentStep::Capturing(angle);
    }

    /// Clears every slot and restarts at the front angle.
    pub fn retake_all(&mut self) {
        self.slots = [None, None, None];
        self.step = EnrollmentStep::Capturing(FaceAngle::Front);
    }

    /// Sends all three captures in one enrollment call. On failure the
    /// wizard stays on review with its slots intact.
    pub async fn complete(&mut self) -> Result<(FaceEnrollResponse, Navigation), FlowError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(FlowError::IncompleteEnrollment { missing });
        }

        let images = EnrollmentImages {
            front: self.slot_uri(FaceAngle::Front),
            left: self.slot_uri(FaceAngle::Left),
            right: self.slot_uri(FaceAngle::Right),
        };

        let response = self
            .backend
            .enroll_face(&self.farmer_id, &images)
            .await
            .map_err(|e| FlowError::api(e, "Failed to enroll face"))?;

        if !response.success {
            let message = if response.message.trim().is_empty() {
                "Failed to enroll face".to_string()
            } else {
                response.message.clone()
            };
            return Err(FlowError::Declined(message));
        }

        let message = if response.was_update {
            "Face data has been updated successfully!"
        } else {
            "Face enrollment completed successfully!"
        };
        info!("Enrolled face for {}", self.farmer_id);
        self.step = EnrollmentStep::Done;
        Ok((
            response,
            Navigation::Back {
                message: Some(message.to_string()),
            },
        ))
    }

    fn slot_uri(&self, angle: FaceAngle) -> String {
        self.slots[angle.index()]
            .as_ref()
            .map(ImagePayload::to_data_uri)
            .unwrap_or_default()
    }
}

/// Farmers split by enrollment state, after search filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FarmerSelection {
    pub not_enrolled: Vec<Farmer>,
    pub enrolled: Vec<Farmer>,
}

impl FarmerSelection {
    pub fn from_farmers(farmers: Vec<Farmer>, search: &str) -> Self {
        let (enrolled, not_enrolled) = farmers
            .into_iter()
            .filter(|f| f.matches_search(search))
            .partition(|f| f.face_enrolled);
        Self {
            not_enrolled,
            enrolled,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.not_enrolled.is_empty() && self.enrolled.is_empty()
    }
}

/// The picker in front of the wizard.
pub struct EnrollmentWelcome<B: FarmBackend> {
    backend: Arc<B>,
}

impl<B: FarmBackend> EnrollmentWelcome<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn load(&self, search: &str) -> Result<FarmerSelection, FlowError> {
        let farmers = self
            .backend
            .list_farmers(&FarmerQuery::default())
            .await
            .map_err(|e| FlowError::api(e, "Failed to load farmers"))?;
        Ok(FarmerSelection::from_farmers(farmers, search))
    }

    /// Route into the wizard for `farmer`.
    pub fn select(&self, farmer: &Farmer) -> Navigation {
        Navigation::To(Route::FaceEnrollment {
            farmer_id: farmer.id.clone(),
            farmer_name: farmer.full_name.clone(),
        })
    }

    pub async fn delete_enrollment(&self, farmer_id: &str) -> Result<(), FlowError> {
        self.backend
            .delete_face_enrollment(farmer_id)
            .await
            .map_err(|e| FlowError::api(e, "Failed to delete face data"))
    }

    /// Farm names for the picker, keyed by farm id.
    pub async fn farm_names(&self) -> Result<Vec<(String, String)>, FlowError> {
        let farms = self
            .backend
            .list_farms(&FarmQuery::default())
            .await
            .map_err(|e| FlowError::api(e, "Failed to load farms"))?;
        Ok(farms
            .into_iter()
            .map(|f| {
                let name = f.display_name().to_string();
                (f.id, name)
            })
            .collect())
    }
}
