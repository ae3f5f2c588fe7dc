use serde::{Deserialize, Serialize};

/// Capture angle of an enrollment sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceAngle {
    Front,
    Left,
    Right,
}

impl FaceAngle {
    /// Capture order of the enrollment wizard.
    pub const ORDER: [FaceAngle; 3] = [FaceAngle::Front, FaceAngle::Left, FaceAngle::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            FaceAngle::Front => "front",
            FaceAngle::Left => "left",
            FaceAngle::Right => "right",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            FaceAngle::Front => "Look straight at the camera",
            FaceAngle::Left => "Turn your head slightly to the left",
            FaceAngle::Right => "Turn your head slightly to the right",
        }
    }

    /// Label for a captured sample. The selfie camera mirrors the image, so
    /// a head turned left shows up as a right turn.
    pub fn display_label(&self) -> &'static str {
        match self {
            FaceAngle::Front => "FRONT",
            FaceAngle::Left => "RIGHT",
            FaceAngle::Right => "LEFT",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            FaceAngle::Front => 0,
            FaceAngle::Left => 1,
            FaceAngle::Right => 2,
        }
    }

    pub fn next(&self) -> Option<FaceAngle> {
        Self::ORDER.get(self.index() + 1).copied()
    }
}

impl std::fmt::Display for FaceAngle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FaceAngle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(FaceAngle::Front),
            "left" => Ok(FaceAngle::Left),
            "right" => Ok(FaceAngle::Right),
            other => Err(format!(
                "unknown angle '{}' (expected front, left or right)",
                other
            )),
        }
    }
}

/// The three enrollment samples as base64 data URIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrollmentImages {
    pub front: String,
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceEnrollResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub farmer_id: Option<String>,
    #[serde(default)]
    pub embeddings_saved: Option<u32>,
    #[serde(default)]
    pub samples_collected: Option<u32>,
    #[serde(default)]
    pub enrollment_complete: Option<bool>,
    #[serde(default)]
    pub was_update: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceVerifyResponse {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub farmer_id: Option<String>,
    #[serde(default)]
    pub farmer_name: Option<String>,
    #[serde(default)]
    pub farm_id: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default)]
    pub pitch: f64,
    #[serde(default)]
    pub yaw: f64,
    #[serde(default)]
    pub roll: f64,
    #[serde(default)]
    pub is_frontal: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityDetails {
    #[serde(default)]
    pub overall_score: f64,
    #[serde(default)]
    pub pose: Option<Pose>,
    #[serde(default)]
    pub face_size: Option<f64>,
    #[serde(default)]
    pub brightness: Option<f64>,
    #[serde(default)]
    pub sharpness: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceQualityResponse {
    #[serde(default)]
    pub face_detected: bool,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub quality_details: Option<QualityDetails>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FaceQualityResponse {
    pub fn score(&self) -> f64 {
        self.quality_score.unwrap_or(0.0)
    }

    pub fn yaw(&self) -> f64 {
        self.quality_details
            .as_ref()
            .and_then(|d| d.pose.as_ref())
            .map(|p| p.yaw)
            .unwrap_or(0.0)
    }
}
