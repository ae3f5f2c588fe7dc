//! Screen models: the local state and action handlers of each user task,
//! independent of how they are rendered.
//!
//! Every model is generic over [`FarmBackend`](crate::api::FarmBackend) and
//! reports a failed action as a [`FlowError`](crate::error::FlowError) whose
//! display text is the message the user should see.

pub mod add_farmer;
pub mod analysis;
pub mod check_in;
pub mod dashboard;
pub mod enrollment;
pub mod farmers;
pub mod login;
pub mod map;
pub mod navigation;
pub mod profile;

pub use add_farmer::{AddFarmerForm, AddFarmerScreen};
pub use analysis::{AnalysisKind, AnalysisScreen, AnalysisView, ConfidenceLevel, ScoreBand};
pub use check_in::{CheckInOutcome, CheckInScreen, CheckMode};
pub use dashboard::{DashboardScreen, DashboardView};
pub use enrollment::{
    CaptureOutcome, EnrollmentScreen, EnrollmentStep, EnrollmentWelcome, FarmerSelection,
};
pub use farmers::{FarmerDetail, FarmersScreen};
pub use login::LoginScreen;
pub use map::{FarmMarker, MapScreen, MarkerColor};
pub use navigation::{Navigation, Navigator, Route};
pub use profile::ProfileScreen;

use std::collections::BTreeMap;
use std::fmt;

/// Field-level validation failures caught before any network call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<&'static str, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.fields.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FormErrors {}
