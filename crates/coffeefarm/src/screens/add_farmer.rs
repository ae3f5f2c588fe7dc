use std::sync::{Arc, LazyLock};

use log::info;
use regex::Regex;

use crate::api::FarmBackend;
use crate::error::FlowError;
use crate::models::{CreateFarmer, Farmer, Gender};
use crate::screens::{FormErrors, Navigation, Route};

static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").unwrap());
static RE_ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());

/// Raw form input, as typed.
#[derive(Debug, Clone, PartialEq)]
pub struct AddFarmerForm {
    pub farmer_code: String,
    pub full_name: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub address: String,
    pub farm_id: String,
}

impl AddFarmerForm {
    pub fn new(default_farm_id: impl Into<String>) -> Self {
        Self {
            farmer_code: String::new(),
            full_name: String::new(),
            phone: String::new(),
            date_of_birth: String::new(),
            gender: Gender::default(),
            address: String::new(),
            farm_id: default_farm_id.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.farmer_code.trim().is_empty() {
            errors.add("farmer_code", "Farmer code is required");
        }
        if self.full_name.trim().is_empty() {
            errors.add("full_name", "Full name is required");
        }
        // Checked as typed; a padded or blank-but-not-empty number is rejected.
        if !self.phone.is_empty() && !RE_PHONE.is_match(&self.phone) {
            errors.add("phone", "Invalid phone number (10-15 digits)");
        }
        errors.into_result()
    }

    /// The create body. Empty optional fields and an unreadable date of
    /// birth are left out.
    pub fn to_request(&self) -> CreateFarmer {
        CreateFarmer {
            farmer_code: self.farmer_code.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            phone: non_empty(&self.phone),
            date_of_birth: normalize_date_of_birth(&self.date_of_birth),
            gender: self.gender,
            address: non_empty(&self.address),
            farm_id: self.farm_id.trim().to_string(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn plausible(month: &str, day: &str) -> bool {
    let (Ok(month), Ok(day)) = (month.parse::<u32>(), day.parse::<u32>()) else {
        return false;
    };
    (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Turns the typed date of birth into `YYYY-MM-DD`.
///
/// Eight digits are read as `YYYYDDMM` first and `YYYYMMDD` second. An
/// already formatted `YYYY-MM-DD` passes through. Anything else is `None`.
pub fn normalize_date_of_birth(input: &str) -> Option<String> {
    let input = input.trim();

    if let Some(caps) = RE_ISO_DATE.captures(input) {
        return plausible(&caps[2], &caps[3]).then(|| input.to_string());
    }

    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = &input[0..4];
    let (dd, mm) = (&input[4..6], &input[6..8]);
    if plausible(mm, dd) {
        return Some(format!("{}-{}-{}", year, mm, dd));
    }

    let (mm, dd) = (&input[4..6], &input[6..8]);
    if plausible(mm, dd) {
        return Some(format!("{}-{}-{}", year, mm, dd));
    }

    None
}

pub struct AddFarmerScreen<B: FarmBackend> {
    backend: Arc<B>,
    pub form: AddFarmerForm,
    pub errors: FormErrors,
}

impl<B: FarmBackend> AddFarmerScreen<B> {
    pub fn new(backend: Arc<B>, default_farm_id: &str) -> Self {
        Self {
            backend,
            form: AddFarmerForm::new(default_farm_id),
            errors: FormErrors::new(),
        }
    }

    /// Validates, creates the farmer and moves on to face enrollment for
    /// the new record. Invalid input never reaches the backend.
    pub async fn submit(&mut self) -> Result<(Farmer, Navigation), FlowError> {
        if let Err(errors) = self.form.validate() {
            self.errors = errors.clone();
            return Err(errors.into());
        }
        self.errors = FormErrors::new();

        let request = self.form.to_request();
        let farmer = self
            .backend
            .create_farmer(&request)
            .await
            .map_err(|e| FlowError::api(e, "Failed to create farmer"))?;

        info!("Created farmer {} ({})", farmer.farmer_code, farmer.id);
        let next = Navigation::To(Route::FaceEnrollment {
            farmer_id: farmer.id.clone(),
            farmer_name: farmer.full_name.clone(),
        });
        Ok((farmer, next))
    }
}
