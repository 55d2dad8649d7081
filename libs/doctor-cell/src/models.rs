use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::{Appointment, AppError, Doctor, FieldViolation, Violations};

/// `GET /doctors/{id}` response: the doctor row plus its appointments,
/// fetched as a PostgREST embedded resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorWithAppointments {
    #[serde(flatten)]
    pub doctor: Doctor,
    pub appointments: Vec<Appointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub available: Option<bool>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

impl CreateDoctorRequest {
    /// Field-level checks, run before the store is touched.
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Violations::new();

        violations.require_text("name", self.name.as_deref(), 255);
        violations.require_text("specialty", self.specialty.as_deref(), 100);
        violations.require_text("phone", self.phone.as_deref(), 20);
        violations.require_email("email", self.email.as_deref());

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations.into_fields())
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub available: Option<bool>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// Optional narrowing predicates for `GET /doctors`.
///
/// `available` arrives as a query-string literal: `"true"`/`"false"`
/// filter, `"all"` (or absence) disables the filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorFilters {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub available: Option<String>,
}

impl DoctorFilters {
    /// The boolean the `available` filter narrows to, if it is active.
    pub fn available_filter(&self) -> Option<bool> {
        match self.available.as_deref() {
            None | Some("all") => None,
            Some(v) => Some(v == "true"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Cannot delete doctor with {0} existing appointments")]
    HasAppointments(u64),

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        match err {
            DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
            DoctorError::HasAppointments(_) => {
                AppError::Conflict("Cannot delete doctor with existing appointments".to_string())
            }
            DoctorError::Validation(fields) => AppError::Validation(fields),
            DoctorError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}
