use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::SortDirection;
use shared_models::{Appointment, AppointmentStatus, AppError, Doctor, FieldViolation, Violations};

/// `GET /appointments/{id}` response: the appointment joined with its
/// doctor row. The embedded doctor may be absent when the referenced row
/// no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithDoctor {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: Option<Doctor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub doctor_id: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub reason: Option<String>,
    /// Defaults to `scheduled`; anything outside the enum is a violation.
    pub status: Option<String>,
    /// Ignored: the server stamps its own creation time.
    pub created_at: Option<String>,
}

impl CreateAppointmentRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Violations::new();

        violations.require("doctorId", self.doctor_id.is_some());
        violations.require_text("date", self.date.as_deref(), 10);
        violations.require_text("time", self.time.as_deref(), 5);
        violations.require_text("patientName", self.patient_name.as_deref(), 255);
        violations.require_email("patientEmail", self.patient_email.as_deref());
        violations.require_text("patientPhone", self.patient_phone.as_deref(), 20);

        if let Some(status) = &self.status {
            if AppointmentStatus::parse(status).is_none() {
                violations.add(
                    "status",
                    "status must be one of scheduled, in-progress, completed, cancelled",
                );
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations.into_fields())
        }
    }
}

/// Partial update. Denormalized doctor fields are plain columns here: they
/// change only when explicitly supplied, never derived from `doctor_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub doctor_id: Option<i64>,
    pub doctor_name: Option<String>,
    pub doctor_specialty: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub patient_name: Option<String>,
    pub patient_email: Option<String>,
    pub patient_phone: Option<String>,
    pub reason: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Whitelisted sort keys for `GET /appointments`; unknown values fail
/// query-string deserialization before any handler code runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SortField {
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "doctorName")]
    DoctorName,
    #[serde(rename = "patientName")]
    PatientName,
    #[serde(rename = "status")]
    Status,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::DoctorName => "doctorName",
            SortField::PatientName => "patientName",
            SortField::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortDirection::Asc,
            SortOrder::Desc => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentFilters {
    /// Exact status match; the literal `"all"` disables the filter.
    pub status: Option<String>,
    pub doctor_name: Option<String>,
    pub date: Option<String>,
    pub patient_name: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl AppointmentFilters {
    pub fn status_filter(&self) -> Option<&str> {
        match self.status.as_deref() {
            None | Some("all") => None,
            Some(status) => Some(status),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => {
                AppError::NotFound("Appointment not found".to_string())
            }
            AppointmentError::DoctorNotFound => {
                AppError::NotFound("Doctor not found".to_string())
            }
            AppointmentError::InvalidStatus(_) => {
                AppError::BadRequest("Invalid status".to_string())
            }
            AppointmentError::Validation(fields) => AppError::Validation(fields),
            AppointmentError::Store(e) => AppError::Internal(e.to_string()),
        }
    }
}
