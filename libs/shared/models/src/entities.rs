use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the `doctors` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialty: String,
    pub available: bool,
    pub phone: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Parses the wire form; anything outside the four values is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row of the `appointments` table.
///
/// `doctor_name` and `doctor_specialty` are denormalized copies taken from
/// the doctor row when the appointment is created. They are the source of
/// truth for display and are never re-derived, even when `doctor_id`
/// changes on update.
///
/// `date` (`YYYY-MM-DD`) and `time` (`HH:MM`) stay strings on purpose:
/// listing sorts them lexicographically, matching the stored format.
/// `created_at` is an ISO 8601 string stamped once by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub doctor_specialty: String,
    pub date: String,
    pub time: String,
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_wire_form_is_kebab_case() {
        assert_eq!(
            serde_json::to_value(AppointmentStatus::InProgress).unwrap(),
            json!("in-progress")
        );
        assert_eq!(
            serde_json::from_value::<AppointmentStatus>(json!("cancelled")).unwrap(),
            AppointmentStatus::Cancelled
        );
    }

    #[test]
    fn status_parse_accepts_only_the_four_values() {
        assert_eq!(
            AppointmentStatus::parse("scheduled"),
            Some(AppointmentStatus::Scheduled)
        );
        assert_eq!(
            AppointmentStatus::parse("in-progress"),
            Some(AppointmentStatus::InProgress)
        );
        assert_eq!(AppointmentStatus::parse("done"), None);
        assert_eq!(AppointmentStatus::parse("IN-PROGRESS"), None);
        assert_eq!(AppointmentStatus::parse(""), None);
    }

    #[test]
    fn appointment_serializes_camel_case() {
        let appointment = Appointment {
            id: 1,
            doctor_id: 2,
            doctor_name: "Dr. A".into(),
            doctor_specialty: "Cardiology".into(),
            date: "2024-02-01".into(),
            time: "09:30".into(),
            patient_name: "Pat".into(),
            patient_email: "pat@example.com".into(),
            patient_phone: "123".into(),
            reason: None,
            status: AppointmentStatus::Scheduled,
            created_at: "2024-01-15T10:00:00.000Z".into(),
            updated_at: chrono::Utc::now(),
        };

        let value = serde_json::to_value(&appointment).unwrap();
        assert_eq!(value["doctorId"], 2);
        assert_eq!(value["patientEmail"], "pat@example.com");
        assert_eq!(value["status"], "scheduled");
    }
}
