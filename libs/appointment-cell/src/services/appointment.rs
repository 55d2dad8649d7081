use chrono::Utc;
use serde_json::json;
use tracing::debug;

use shared_database::{PostgrestClient, SortDirection, TableQuery};
use shared_models::{Appointment, AppointmentStatus, Doctor};

use crate::models::{
    AppointmentError, AppointmentFilters, AppointmentWithDoctor, CreateAppointmentRequest,
    UpdateAppointmentRequest,
};

const RECENT_DEFAULT_LIMIT: usize = 5;

pub struct AppointmentService {
    db: PostgrestClient,
}

impl AppointmentService {
    pub fn new(db: PostgrestClient) -> Self {
        Self { db }
    }

    /// Filtered, sorted listing. Without an explicit sort key the newest
    /// appointments come first: date descending, then time descending
    /// (both plain string comparisons over the stored formats).
    pub async fn list_appointments(
        &self,
        filters: &AppointmentFilters,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        debug!("Listing appointments with filters: {:?}", filters);

        let mut query = TableQuery::new("appointments");

        if let Some(status) = filters.status_filter() {
            query = query.filter_eq("status", status);
        }
        if let Some(doctor_name) = &filters.doctor_name {
            query = query.filter_contains_ci("doctorName", doctor_name.clone());
        }
        if let Some(date) = &filters.date {
            query = query.filter_eq("date", date.clone());
        }
        if let Some(patient_name) = &filters.patient_name {
            query = query.filter_contains_ci("patientName", patient_name.clone());
        }

        query = match filters.sort_by {
            Some(field) => {
                let direction = filters
                    .sort_order
                    .map(SortDirection::from)
                    .unwrap_or(SortDirection::Asc);
                query.order_by(field.column(), direction)
            }
            None => query
                .order_by("date", SortDirection::Desc)
                .order_by("time", SortDirection::Desc),
        };

        Ok(self.db.select_many(&query).await?)
    }

    /// One appointment with its doctor row embedded.
    pub async fn get_appointment(
        &self,
        id: i64,
    ) -> Result<AppointmentWithDoctor, AppointmentError> {
        debug!("Fetching appointment: {}", id);

        let query = TableQuery::new("appointments")
            .select("*,doctor:doctors(*)")
            .filter_eq("id", id.to_string());

        self.db
            .select_one(&query)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Creates an appointment. The referenced doctor must exist; its name
    /// and specialty are copied into the denormalized columns at this point
    /// and never synced afterwards. `createdAt` is stamped server-side,
    /// overriding anything the client sent.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        request.validate().map_err(AppointmentError::Validation)?;

        // validate() guarantees presence.
        let doctor_id = request.doctor_id.unwrap_or_default();

        let doctor_query = TableQuery::new("doctors").filter_eq("id", doctor_id.to_string());
        let doctor: Doctor = self
            .db
            .select_one(&doctor_query)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;

        debug!("Creating appointment for doctor {}", doctor_id);

        let status = request
            .status
            .as_deref()
            .and_then(AppointmentStatus::parse)
            .unwrap_or(AppointmentStatus::Scheduled);

        let now = Utc::now();
        let row = json!({
            "doctorId": doctor_id,
            "doctorName": doctor.name,
            "doctorSpecialty": doctor.specialty,
            "date": request.date,
            "time": request.time,
            "patientName": request.patient_name,
            "patientEmail": request.patient_email,
            "patientPhone": request.patient_phone,
            "reason": request.reason,
            "status": status,
            "createdAt": now.to_rfc3339(),
            "updatedAt": now.to_rfc3339(),
        });

        Ok(self.db.insert("appointments", row).await?)
    }

    /// Partial merge update. Denormalized doctor fields change only when
    /// supplied explicitly, even if `doctorId` changes.
    pub async fn update_appointment(
        &self,
        id: i64,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Updating appointment: {}", id);

        let mut patch = serde_json::Map::new();

        if let Some(doctor_id) = request.doctor_id {
            patch.insert("doctorId".to_string(), json!(doctor_id));
        }
        if let Some(doctor_name) = request.doctor_name {
            patch.insert("doctorName".to_string(), json!(doctor_name));
        }
        if let Some(doctor_specialty) = request.doctor_specialty {
            patch.insert("doctorSpecialty".to_string(), json!(doctor_specialty));
        }
        if let Some(date) = request.date {
            patch.insert("date".to_string(), json!(date));
        }
        if let Some(time) = request.time {
            patch.insert("time".to_string(), json!(time));
        }
        if let Some(patient_name) = request.patient_name {
            patch.insert("patientName".to_string(), json!(patient_name));
        }
        if let Some(patient_email) = request.patient_email {
            patch.insert("patientEmail".to_string(), json!(patient_email));
        }
        if let Some(patient_phone) = request.patient_phone {
            patch.insert("patientPhone".to_string(), json!(patient_phone));
        }
        if let Some(reason) = request.reason {
            patch.insert("reason".to_string(), json!(reason));
        }
        if let Some(raw) = request.status {
            let status = AppointmentStatus::parse(&raw)
                .ok_or_else(|| AppointmentError::InvalidStatus(raw.clone()))?;
            patch.insert("status".to_string(), json!(status));
        }

        patch.insert("updatedAt".to_string(), json!(Utc::now().to_rfc3339()));

        let query = TableQuery::new("appointments").filter_eq("id", id.to_string());
        self.db
            .update(&query, serde_json::Value::Object(patch))
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    /// Sets the status column alone. Any of the four values may follow any
    /// other; there is no transition graph.
    pub async fn update_status(
        &self,
        id: i64,
        raw_status: &str,
    ) -> Result<Appointment, AppointmentError> {
        let status = AppointmentStatus::parse(raw_status)
            .ok_or_else(|| AppointmentError::InvalidStatus(raw_status.to_string()))?;

        debug!("Setting appointment {} status to {}", id, status);

        let patch = json!({
            "status": status,
            "updatedAt": Utc::now().to_rfc3339(),
        });

        let query = TableQuery::new("appointments").filter_eq("id", id.to_string());
        self.db
            .update(&query, patch)
            .await?
            .ok_or(AppointmentError::NotFound)
    }

    pub async fn cancel_appointment(&self, id: i64) -> Result<Appointment, AppointmentError> {
        self.update_status(id, AppointmentStatus::Cancelled.as_str())
            .await
    }

    pub async fn delete_appointment(&self, id: i64) -> Result<(), AppointmentError> {
        debug!("Deleting appointment: {}", id);

        let query = TableQuery::new("appointments").filter_eq("id", id.to_string());
        let removed = self.db.delete(&query).await?;
        if removed == 0 {
            return Err(AppointmentError::NotFound);
        }

        Ok(())
    }

    pub async fn count_total(&self) -> Result<u64, AppointmentError> {
        Ok(self.db.count(&TableQuery::new("appointments")).await?)
    }

    /// Appointments whose `date` equals today's `YYYY-MM-DD` string.
    pub async fn count_today(&self) -> Result<u64, AppointmentError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let query = TableQuery::new("appointments").filter_eq("date", today);
        Ok(self.db.count(&query).await?)
    }

    /// Most recently created appointments, newest first.
    pub async fn list_recent(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let query = TableQuery::new("appointments")
            .order_by("createdAt", SortDirection::Desc)
            .limit(limit.unwrap_or(RECENT_DEFAULT_LIMIT));
        Ok(self.db.select_many(&query).await?)
    }
}
