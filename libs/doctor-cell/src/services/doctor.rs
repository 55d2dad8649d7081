use chrono::Utc;
use serde_json::json;
use tracing::debug;

use shared_database::{PostgrestClient, TableQuery};
use shared_models::Doctor;

use crate::models::{
    CreateDoctorRequest, DoctorError, DoctorFilters, DoctorWithAppointments, UpdateDoctorRequest,
};

pub struct DoctorService {
    db: PostgrestClient,
}

impl DoctorService {
    pub fn new(db: PostgrestClient) -> Self {
        Self { db }
    }

    /// All doctors matching the given filters, in storage order.
    pub async fn list_doctors(&self, filters: &DoctorFilters) -> Result<Vec<Doctor>, DoctorError> {
        debug!("Listing doctors with filters: {:?}", filters);

        let mut query = TableQuery::new("doctors");

        if let Some(name) = &filters.name {
            query = query.filter_contains_ci("name", name.clone());
        }
        if let Some(specialty) = &filters.specialty {
            query = query.filter_contains_ci("specialty", specialty.clone());
        }
        if let Some(available) = filters.available_filter() {
            query = query.filter_eq("available", available.to_string());
        }

        Ok(self.db.select_many(&query).await?)
    }

    /// One doctor with its appointments embedded.
    pub async fn get_doctor(&self, id: i64) -> Result<DoctorWithAppointments, DoctorError> {
        debug!("Fetching doctor: {}", id);

        let query = TableQuery::new("doctors")
            .select("*,appointments(*)")
            .filter_eq("id", id.to_string());

        self.db
            .select_one(&query)
            .await?
            .ok_or(DoctorError::NotFound)
    }

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        request.validate().map_err(DoctorError::Validation)?;

        debug!("Creating doctor: {:?}", request.name);

        let now = Utc::now().to_rfc3339();
        let row = json!({
            "name": request.name,
            "specialty": request.specialty,
            "available": request.available.unwrap_or(true),
            "phone": request.phone,
            "email": request.email,
            "image": request.image,
            "createdAt": now,
            "updatedAt": now,
        });

        Ok(self.db.insert("doctors", row).await?)
    }

    /// Partial merge update; only the provided fields change.
    pub async fn update_doctor(
        &self,
        id: i64,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor: {}", id);

        let mut patch = serde_json::Map::new();

        if let Some(name) = request.name {
            patch.insert("name".to_string(), json!(name));
        }
        if let Some(specialty) = request.specialty {
            patch.insert("specialty".to_string(), json!(specialty));
        }
        if let Some(available) = request.available {
            patch.insert("available".to_string(), json!(available));
        }
        if let Some(phone) = request.phone {
            patch.insert("phone".to_string(), json!(phone));
        }
        if let Some(email) = request.email {
            patch.insert("email".to_string(), json!(email));
        }
        if let Some(image) = request.image {
            patch.insert("image".to_string(), json!(image));
        }

        patch.insert("updatedAt".to_string(), json!(Utc::now().to_rfc3339()));

        let query = TableQuery::new("doctors").filter_eq("id", id.to_string());
        self.db
            .update(&query, serde_json::Value::Object(patch))
            .await?
            .ok_or(DoctorError::NotFound)
    }

    /// Hard delete, restricted: a doctor with remaining appointments is not
    /// deletable (the rows reference it by `doctorId`).
    pub async fn delete_doctor(&self, id: i64) -> Result<(), DoctorError> {
        debug!("Deleting doctor: {}", id);

        let appointments =
            TableQuery::new("appointments").filter_eq("doctorId", id.to_string());
        let referencing = self.db.count(&appointments).await?;
        if referencing > 0 {
            return Err(DoctorError::HasAppointments(referencing));
        }

        let query = TableQuery::new("doctors").filter_eq("id", id.to_string());
        let removed = self.db.delete(&query).await?;
        if removed == 0 {
            return Err(DoctorError::NotFound);
        }

        Ok(())
    }

    pub async fn count_available(&self) -> Result<u64, DoctorError> {
        let query = TableQuery::new("doctors").filter_eq("available", "true");
        Ok(self.db.count(&query).await?)
    }

    pub async fn count_total(&self) -> Result<u64, DoctorError> {
        Ok(self.db.count(&TableQuery::new("doctors")).await?)
    }
}
