use std::sync::Arc;

use tracing::debug;

use appointment_cell::services::AppointmentService;
use doctor_cell::services::DoctorService;
use shared_models::error::AppError;

use crate::models::DashboardStats;

const RECENT_APPOINTMENTS: usize = 5;

pub struct DashboardService {
    doctors: Arc<DoctorService>,
    appointments: Arc<AppointmentService>,
}

impl DashboardService {
    pub fn new(doctors: Arc<DoctorService>, appointments: Arc<AppointmentService>) -> Self {
        Self {
            doctors,
            appointments,
        }
    }

    /// Five independent reads, fanned out concurrently and joined. None of
    /// them depends on another; a single failure fails the whole call, no
    /// partial results.
    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        debug!("Gathering dashboard stats");

        let (
            total_doctors,
            available_doctors,
            total_appointments,
            today_appointments,
            recent_appointments,
        ) = tokio::try_join!(
            async { self.doctors.count_total().await.map_err(AppError::from) },
            async { self.doctors.count_available().await.map_err(AppError::from) },
            async { self.appointments.count_total().await.map_err(AppError::from) },
            async { self.appointments.count_today().await.map_err(AppError::from) },
            async {
                self.appointments
                    .list_recent(Some(RECENT_APPOINTMENTS))
                    .await
                    .map_err(AppError::from)
            },
        )?;

        Ok(DashboardStats {
            total_doctors,
            available_doctors,
            total_appointments,
            today_appointments,
            recent_appointments,
        })
    }
}
