use serde::{Deserialize, Serialize};

use shared_models::Appointment;

/// `GET /dashboard/stats` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_doctors: u64,
    pub available_doctors: u64,
    pub total_appointments: u64,
    pub today_appointments: u64,
    pub recent_appointments: Vec<Appointment>,
}
