use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use super::RecordId;

/// Row of the `appointments` table. `id` is absent until stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub uhid: String,
    #[serde(default)]
    pub department_id: Option<RecordId>,
    #[serde(default)]
    pub sub_department_id: Option<RecordId>,
    #[serde(default)]
    pub doctor_id: Option<RecordId>,
    pub appointment_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}
