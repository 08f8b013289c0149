use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{AdmissionStatus, Ward};
use super::RecordId;
use crate::calendar::parse_date_loose;

/// Row of `opd_visits`: one outpatient visit per appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpdVisit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub opd_no: String,
    pub uhid: String,
    pub appointment_id: RecordId,
    pub visit_date: NaiveDate,
}

/// Row written to `ipd_admissions` by registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAdmission {
    pub ipd_no: String,
    pub uhid: String,
    pub opd_no: String,
    pub doctor_id: Option<RecordId>,
    pub ward: Ward,
    pub bed_number: String,
    pub admission_date: NaiveDate,
    pub discharge_date: NaiveDate,
    pub admission_reason: String,
    pub status: AdmissionStatus,
    pub deposit_amount: u32,
}

/// Stored admission as read back for the clinical phase.
///
/// Read leniently: rows written by other tools may carry timestamps or
/// free-form text where registration writes plain dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpdAdmission {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub ipd_no: String,
    pub uhid: String,
    #[serde(default)]
    pub opd_no: Option<String>,
    #[serde(default)]
    pub doctor_id: Option<RecordId>,
    #[serde(default)]
    pub ward: Option<String>,
    #[serde(default)]
    pub bed_number: Option<String>,
    #[serde(default)]
    pub admission_date: Option<String>,
    #[serde(default)]
    pub discharge_date: Option<String>,
}

impl IpdAdmission {
    pub fn admitted_on(&self) -> Option<NaiveDate> {
        self.admission_date.as_deref().and_then(parse_date_loose)
    }

    pub fn discharged_on(&self) -> Option<NaiveDate> {
        self.discharge_date.as_deref().and_then(parse_date_loose)
    }
}
