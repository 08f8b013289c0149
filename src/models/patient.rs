use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One spreadsheet row: a patient and the complaint that brought them in.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub uhid: String,
    pub full_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub mobile: Option<String>,
    pub aadhaar: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
    pub complaints: Option<String>,
    pub department: Option<String>,
    pub sub_department: Option<String>,
}

impl PatientRecord {
    pub fn to_patient(&self) -> Patient {
        Patient {
            uhid: self.uhid.clone(),
            full_name: self.full_name.clone(),
            gender: self.gender.clone(),
            age: self.age,
            mobile: self.mobile.clone(),
            aadhaar: self.aadhaar.clone(),
            address: self.address.clone(),
            created_at: Some(self.created_at.format("%Y-%m-%dT%H:%M:%S").to_string()),
            complaints: self.complaints.clone(),
            department: self.department.clone(),
            sub_department: self.sub_department.clone(),
        }
    }
}

/// Row of the `patients` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub uhid: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub aadhaar: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub complaints: Option<String>,
    #[serde(rename = "Department", default)]
    pub department: Option<String>,
    #[serde(rename = "Sub_Department", default)]
    pub sub_department: Option<String>,
}

impl Patient {
    pub fn is_female(&self) -> bool {
        self.gender
            .as_deref()
            .is_some_and(|g| g.trim().eq_ignore_ascii_case("female"))
    }
}
