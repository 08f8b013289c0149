use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::enums::StaffRole;
use super::RecordId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: RecordId,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department_id: Option<RecordId>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl StaffMember {
    /// Known role, or `None` for roles this tool does not use.
    pub fn role(&self) -> Option<StaffRole> {
        self.role.as_deref().and_then(|r| StaffRole::from_str(r).ok())
    }

    pub fn has_role(&self, role: StaffRole) -> bool {
        self.role() == Some(role)
    }
}

/// Row of `departments` or `sub_departments`. The name column is nullable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
}
