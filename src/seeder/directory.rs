//! Reference data read once per run: staff, departments, sub-departments.

use serde_json::Value;

use super::SeedError;
use crate::models::{Department, RecordId, StaffMember};
use crate::models::enums::StaffRole;
use crate::store::{from_rows, text, Direction, Query, RowStore};

/// Comparable text form of a store id (`7` and `"7"` are the same key).
pub fn id_key(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn same_id(a: &Value, b: &Value) -> bool {
    matches!((id_key(a), id_key(b)), (Some(x), Some(y)) if x == y)
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub staff: Vec<StaffMember>,
    pub departments: Vec<Department>,
    pub sub_departments: Vec<Department>,
}

impl Directory {
    pub fn load(store: &dyn RowStore) -> Result<Self, SeedError> {
        let staff: Vec<StaffMember> = from_rows(
            &store.select("staff", &Query::all().columns("id, role, department_id, full_name"))?,
        )?;
        let departments: Vec<Department> =
            from_rows(&store.select("departments", &Query::all().columns("id, name"))?)?;
        let sub_departments: Vec<Department> =
            from_rows(&store.select("sub_departments", &Query::all().columns("id, name"))?)?;

        tracing::info!(
            staff = staff.len(),
            departments = departments.len(),
            sub_departments = sub_departments.len(),
            "Loaded reference data"
        );
        Ok(Self {
            staff,
            departments,
            sub_departments,
        })
    }

    fn find_by_name<'a>(list: &'a [Department], name: &str) -> Option<&'a RecordId> {
        let name = name.trim();
        list.iter()
            .find(|d| {
                d.name
                    .as_deref()
                    .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
            })
            .map(|d| &d.id)
    }

    pub fn department_id(&self, name: &str) -> Option<&RecordId> {
        Self::find_by_name(&self.departments, name)
    }

    pub fn sub_department_id(&self, name: &str) -> Option<&RecordId> {
        Self::find_by_name(&self.sub_departments, name)
    }

    /// The doctor appointments in `department_id` are booked with.
    /// With several doctors in a department, the last one listed wins.
    pub fn doctor_for_department(&self, department_id: &RecordId) -> Option<&RecordId> {
        self.staff
            .iter()
            .filter(|s| s.has_role(StaffRole::Doctor))
            .filter(|s| s.department_id.as_ref().is_some_and(|d| same_id(d, department_id)))
            .map(|s| &s.id)
            .last()
    }

    /// Name of the department `doctor_id` belongs to.
    pub fn department_of(&self, doctor_id: &RecordId) -> Option<&str> {
        let dept = self
            .staff
            .iter()
            .find(|s| same_id(&s.id, doctor_id))?
            .department_id
            .as_ref()?;
        self.departments
            .iter()
            .find(|d| same_id(&d.id, dept))
            .and_then(|d| d.name.as_deref())
    }

    pub fn staff_ids(&self) -> Vec<&RecordId> {
        self.staff.iter().map(|s| &s.id).collect()
    }

    pub fn first_of_role(&self, role: StaffRole) -> Option<&RecordId> {
        self.staff.iter().find(|s| s.has_role(role)).map(|s| &s.id)
    }

    /// Therapists of `department_id`; every therapist when that department has none.
    pub fn therapist_pool(&self, department_id: Option<&RecordId>) -> Vec<&RecordId> {
        let therapists = || self.staff.iter().filter(|s| s.has_role(StaffRole::Therapist));
        let in_department: Vec<&RecordId> = match department_id {
            Some(dept) => therapists()
                .filter(|s| s.department_id.as_ref().is_some_and(|d| same_id(d, dept)))
                .map(|s| &s.id)
                .collect(),
            None => Vec::new(),
        };
        if in_department.is_empty() {
            therapists().map(|s| &s.id).collect()
        } else {
            in_department
        }
    }
}

/// Patient fields copied onto case sheets and discharge summaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Demographics {
    pub patient_name: Option<String>,
    pub age: Option<Value>,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
}

impl Demographics {
    pub fn is_female(&self) -> bool {
        self.gender
            .as_deref()
            .is_some_and(|g| g.trim().eq_ignore_ascii_case("female"))
    }
}

/// Demographics of `uhid`; all-empty when the patient row is missing.
pub fn demographics(store: &dyn RowStore, uhid: &str) -> Result<Demographics, SeedError> {
    let rows = store.select(
        "patients",
        &Query::all()
            .columns("full_name, age, gender, mobile, address")
            .eq("uhid", uhid)
            .limit(1),
    )?;
    let Some(row) = rows.first() else {
        tracing::warn!(uhid, "No patient row for admission");
        return Ok(Demographics::default());
    };
    Ok(Demographics {
        patient_name: text(row, "full_name"),
        age: row.get("age").filter(|v| !v.is_null()).cloned(),
        gender: text(row, "gender"),
        contact: text(row, "mobile"),
        address: text(row, "address"),
    })
}

/// Department of the most recent appointment of `uhid`, if any.
pub fn latest_appointment_department(
    store: &dyn RowStore,
    uhid: &str,
) -> Result<Option<RecordId>, SeedError> {
    let rows = store.select(
        "appointments",
        &Query::all()
            .columns("appointment_date, department_id")
            .eq("uhid", uhid)
            .order("appointment_date", Direction::Desc)
            .limit(1),
    )?;
    Ok(rows
        .first()
        .and_then(|r| r.get("department_id"))
        .filter(|v| !v.is_null())
        .cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Row, SqliteStore};
    use serde_json::json;

    fn row(v: Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    fn directory() -> Directory {
        let staff = vec![
            json!({"id": 1, "role": "doctor", "department_id": 10}),
            json!({"id": 2, "role": "doctor", "department_id": 10}),
            json!({"id": 3, "role": "nurse"}),
            json!({"id": 4, "role": "therapist", "department_id": 11}),
            json!({"id": 5, "role": "therapist", "department_id": "12"}),
        ];
        Directory {
            staff: staff.into_iter().map(|s| serde_json::from_value(s).unwrap()).collect(),
            departments: vec![
                Department { id: json!(10), name: Some("Kayachikitsa".into()) },
                Department { id: json!(11), name: Some("Shalya".into()) },
                Department { id: json!(13), name: None },
            ],
            sub_departments: vec![Department { id: json!(20), name: Some("Panchakarma".into()) }],
        }
    }

    #[test]
    fn last_listed_doctor_wins() {
        let dir = directory();
        assert_eq!(dir.doctor_for_department(&json!(10)), Some(&json!(2)));
        assert_eq!(dir.doctor_for_department(&json!(11)), None);
    }

    #[test]
    fn names_match_ignoring_case() {
        let dir = directory();
        assert_eq!(dir.department_id("kayachikitsa "), Some(&json!(10)));
        assert_eq!(dir.sub_department_id("Panchakarma"), Some(&json!(20)));
        assert_eq!(dir.department_id("Unknown"), None);
    }

    #[test]
    fn doctor_department_name() {
        let dir = directory();
        assert_eq!(dir.department_of(&json!(1)), Some("Kayachikitsa"));
        assert_eq!(dir.department_of(&json!(3)), None);
        assert_eq!(dir.department_of(&json!(99)), None);
    }

    #[test]
    fn therapist_pool_falls_back_to_everyone() {
        let dir = directory();
        assert_eq!(dir.therapist_pool(Some(&json!(11))), vec![&json!(4)]);
        // Numeric and text ids compare equal.
        assert_eq!(dir.therapist_pool(Some(&json!(12))), vec![&json!(5)]);
        assert_eq!(dir.therapist_pool(Some(&json!(10))).len(), 2);
        assert_eq!(dir.therapist_pool(None).len(), 2);
    }

    #[test]
    fn first_nurse() {
        assert_eq!(directory().first_of_role(StaffRole::Nurse), Some(&json!(3)));
    }

    #[test]
    fn unnamed_department_rows_load_but_never_match() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(
                "departments",
                &[
                    row(json!({"id": 1, "name": null})),
                    row(json!({"id": 2, "name": "Shalya"})),
                ],
            )
            .unwrap();
        store
            .insert("staff", &[row(json!({"id": 9, "role": "doctor", "department_id": 1}))])
            .unwrap();

        let dir = Directory::load(&store).unwrap();
        assert_eq!(dir.departments.len(), 2);
        assert_eq!(dir.department_id("Shalya"), Some(&json!(2)));
        assert_eq!(dir.department_id(""), None);
        assert_eq!(dir.department_of(&json!(9)), None);
    }

    #[test]
    fn demographics_of_missing_patient_are_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(demographics(&store, "U404").unwrap(), Demographics::default());
    }

    #[test]
    fn demographics_and_latest_department() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(
                "patients",
                &[row(json!({"uhid": "U1", "full_name": "Asha", "age": 40, "gender": "Female", "mobile": "99"}))],
            )
            .unwrap();
        store
            .insert(
                "appointments",
                &[
                    row(json!({"uhid": "U1", "appointment_date": "2025-01-10", "status": "seen", "department_id": 10})),
                    row(json!({"uhid": "U1", "appointment_date": "2025-02-01", "status": "seen", "department_id": 11})),
                ],
            )
            .unwrap();

        let demo = demographics(&store, "U1").unwrap();
        assert!(demo.is_female());
        assert_eq!(demo.age, Some(json!(40)));
        assert_eq!(demo.contact.as_deref(), Some("99"));

        assert_eq!(
            latest_appointment_department(&store, "U1").unwrap(),
            Some(json!(11))
        );
        assert_eq!(latest_appointment_department(&store, "U2").unwrap(), None);
    }
}
