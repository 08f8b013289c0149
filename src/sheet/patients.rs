use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;

use super::{non_blank, title_case, SheetError};
use crate::calendar::parse_datetime_loose;
use crate::models::PatientRecord;

/// Columns every patient sheet must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "uhid",
    "full_name",
    "Gender",
    "Age",
    "mobile",
    "aadhar",
    "address",
    "created_at",
    "complaints",
    "Department",
];

/// Optional column; absent in older exports.
pub const SUB_DEPARTMENT_COLUMN: &str = "Sub Department";

/// Read the patient sheet. Rows without a UHID or a parsable `created_at`
/// are skipped with a warning; a missing required column fails the load.
pub fn read_patient_sheet(path: &Path) -> Result<Vec<PatientRecord>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let index = column_index(&headers);
    for column in REQUIRED_COLUMNS {
        if !index.contains_key(column) {
            return Err(SheetError::MissingColumn {
                file: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let row = result?;
        let cell = |name: &str| index.get(name).and_then(|&i| row.get(i));

        let Some(uhid) = non_blank(cell("uhid")) else {
            tracing::warn!(row = line + 2, "Skipping sheet row without uhid");
            continue;
        };
        let Some(created_at) = cell("created_at").and_then(parse_datetime_loose) else {
            tracing::warn!(row = line + 2, uhid = %uhid, "Skipping sheet row with unreadable created_at");
            continue;
        };

        records.push(PatientRecord {
            uhid,
            full_name: non_blank(cell("full_name")),
            gender: non_blank(cell("Gender")),
            age: non_blank(cell("Age")).and_then(|a| parse_age(&a)),
            mobile: non_blank(cell("mobile")).map(|m| clean_numeric_text(&m)),
            aadhaar: non_blank(cell("aadhar")).map(|a| clean_numeric_text(&a)),
            address: non_blank(cell("address")),
            created_at,
            complaints: non_blank(cell("complaints")),
            department: non_blank(cell("Department")).map(|d| title_case(&d)),
            sub_department: non_blank(cell(SUB_DEPARTMENT_COLUMN)).map(|d| title_case(&d)),
        });
    }

    tracing::info!(file = %path.display(), rows = records.len(), "Loaded patient sheet");
    Ok(records)
}

pub(crate) fn column_index(headers: &StringRecord) -> HashMap<&'static str, usize> {
    let mut index = HashMap::new();
    let known = REQUIRED_COLUMNS
        .iter()
        .chain(std::iter::once(&SUB_DEPARTMENT_COLUMN));
    for name in known {
        if let Some(pos) = headers.iter().position(|h| h.trim() == *name) {
            index.insert(*name, pos);
        }
    }
    index
}

/// Spreadsheet exports turn whole numbers into `42.0`.
fn parse_age(raw: &str) -> Option<u32> {
    raw.parse::<u32>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u32))
}

/// Strip the `.0` a numeric spreadsheet cell picks up on export.
fn clean_numeric_text(raw: &str) -> String {
    match raw.strip_suffix(".0") {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            digits.to_string()
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "uhid,full_name,Gender,Age,mobile,aadhar,address,created_at,complaints,Department,Sub Department";

    fn write_sheet(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        write!(file, "{body}").unwrap();
        file
    }

    #[test]
    fn reads_and_normalizes_rows() {
        let file = write_sheet(
            "U1,Asha Rao,Female,42.0,9876543210.0,123412341234,Pune,2025-05-10 10:30:00,Knee pain, kayachikitsa ,panchakarma\n",
        );
        let records = read_patient_sheet(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.uhid, "U1");
        assert_eq!(r.age, Some(42));
        assert_eq!(r.mobile.as_deref(), Some("9876543210"));
        assert_eq!(r.department.as_deref(), Some("Kayachikitsa"));
        assert_eq!(r.sub_department.as_deref(), Some("Panchakarma"));
        assert_eq!(r.created_at.date().to_string(), "2025-05-10");
    }

    #[test]
    fn skips_rows_without_uhid_or_date() {
        let file = write_sheet(
            ",Nobody,Male,30,,,,2025-05-10,,Shalya,\nU2,Ravi,Male,30,,,,not a date,,Shalya,\nU3,Mina,Female,25,,,,2025-05-11,,Shalya,\n",
        );
        let records = read_patient_sheet(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].uhid, "U3");
        assert_eq!(records[0].sub_department, None);
    }

    #[test]
    fn missing_required_column_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "uhid,full_name").unwrap();
        writeln!(file, "U1,Asha").unwrap();
        let err = read_patient_sheet(file.path()).unwrap_err();
        assert!(matches!(err, SheetError::MissingColumn { ref column, .. } if column == "Gender"));
    }

    #[test]
    fn sub_department_column_is_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "uhid,full_name,Gender,Age,mobile,aadhar,address,created_at,complaints,Department"
        )
        .unwrap();
        writeln!(file, "U1,Asha,Female,40,,,,2025-05-10,,Shalya").unwrap();
        let records = read_patient_sheet(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sub_department, None);
    }

    #[test]
    fn numeric_cleanup_only_touches_whole_numbers() {
        assert_eq!(clean_numeric_text("98765.0"), "98765");
        assert_eq!(clean_numeric_text("+91 98765.0"), "+91 98765.0");
        assert_eq!(clean_numeric_text("12.5"), "12.5");
        assert_eq!(parse_age("abc"), None);
        assert_eq!(parse_age("-3"), None);
    }
}
