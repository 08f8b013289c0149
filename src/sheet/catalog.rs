use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{non_blank, SheetError};

/// A procedure as listed in the procedures export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureTemplate {
    pub procedure_name: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
}

/// Distinct `product_name` values of a medications export, in sheet order.
pub fn read_medication_names(path: &Path) -> Result<Vec<String>, SheetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let col = position(&headers, "product_name").ok_or_else(|| SheetError::MissingColumn {
        file: path.to_path_buf(),
        column: "product_name".into(),
    })?;

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for result in reader.records() {
        let row = result?;
        if let Some(name) = non_blank(row.get(col)) {
            if seen.insert(name.clone()) {
                names.push(name);
            }
        }
    }
    Ok(names)
}

/// Rows of a procedures export; blank names are dropped.
pub fn read_procedure_templates(path: &Path) -> Result<Vec<ProcedureTemplate>, SheetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let name_col =
        position(&headers, "procedure_name").ok_or_else(|| SheetError::MissingColumn {
            file: path.to_path_buf(),
            column: "procedure_name".into(),
        })?;
    let req_col = position(&headers, "requirements");
    let qty_col = position(&headers, "quantity");

    let mut templates = Vec::new();
    for result in reader.records() {
        let row = result?;
        let Some(procedure_name) = non_blank(row.get(name_col)) else {
            continue;
        };
        templates.push(ProcedureTemplate {
            procedure_name,
            requirements: req_col.and_then(|c| non_blank(row.get(c))),
            quantity: qty_col.and_then(|c| non_blank(row.get(c))),
        });
    }
    Ok(templates)
}

fn position(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}
