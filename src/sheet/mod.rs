//! Spreadsheet input, read from CSV exports.

pub mod catalog;
pub mod patients;

pub use catalog::*;
pub use patients::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file}: missing column '{column}'")]
    MissingColumn { file: PathBuf, column: String },
}

/// Title case: every letter that follows a non-letter is
/// upper-cased, every other letter lower-cased. Surrounding space is trimmed.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_is_letter = false;
    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Blank cells are absent values.
pub fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
        .map(str::to_string)
}
