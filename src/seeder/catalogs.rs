//! Medication and procedure names the clinical generators pick from.
//!
//! Sources in order: the exported catalog files given on the command line,
//! then the store's own `medications` / `procedures` tables, then a small
//! built-in list.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{vocab, SeedError};
use crate::sheet::{read_medication_names, read_procedure_templates, ProcedureTemplate, SheetError};
use crate::store::{text, Query, RowStore};

/// Store catalogs are sampled, not read in full.
const STORE_CATALOG_LIMIT: usize = 100;

/// A catalog file that cannot be read counts as empty.
fn from_file<T>(path: &Path, read: impl FnOnce(&Path) -> Result<Vec<T>, SheetError>) -> Vec<T> {
    match read(path) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Catalog unreadable, falling back");
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    pub medications: Vec<String>,
    pub procedures: Vec<ProcedureTemplate>,
}

impl Catalogs {
    pub fn load(
        store: &dyn RowStore,
        medications_csv: Option<&Path>,
        procedures_csv: Option<&Path>,
    ) -> Result<Self, SeedError> {
        let mut medications = medications_csv
            .map(|path| from_file(path, read_medication_names))
            .unwrap_or_default();
        if medications.is_empty() {
            medications = store
                .select(
                    "medications",
                    &Query::all().columns("product_name").limit(STORE_CATALOG_LIMIT),
                )?
                .iter()
                .filter_map(|r| text(r, "product_name"))
                .filter(|n| !n.trim().is_empty())
                .collect();
        }
        if medications.is_empty() {
            medications = vocab::FALLBACK_MEDICATIONS.iter().map(|s| s.to_string()).collect();
        }

        let mut procedures = procedures_csv
            .map(|path| from_file(path, read_procedure_templates))
            .unwrap_or_default();
        if procedures.is_empty() {
            procedures = store
                .select(
                    "procedures",
                    &Query::all()
                        .columns("procedure_name, requirements, quantity")
                        .limit(STORE_CATALOG_LIMIT),
                )?
                .iter()
                .filter_map(|r| {
                    Some(ProcedureTemplate {
                        procedure_name: text(r, "procedure_name").filter(|n| !n.trim().is_empty())?,
                        requirements: text(r, "requirements"),
                        quantity: text(r, "quantity"),
                    })
                })
                .collect();
        }

        tracing::info!(
            medications = medications.len(),
            procedures = procedures.len(),
            "Loaded catalogs"
        );
        Ok(Self {
            medications,
            procedures,
        })
    }

    /// A random catalog procedure, or a generic placeholder when no catalog has any.
    pub fn pick_procedure<R: Rng + ?Sized>(&self, rng: &mut R) -> ProcedureTemplate {
        self.procedures
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| ProcedureTemplate {
                procedure_name: vocab::FALLBACK_PROCEDURE.to_string(),
                requirements: None,
                quantity: None,
            })
    }
}
