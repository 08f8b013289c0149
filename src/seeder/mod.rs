//! The two seeding phases.
//!
//! Registration turns spreadsheet rows into patients, appointments, OPD
//! visits and a random handful of IPD admissions. The clinical phase fills
//! every admission of the sheet's patients with generated sub-records,
//! replacing whatever an earlier run left behind.

pub mod cascade;
pub mod catalogs;
pub mod clinical;
pub mod directory;
pub mod registration;
pub mod vocab;

pub use cascade::{clinical_graph, Cascade, DependencyGraph, CLINICAL_FOREIGN_KEYS};
pub use catalogs::Catalogs;
pub use clinical::{seed_clinical, AdmissionFailure, ClinicalOptions, ClinicalReport};
pub use directory::Directory;
pub use registration::{register, RegistrationReport};

use thiserror::Error;

use crate::ids::IdError;
use crate::sheet::SheetError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error("Dependency graph has a cycle through: {0}")]
    DependencyCycle(String),

    #[error("{table}: {expected} rows inserted but {returned} ids returned")]
    MissingStoredId {
        table: String,
        expected: usize,
        returned: usize,
    },
}
