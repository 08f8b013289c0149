pub mod calendar;
pub mod config;
pub mod ids;
pub mod models;
pub mod seeder; // Registration and clinical phases
pub mod sheet; // CSV spreadsheet input
pub mod store; // Row store backends (PostgREST, SQLite)

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use config::{SeederConfig, StoreTarget};
use seeder::{
    register, seed_clinical, Catalogs, ClinicalOptions, ClinicalReport, RegistrationReport,
    SeedError, CLINICAL_FOREIGN_KEYS,
};
use store::{RestStore, RowStore, SqliteStore, StoreError};

/// Seconds before a remote store request is abandoned.
const REMOTE_TIMEOUT_SECS: u64 = 60;

/// Which phases a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Register,
    Clinical,
    All,
}

impl Phase {
    fn registers(self) -> bool {
        matches!(self, Phase::Register | Phase::All)
    }

    fn seeds_clinical(self) -> bool {
        matches!(self, Phase::Clinical | Phase::All)
    }
}

/// Reports of the phases that ran.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub registration: Option<RegistrationReport>,
    pub clinical: Option<ClinicalReport>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.clinical.as_ref().map_or(true, ClinicalReport::is_success)
    }
}

/// Install the fmt subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Open the configured store. The local store enforces the clinical
/// foreign keys the hosted database declares.
pub fn open_store(target: &StoreTarget) -> Result<Box<dyn RowStore>, StoreError> {
    match target {
        StoreTarget::Remote { url, service_key } => {
            tracing::info!(url = %url, "Using remote store");
            Ok(Box::new(RestStore::new(url, service_key, REMOTE_TIMEOUT_SECS)?))
        }
        StoreTarget::Local { path } => {
            tracing::info!(path = %path.display(), "Using local store");
            let store = SqliteStore::open(path)?.with_constraints(CLINICAL_FOREIGN_KEYS.iter().cloned());
            Ok(Box::new(store))
        }
    }
}

/// Run the requested phases against `store`.
pub fn run(
    config: &SeederConfig,
    store: &dyn RowStore,
    phase: Phase,
) -> Result<RunOutcome, SeedError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let records = sheet::read_patient_sheet(&config.patients_csv)?;
    tracing::info!(
        file = %config.patients_csv.display(),
        rows = records.len(),
        "Read patient sheet"
    );

    let mut outcome = RunOutcome::default();
    if phase.registers() {
        outcome.registration = Some(register(store, &records, config.admissions_per_run, &mut rng)?);
    }

    if phase.seeds_clinical() {
        let catalogs = Catalogs::load(
            store,
            config.medications_csv.as_deref(),
            config.procedures_csv.as_deref(),
        )?;
        let uhids: HashSet<String> = records.iter().map(|r| r.uhid.clone()).collect();
        let options = ClinicalOptions {
            only: config.only_admissions.clone(),
            keep_going: config.keep_going,
        };
        outcome.clinical = Some(seed_clinical(store, &uhids, &catalogs, &options, &mut rng)?);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    use crate::store::{text, Query};

    fn sheet_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "uhid,full_name,Gender,Age,mobile,aadhar,address,created_at,complaints,Department,Sub Department"
        )
        .unwrap();
        writeln!(file, "U1,asha devi,female,40,999,,Pune,2025-01-10 09:30:00,Back pain,kayachikitsa,").unwrap();
        writeln!(file, "U2,ravi kumar,male,52,888,,Pune,2025-01-11 10:00:00,,kayachikitsa,").unwrap();
        file.flush().unwrap();
        file
    }

    fn reference_data(store: &dyn RowStore) {
        let row = |v: serde_json::Value| v.as_object().cloned().unwrap();
        store
            .insert("departments", &[row(serde_json::json!({"id": "d-1", "name": "Kayachikitsa"}))])
            .unwrap();
        store
            .insert(
                "staff",
                &[
                    row(serde_json::json!({"id": "doc-1", "role": "doctor", "department_id": "d-1"})),
                    row(serde_json::json!({"id": "n-1", "role": "nurse"})),
                ],
            )
            .unwrap();
    }

    #[test]
    fn phases_select_work() {
        assert!(Phase::All.registers() && Phase::All.seeds_clinical());
        assert!(!Phase::Register.seeds_clinical());
        assert!(!Phase::Clinical.registers());
    }

    #[test]
    fn full_run_registers_then_seeds() {
        let sheet = sheet_file();
        let dir = tempfile::tempdir().unwrap();
        let target = StoreTarget::Local {
            path: dir.path().join("nested").join("seed.db"),
        };
        let store = open_store(&target).unwrap();
        reference_data(store.as_ref());

        let mut config = SeederConfig::new(target, PathBuf::from(sheet.path()));
        config.seed = Some(7);
        let outcome = run(&config, store.as_ref(), Phase::All).unwrap();

        let registration = outcome.registration.as_ref().unwrap();
        assert_eq!(registration.patients_inserted, 2);
        assert_eq!(registration.admissions.len(), 2);
        let clinical = outcome.clinical.as_ref().unwrap();
        assert_eq!(clinical.succeeded.len(), 2);
        assert!(outcome.is_success());

        let sheets = store.select("ipd_case_sheets", &Query::all()).unwrap();
        assert_eq!(sheets.len(), 2);
        assert!(sheets.iter().all(|s| text(s, "ipd_no").is_some()));
    }

    #[test]
    fn clinical_only_run_without_admissions_succeeds() {
        let sheet = sheet_file();
        let store = SqliteStore::open_in_memory().unwrap();
        let config = SeederConfig::new(
            StoreTarget::Local { path: PathBuf::from("unused.db") },
            PathBuf::from(sheet.path()),
        );
        let outcome = run(&config, &store, Phase::Clinical).unwrap();
        assert!(outcome.registration.is_none());
        assert_eq!(outcome.clinical, Some(ClinicalReport::default()));
        assert!(outcome.is_success());
    }

    #[test]
    fn missing_sheet_is_an_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = SeederConfig::new(
            StoreTarget::Local { path: PathBuf::from("unused.db") },
            PathBuf::from("/nonexistent/patients.csv"),
        );
        assert!(matches!(
            run(&config, &store, Phase::Register),
            Err(SeedError::Sheet(_))
        ));
    }
}
