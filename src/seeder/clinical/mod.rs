//! Phase 2: generated clinical records for every admission of the sheet's patients.
//!
//! Builders in the submodules are pure: they turn an [`AdmissionContext`]
//! and a random source into typed rows. [`seed_admission`] runs them in a
//! fixed order and writes each table through the [`Cascade`], so a re-run
//! replaces an admission's records instead of adding to them.

pub mod case_sheet;
pub mod charts;
pub mod medication;
pub mod procedure;
pub mod summary;

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use rand::Rng;
use serde::Serialize;

use super::cascade::{clinical_graph, Cascade};
use super::catalogs::Catalogs;
use super::directory::{demographics, latest_appointment_department, Demographics, Directory};
use super::SeedError;
use crate::calendar::random_date_in_month;
use crate::models::enums::StaffRole;
use crate::models::{IpdAdmission, RecordId};
use crate::store::{ids_of, to_rows, Query, Row, RowStore};

/// Column every per-admission table is keyed by.
pub const ADMISSION_KEY: &str = "ipd_no";

#[derive(Debug, Clone, Default)]
pub struct ClinicalOptions {
    /// Only these admissions; empty means every admission of the sheet's patients.
    pub only: Vec<String>,
    /// Continue with the next admission after a failure.
    pub keep_going: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdmissionFailure {
    pub ipd_no: String,
    pub error: String,
}

/// Outcome per admission. Admissions that were written stay written even
/// when a later one fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClinicalReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<AdmissionFailure>,
    /// Not attempted because the run stopped at a failure.
    pub not_attempted: Vec<String>,
}

impl ClinicalReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.not_attempted.is_empty()
    }

    /// Admissions a follow-up `--only` run should cover.
    pub fn remaining(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|f| f.ipd_no.clone())
            .chain(self.not_attempted.iter().cloned())
            .collect()
    }
}

/// Everything the builders know about one admission.
#[derive(Debug, Clone)]
pub struct AdmissionContext<'a> {
    pub admission: &'a IpdAdmission,
    /// Admission date, or today when the stored one is missing or unreadable.
    pub base: NaiveDate,
    pub anchor: NaiveDate,
    pub discharge: Option<NaiveDate>,
    pub department: Option<String>,
    pub patient: Demographics,
}

impl<'a> AdmissionContext<'a> {
    pub fn new<R: Rng + ?Sized>(
        admission: &'a IpdAdmission,
        department: Option<String>,
        patient: Demographics,
        rng: &mut R,
    ) -> Self {
        let base = admission
            .admitted_on()
            .unwrap_or_else(|| Utc::now().date_naive());
        Self {
            admission,
            base,
            anchor: random_date_in_month(rng, base),
            discharge: admission.discharged_on(),
            department,
            patient,
        }
    }

    pub fn ipd_no(&self) -> &str {
        &self.admission.ipd_no
    }

    /// The anchor for the first entry of a series, any day of the month after that.
    pub fn series_day<R: Rng + ?Sized>(&self, rng: &mut R, index: usize) -> NaiveDate {
        if index == 0 {
            self.anchor
        } else {
            random_date_in_month(rng, self.base)
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ`.
pub fn stamp(day: NaiveDate, time: &str) -> String {
    format!("{day}T{time}Z")
}

/// Admissions whose patient is in the sheet, narrowed to `only` when given.
pub fn sheet_admissions(
    store: &dyn RowStore,
    sheet_uhids: &HashSet<String>,
    only: &[String],
) -> Result<Vec<IpdAdmission>, SeedError> {
    let rows = store.select("ipd_admissions", &Query::all())?;
    let total = rows.len();
    let mut admissions = Vec::new();
    for row in rows {
        let admission: IpdAdmission = match serde_json::from_value(serde_json::Value::Object(row)) {
            Ok(a) => a,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable admission row");
                continue;
            }
        };
        if !sheet_uhids.contains(&admission.uhid) {
            continue;
        }
        if !only.is_empty() && !only.contains(&admission.ipd_no) {
            continue;
        }
        admissions.push(admission);
    }
    for wanted in only {
        if !admissions.iter().any(|a| &a.ipd_no == wanted) {
            tracing::warn!(ipd_no = %wanted, "Requested admission not found among sheet admissions");
        }
    }
    tracing::info!(total, selected = admissions.len(), "Selected admissions from sheet patients");
    Ok(admissions)
}

/// Generate clinical records for each admission in turn.
pub fn seed_clinical<R: Rng + ?Sized>(
    store: &dyn RowStore,
    sheet_uhids: &HashSet<String>,
    catalogs: &Catalogs,
    options: &ClinicalOptions,
    rng: &mut R,
) -> Result<ClinicalReport, SeedError> {
    let graph = clinical_graph()?;
    let cascade = Cascade::new(store, &graph);
    let directory = Directory::load(store)?;
    let admissions = sheet_admissions(store, sheet_uhids, &options.only)?;

    let mut report = ClinicalReport::default();
    if admissions.is_empty() {
        tracing::warn!("No admissions for sheet patients; run registration first");
        return Ok(report);
    }

    let total = admissions.len();
    for (i, admission) in admissions.iter().enumerate() {
        tracing::info!(ipd_no = %admission.ipd_no, uhid = %admission.uhid, n = i + 1, total, "Seeding admission");
        match seed_admission(&cascade, &directory, catalogs, admission, rng) {
            Ok(()) => report.succeeded.push(admission.ipd_no.clone()),
            Err(e) => {
                tracing::error!(ipd_no = %admission.ipd_no, error = %e, "Admission failed");
                report.failed.push(AdmissionFailure {
                    ipd_no: admission.ipd_no.clone(),
                    error: e.to_string(),
                });
                if !options.keep_going {
                    report.not_attempted = admissions[i + 1..]
                        .iter()
                        .map(|a| a.ipd_no.clone())
                        .collect();
                    break;
                }
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded.len(),
        failed = report.failed.len(),
        not_attempted = report.not_attempted.len(),
        "Clinical seeding finished"
    );
    Ok(report)
}

fn replace_all<T: Serialize>(
    cascade: &Cascade<'_>,
    table: &str,
    ipd_no: &str,
    records: &[T],
) -> Result<Vec<Row>, SeedError> {
    cascade.replace(table, ADMISSION_KEY, ipd_no, &to_rows(records)?)
}

/// Ids of the rows just stored, in insertion order. Child records are keyed
/// by position, so a row coming back without an id fails the admission.
fn stored_ids(table: &str, stored: &[Row], expected: usize) -> Result<Vec<RecordId>, SeedError> {
    let ids = ids_of(stored);
    if stored.len() != expected || ids.len() != expected {
        return Err(SeedError::MissingStoredId {
            table: table.to_string(),
            expected,
            returned: ids.len(),
        });
    }
    Ok(ids)
}

/// Replace every clinical table of one admission.
pub fn seed_admission<R: Rng + ?Sized>(
    cascade: &Cascade<'_>,
    directory: &Directory,
    catalogs: &Catalogs,
    admission: &IpdAdmission,
    rng: &mut R,
) -> Result<(), SeedError> {
    let store = cascade.store();
    let department = admission
        .doctor_id
        .as_ref()
        .and_then(|d| directory.department_of(d))
        .map(str::to_string);
    let patient = demographics(store, &admission.uhid)?;
    let ctx = AdmissionContext::new(admission, department, patient, rng);
    let ipd_no = ctx.ipd_no();
    let staff = directory.staff_ids();

    replace_all(cascade, case_sheet::TABLE, ipd_no, &[case_sheet::build(&ctx, rng)])?;

    // Medication orders, then what hangs off them.
    let medications = medication::build_internal_medications(&ctx, catalogs, rng);
    let stored = replace_all(cascade, medication::ORDERS_TABLE, ipd_no, &medications)?;
    let medication_ids = stored_ids(medication::ORDERS_TABLE, &stored, medications.len())?;
    let requests = medication::build_dispense_requests(&ctx, &medication_ids);
    let stored_requests = replace_all(cascade, medication::REQUESTS_TABLE, ipd_no, &requests)?;
    let request_ids = stored_ids(medication::REQUESTS_TABLE, &stored_requests, requests.len())?;
    let dispensed = medication::build_dispensed(&ctx, &request_ids);
    store.insert(medication::DISPENSED_TABLE, &to_rows(&dispensed)?)?;

    let charts = medication::build_charts(&ctx, &medications);
    let stored_charts = replace_all(cascade, medication::CHARTS_TABLE, ipd_no, &charts)?;
    let chart_keys: Vec<_> = stored_ids(medication::CHARTS_TABLE, &stored_charts, charts.len())?
        .into_iter()
        .zip(charts.iter().map(|c| c.start_date))
        .collect();
    let entries = medication::build_administration_entries(&ctx, &chart_keys, rng);
    store.insert(medication::ENTRIES_TABLE, &to_rows(&entries)?)?;

    // Procedures and their assignments, requirements and sessions.
    let procedures = procedure::build_entries(&ctx, catalogs, rng);
    let stored_procedures = replace_all(cascade, procedure::ENTRIES_TABLE, ipd_no, &procedures)?;
    let procedure_ids = stored_ids(procedure::ENTRIES_TABLE, &stored_procedures, procedures.len())?;
    let procedure_keys: Vec<_> = procedure_ids
        .into_iter()
        .zip(procedures.iter().map(|p| p.start_date))
        .collect();
    let department_id = latest_appointment_department(store, &admission.uhid)?;
    let pool = directory.therapist_pool(department_id.as_ref());
    let assignments = procedure::build_assignments(&ctx, &procedure_keys, &pool, rng);
    replace_all(cascade, procedure::ASSIGNMENTS_TABLE, ipd_no, &assignments)?;
    let requirement_requests = procedure::build_requirement_requests(&ctx, &procedure_keys, rng);
    let stored_requirements =
        replace_all(cascade, procedure::REQUIREMENTS_TABLE, ipd_no, &requirement_requests)?;
    let requirement_ids = stored_ids(
        procedure::REQUIREMENTS_TABLE,
        &stored_requirements,
        requirement_requests.len(),
    )?;
    let dispensed = procedure::build_dispensed_requirements(&ctx, &requirement_ids, rng);
    store.insert(procedure::DISPENSED_TABLE, &to_rows(&dispensed)?)?;
    let sessions = procedure::build_sessions(&ctx, &procedure_keys, staff.first().copied(), rng);
    replace_all(cascade, procedure::SESSIONS_TABLE, ipd_no, &sessions)?;

    replace_all(
        cascade,
        summary::REFERRALS_TABLE,
        ipd_no,
        &[summary::build_referral(&ctx, &staff, rng)],
    )?;
    replace_all(
        cascade,
        summary::INVESTIGATIONS_TABLE,
        ipd_no,
        &[summary::build_investigation_request(&ctx, rng)],
    )?;
    replace_all(cascade, summary::BILLING_TABLE, ipd_no, &summary::build_billing(&ctx, rng))?;

    replace_all(
        cascade,
        charts::PAIN_ASSESSMENTS_TABLE,
        ipd_no,
        &[charts::build_pain_assessment(&ctx, rng)],
    )?;
    replace_all(
        cascade,
        charts::PAIN_MONITORING_TABLE,
        ipd_no,
        &charts::build_pain_monitoring(&ctx, &staff, rng),
    )?;
    let nurse = directory.first_of_role(StaffRole::Nurse);
    replace_all(cascade, charts::VITALS_TABLE, ipd_no, &charts::build_vitals(&ctx, nurse, rng))?;
    replace_all(cascade, charts::DIET_TABLE, ipd_no, &charts::build_diet(&ctx, rng))?;
    replace_all(
        cascade,
        charts::DAILY_ASSESSMENTS_TABLE,
        ipd_no,
        &charts::build_daily_assessments(&ctx, rng),
    )?;

    match summary::build_discharge_summary(&ctx, rng) {
        Some(discharge) => {
            replace_all(cascade, summary::DISCHARGE_TABLE, ipd_no, &[discharge])?;
        }
        None => tracing::debug!(ipd_no, "No discharge date, leaving discharge summary alone"),
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::seeder::cascade::CLINICAL_FOREIGN_KEYS;
    use crate::store::{text, SqliteStore};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    pub(crate) fn admission(discharge: Option<&str>) -> IpdAdmission {
        IpdAdmission {
            id: Some(json!(1)),
            ipd_no: "IPD-20250110-0001".into(),
            uhid: "U1".into(),
            opd_no: Some("OPD-20250110-0001".into()),
            doctor_id: Some(json!("doc-1")),
            ward: Some("General".into()),
            bed_number: Some("G-4".into()),
            admission_date: Some("2025-01-10".into()),
            discharge_date: discharge.map(str::to_string),
        }
    }

    pub(crate) fn context(admission: &IpdAdmission, female: bool) -> AdmissionContext<'_> {
        let patient = Demographics {
            patient_name: Some("Asha".into()),
            gender: Some(if female { "Female" } else { "Male" }.into()),
            ..Demographics::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        AdmissionContext::new(admission, Some("Kayachikitsa".into()), patient, &mut rng)
    }

    fn row(v: serde_json::Value) -> Row {
        v.as_object().cloned().unwrap()
    }

    const CLINICAL_TABLES: &[&str] = &[
        "ipd_case_sheets",
        "internal_medications",
        "medication_dispense_requests",
        "dispensed_medications",
        "medication_administration_charts",
        "medication_administration_entries",
        "procedure_entries",
        "therapist_assignments",
        "procedure_medicine_requirement_requests",
        "dispensed_procedure_requirements",
        "procedure_sessions",
        "referred_assessments",
        "requested_investigations",
        "billing_records",
        "pain_assessments",
        "pain_monitoring_charts",
        "bp_tpr_charts",
        "diet_sheets",
        "ipd_daily_assessments",
        "discharge_summaries",
    ];

    fn seeded_store() -> SqliteStore {
        let store = SqliteStore::open_in_memory()
            .unwrap()
            .with_constraints(CLINICAL_FOREIGN_KEYS.iter().cloned());
        store
            .insert("departments", &[row(json!({"id": "d-1", "name": "Kayachikitsa"}))])
            .unwrap();
        store
            .insert(
                "staff",
                &[
                    row(json!({"id": "doc-1", "role": "doctor", "department_id": "d-1"})),
                    row(json!({"id": "n-1", "role": "nurse"})),
                    row(json!({"id": "t-1", "role": "therapist", "department_id": "d-1"})),
                ],
            )
            .unwrap();
        store
            .insert(
                "patients",
                &[
                    row(json!({"uhid": "U1", "full_name": "Asha", "gender": "Female", "age": 40})),
                    row(json!({"uhid": "U2", "full_name": "Ravi", "gender": "Male", "age": 52})),
                ],
            )
            .unwrap();
        store
            .insert(
                "ipd_admissions",
                &[
                    row(json!({"ipd_no": "IPD-20250110-0001", "uhid": "U1", "opd_no": "OPD-20250110-0001",
                        "doctor_id": "doc-1", "ward": "General", "bed_number": "G-4",
                        "admission_date": "2025-01-10", "discharge_date": "2025-01-14"})),
                    row(json!({"ipd_no": "IPD-20250111-0001", "uhid": "U2", "opd_no": "OPD-20250111-0001",
                        "doctor_id": "doc-1", "admission_date": "2025-01-11", "discharge_date": null})),
                    row(json!({"ipd_no": "IPD-20250112-0001", "uhid": "OTHER",
                        "admission_date": "2025-01-12"})),
                ],
            )
            .unwrap();
        store
    }

    fn sheet_uhids() -> HashSet<String> {
        ["U1".to_string(), "U2".to_string()].into_iter().collect()
    }

    fn counts(store: &SqliteStore) -> Vec<usize> {
        CLINICAL_TABLES.iter().map(|t| store.count(t).unwrap()).collect()
    }

    #[test]
    fn only_sheet_patients_are_seeded() {
        let store = seeded_store();
        let mut rng = StdRng::seed_from_u64(3);
        let report = seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &ClinicalOptions::default(),
            &mut rng,
        )
        .unwrap();

        assert!(report.is_success());
        assert_eq!(report.succeeded, vec!["IPD-20250110-0001", "IPD-20250111-0001"]);
        let owners: HashSet<String> = store
            .select("ipd_case_sheets", &Query::all())
            .unwrap()
            .iter()
            .filter_map(|r| text(r, "ipd_no"))
            .collect();
        assert!(!owners.contains("IPD-20250112-0001"));
        // Only the discharged admission gets a summary.
        assert_eq!(store.count("discharge_summaries").unwrap(), 1);
    }

    #[test]
    fn rerun_replaces_instead_of_accumulating() {
        let store = seeded_store();
        let options = ClinicalOptions::default();

        let mut rng = StdRng::seed_from_u64(11);
        seed_clinical(&store, &sheet_uhids(), &Catalogs::default(), &options, &mut rng).unwrap();
        let first = counts(&store);

        let mut rng = StdRng::seed_from_u64(11);
        seed_clinical(&store, &sheet_uhids(), &Catalogs::default(), &options, &mut rng).unwrap();
        assert_eq!(counts(&store), first);
    }

    #[test]
    fn rerun_with_different_content_leaves_no_orphans() {
        let store = seeded_store();
        let options = ClinicalOptions::default();
        seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &options,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &options,
            &mut StdRng::seed_from_u64(2),
        )
        .unwrap();

        // Every dispense request points at a live medication order.
        let meds = ids_of(&store.select("internal_medications", &Query::all()).unwrap());
        for request in store.select("medication_dispense_requests", &Query::all()).unwrap() {
            assert!(meds.contains(&request["medication_id"]));
        }
        assert_eq!(
            store.count("medication_dispense_requests").unwrap(),
            store.count("internal_medications").unwrap()
        );
        assert_eq!(
            store.count("dispensed_medications").unwrap(),
            store.count("medication_dispense_requests").unwrap()
        );
        assert_eq!(
            store.count("medication_administration_charts").unwrap(),
            store.count("internal_medications").unwrap()
        );
    }

    #[test]
    fn only_narrows_the_run() {
        let store = seeded_store();
        let options = ClinicalOptions {
            only: vec!["IPD-20250111-0001".into()],
            keep_going: false,
        };
        let report = seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &options,
            &mut StdRng::seed_from_u64(4),
        )
        .unwrap();
        assert_eq!(report.succeeded, vec!["IPD-20250111-0001"]);
        assert_eq!(store.count("ipd_case_sheets").unwrap(), 1);
    }

    #[test]
    fn no_admissions_is_an_empty_success() {
        let store = SqliteStore::open_in_memory().unwrap();
        let report = seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &ClinicalOptions::default(),
            &mut StdRng::seed_from_u64(4),
        )
        .unwrap();
        assert_eq!(report, ClinicalReport::default());
    }

    /// Fails every billing insert for one admission.
    struct FailingStore {
        inner: SqliteStore,
        fail_for: &'static str,
    }

    impl RowStore for FailingStore {
        fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, crate::store::StoreError> {
            self.inner.select(table, query)
        }

        fn insert(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>, crate::store::StoreError> {
            if table == summary::BILLING_TABLE
                && rows.iter().any(|r| text(r, "ipd_no").as_deref() == Some(self.fail_for))
            {
                return Err(crate::store::StoreError::Status {
                    status: 500,
                    body: "boom".into(),
                });
            }
            self.inner.insert(table, rows)
        }

        fn delete(
            &self,
            table: &str,
            filters: &[crate::store::Filter],
        ) -> Result<usize, crate::store::StoreError> {
            self.inner.delete(table, filters)
        }
    }

    #[test]
    fn stops_at_first_failure_by_default() {
        let store = FailingStore {
            inner: seeded_store(),
            fail_for: "IPD-20250110-0001",
        };
        let report = seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &ClinicalOptions::default(),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].ipd_no, "IPD-20250110-0001");
        assert!(report.failed[0].error.contains("500"));
        assert_eq!(report.not_attempted, vec!["IPD-20250111-0001"]);
        // Records written before the failure stay in place.
        assert_eq!(store.inner.count("ipd_case_sheets").unwrap(), 1);
    }

    #[test]
    fn keep_going_records_every_outcome() {
        let store = FailingStore {
            inner: seeded_store(),
            fail_for: "IPD-20250110-0001",
        };
        let options = ClinicalOptions {
            only: Vec::new(),
            keep_going: true,
        };
        let report = seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &options,
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(report.succeeded, vec!["IPD-20250111-0001"]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.not_attempted.is_empty());
        assert_eq!(report.remaining(), vec!["IPD-20250110-0001".to_string()]);
    }

    /// Drops the ids from the rows one table hands back.
    struct IdlessStore {
        inner: SqliteStore,
        table: &'static str,
    }

    impl RowStore for IdlessStore {
        fn select(&self, table: &str, query: &Query) -> Result<Vec<Row>, crate::store::StoreError> {
            self.inner.select(table, query)
        }

        fn insert(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>, crate::store::StoreError> {
            let mut stored = self.inner.insert(table, rows)?;
            if table == self.table {
                if let Some(first) = stored.first_mut() {
                    first.remove("id");
                }
            }
            Ok(stored)
        }

        fn delete(
            &self,
            table: &str,
            filters: &[crate::store::Filter],
        ) -> Result<usize, crate::store::StoreError> {
            self.inner.delete(table, filters)
        }
    }

    #[test]
    fn stored_row_without_id_fails_the_admission() {
        let store = IdlessStore {
            inner: seeded_store(),
            table: medication::CHARTS_TABLE,
        };
        let report = seed_clinical(
            &store,
            &sheet_uhids(),
            &Catalogs::default(),
            &ClinicalOptions::default(),
            &mut StdRng::seed_from_u64(5),
        )
        .unwrap();
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].error.contains(medication::CHARTS_TABLE));
        // No administration entry was attached to a shifted chart.
        assert_eq!(store.inner.count(medication::ENTRIES_TABLE).unwrap(), 0);
    }

    #[test]
    fn stored_ids_require_one_id_per_row() {
        let rows = vec![row(json!({"id": 1})), row(json!({"id": null})), row(json!({"id": 3}))];
        let err = stored_ids("procedure_entries", &rows, 3).unwrap_err();
        assert!(matches!(
            err,
            SeedError::MissingStoredId { expected: 3, returned: 2, .. }
        ));
        assert!(stored_ids("procedure_entries", &rows[..1], 2).is_err());
        assert_eq!(
            stored_ids("procedure_entries", &rows[..1], 1).unwrap(),
            vec![json!(1)]
        );
    }

    #[test]
    fn report_lists_what_remains() {
        let report = ClinicalReport {
            succeeded: vec!["A".into()],
            failed: vec![AdmissionFailure {
                ipd_no: "B".into(),
                error: "boom".into(),
            }],
            not_attempted: vec!["C".into()],
        };
        assert!(!report.is_success());
        assert_eq!(report.remaining(), vec!["B".to_string(), "C".to_string()]);
    }

    #[test]
    fn series_starts_on_anchor_and_stays_in_month() {
        let adm = admission(None);
        let ctx = context(&adm, true);
        let mut rng = StdRng::seed_from_u64(8);
        assert_eq!(ctx.series_day(&mut rng, 0), ctx.anchor);
        for i in 1..50 {
            let day = ctx.series_day(&mut rng, i);
            assert_eq!(day.format("%Y-%m").to_string(), "2025-01");
        }
        assert_eq!(stamp(ctx.anchor, "09:00:00").len(), "2025-01-10T09:00:00Z".len());
    }
}
