//! Phase 1: sheet rows → patients → appointments → OPD visits → IPD admissions.
//!
//! Each stage reconciles against what the store already holds by natural
//! key, so re-running the same sheet adds nothing it added before.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

use super::directory::{id_key, Directory};
use super::{vocab, SeedError};
use crate::calendar::parse_date_loose;
use crate::ids::{parse_identifier, IdPrefix, SequenceAllocator};
use crate::models::enums::{AdmissionStatus, AppointmentStatus, Ward};
use crate::models::{Appointment, NewAdmission, OpdVisit, PatientRecord};
use crate::store::{from_rows, text, to_rows, Filter, Query, RowStore};

/// What a registration run added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationReport {
    pub patients_inserted: usize,
    pub patients_skipped: usize,
    pub appointments_inserted: usize,
    pub appointments_skipped: usize,
    pub opd_visits: Vec<String>,
    pub admissions: Vec<String>,
}

/// Run every registration stage in order.
pub fn register<R: Rng + ?Sized>(
    store: &dyn RowStore,
    records: &[PatientRecord],
    admissions_per_run: usize,
    rng: &mut R,
) -> Result<RegistrationReport, SeedError> {
    tracing::info!(rows = records.len(), "Starting registration");
    let directory = Directory::load(store)?;

    let (patients_inserted, patients_skipped) = insert_new_patients(store, records)?;
    let (appointments, appointments_skipped) = insert_new_appointments(store, records, &directory)?;
    let visits = insert_opd_visits(store, &appointments)?;
    let admissions = admit_random_visits(store, records, &visits, admissions_per_run, rng)?;

    let report = RegistrationReport {
        patients_inserted,
        patients_skipped,
        appointments_inserted: appointments.len(),
        appointments_skipped,
        opd_visits: visits.into_iter().map(|v| v.opd_no).collect(),
        admissions: admissions.into_iter().map(|a| a.ipd_no).collect(),
    };
    tracing::info!(
        patients = report.patients_inserted,
        appointments = report.appointments_inserted,
        opd_visits = report.opd_visits.len(),
        admissions = report.admissions.len(),
        "Registration complete"
    );
    Ok(report)
}

/// Insert sheet patients whose UHID is not stored yet. Returns (inserted, skipped).
pub fn insert_new_patients(
    store: &dyn RowStore,
    records: &[PatientRecord],
) -> Result<(usize, usize), SeedError> {
    let mut known: HashSet<String> = store
        .select("patients", &Query::all().columns("uhid"))?
        .iter()
        .filter_map(|r| text(r, "uhid"))
        .collect();

    let fresh: Vec<_> = records
        .iter()
        .filter(|r| known.insert(r.uhid.clone()))
        .map(PatientRecord::to_patient)
        .collect();
    let skipped = records.len() - fresh.len();
    tracing::info!(new = fresh.len(), skipped, "Reconciled patients");

    let stored = store.insert("patients", &to_rows(&fresh)?)?;
    Ok((stored.len(), skipped))
}

/// Book one appointment per sheet row not already booked for that UHID and day.
/// Returns the stored appointments and the number of rows skipped.
pub fn insert_new_appointments(
    store: &dyn RowStore,
    records: &[PatientRecord],
    directory: &Directory,
) -> Result<(Vec<Appointment>, usize), SeedError> {
    let mut booked: HashSet<(String, NaiveDate)> = store
        .select("appointments", &Query::all().columns("uhid, appointment_date"))?
        .iter()
        .filter_map(|r| {
            let uhid = text(r, "uhid")?;
            let day = text(r, "appointment_date").as_deref().and_then(parse_date_loose)?;
            Some((uhid, day))
        })
        .collect();

    let mut fresh = Vec::new();
    let mut skipped = 0;
    for record in records {
        let department_id = record
            .department
            .as_deref()
            .and_then(|d| directory.department_id(d));
        let doctor_id = department_id.and_then(|d| directory.doctor_for_department(d));
        let (Some(department_id), Some(doctor_id)) = (department_id, doctor_id) else {
            tracing::warn!(uhid = %record.uhid, department = ?record.department, "No department or doctor, skipping appointment");
            skipped += 1;
            continue;
        };

        let appointment_date = record.created_at.date();
        if !booked.insert((record.uhid.clone(), appointment_date)) {
            tracing::debug!(uhid = %record.uhid, date = %appointment_date, "Appointment already booked");
            skipped += 1;
            continue;
        }

        fresh.push(Appointment {
            id: None,
            uhid: record.uhid.clone(),
            department_id: Some(department_id.clone()),
            sub_department_id: record
                .sub_department
                .as_deref()
                .and_then(|s| directory.sub_department_id(s))
                .cloned(),
            doctor_id: Some(doctor_id.clone()),
            appointment_date,
            reason: Some(
                record
                    .complaints
                    .clone()
                    .unwrap_or_else(|| vocab::DEFAULT_APPOINTMENT_REASON.to_string()),
            ),
            status: AppointmentStatus::Seen,
        });
    }

    let stored: Vec<Appointment> = from_rows(&store.insert("appointments", &to_rows(&fresh)?)?)?;
    tracing::info!(inserted = stored.len(), skipped, "Booked appointments");
    Ok((stored, skipped))
}

/// One OPD visit per appointment, numbered within the appointment's day.
pub fn insert_opd_visits(
    store: &dyn RowStore,
    appointments: &[Appointment],
) -> Result<Vec<OpdVisit>, SeedError> {
    let mut allocator = SequenceAllocator::new(IdPrefix::Opd);
    let mut visits = Vec::with_capacity(appointments.len());
    for appointment in appointments {
        let Some(appointment_id) = appointment.id.clone() else {
            tracing::warn!(uhid = %appointment.uhid, "Stored appointment has no id, skipping visit");
            continue;
        };
        let day = appointment.appointment_date;
        visits.push(OpdVisit {
            id: None,
            opd_no: allocator.next(store, day)?,
            uhid: appointment.uhid.clone(),
            appointment_id,
            visit_date: day,
        });
    }

    let stored: Vec<OpdVisit> = from_rows(&store.insert("opd_visits", &to_rows(&visits)?)?)?;
    tracing::info!(inserted = stored.len(), "Created OPD visits");
    Ok(stored)
}

/// Admit up to `n` randomly chosen visits from `visits` that have no admission yet.
pub fn admit_random_visits<R: Rng + ?Sized>(
    store: &dyn RowStore,
    records: &[PatientRecord],
    visits: &[OpdVisit],
    n: usize,
    rng: &mut R,
) -> Result<Vec<NewAdmission>, SeedError> {
    if visits.is_empty() {
        tracing::info!("No new OPD visits to admit");
        return Ok(Vec::new());
    }

    let existing = store.select("ipd_admissions", &Query::all().columns("opd_no, ipd_no"))?;
    let admitted: HashSet<String> = existing.iter().filter_map(|r| text(r, "opd_no")).collect();

    let mut allocator = SequenceAllocator::new(IdPrefix::Ipd);
    for ipd_no in existing.iter().filter_map(|r| text(r, "ipd_no")) {
        if let Ok(id) = parse_identifier(&ipd_no) {
            allocator.seed(id.day, id.seq);
        }
    }

    let available: Vec<&OpdVisit> = visits
        .iter()
        .filter(|v| !admitted.contains(&v.opd_no))
        .collect();
    if available.is_empty() {
        tracing::info!("Every new OPD visit is already admitted");
        return Ok(Vec::new());
    }
    let selected: Vec<&OpdVisit> = available
        .choose_multiple(rng, n.min(available.len()))
        .copied()
        .collect();

    let appointment_ids = selected.iter().map(|v| v.appointment_id.clone()).collect();
    let appointments: HashMap<String, Appointment> = from_rows::<Appointment>(
        &store.select(
            "appointments",
            &Query::all().filter(Filter::is_in("id", appointment_ids)),
        )?,
    )?
    .into_iter()
    .filter_map(|a| Some((id_key(a.id.as_ref()?)?, a)))
    .collect();

    let mut admissions = Vec::with_capacity(selected.len());
    for visit in selected {
        let Some(appointment) = id_key(&visit.appointment_id).and_then(|k| appointments.get(&k))
        else {
            tracing::warn!(opd_no = %visit.opd_no, "Appointment for visit not found, skipping admission");
            continue;
        };
        let Some(record) = records.iter().find(|r| r.uhid == visit.uhid) else {
            tracing::warn!(uhid = %visit.uhid, "UHID not in sheet, skipping admission");
            continue;
        };

        let admission_date = record.created_at.date();
        let discharge_date = admission_date + Duration::days(rng.gen_range(2..=7));
        admissions.push(NewAdmission {
            ipd_no: allocator.next(store, admission_date)?,
            uhid: visit.uhid.clone(),
            opd_no: visit.opd_no.clone(),
            doctor_id: appointment.doctor_id.clone(),
            ward: Ward::ALL.choose(rng).copied().unwrap_or(Ward::General),
            bed_number: format!(
                "{}-{}",
                vocab::pick(rng, Ward::BED_PREFIXES),
                rng.gen_range(1..=30)
            ),
            admission_date,
            discharge_date,
            admission_reason: vocab::pick(rng, vocab::ADMISSION_REASONS).to_string(),
            status: AdmissionStatus::Discharged,
            deposit_amount: vocab::pick(rng, vocab::DEPOSIT_AMOUNTS),
        });
    }

    let stored = store.insert("ipd_admissions", &to_rows(&admissions)?)?;
    tracing::info!(inserted = stored.len(), "Created IPD admissions");
    Ok(admissions)
}
