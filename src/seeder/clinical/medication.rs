//! Medication orders and the records derived from them: dispense requests,
//! dispensed medications, administration charts and chart entries.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::{stamp, AdmissionContext};
use crate::calendar::{random_date_in_month, random_end_in_month};
use crate::models::enums::{RequestStatus, TimeSlot};
use crate::models::RecordId;
use crate::seeder::catalogs::Catalogs;
use crate::seeder::vocab::{self, pick};

pub const ORDERS_TABLE: &str = "internal_medications";
pub const REQUESTS_TABLE: &str = "medication_dispense_requests";
pub const DISPENSED_TABLE: &str = "dispensed_medications";
pub const CHARTS_TABLE: &str = "medication_administration_charts";
pub const ENTRIES_TABLE: &str = "medication_administration_entries";

#[derive(Debug, Clone, Serialize)]
pub struct InternalMedication {
    pub ipd_no: String,
    pub medication_name: String,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: &'static str,
    pub prescribed_by: Option<RecordId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispenseRequest {
    pub ipd_no: String,
    pub medication_id: RecordId,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispensedMedication {
    pub request_id: RecordId,
    pub dispensed_by: Option<RecordId>,
    pub dispensed_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdministrationChart {
    pub ipd_no: String,
    pub medication_name: String,
    pub dosage: &'static str,
    pub frequency: &'static str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdministrationEntry {
    pub chart_id: RecordId,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub administered: bool,
    pub administered_at: Option<String>,
    pub administered_by: Option<RecordId>,
    pub notes: &'static str,
}

fn medication_name<R: Rng + ?Sized>(rng: &mut R, catalogs: &Catalogs) -> String {
    catalogs
        .medications
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| pick(rng, vocab::FALLBACK_MEDICATIONS).to_string())
}

/// Two to four orders, the first starting on the anchor date.
pub fn build_internal_medications<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    catalogs: &Catalogs,
    rng: &mut R,
) -> Vec<InternalMedication> {
    let count = rng.gen_range(2..=4);
    (0..count)
        .map(|i| {
            let start_date = ctx.series_day(rng, i);
            InternalMedication {
                ipd_no: ctx.ipd_no().to_string(),
                medication_name: medication_name(rng, catalogs),
                dosage: pick(rng, vocab::DOSAGES),
                frequency: pick(rng, vocab::FREQUENCIES),
                start_date,
                end_date: random_end_in_month(rng, start_date, ctx.base),
                notes: pick(rng, vocab::MEDICATION_NOTES),
                prescribed_by: ctx.admission.doctor_id.clone(),
            }
        })
        .collect()
}

/// One completed request per stored order.
pub fn build_dispense_requests(
    ctx: &AdmissionContext<'_>,
    medication_ids: &[RecordId],
) -> Vec<DispenseRequest> {
    medication_ids
        .iter()
        .map(|id| DispenseRequest {
            ipd_no: ctx.ipd_no().to_string(),
            medication_id: id.clone(),
            status: RequestStatus::Completed,
        })
        .collect()
}

/// Past admissions: every request was dispensed on the admission day.
pub fn build_dispensed(
    ctx: &AdmissionContext<'_>,
    request_ids: &[RecordId],
) -> Vec<DispensedMedication> {
    request_ids
        .iter()
        .map(|id| DispensedMedication {
            request_id: id.clone(),
            dispensed_by: ctx.admission.doctor_id.clone(),
            dispensed_date: stamp(ctx.base, "10:00:00"),
        })
        .collect()
}

/// One chart per order, mirroring its schedule.
pub fn build_charts(
    ctx: &AdmissionContext<'_>,
    medications: &[InternalMedication],
) -> Vec<AdministrationChart> {
    medications
        .iter()
        .map(|m| AdministrationChart {
            ipd_no: ctx.ipd_no().to_string(),
            medication_name: m.medication_name.clone(),
            dosage: m.dosage,
            frequency: m.frequency,
            start_date: m.start_date,
            end_date: m.end_date,
        })
        .collect()
}

/// One to three entries per `(chart id, chart start)`; later entries fall in the chart's month.
pub fn build_administration_entries<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    charts: &[(RecordId, NaiveDate)],
    rng: &mut R,
) -> Vec<AdministrationEntry> {
    let mut entries = Vec::new();
    for (chart_id, start) in charts {
        let n = rng.gen_range(1..=3);
        for j in 0..n {
            entries.push(AdministrationEntry {
                chart_id: chart_id.clone(),
                date: if j == 0 {
                    ctx.anchor
                } else {
                    random_date_in_month(rng, *start)
                },
                time_slot: TimeSlot::ALL.choose(rng).copied().unwrap_or(TimeSlot::Morning),
                administered: rng.gen_bool(0.5),
                administered_at: None,
                administered_by: None,
                notes: pick(rng, vocab::ADMINISTRATION_NOTES),
            });
        }
    }
    entries
}
