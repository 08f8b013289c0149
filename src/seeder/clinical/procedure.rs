//! Procedure entries and what hangs off them: therapist assignments,
//! requirement requests, dispensed requirements and session notes.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::{stamp, AdmissionContext};
use crate::calendar::random_end_in_month;
use crate::models::enums::RequestStatus;
use crate::models::RecordId;
use crate::seeder::catalogs::Catalogs;
use crate::seeder::vocab::{self, pick};

pub const ENTRIES_TABLE: &str = "procedure_entries";
pub const ASSIGNMENTS_TABLE: &str = "therapist_assignments";
pub const REQUIREMENTS_TABLE: &str = "procedure_medicine_requirement_requests";
pub const DISPENSED_TABLE: &str = "dispensed_procedure_requirements";
pub const SESSIONS_TABLE: &str = "procedure_sessions";

/// Sessions are recorded for at most this many procedures.
const MAX_SESSIONS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ProcedureEntry {
    pub ipd_no: String,
    pub procedure_name: String,
    pub requirements: String,
    pub quantity: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub therapist: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TherapistAssignment {
    pub ipd_no: String,
    pub procedure_entry_id: RecordId,
    pub therapist_id: Option<RecordId>,
    pub doctor_id: Option<RecordId>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: &'static str,
    pub notes: &'static str,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequirementRequest {
    pub ipd_no: String,
    pub procedure_entry_id: RecordId,
    pub requirements: &'static str,
    pub quantity: &'static str,
    pub requested_by: Option<RecordId>,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispensedRequirement {
    pub request_id: RecordId,
    pub dispensed_by: Option<RecordId>,
    pub dispensed_date: String,
    pub notes: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcedureSession {
    pub ipd_no: String,
    pub procedure_entry_id: RecordId,
    pub session_date: NaiveDate,
    pub pre_vitals: &'static str,
    pub post_vitals: &'static str,
    pub procedure_note: &'static str,
    pub performed_by: Option<RecordId>,
    pub session_duration_minutes: u32,
    pub complications: &'static str,
    pub patient_response: &'static str,
    pub next_session_date: NaiveDate,
}

/// Two to four procedures from the catalog; missing requirement or
/// quantity columns are filled from the fixed lists.
pub fn build_entries<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    catalogs: &Catalogs,
    rng: &mut R,
) -> Vec<ProcedureEntry> {
    let count = rng.gen_range(2..=4);
    (0..count)
        .map(|i| {
            let start_date = ctx.series_day(rng, i);
            let end_date = random_end_in_month(rng, start_date, ctx.base);
            let template = catalogs.pick_procedure(rng);
            ProcedureEntry {
                ipd_no: ctx.ipd_no().to_string(),
                procedure_name: template.procedure_name,
                requirements: template
                    .requirements
                    .unwrap_or_else(|| pick(rng, vocab::REQUIREMENTS).to_string()),
                quantity: template
                    .quantity
                    .unwrap_or_else(|| pick(rng, vocab::QUANTITIES).to_string()),
                start_date,
                end_date,
                therapist: String::new(),
            }
        })
        .collect()
}

/// One assignment per `(entry id, entry start)`, scheduled on the entry's start day.
/// An empty therapist pool leaves the therapist unset.
pub fn build_assignments<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    entries: &[(RecordId, NaiveDate)],
    therapists: &[&RecordId],
    rng: &mut R,
) -> Vec<TherapistAssignment> {
    entries
        .iter()
        .map(|(entry_id, start)| TherapistAssignment {
            ipd_no: ctx.ipd_no().to_string(),
            procedure_entry_id: entry_id.clone(),
            therapist_id: therapists.choose(rng).map(|t| (*t).clone()),
            doctor_id: ctx.admission.doctor_id.clone(),
            scheduled_date: *start,
            scheduled_time: pick(rng, vocab::SCHEDULED_TIMES),
            notes: pick(rng, vocab::ASSIGNMENT_NOTES),
            status: RequestStatus::ALL
                .choose(rng)
                .copied()
                .unwrap_or(RequestStatus::Pending),
        })
        .collect()
}

pub fn build_requirement_requests<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    entries: &[(RecordId, NaiveDate)],
    rng: &mut R,
) -> Vec<RequirementRequest> {
    entries
        .iter()
        .map(|(entry_id, _)| RequirementRequest {
            ipd_no: ctx.ipd_no().to_string(),
            procedure_entry_id: entry_id.clone(),
            requirements: pick(rng, vocab::REQUIREMENTS),
            quantity: pick(rng, vocab::QUANTITIES),
            requested_by: ctx.admission.doctor_id.clone(),
            status: RequestStatus::Completed,
        })
        .collect()
}

pub fn build_dispensed_requirements<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    request_ids: &[RecordId],
    rng: &mut R,
) -> Vec<DispensedRequirement> {
    request_ids
        .iter()
        .map(|id| DispensedRequirement {
            request_id: id.clone(),
            dispensed_by: ctx.admission.doctor_id.clone(),
            dispensed_date: stamp(ctx.base, "10:00:00"),
            notes: pick(rng, vocab::DISPENSE_NOTES),
        })
        .collect()
}

/// Session notes for the first few procedures, all on the anchor date.
pub fn build_sessions<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    entries: &[(RecordId, NaiveDate)],
    performed_by: Option<&RecordId>,
    rng: &mut R,
) -> Vec<ProcedureSession> {
    entries
        .iter()
        .take(MAX_SESSIONS)
        .map(|(entry_id, _)| ProcedureSession {
            ipd_no: ctx.ipd_no().to_string(),
            procedure_entry_id: entry_id.clone(),
            session_date: ctx.anchor,
            pre_vitals: vocab::PRE_SESSION_VITALS,
            post_vitals: vocab::POST_SESSION_VITALS,
            procedure_note: pick(rng, vocab::SESSION_NOTES),
            performed_by: performed_by.cloned(),
            session_duration_minutes: pick(rng, vocab::SESSION_MINUTES),
            complications: pick(rng, vocab::COMPLICATIONS),
            patient_response: pick(rng, vocab::SESSION_RESPONSES),
            next_session_date: ctx.anchor,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::clinical::tests::{admission, context};
    use crate::sheet::ProcedureTemplate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn keys(n: usize) -> Vec<(RecordId, NaiveDate)> {
        (0..n)
            .map(|i| (json!(i + 1), NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()))
            .collect()
    }

    #[test]
    fn entries_fill_missing_template_columns() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let catalogs = Catalogs {
            medications: Vec::new(),
            procedures: vec![ProcedureTemplate {
                procedure_name: "Abhyanga".into(),
                requirements: None,
                quantity: Some("7".into()),
            }],
        };
        let mut rng = StdRng::seed_from_u64(3);
        let entries = build_entries(&ctx, &catalogs, &mut rng);
        assert!((2..=4).contains(&entries.len()));
        assert_eq!(entries[0].start_date, ctx.anchor);
        for e in &entries {
            assert_eq!(e.procedure_name, "Abhyanga");
            assert!(vocab::REQUIREMENTS.contains(&e.requirements.as_str()));
            assert_eq!(e.quantity, "7");
            assert!(e.therapist.is_empty());
        }
    }

    #[test]
    fn entries_without_catalog_use_placeholder() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let entries = build_entries(&ctx, &Catalogs::default(), &mut StdRng::seed_from_u64(1));
        assert!(entries.iter().all(|e| e.procedure_name == vocab::FALLBACK_PROCEDURE));
        assert!(entries
            .iter()
            .all(|e| vocab::QUANTITIES.contains(&e.quantity.as_str())));
    }

    #[test]
    fn assignments_draw_from_pool() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let t1 = json!("t-1");
        let t2 = json!("t-2");
        let mut rng = StdRng::seed_from_u64(4);
        let assignments = build_assignments(&ctx, &keys(4), &[&t1, &t2], &mut rng);
        assert_eq!(assignments.len(), 4);
        for a in &assignments {
            let id = a.therapist_id.as_ref().unwrap();
            assert!(id == &t1 || id == &t2);
            assert!(vocab::SCHEDULED_TIMES.contains(&a.scheduled_time));
            assert_eq!(a.scheduled_date, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap());
        }

        let unassigned = build_assignments(&ctx, &keys(1), &[], &mut rng);
        assert!(unassigned[0].therapist_id.is_none());
    }

    #[test]
    fn sessions_capped_at_three() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let staff = json!("s-1");
        let sessions = build_sessions(&ctx, &keys(4), Some(&staff), &mut StdRng::seed_from_u64(5));
        assert_eq!(sessions.len(), 3);
        for s in &sessions {
            assert_eq!(s.session_date, ctx.anchor);
            assert_eq!(s.performed_by, Some(staff.clone()));
            assert!(vocab::SESSION_MINUTES.contains(&s.session_duration_minutes));
        }
    }

    #[test]
    fn requirement_chain() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let mut rng = StdRng::seed_from_u64(6);
        let requests = build_requirement_requests(&ctx, &keys(2), &mut rng);
        assert!(requests.iter().all(|r| r.status == RequestStatus::Completed));
        let dispensed = build_dispensed_requirements(&ctx, &[json!(10)], &mut rng);
        assert_eq!(dispensed[0].request_id, json!(10));
        assert!(vocab::DISPENSE_NOTES.contains(&dispensed[0].notes));
    }
}
