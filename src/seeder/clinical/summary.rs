//! Referral, investigation request, billing lines and discharge summary.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::{stamp, AdmissionContext};
use crate::models::enums::{Priority, RequestStatus};
use crate::models::RecordId;
use crate::seeder::vocab::{self, pick, pick_several};

pub const REFERRALS_TABLE: &str = "referred_assessments";
pub const INVESTIGATIONS_TABLE: &str = "requested_investigations";
pub const BILLING_TABLE: &str = "billing_records";
pub const DISCHARGE_TABLE: &str = "discharge_summaries";

#[derive(Debug, Clone, Serialize)]
pub struct Referral {
    pub ipd_no: String,
    pub referred_by_id: Option<RecordId>,
    pub referred_to_id: Option<RecordId>,
    pub department: Option<String>,
    pub assessment_note: &'static str,
    pub advice: &'static str,
    pub recommended_procedures: &'static str,
    pub recommended_meds: &'static str,
    pub status: RequestStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestigationRequest {
    pub ipd_no: String,
    pub requested_investigations: String,
    pub doctor_id: Option<RecordId>,
    pub scheduled_date: chrono::NaiveDate,
    pub scheduled_time: &'static str,
    pub status: RequestStatus,
    pub notes: &'static str,
    pub priority: Priority,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BillingLine {
    pub ipd_no: String,
    pub opd_no: Option<String>,
    pub bill_date: String,
    pub description: &'static str,
    pub amount: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DischargeSummary {
    pub ipd_no: String,
    pub department: Option<String>,
    pub doctor_name: Option<String>,
    pub patient_name: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub uhid_no: String,
    pub ip_no: String,
    pub ward_bed_no: Option<String>,
    pub date_of_admission: Option<String>,
    pub time_of_admission: Option<String>,
    pub date_of_discharge: Option<String>,
    pub time_of_discharge: Option<String>,
    pub complaints: &'static str,
    pub history_brief: &'static str,
    pub significant_findings: &'static str,
    pub investigation_results: &'static str,
    pub diagnosis: &'static str,
    pub condition_at_discharge: &'static str,
    pub course_in_hospital: &'static str,
    pub procedures_performed: &'static str,
    pub medications_administered: &'static str,
    pub other_treatment: Option<String>,
    pub discharge_medications: Option<String>,
    pub other_instructions: &'static str,
    pub follow_up_period: &'static str,
    pub urgent_care_instructions: Option<String>,
    pub doctor_signature: Option<String>,
    pub patient_signature: Option<String>,
    pub summary_prepared_by: Option<String>,
}

/// Referred by the first staff member to the second.
pub fn build_referral<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    staff: &[&RecordId],
    rng: &mut R,
) -> Referral {
    Referral {
        ipd_no: ctx.ipd_no().to_string(),
        referred_by_id: staff.first().map(|s| (*s).clone()),
        referred_to_id: staff.get(1).map(|s| (*s).clone()),
        department: ctx.department.clone(),
        assessment_note: pick(rng, vocab::REFERRAL_NOTES),
        advice: pick(rng, vocab::REFERRAL_ADVICE),
        recommended_procedures: vocab::RECOMMENDED_PROCEDURES,
        recommended_meds: vocab::RECOMMENDED_MEDS,
        status: RequestStatus::Pending,
        created_at: stamp(ctx.anchor, "10:00:00"),
    }
}

pub fn build_investigation_request<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    rng: &mut R,
) -> InvestigationRequest {
    let created = stamp(ctx.anchor, "09:00:00");
    InvestigationRequest {
        ipd_no: ctx.ipd_no().to_string(),
        requested_investigations: pick_several(rng, vocab::INVESTIGATIONS, 1, 3),
        doctor_id: ctx.admission.doctor_id.clone(),
        scheduled_date: ctx.anchor,
        scheduled_time: pick(rng, vocab::INVESTIGATION_SLOTS),
        status: RequestStatus::Pending,
        notes: pick(rng, vocab::INVESTIGATION_NOTES),
        priority: Priority::ALL.choose(rng).copied().unwrap_or(Priority::Normal),
        created_at: created.clone(),
        updated_at: created,
    }
}

/// Admission, bed, procedure and medication charges, billed on the anchor date.
pub fn build_billing<R: Rng + ?Sized>(ctx: &AdmissionContext<'_>, rng: &mut R) -> Vec<BillingLine> {
    let items = [
        ("Admission charges", vocab::ADMISSION_CHARGE),
        ("Bed charges", pick(rng, vocab::BED_CHARGES)),
        ("Procedure charges", pick(rng, vocab::PROCEDURE_CHARGES)),
        ("Medication charges", pick(rng, vocab::MEDICATION_CHARGES)),
    ];
    items
        .into_iter()
        .map(|(description, amount)| BillingLine {
            ipd_no: ctx.ipd_no().to_string(),
            opd_no: ctx.admission.opd_no.clone(),
            bill_date: stamp(ctx.anchor, "12:00:00"),
            description,
            amount,
        })
        .collect()
}

/// `None` while the admission has no discharge date.
pub fn build_discharge_summary<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    rng: &mut R,
) -> Option<DischargeSummary> {
    let discharged = ctx.discharge?;
    let adm = ctx.admission;
    Some(DischargeSummary {
        ipd_no: adm.ipd_no.clone(),
        department: ctx.department.clone(),
        doctor_name: None,
        patient_name: ctx.patient.patient_name.clone(),
        age: None,
        sex: None,
        uhid_no: adm.uhid.clone(),
        ip_no: adm.ipd_no.clone(),
        ward_bed_no: adm.bed_number.clone(),
        date_of_admission: adm.admitted_on().map(|d| d.to_string()),
        time_of_admission: None,
        date_of_discharge: Some(discharged.to_string()),
        time_of_discharge: None,
        complaints: vocab::AS_PER_RECORDS,
        history_brief: vocab::AS_PER_RECORDS,
        significant_findings: vocab::AS_PER_RECORDS,
        investigation_results: vocab::AS_PER_RECORDS,
        diagnosis: vocab::AS_PER_RECORDS,
        condition_at_discharge: pick(rng, vocab::DISCHARGE_CONDITIONS),
        course_in_hospital: vocab::AS_PER_RECORDS,
        procedures_performed: vocab::AS_PER_RECORDS,
        medications_administered: vocab::AS_PER_RECORDS,
        other_treatment: None,
        discharge_medications: None,
        other_instructions: "As advised",
        follow_up_period: vocab::FOLLOW_UP_PERIOD,
        urgent_care_instructions: None,
        doctor_signature: None,
        patient_signature: None,
        summary_prepared_by: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::clinical::tests::{admission, context};
    use crate::seeder::vocab::all_from;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn billing_has_four_fixed_descriptions() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let lines = build_billing(&ctx, &mut StdRng::seed_from_u64(1));
        let descriptions: Vec<&str> = lines.iter().map(|l| l.description).collect();
        assert_eq!(
            descriptions,
            ["Admission charges", "Bed charges", "Procedure charges", "Medication charges"]
        );
        assert_eq!(lines[0].amount, 500);
        assert!(vocab::BED_CHARGES.contains(&lines[1].amount));
        assert_eq!(lines[0].opd_no.as_deref(), Some("OPD-20250110-0001"));
        assert_eq!(lines[0].bill_date, format!("{}T12:00:00Z", ctx.anchor));
    }

    #[test]
    fn referral_uses_first_two_staff() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let (a, b) = (json!("s-1"), json!("s-2"));
        let referral = build_referral(&ctx, &[&a, &b], &mut StdRng::seed_from_u64(2));
        assert_eq!(referral.referred_by_id, Some(a));
        assert_eq!(referral.referred_to_id, Some(b));
        assert_eq!(referral.department.as_deref(), Some("Kayachikitsa"));

        let lone = build_referral(&ctx, &[], &mut StdRng::seed_from_u64(2));
        assert!(lone.referred_by_id.is_none() && lone.referred_to_id.is_none());
    }

    #[test]
    fn investigations_pick_one_to_three() {
        let adm = admission(None);
        let ctx = context(&adm, false);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..30 {
            let req = build_investigation_request(&ctx, &mut rng);
            let n = req.requested_investigations.split(", ").count();
            assert!((1..=3).contains(&n));
            assert!(all_from(&req.requested_investigations, vocab::INVESTIGATIONS));
            assert_eq!(req.created_at, req.updated_at);
        }
    }

    #[test]
    fn discharge_summary_needs_discharge_date() {
        let open = admission(None);
        assert!(build_discharge_summary(&context(&open, false), &mut StdRng::seed_from_u64(4)).is_none());

        let closed = admission(Some("2025-01-14"));
        let summary =
            build_discharge_summary(&context(&closed, false), &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(summary.date_of_admission.as_deref(), Some("2025-01-10"));
        assert_eq!(summary.date_of_discharge.as_deref(), Some("2025-01-14"));
        assert_eq!(summary.uhid_no, "U1");
        assert_eq!(summary.follow_up_period, "7 days");
        assert!(vocab::DISCHARGE_CONDITIONS.contains(&summary.condition_at_discharge));
    }
}
