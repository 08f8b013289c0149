//! Bedside charts: pain, vitals, diet and daily rounds.

use chrono::{NaiveDate, SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use super::{stamp, AdmissionContext};
use crate::models::RecordId;
use crate::seeder::vocab::{self, pick};

pub const PAIN_ASSESSMENTS_TABLE: &str = "pain_assessments";
pub const PAIN_MONITORING_TABLE: &str = "pain_monitoring_charts";
pub const VITALS_TABLE: &str = "bp_tpr_charts";
pub const DIET_TABLE: &str = "diet_sheets";
pub const DAILY_ASSESSMENTS_TABLE: &str = "ipd_daily_assessments";

const PAIN_CHECKS: usize = 3;
const VITALS_READINGS: usize = 4;
const DIET_ENTRIES: usize = 4;

#[derive(Debug, Clone, Serialize)]
pub struct PainAssessment {
    pub ipd_no: String,
    pub location: &'static str,
    pub intensity: &'static str,
    pub character: &'static str,
    pub frequency: &'static str,
    pub duration: &'static str,
    pub radiation: &'static str,
    pub triggers: &'static str,
    pub current_management: &'static str,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PainCheck {
    pub ipd_no: String,
    pub date_time: String,
    pub pain_score: u32,
    pub intervention: &'static str,
    pub outcome: &'static str,
    pub side_effects: &'static str,
    pub advice: &'static str,
    pub staff_id: Option<RecordId>,
}

/// Row of `bp_tpr_charts`.
#[derive(Debug, Clone, Serialize)]
pub struct VitalsReading {
    pub ipd_no: String,
    pub date_time: String,
    pub temperature: f64,
    pub pulse: u32,
    pub respiratory_rate: u32,
    pub bp: &'static str,
    pub nurse_id: Option<RecordId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DietEntry {
    pub ipd_no: String,
    pub date: NaiveDate,
    pub time: &'static str,
    pub diet: &'static str,
    pub notes: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyAssessment {
    pub ipd_no: String,
    pub date: NaiveDate,
    pub doctor_id: Option<RecordId>,
    pub assessment: &'static str,
    pub advice: &'static str,
}

/// Stamped with the time of the run, not the admission.
pub fn build_pain_assessment<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    rng: &mut R,
) -> PainAssessment {
    PainAssessment {
        ipd_no: ctx.ipd_no().to_string(),
        location: pick(rng, vocab::PAIN_LOCATIONS),
        intensity: pick(rng, vocab::PAIN_INTENSITIES),
        character: pick(rng, vocab::PAIN_CHARACTERS),
        frequency: pick(rng, vocab::PAIN_FREQUENCIES),
        duration: pick(rng, vocab::PAIN_DURATIONS),
        radiation: pick(rng, vocab::PAIN_RADIATION),
        triggers: pick(rng, vocab::PAIN_TRIGGERS),
        current_management: pick(rng, vocab::PAIN_MANAGEMENT),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

pub fn build_pain_monitoring<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    staff: &[&RecordId],
    rng: &mut R,
) -> Vec<PainCheck> {
    (0..PAIN_CHECKS)
        .map(|i| {
            let day = ctx.series_day(rng, i);
            PainCheck {
                ipd_no: ctx.ipd_no().to_string(),
                date_time: stamp(day, pick(rng, vocab::PAIN_CHECK_TIMES)),
                pain_score: rng.gen_range(1..=10),
                intervention: pick(rng, vocab::PAIN_INTERVENTIONS),
                outcome: pick(rng, vocab::PAIN_OUTCOMES),
                side_effects: pick(rng, vocab::SIDE_EFFECTS),
                advice: pick(rng, vocab::PAIN_ADVICE),
                staff_id: staff.choose(rng).map(|s| (*s).clone()),
            }
        })
        .collect()
}

pub fn build_vitals<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    nurse: Option<&RecordId>,
    rng: &mut R,
) -> Vec<VitalsReading> {
    (0..VITALS_READINGS)
        .map(|i| {
            let day = ctx.series_day(rng, i);
            VitalsReading {
                ipd_no: ctx.ipd_no().to_string(),
                date_time: stamp(day, pick(rng, vocab::VITALS_TIMES)),
                temperature: pick(rng, vocab::TEMPERATURES),
                pulse: rng.gen_range(68..=98),
                respiratory_rate: rng.gen_range(14..=22),
                bp: pick(rng, vocab::CHART_BLOOD_PRESSURES),
                nurse_id: nurse.cloned(),
            }
        })
        .collect()
}

pub fn build_diet<R: Rng + ?Sized>(ctx: &AdmissionContext<'_>, rng: &mut R) -> Vec<DietEntry> {
    (0..DIET_ENTRIES)
        .map(|i| DietEntry {
            ipd_no: ctx.ipd_no().to_string(),
            date: ctx.series_day(rng, i),
            time: pick(rng, vocab::MEAL_TIMES),
            diet: pick(rng, vocab::DIET_PLANS),
            notes: pick(rng, vocab::DIET_NOTES),
        })
        .collect()
}

/// Two to four ward-round notes by the admitting doctor.
pub fn build_daily_assessments<R: Rng + ?Sized>(
    ctx: &AdmissionContext<'_>,
    rng: &mut R,
) -> Vec<DailyAssessment> {
    let n = rng.gen_range(2..=4);
    (0..n)
        .map(|i| DailyAssessment {
            ipd_no: ctx.ipd_no().to_string(),
            date: ctx.series_day(rng, i),
            doctor_id: ctx.admission.doctor_id.clone(),
            assessment: pick(rng, vocab::ASSESSMENTS),
            advice: pick(rng, vocab::ASSESSMENT_ADVICE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::clinical::tests::{admission, context};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    #[test]
    fn pain_checks_are_three_and_stamped() {
        let adm = admission(None);
        let ctx = context(&adm, true);
        let s1 = json!("s-1");
        let checks = build_pain_monitoring(&ctx, &[&s1], &mut StdRng::seed_from_u64(1));
        assert_eq!(checks.len(), 3);
        assert!(checks[0].date_time.starts_with(&ctx.anchor.to_string()));
        for c in &checks {
            assert!((1..=10).contains(&c.pain_score));
            assert!(c.date_time.ends_with(":00Z"));
            assert_eq!(c.staff_id, Some(s1.clone()));
        }
        let unstaffed = build_pain_monitoring(&ctx, &[], &mut StdRng::seed_from_u64(1));
        assert!(unstaffed.iter().all(|c| c.staff_id.is_none()));
    }

    #[test]
    fn vitals_use_first_nurse_and_ranges() {
        let adm = admission(None);
        let ctx = context(&adm, true);
        let nurse = json!("n-1");
        let readings = build_vitals(&ctx, Some(&nurse), &mut StdRng::seed_from_u64(2));
        assert_eq!(readings.len(), 4);
        for r in &readings {
            assert!(vocab::TEMPERATURES.contains(&r.temperature));
            assert!((68..=98).contains(&r.pulse));
            assert!((14..=22).contains(&r.respiratory_rate));
            assert_eq!(r.nurse_id, Some(nurse.clone()));
        }
    }

    #[test]
    fn diet_and_rounds_follow_vocabulary() {
        let adm = admission(None);
        let ctx = context(&adm, true);
        let mut rng = StdRng::seed_from_u64(3);
        let diet = build_diet(&ctx, &mut rng);
        assert_eq!(diet.len(), 4);
        assert_eq!(diet[0].date, ctx.anchor);
        assert!(diet.iter().all(|d| vocab::DIET_PLANS.contains(&d.diet)));

        let rounds = build_daily_assessments(&ctx, &mut rng);
        assert!((2..=4).contains(&rounds.len()));
        assert!(rounds.iter().all(|r| vocab::ASSESSMENTS.contains(&r.assessment)));
    }

    #[test]
    fn pain_assessment_vocabulary() {
        let adm = admission(None);
        let ctx = context(&adm, true);
        let a = build_pain_assessment(&ctx, &mut StdRng::seed_from_u64(4));
        assert!(vocab::PAIN_LOCATIONS.contains(&a.location));
        assert!(vocab::PAIN_MANAGEMENT.contains(&a.current_management));
        assert!(a.created_at.ends_with('Z'));
    }
}
