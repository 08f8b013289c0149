//! Fixed option lists the clinical generators draw from, and the sampling
//! helpers that draw from them. Generated values never leave these lists.

use rand::seq::SliceRandom;
use rand::Rng;

// ── Registration ────────────────────────────────────────────

pub const ADMISSION_REASONS: &[&str] = &[
    "Fever",
    "Surgery",
    "Observation",
    "Infection",
    "Accident",
    "Chronic illness",
];
pub const DEPOSIT_AMOUNTS: &[u32] = &[500, 1000, 2000];
pub const DEFAULT_APPOINTMENT_REASON: &str = "Checkup";

// ── Case sheet ──────────────────────────────────────────────

pub const PRESENT_COMPLAINTS: &[&str] = &[
    "Low back pain",
    "Knee pain",
    "Headache",
    "Neck stiffness",
    "Generalized weakness",
    "Fever",
    "Cough",
    "Abdominal pain",
    "Joint stiffness",
    "Tingling in limbs",
];
pub const ASSOCIATED_COMPLAINTS: &[&str] = &[
    "Nausea",
    "Vomiting",
    "Dizziness",
    "Loss of appetite",
    "Sleep disturbance",
    "Fatigue",
    "Constipation",
    "Acidity",
    "Muscle cramps",
    "Swelling",
];
pub const OBS_GYN_HISTORY: &[&str] = &[
    "Irregular cycles",
    "Dysmenorrhea",
    "Menorrhagia",
    "Leucorrhea",
    "PMS symptoms",
    "No significant OBG history",
];
pub const BLOOD_PRESSURES: &[&str] = &["118/76", "120/80", "124/82", "130/86", "140/90"];
pub const RESPIRATORY_FINDINGS: &[&str] = &[
    "Clear breath sounds, no crepitations",
    "Normal breath sounds, no wheezing",
    "Bilateral air entry equal, no added sounds",
    "Clear chest, no respiratory distress",
];
pub const CVS_FINDINGS: &[&str] = &[
    "S1 S2 heard, no murmurs",
    "Regular rhythm, no murmurs",
    "Normal heart sounds, no added sounds",
    "S1S2 normal, no murmurs",
];
pub const CNS_FINDINGS: &[&str] = &[
    "Conscious, oriented, no focal deficit",
    "Higher mental functions normal, cranial nerves intact",
    "Alert, responsive, normal coordination",
    "Conscious, oriented, no neurological deficits",
];
pub const PAST_HISTORY: &[&str] = &["Nil", "Diabetes", "Hypertension", "Asthma"];
pub const PERSONAL_HISTORY: &[&str] = &["Vegetarian", "Mixed diet"];
pub const PREVIOUS_MEDICINE_HISTORY: &[&str] = &["Occasional analgesics", "Ayurvedic meds", "None"];
pub const FAMILY_HISTORY: &[&str] = &["Nil", "Similar complaints in family"];
pub const DOSHAS: &[&str] = &["Vata", "Pitta", "Kapha"];
pub const GRADES: &[&str] = &["Uttam", "Madhyam", "Avara"];
pub const CAPACITY_GRADES: &[&str] = &["Pravara", "Madhyam", "Avara"];
pub const MALA: &[&str] = &["Samyaka", "Alpa", "Krura"];
pub const MOOTRA: &[&str] = &["Samyaka", "Alpa"];
pub const JIHVA: &[&str] = &["Nirmala", "Saama"];
pub const SHABDA: &[&str] = &["Samyaka"];
pub const SPARSHA: &[&str] = &["Samashita", "Ushna"];
pub const DRIKA: &[&str] = &["Prakrita"];
pub const AKRUTI: &[&str] = &["Madhyama", "Sthula", "Krisha"];
pub const SROTHO_DUSHTI: &[&str] = &["Mamsa", "Rakta", "Meda", "Asthi"];
pub const VYAKTASTHANA: &[&str] = &["Mamsavaha", "Raktavaha", "Meda"];
pub const AGNI: &[&str] = &["Mandagni", "Vishamagni", "Tikshnagni"];
pub const PRESENT_ABSENT: &[&str] = &["Present", "Absent"];
pub const BODY_SITES: &[&str] = &["Kati", "Janu", "Greeva"];
pub const SROTHAS: &[&str] = &["Pakwashaya", "Amashaya"];
pub const YES_NO: &[&str] = &["Yes", "No"];
pub const LOCAL_EXAMINATION: &[&str] = &[
    "Within normal limits",
    "Tenderness present",
    "Swelling noted",
    "No abnormalities",
];
pub const PAIN_SCALES: &[&str] = &["VAS 4/10", "VAS 6/10", "VAS 7/10"];
pub const CASE_INVESTIGATIONS: &[&str] = &["CBC, RFT", "X-Ray", "MRI as advised"];
pub const DIAGNOSES: &[&str] = &["Vata vyadhi", "Pitta vyadhi", "Kapha vyadhi"];
pub const NUTRITIONAL_STATUS: &[&str] = &["normal", "mild malnutrition"];
pub const TREATMENT_PLANS: &[&str] = &["Abhyanga + internal meds", "Physiotherapy + meds"];
pub const PREVENTIVE_ASPECTS: &[&str] = &["Posture advice", "Back strengthening"];
pub const REHABILITATION: &[&str] = &["Physiotherapy", "Home exercise program"];
pub const DESIRED_OUTCOMES: &[&str] = &["Pain reduction", "Improved mobility"];

// ── Medication ──────────────────────────────────────────────

pub const FALLBACK_MEDICATIONS: &[&str] = &[
    "Ashwagandha",
    "Triphala",
    "Guggulu",
    "Punarnava",
    "Haridra",
    "Shatavari",
];
pub const DOSAGES: &[&str] = &["1 tab", "2 tabs", "10 ml", "500 mg"];
pub const FREQUENCIES: &[&str] = &["OD", "BD", "TDS", "HS", "QID"];
pub const MEDICATION_NOTES: &[&str] = &["After food", "Before food", "With water", "Monitor BP", "PRN"];
pub const ADMINISTRATION_NOTES: &[&str] =
    &["Given as scheduled", "Delayed dose", "Patient asleep", "Refused"];

// ── Procedures ──────────────────────────────────────────────

pub const FALLBACK_PROCEDURE: &str = "Procedure";
pub const REQUIREMENTS: &[&str] = &["Oil, Herbs", "Bandage, Gauze", "Steam setup", "Saline"];
pub const QUANTITIES: &[&str] = &["1", "2", "3", "5"];
pub const SCHEDULED_TIMES: &[&str] = &["09:00", "11:00", "15:30"];
pub const ASSIGNMENT_NOTES: &[&str] = &["Handle gently", "Short session", "Post-procedure rest"];
pub const DISPENSE_NOTES: &[&str] = &["Dispensed as requested", "All items provided", "Patient received"];
pub const PRE_SESSION_VITALS: &str = "Temp: 36.9, Pulse: 76, BP: 120/80, RR: 18";
pub const POST_SESSION_VITALS: &str = "Temp: 37.0, Pulse: 80, BP: 124/82, RR: 19";
pub const SESSION_NOTES: &[&str] = &["Session completed; tolerated well", "Mild discomfort; advised rest"];
pub const SESSION_MINUTES: &[u32] = &[30, 45, 60];
pub const COMPLICATIONS: &[&str] = &["None", "Nil"];
pub const SESSION_RESPONSES: &[&str] = &["Improved", "Stable"];

// ── Pain ────────────────────────────────────────────────────

pub const PAIN_LOCATIONS: &[&str] = &["Back", "Head", "Knee", "Abdomen"];
pub const PAIN_INTENSITIES: &[&str] = &["2/10", "4/10", "6/10", "8/10"];
pub const PAIN_CHARACTERS: &[&str] = &["Dull", "Sharp", "Throbbing", "Burning"];
pub const PAIN_FREQUENCIES: &[&str] = &["Intermittent", "Continuous"];
pub const PAIN_DURATIONS: &[&str] = &["Hours", "Days", "Weeks"];
pub const PAIN_RADIATION: &[&str] = &["None", "To leg", "To shoulder"];
pub const PAIN_TRIGGERS: &[&str] = &["Movement", "Cold", "Pressure"];
pub const PAIN_MANAGEMENT: &[&str] = &["Heat therapy", "Analgesic", "Rest"];
pub const PAIN_CHECK_TIMES: &[&str] = &["08:00:00", "12:00:00", "18:00:00"];
pub const PAIN_INTERVENTIONS: &[&str] = &["Analgesic", "Physiotherapy", "Massage", "Cold pack"];
pub const PAIN_OUTCOMES: &[&str] = &["Improved", "No change"];
pub const SIDE_EFFECTS: &[&str] = &["None", "Drowsiness"];
pub const PAIN_ADVICE: &[&str] = &["Continue as advised", "Rest"];

// ── Vitals, diet, daily rounds ──────────────────────────────

pub const VITALS_TIMES: &[&str] = &["07:30:00", "11:30:00", "16:30:00"];
pub const TEMPERATURES: &[f64] = &[36.7, 36.9, 37.2, 37.5];
pub const CHART_BLOOD_PRESSURES: &[&str] = &["118/76", "120/80", "124/82", "130/86"];
pub const MEAL_TIMES: &[&str] = &["07:30", "13:00", "19:30"];
pub const DIET_PLANS: &[&str] = &[
    "Breakfast: Idli-Sambar; Lunch: Dal-Rice; Dinner: Soup",
    "Breakfast: Poha; Lunch: Roti-Sabzi; Dinner: Khichdi",
    "Breakfast: Upma; Lunch: Curd-Rice; Dinner: Veg Pulao",
];
pub const DIET_NOTES: &[&str] = &["Tolerated well", "Half taken", "Skipped dinner"];
pub const ASSESSMENTS: &[&str] = &["Stable", "Improving", "Deteriorating"];
pub const ASSESSMENT_ADVICE: &[&str] = &["Continue meds", "Physio advised", "Observe"];

// ── Referral, investigations, billing, discharge ───────────

pub const REFERRAL_NOTES: &[&str] = &["Needs specialist review", "Second opinion requested"];
pub const REFERRAL_ADVICE: &[&str] = &["Proceed with imaging", "Start physiotherapy"];
pub const RECOMMENDED_PROCEDURES: &str = "Abhyanga, Swedana";
pub const RECOMMENDED_MEDS: &str = "Ashwagandha, Triphala";
pub const INVESTIGATIONS: &[&str] = &[
    "CBC",
    "RFT",
    "LFT",
    "X-Ray Chest",
    "MRI Lumbar Spine",
    "CT Brain",
    "Urine Routine",
    "ECG",
    "Ultrasound Abdomen",
];
pub const INVESTIGATION_SLOTS: &[&str] = &["09:00-10:00 am", "11:00-12:00 pm", "02:00-03:00 pm"];
pub const INVESTIGATION_NOTES: &[&str] = &["Urgent", "Normal priority", "Review after report"];
pub const ADMISSION_CHARGE: u32 = 500;
pub const BED_CHARGES: &[u32] = &[1000, 1500, 2000];
pub const PROCEDURE_CHARGES: &[u32] = &[1500, 2500, 3500];
pub const MEDICATION_CHARGES: &[u32] = &[800, 1200, 1600];
pub const DISCHARGE_CONDITIONS: &[&str] = &["Stable", "Improved"];
pub const AS_PER_RECORDS: &str = "As per records";
pub const FOLLOW_UP_PERIOD: &str = "7 days";

/// One option, uniformly. Empty lists yield the type's default.
pub fn pick<R: Rng + ?Sized, T: Copy + Default>(rng: &mut R, options: &[T]) -> T {
    options.choose(rng).copied().unwrap_or_default()
}

/// `kmin..=kmax` distinct options joined with ", " (capped at the list size).
pub fn pick_several<R: Rng + ?Sized>(
    rng: &mut R,
    options: &[&str],
    kmin: usize,
    kmax: usize,
) -> String {
    if options.is_empty() {
        return String::new();
    }
    let k = rng.gen_range(kmin..=kmax.max(kmin)).min(options.len());
    options
        .choose_multiple(rng, k)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check that a comma-joined value only contains members of `options`.
pub fn all_from(value: &str, options: &[&str]) -> bool {
    value.split(", ").all(|part| options.contains(&part))
}
