use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use super::{stamp, AdmissionContext};
use crate::models::RecordId;
use crate::seeder::vocab::{self, pick, pick_several};

pub const TABLE: &str = "ipd_case_sheets";

#[derive(Debug, Clone, Serialize)]
pub struct SystemicExamination {
    #[serde(rename = "RespiratorySystem")]
    pub respiratory_system: &'static str,
    #[serde(rename = "CVS")]
    pub cvs: &'static str,
    #[serde(rename = "CNS")]
    pub cns: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralExamination {
    pub bp: &'static str,
    pub pulse: u32,
    pub spo2: u32,
}

/// Ten-fold examination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DasavidhaPariksha {
    pub prakriti: &'static str,
    pub vikriti: &'static str,
    pub sara: &'static str,
    pub samhanana: &'static str,
    pub pramana: &'static str,
    pub satmya: &'static str,
    pub satva: &'static str,
    pub ahara_shakti: &'static str,
    pub vyayam_shakti: &'static str,
    pub vaya: &'static str,
}

/// Eight-fold examination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AsthasthanaPariksha {
    pub nadi: &'static str,
    pub mala: &'static str,
    pub mootra: &'static str,
    pub jihva: &'static str,
    pub shabda: &'static str,
    pub sparsha: &'static str,
    pub drika: &'static str,
    pub akruti: &'static str,
}

/// Pathogenesis factors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sampraptighataka {
    pub dosha: &'static str,
    pub srotho_dushti: &'static str,
    pub vyaktasthana: &'static str,
    pub dushya: &'static str,
    pub udhabavasthana: &'static str,
    pub vyadibheda: &'static str,
    pub srothas: &'static str,
    pub sancharastana: &'static str,
    pub sadhyaasadhyatha: &'static str,
}

/// Row of `ipd_case_sheets`; one per admission.
#[derive(Debug, Clone, Serialize)]
pub struct CaseSheet {
    pub ipd_no: String,
    pub opd_no: Option<String>,
    pub doctor_id: Option<RecordId>,
    pub department: Option<String>,
    pub ward: Option<String>,
    pub bed_no: Option<String>,
    pub admission_at: String,
    pub discharge_at: Option<String>,
    pub doa_time: &'static str,
    pub dod_time: Option<&'static str>,
    pub op_no: Option<String>,
    pub ip_no: String,

    pub age: Option<Value>,
    pub gender: Option<String>,
    pub occupation: &'static str,
    pub address: Option<String>,
    pub contact: Option<String>,

    pub height: String,
    pub weight: String,
    pub bmi: String,
    pub pulse: String,
    pub rr: String,
    pub bp: &'static str,
    pub systemic_examination: SystemicExamination,

    pub present_complaints: String,
    pub associated_complaints: String,
    pub past_history: &'static str,
    pub personal_history: &'static str,
    pub obs_gyn_history: Option<&'static str>,
    pub previous_medicine_history: &'static str,
    pub family_history: &'static str,

    pub general_examination: GeneralExamination,
    pub dasavidha_pariksha: DasavidhaPariksha,
    pub asthasthana_pariksha: AsthasthanaPariksha,
    pub sampraptighataka: Sampraptighataka,

    pub local_examination: &'static str,
    pub pain_assessment: &'static str,
    pub investigations: &'static str,
    pub diagnosis: &'static str,
    pub nutritional_status: &'static str,
    pub treatment_plan: &'static str,
    pub preventive_aspects: &'static str,
    pub rehabilitation: &'static str,
    pub desired_outcome: &'static str,
}

pub fn build<R: Rng + ?Sized>(ctx: &AdmissionContext<'_>, rng: &mut R) -> CaseSheet {
    let adm = ctx.admission;
    CaseSheet {
        ipd_no: adm.ipd_no.clone(),
        opd_no: adm.opd_no.clone(),
        doctor_id: adm.doctor_id.clone(),
        department: ctx.department.clone(),
        ward: adm.ward.clone(),
        bed_no: adm.bed_number.clone(),
        admission_at: stamp(ctx.anchor, "09:00:00"),
        discharge_at: ctx.discharge.map(|d| stamp(d, "17:00:00")),
        doa_time: "09:00",
        dod_time: ctx.discharge.map(|_| "17:00"),
        op_no: adm.opd_no.clone(),
        ip_no: adm.ipd_no.clone(),

        age: ctx.patient.age.clone(),
        gender: ctx.patient.gender.clone(),
        occupation: "Unknown",
        address: ctx.patient.address.clone(),
        contact: ctx.patient.contact.clone(),

        height: rng.gen_range(150..=180).to_string(),
        weight: rng.gen_range(50..=90).to_string(),
        bmi: format!("{:.1}", rng.gen_range(18.5..=30.0_f64)),
        pulse: rng.gen_range(70..=100).to_string(),
        rr: rng.gen_range(16..=22).to_string(),
        bp: pick(rng, vocab::BLOOD_PRESSURES),
        systemic_examination: SystemicExamination {
            respiratory_system: pick(rng, vocab::RESPIRATORY_FINDINGS),
            cvs: pick(rng, vocab::CVS_FINDINGS),
            cns: pick(rng, vocab::CNS_FINDINGS),
        },

        present_complaints: pick_several(rng, vocab::PRESENT_COMPLAINTS, 1, 3),
        associated_complaints: pick_several(rng, vocab::ASSOCIATED_COMPLAINTS, 1, 3),
        past_history: pick(rng, vocab::PAST_HISTORY),
        personal_history: pick(rng, vocab::PERSONAL_HISTORY),
        obs_gyn_history: if ctx.patient.is_female() {
            Some(pick(rng, vocab::OBS_GYN_HISTORY))
        } else {
            None
        },
        previous_medicine_history: pick(rng, vocab::PREVIOUS_MEDICINE_HISTORY),
        family_history: pick(rng, vocab::FAMILY_HISTORY),

        general_examination: GeneralExamination {
            bp: "120/80",
            pulse: rng.gen_range(72..=92),
            spo2: rng.gen_range(96..=99),
        },
        dasavidha_pariksha: DasavidhaPariksha {
            prakriti: pick(rng, vocab::DOSHAS),
            vikriti: pick(rng, vocab::DOSHAS),
            sara: pick(rng, vocab::GRADES),
            samhanana: pick(rng, vocab::GRADES),
            pramana: pick(rng, vocab::GRADES),
            satmya: pick(rng, vocab::GRADES),
            satva: pick(rng, vocab::GRADES),
            ahara_shakti: pick(rng, vocab::CAPACITY_GRADES),
            vyayam_shakti: pick(rng, vocab::CAPACITY_GRADES),
            vaya: pick(rng, vocab::GRADES),
        },
        asthasthana_pariksha: AsthasthanaPariksha {
            nadi: pick(rng, vocab::DOSHAS),
            mala: pick(rng, vocab::MALA),
            mootra: pick(rng, vocab::MOOTRA),
            jihva: pick(rng, vocab::JIHVA),
            shabda: pick(rng, vocab::SHABDA),
            sparsha: pick(rng, vocab::SPARSHA),
            drika: pick(rng, vocab::DRIKA),
            akruti: pick(rng, vocab::AKRUTI),
        },
        sampraptighataka: Sampraptighataka {
            dosha: pick(rng, vocab::DOSHAS),
            srotho_dushti: pick(rng, vocab::SROTHO_DUSHTI),
            vyaktasthana: pick(rng, vocab::VYAKTASTHANA),
            dushya: pick(rng, vocab::AGNI),
            udhabavasthana: pick(rng, vocab::PRESENT_ABSENT),
            vyadibheda: pick(rng, vocab::BODY_SITES),
            srothas: pick(rng, vocab::SROTHAS),
            sancharastana: pick(rng, vocab::BODY_SITES),
            sadhyaasadhyatha: pick(rng, vocab::YES_NO),
        },

        local_examination: pick(rng, vocab::LOCAL_EXAMINATION),
        pain_assessment: pick(rng, vocab::PAIN_SCALES),
        investigations: pick(rng, vocab::CASE_INVESTIGATIONS),
        diagnosis: pick(rng, vocab::DIAGNOSES),
        nutritional_status: pick(rng, vocab::NUTRITIONAL_STATUS),
        treatment_plan: pick(rng, vocab::TREATMENT_PLANS),
        preventive_aspects: pick(rng, vocab::PREVENTIVE_ASPECTS),
        rehabilitation: pick(rng, vocab::REHABILITATION),
        desired_outcome: pick(rng, vocab::DESIRED_OUTCOMES),
    }
}
