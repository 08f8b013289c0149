//! hms-seeder: fill a hospital management demo database from a patient sheet.
//!
//! Usage:
//!   hms-seeder register --patients <csv> [--admit <n>]
//!   hms-seeder clinical --patients <csv> [--medications <csv>] [--procedures <csv>] [--only <IPD-no>...]
//!   hms-seeder all --patients <csv> [--admit <n>] [--medications <csv>] [--procedures <csv>]
//!
//! The hosted database is addressed through SUPABASE_URL and
//! SUPABASE_SERVICE_KEY; `--local [<path>]` writes to a SQLite file instead.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use hms_seeder::config::{self, SeederConfig, StoreTarget};
use hms_seeder::{init_tracing, open_store, run, Phase, RunOutcome};

#[derive(Parser)]
#[command(name = "hms-seeder")]
#[command(version)]
#[command(about = "Seed a hospital management demo database from a patient spreadsheet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use the local SQLite store (optionally at PATH) instead of the remote one
    #[arg(long, global = true, num_args = 0..=1, value_name = "PATH")]
    local: Option<Option<PathBuf>>,

    /// Base URL of the remote store
    #[arg(long, global = true, env = config::ENV_STORE_URL)]
    url: Option<String>,

    /// Service-role key for the remote store
    #[arg(long, global = true, env = config::ENV_STORE_KEY, hide_env_values = true)]
    service_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register sheet patients: patients, appointments, OPD visits, admissions
    Register {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        admit: AdmitArgs,
    },
    /// Generate clinical records for every admission of the sheet's patients
    Clinical {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        clinical: ClinicalArgs,
    },
    /// Registration followed by clinical generation
    All {
        #[command(flatten)]
        sheet: SheetArgs,
        #[command(flatten)]
        admit: AdmitArgs,
        #[command(flatten)]
        clinical: ClinicalArgs,
    },
}

#[derive(Args)]
struct SheetArgs {
    /// Patient sheet (CSV export)
    #[arg(long, value_name = "CSV")]
    patients: PathBuf,

    /// Seed for reproducible generated content
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args)]
struct AdmitArgs {
    /// Admissions created per registration run
    #[arg(long, default_value_t = config::DEFAULT_ADMISSIONS_PER_RUN)]
    admit: usize,
}

#[derive(Args)]
struct ClinicalArgs {
    /// Medication catalog; the store's catalog is used when omitted
    #[arg(long, value_name = "CSV")]
    medications: Option<PathBuf>,

    /// Procedure catalog; the store's catalog is used when omitted
    #[arg(long, value_name = "CSV")]
    procedures: Option<PathBuf>,

    /// Only seed this admission (repeatable)
    #[arg(long, value_name = "IPD-NO")]
    only: Vec<String>,

    /// Continue with the next admission after a failure
    #[arg(long)]
    keep_going: bool,
}

impl Cli {
    fn store_target(&self) -> Result<StoreTarget, String> {
        if let Some(path) = &self.local {
            let path = path
                .clone()
                .or_else(|| std::env::var_os(config::ENV_LOCAL_DB).map(PathBuf::from))
                .unwrap_or_else(config::default_local_db_path);
            return Ok(StoreTarget::Local { path });
        }
        match (&self.url, &self.service_key) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Ok(StoreTarget::Remote {
                    url: url.clone(),
                    service_key: key.clone(),
                })
            }
            _ => Err(format!(
                "no store configured: set {} and {}, or pass --local",
                config::ENV_STORE_URL,
                config::ENV_STORE_KEY
            )),
        }
    }
}

impl Commands {
    /// The phase to run and its configuration.
    fn into_config(self, target: StoreTarget) -> (Phase, SeederConfig) {
        let (phase, sheet, admit, clinical) = match self {
            Commands::Register { sheet, admit } => (Phase::Register, sheet, Some(admit), None),
            Commands::Clinical { sheet, clinical } => (Phase::Clinical, sheet, None, Some(clinical)),
            Commands::All { sheet, admit, clinical } => (Phase::All, sheet, Some(admit), Some(clinical)),
        };
        let mut cfg = SeederConfig::new(target, sheet.patients);
        cfg.seed = sheet.seed;
        if let Some(admit) = admit {
            cfg.admissions_per_run = admit.admit;
        }
        if let Some(clinical) = clinical {
            cfg.medications_csv = clinical.medications;
            cfg.procedures_csv = clinical.procedures;
            cfg.only_admissions = clinical.only;
            cfg.keep_going = clinical.keep_going;
        }
        (phase, cfg)
    }
}

fn log_outcome(outcome: &RunOutcome) {
    if let Some(report) = &outcome.registration {
        tracing::info!(
            patients = report.patients_inserted,
            patients_skipped = report.patients_skipped,
            appointments = report.appointments_inserted,
            appointments_skipped = report.appointments_skipped,
            opd_visits = report.opd_visits.len(),
            admissions = ?report.admissions,
            "Registration summary"
        );
    }
    if let Some(report) = &outcome.clinical {
        for failure in &report.failed {
            tracing::error!(ipd_no = %failure.ipd_no, error = %failure.error, "Admission not seeded");
        }
        if !report.is_success() {
            tracing::warn!(
                remaining = ?report.remaining(),
                "Re-run the clinical phase with --only for the remaining admissions"
            );
        }
        tracing::info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            not_attempted = report.not_attempted.len(),
            "Clinical summary"
        );
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    tracing::info!("{} v{}", config::APP_NAME, config::APP_VERSION);

    let target = match cli.store_target() {
        Ok(t) => t,
        Err(msg) => {
            tracing::error!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let (phase, cfg) = cli.command.into_config(target);

    let store = match open_store(&cfg.store) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Cannot open store");
            return ExitCode::FAILURE;
        }
    };

    match run(&cfg, store.as_ref(), phase) {
        Ok(outcome) => {
            log_outcome(&outcome);
            if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Seeding run failed");
            ExitCode::FAILURE
        }
    }
}
