use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "hms-seeder";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Remote store endpoint (Supabase project URL)
pub const ENV_STORE_URL: &str = "SUPABASE_URL";
/// Service-role key for the remote store
pub const ENV_STORE_KEY: &str = "SUPABASE_SERVICE_KEY";
/// Path of the local SQLite row store
pub const ENV_LOCAL_DB: &str = "HMS_SEEDER_DB";

/// Admissions created per registration run unless overridden
pub const DEFAULT_ADMISSIONS_PER_RUN: usize = 10;

/// Filter used when RUST_LOG is not set
pub fn default_log_filter() -> &'static str {
    "hms_seeder=info"
}

/// Get the application data directory (~/.hms-seeder/)
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".hms-seeder"))
}

/// Default location of the local SQLite store
pub fn default_local_db_path() -> PathBuf {
    app_data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("seed.db")
}

/// Where rows are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// PostgREST endpoint of the hosted database.
    Remote { url: String, service_key: String },
    /// JSON row store in a local SQLite file.
    Local { path: PathBuf },
}

/// Everything a seeding run needs to know before it touches the store.
#[derive(Debug, Clone)]
pub struct SeederConfig {
    pub store: StoreTarget,
    pub patients_csv: PathBuf,
    pub medications_csv: Option<PathBuf>,
    pub procedures_csv: Option<PathBuf>,
    pub admissions_per_run: usize,
    /// Fixed RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
    /// Restrict the clinical phase to these admission ids.
    pub only_admissions: Vec<String>,
    /// Continue the clinical phase after a failed admission.
    pub keep_going: bool,
}

impl SeederConfig {
    pub fn new(store: StoreTarget, patients_csv: PathBuf) -> Self {
        Self {
            store,
            patients_csv,
            medications_csv: None,
            procedures_csv: None,
            admissions_per_run: DEFAULT_ADMISSIONS_PER_RUN,
            seed: None,
            only_admissions: Vec::new(),
            keep_going: false,
        }
    }
}
