pub const DATASET_URL: &str = "https://archive.ics.uci.edu/ml/machine-learning-databases/00275/Bike-Sharing-Dataset.zip";
pub const DATASET_MEMBER: &str = "hour.csv";
pub const INDEX_COLUMN: &str = "dteday";
pub const TARGET_COLUMN: &str = "cnt";
pub const NUMERICAL_FEATURES: [&str; 6] = ["temp", "atemp", "hum", "windspeed", "hr", "weekday"];
pub const CATEGORICAL_FEATURES: [&str; 3] = ["season", "holiday", "workingday"];
pub const REFERENCE_START: &str = "2011-01-01 00:00:00";
pub const REFERENCE_END: &str = "2011-01-28 23:00:00";
pub const CURRENT_START: &str = "2011-01-29 00:00:00";
pub const CURRENT_END: &str = "2011-02-28 23:00:00";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const N_ESTIMATORS: usize = 50;
pub const SEED: u64 = 0;
pub const MIN_SAMPLES_SPLIT: usize = 2;
pub const MIN_SAMPLES_LEAF: usize = 1;
pub const HISTOGRAM_BINS: usize = 30;
pub const IMAGE_WIDTH: u32 = 600;
pub const CHART_SIZE: (u32, u32) = (640, 480);
pub const OUTPUT_DIR: &str = "static";
pub const BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_LOG_FILTER: &str = "drift_report=info,tower_http=info";
pub const KS_EXACT_LIMIT: usize = 10_000;
pub const IMPURITY_EPS: f64 = 1e-7;
pub const INDEX_DOCUMENT: &str = "index.html";
pub const SUMMARY_DOCUMENT: &str = "report.json";
