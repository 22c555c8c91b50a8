mod node;

// Modules
pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod constants;
pub mod data;
pub mod errors;
pub mod fitter;
pub mod forest;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod sampler;
pub mod server;
pub mod split;
pub mod stats;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use analysis::DriftAnalysis;
pub use config::{ForestConfig, ReportConfig};
pub use data::{Matrix, ObservationTable, TimeRange};
pub use errors::DriftError;
pub use fitter::{Regressor, ScoredWindow, ScoredWindows};
pub use forest::RandomForestRegressor;
pub use pipeline::{build_report, run, DriftReport};
pub use server::serve;
