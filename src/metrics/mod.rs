//! Metrics
//!
//! Regression quality metrics reported for the reference window.
pub mod regression;

pub use regression::{mean_squared_error, r2_score, root_mean_squared_error, RegressionQuality};
