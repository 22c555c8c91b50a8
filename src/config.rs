//! Report Configuration
//!
//! Everything the pipeline needs to know up front. The binary always runs with
//! [`ReportConfig::default`], which reproduces the Bike Sharing report.
use crate::constants::*;
use crate::data::TimeRange;
use crate::errors::DriftError;
use chrono::NaiveDateTime;
use log::error;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Parameters of the random forest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ForestConfig {
    /// Number of trees.
    pub n_estimators: usize,
    /// Seed for bootstrap draws and split tie-breaking.
    pub seed: u64,
    /// Draw a bootstrap sample per tree, otherwise every tree sees every row.
    pub bootstrap: bool,
    /// Maximum tree depth, unlimited when `None`.
    pub max_depth: Option<usize>,
    /// Minimum number of rows required to split a node.
    pub min_samples_split: usize,
    /// Minimum number of rows in each leaf.
    pub min_samples_leaf: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        ForestConfig {
            n_estimators: N_ESTIMATORS,
            seed: SEED,
            bootstrap: true,
            max_depth: None,
            min_samples_split: MIN_SAMPLES_SPLIT,
            min_samples_leaf: MIN_SAMPLES_LEAF,
        }
    }
}

/// Configuration for a drift report run.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Location of the zipped dataset.
    pub dataset_url: String,
    /// CSV file inside the archive.
    pub dataset_member: String,
    /// Column holding the timestamps.
    pub index_column: String,
    /// Regression target.
    pub target: String,
    /// Features tested for drift, in report order.
    pub numerical_features: Vec<String>,
    /// Features only used for fitting.
    pub categorical_features: Vec<String>,
    /// Baseline window.
    pub reference: TimeRange,
    /// Comparison window.
    pub current: TimeRange,
    pub forest: ForestConfig,
    /// Number of histogram bins in the drift charts.
    pub histogram_bins: usize,
    /// Width of each image on the HTML page.
    pub image_width: u32,
    pub output_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

/// Window from two timestamp literals. A literal that does not parse yields an
/// inverted range, which [`ReportConfig::validate`] rejects.
fn literal_range(start: &str, end: &str) -> TimeRange {
    TimeRange::parse(start, end).unwrap_or_else(|err| {
        error!("Invalid window {} .. {}: {}", start, end, err);
        TimeRange::new(NaiveDateTime::MAX, NaiveDateTime::MIN)
    })
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            dataset_url: DATASET_URL.to_string(),
            dataset_member: DATASET_MEMBER.to_string(),
            index_column: INDEX_COLUMN.to_string(),
            target: TARGET_COLUMN.to_string(),
            numerical_features: NUMERICAL_FEATURES.iter().map(|s| s.to_string()).collect(),
            categorical_features: CATEGORICAL_FEATURES.iter().map(|s| s.to_string()).collect(),
            reference: literal_range(REFERENCE_START, REFERENCE_END),
            current: literal_range(CURRENT_START, CURRENT_END),
            forest: ForestConfig::default(),
            histogram_bins: HISTOGRAM_BINS,
            image_width: IMAGE_WIDTH,
            output_dir: PathBuf::from(OUTPUT_DIR),
            bind_addr: BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000)),
        }
    }
}

impl ReportConfig {
    /// Columns fed to the regressor: numerical features followed by categorical ones.
    pub fn model_features(&self) -> Vec<String> {
        self.numerical_features
            .iter()
            .chain(self.categorical_features.iter())
            .cloned()
            .collect()
    }

    /// Check parameters before any work is done.
    pub fn validate(&self) -> Result<(), DriftError> {
        if self.forest.n_estimators == 0 {
            return Err(DriftError::InvalidParameter(
                "n_estimators".to_string(),
                "a positive integer".to_string(),
                "0".to_string(),
            ));
        }
        if self.forest.min_samples_split < 2 {
            return Err(DriftError::InvalidParameter(
                "min_samples_split".to_string(),
                "an integer of at least 2".to_string(),
                self.forest.min_samples_split.to_string(),
            ));
        }
        if self.forest.min_samples_leaf == 0 {
            return Err(DriftError::InvalidParameter(
                "min_samples_leaf".to_string(),
                "a positive integer".to_string(),
                "0".to_string(),
            ));
        }
        for (name, range) in [("reference", &self.reference), ("current", &self.current)] {
            if range.start > range.end {
                return Err(DriftError::InvalidParameter(
                    name.to_string(),
                    "a window whose start is not after its end".to_string(),
                    format!("{} .. {}", range.start, range.end),
                ));
            }
        }
        if self.histogram_bins == 0 {
            return Err(DriftError::InvalidParameter(
                "histogram_bins".to_string(),
                "a positive integer".to_string(),
                "0".to_string(),
            ));
        }
        if self.model_features().is_empty() {
            return Err(DriftError::InvalidParameter(
                "features".to_string(),
                "at least one feature column".to_string(),
                "none".to_string(),
            ));
        }
        if let Some(name) = self
            .model_features()
            .iter()
            .find(|name| name.is_empty() || name.chars().any(|c| matches!(c, '/' | '\\' | '"' | '<' | '>')))
        {
            return Err(DriftError::InvalidParameter(
                "features".to_string(),
                "names usable in a file name".to_string(),
                name.clone(),
            ));
        }
        Ok(())
    }
}
