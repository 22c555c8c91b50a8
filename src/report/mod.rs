//! Report Renderer
//!
//! Every file the report consists of is listed once, in the artifact manifest.
//! Charts are written from the manifest and `index.html` is generated from the
//! same list, so the page always references exactly the images on disk.
pub mod charts;
pub mod html;

use crate::analysis::{ColumnDrift, DriftAnalysis};
use crate::config::ReportConfig;
use crate::constants::{INDEX_DOCUMENT, SUMMARY_DOCUMENT};
use crate::errors::DriftError;
use crate::fitter::ScoredWindows;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSION: &str = "svg";

/// Headings of the dashboard, in page order.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    RegressionPerformance,
    TargetDrift,
    FeatureDrift,
}

pub const SECTIONS: [Section; 3] = [Section::RegressionPerformance, Section::TargetDrift, Section::FeatureDrift];

/// What an image shows.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub enum Statistic {
    Regression,
    Target(String),
    Feature(String),
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub statistic: Statistic,
    pub file_name: String,
}

impl Artifact {
    fn new(statistic: Statistic) -> Self {
        let stem = match &statistic {
            Statistic::Regression => "regression_perf_ref".to_string(),
            Statistic::Target(column) => format!("target_drift_{}", column),
            Statistic::Feature(column) => format!("feature_drift_{}", column),
        };
        Artifact {
            statistic,
            file_name: format!("{}.{}", stem, IMAGE_EXTENSION),
        }
    }

    pub fn section(&self) -> Section {
        match self.statistic {
            Statistic::Regression => Section::RegressionPerformance,
            Statistic::Target(_) => Section::TargetDrift,
            Statistic::Feature(_) => Section::FeatureDrift,
        }
    }
}

/// List the images of a report: the regression chart, the target chart and one
/// chart per feature, in that order.
pub fn manifest(target: &str, features: &[String]) -> Vec<Artifact> {
    let mut artifacts = vec![
        Artifact::new(Statistic::Regression),
        Artifact::new(Statistic::Target(target.to_string())),
    ];
    artifacts.extend(features.iter().map(|f| Artifact::new(Statistic::Feature(f.clone()))));
    artifacts
}

/// Contents of `report.json`.
#[derive(Serialize, Debug)]
pub struct ReportSummary<'a> {
    pub reference_rows: usize,
    pub current_rows: usize,
    /// Out-of-bag R² of the forest, when bootstrap left rows out.
    pub oob_score: Option<f64>,
    pub analysis: &'a DriftAnalysis,
    pub artifacts: &'a [Artifact],
    pub config: &'a ReportConfig,
}

fn regression_title(analysis: &DriftAnalysis) -> String {
    format!(
        "Regression Performance: RMSE={:.2}, R2={:.2}",
        analysis.regression.rmse, analysis.regression.r2
    )
}

fn target_title(drift: &ColumnDrift) -> String {
    format!("Target Drift: t-test, p={:.4}", drift.outcome.p_value)
}

fn feature_title(drift: &ColumnDrift) -> String {
    format!("Feature Drift: {}, p = {:.4}", drift.column, drift.outcome.p_value)
}

fn draw(
    artifact: &Artifact,
    path: &Path,
    scored: &ScoredWindows,
    analysis: &DriftAnalysis,
    bins: usize,
) -> Result<(), DriftError> {
    let (reference, current) = (&scored.reference.table, &scored.current.table);
    match &artifact.statistic {
        Statistic::Regression => charts::scatter_chart(
            path,
            &regression_title(analysis),
            reference.column(&analysis.target_drift.column)?,
            &scored.reference.predictions,
        ),
        Statistic::Target(column) => charts::histogram_chart(
            path,
            &target_title(&analysis.target_drift),
            column,
            reference.column(column)?,
            current.column(column)?,
            bins,
        ),
        Statistic::Feature(column) => {
            let drift = analysis
                .feature_drift
                .iter()
                .find(|d| &d.column == column)
                .ok_or_else(|| DriftError::MissingColumn(column.clone()))?;
            charts::histogram_chart(
                path,
                &feature_title(drift),
                column,
                reference.column(column)?,
                current.column(column)?,
                bins,
            )
        }
    }
}

/// Remove images left over from earlier runs that the manifest no longer lists.
fn prune_stale_images(dir: &Path, artifacts: &[Artifact]) -> Result<usize, DriftError> {
    let keep: HashSet<&str> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_image = path.extension().is_some_and(|ext| ext == IMAGE_EXTENSION);
        let listed = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| keep.contains(n));
        if path.is_file() && is_image && !listed {
            debug!("Removing stale image {}", path.display());
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Write every chart, `index.html` and `report.json` into `cfg.output_dir`.
///
/// The directory is created if needed and existing files are overwritten.
/// Returns the paths written, images first.
///
/// # Arguments
///
/// * `scored` - Both windows with their predictions.
/// * `analysis` - Statistics computed on `scored`.
/// * `oob_score` - Forest diagnostic, only stored in the summary.
/// * `cfg` - Output location, target, features and chart settings.
pub fn render(
    scored: &ScoredWindows,
    analysis: &DriftAnalysis,
    oob_score: Option<f64>,
    cfg: &ReportConfig,
) -> Result<Vec<PathBuf>, DriftError> {
    let dir = cfg.output_dir.as_path();
    fs::create_dir_all(dir)?;

    let artifacts = manifest(&cfg.target, &cfg.numerical_features);
    let mut written = Vec::with_capacity(artifacts.len() + 2);
    for artifact in &artifacts {
        let path = dir.join(&artifact.file_name);
        draw(artifact, &path, scored, analysis, cfg.histogram_bins)?;
        written.push(path);
    }
    let removed = prune_stale_images(dir, &artifacts)?;

    let index_path = dir.join(INDEX_DOCUMENT);
    fs::write(&index_path, html::index_document(&artifacts, cfg.image_width))?;
    written.push(index_path);

    let summary = ReportSummary {
        reference_rows: scored.reference.table.rows(),
        current_rows: scored.current.table.rows(),
        oob_score,
        analysis,
        artifacts: &artifacts,
        config: cfg,
    };
    let summary_path = dir.join(SUMMARY_DOCUMENT);
    fs::write(&summary_path, serde_json::to_string_pretty(&summary)?)?;
    written.push(summary_path);

    info!(
        "Rendered {} images into {}, removed {} stale",
        artifacts.len(),
        dir.display(),
        removed
    );
    Ok(written)
}
