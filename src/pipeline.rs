//! Pipeline
//!
//! The report phases as separate functions, run in order by [`run`]. Every
//! phase is synchronous; serving is left to the caller.
use crate::acquisition;
use crate::analysis::{self, DriftAnalysis};
use crate::config::ReportConfig;
use crate::data::ObservationTable;
use crate::errors::DriftError;
use crate::fitter::{fit_and_score, ScoredWindows};
use crate::forest::RandomForestRegressor;
use crate::report;
use log::info;
use std::path::PathBuf;

/// Windows scored by the fitted forest, plus its out-of-bag R².
#[derive(Clone, Debug)]
pub struct FitOutcome {
    pub scored: ScoredWindows,
    pub oob_score: Option<f64>,
}

/// What a finished run produced.
#[derive(Clone, Debug)]
pub struct DriftReport {
    pub analysis: DriftAnalysis,
    pub oob_score: Option<f64>,
    pub files: Vec<PathBuf>,
}

/// Download and parse the dataset.
pub fn fetch(cfg: &ReportConfig) -> Result<ObservationTable, DriftError> {
    acquisition::fetch(cfg)
}

/// Cut the reference and current windows out of `table`.
pub fn split(table: &ObservationTable, cfg: &ReportConfig) -> (ObservationTable, ObservationTable) {
    crate::split::split(table, &cfg.reference, &cfg.current)
}

/// Fit a forest on `reference` and score both windows. The forest is dropped here.
pub fn fit(reference: ObservationTable, current: ObservationTable, cfg: &ReportConfig) -> Result<FitOutcome, DriftError> {
    let mut forest = RandomForestRegressor::from_config(&cfg.forest);
    let scored = fit_and_score(&mut forest, reference, current, &cfg.model_features(), &cfg.target)?;
    Ok(FitOutcome {
        scored,
        oob_score: forest.oob_score,
    })
}

pub fn analyze(scored: &ScoredWindows, cfg: &ReportConfig) -> Result<DriftAnalysis, DriftError> {
    analysis::analyze(scored, &cfg.target, &cfg.numerical_features)
}

pub fn render(fitted: &FitOutcome, analysis: &DriftAnalysis, cfg: &ReportConfig) -> Result<Vec<PathBuf>, DriftError> {
    report::render(&fitted.scored, analysis, fitted.oob_score, cfg)
}

/// Every phase after acquisition, on a table already in memory.
pub fn build_report(table: &ObservationTable, cfg: &ReportConfig) -> Result<DriftReport, DriftError> {
    cfg.validate()?;
    let (reference, current) = split(table, cfg);
    let fitted = fit(reference, current, cfg)?;
    let analysis = analyze(&fitted.scored, cfg)?;
    let files = render(&fitted, &analysis, cfg)?;
    Ok(DriftReport {
        analysis,
        oob_score: fitted.oob_score,
        files,
    })
}

/// Fetch the dataset and build the report into `cfg.output_dir`.
pub fn run(cfg: &ReportConfig) -> Result<DriftReport, DriftError> {
    cfg.validate()?;
    info!("Fetching {} from {}", cfg.dataset_member, cfg.dataset_url);
    let table = fetch(cfg)?;
    build_report(&table, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_timestamp, TimeRange};
    use chrono::Duration;

    #[test]
    fn test_invalid_config_fails_before_fetch() {
        let mut cfg = ReportConfig {
            dataset_url: "http://127.0.0.1:9/unreachable.zip".to_string(),
            ..ReportConfig::default()
        };
        cfg.forest.n_estimators = 0;
        assert!(matches!(run(&cfg), Err(DriftError::InvalidParameter(..))));
    }

    #[test]
    fn test_empty_reference_window_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let start = parse_timestamp("2011-01-01").unwrap();
        let stamps = (0..10).map(|h| start + Duration::hours(h)).collect();
        let columns = ["temp", "cnt"]
            .iter()
            .map(|name| (name.to_string(), (0..10).map(|v| v as f64).collect()))
            .collect();
        let table = ObservationTable::new(stamps, columns).unwrap();
        let cfg = ReportConfig {
            numerical_features: vec!["temp".to_string()],
            categorical_features: Vec::new(),
            reference: TimeRange::parse("2010-01-01", "2010-01-02").unwrap(),
            output_dir: dir.path().to_path_buf(),
            ..ReportConfig::default()
        };
        assert!(matches!(build_report(&table, &cfg), Err(DriftError::EmptyTrainingSet)));
    }
}
