//! Drift Analysis
//!
//! Turns two scored windows into the numbers the report shows: regression
//! quality on the reference window, the target t-test and one KS test per
//! numerical feature.
use crate::errors::DriftError;
use crate::fitter::ScoredWindows;
use crate::metrics::RegressionQuality;
use crate::stats::{ks_2samp, welch_t_test, TestOutcome};
use crate::utils::fmt_vec_output;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Outcome of a two-sample test on one column.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ColumnDrift {
    pub column: String,
    pub outcome: TestOutcome,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DriftAnalysis {
    /// Fit quality of the model on its own training window.
    pub regression: RegressionQuality,
    /// Welch's t-test, reference against current target.
    pub target_drift: ColumnDrift,
    /// KS test per numerical feature, in configured order.
    pub feature_drift: Vec<ColumnDrift>,
}

/// Compute every statistic of the report.
///
/// # Arguments
///
/// * `scored` - Both windows with their predictions.
/// * `target` - Target column.
/// * `features` - Numerical features to test for drift.
pub fn analyze(scored: &ScoredWindows, target: &str, features: &[String]) -> Result<DriftAnalysis, DriftError> {
    let y_ref = scored.reference.table.column(target)?;
    let y_cur = scored.current.table.column(target)?;
    if y_ref.len() != scored.reference.predictions.len() {
        return Err(DriftError::LengthMismatch(
            "reference predictions".to_string(),
            y_ref.len(),
            scored.reference.predictions.len(),
        ));
    }

    let regression = RegressionQuality::compute(y_ref, &scored.reference.predictions);
    info!(
        "Reference fit: mse {:.4}, rmse {:.4}, r2 {:.4}",
        regression.mse, regression.rmse, regression.r2
    );

    let target_drift = ColumnDrift {
        column: target.to_string(),
        outcome: welch_t_test(y_ref, y_cur),
    };
    info!(
        "Target drift on {}: t {:.4}, p {:.4}",
        target, target_drift.outcome.statistic, target_drift.outcome.p_value
    );

    let feature_drift = features
        .iter()
        .map(|column| {
            let outcome = ks_2samp(
                scored.reference.table.column(column)?,
                scored.current.table.column(column)?,
            );
            debug!("Feature drift on {}: ks {:.4}, p {:.4}", column, outcome.statistic, outcome.p_value);
            Ok(ColumnDrift {
                column: column.clone(),
                outcome,
            })
        })
        .collect::<Result<Vec<_>, DriftError>>()?;
    let p_values: Vec<f64> = feature_drift.iter().map(|d| d.outcome.p_value).collect();
    info!("Feature drift p-values: [{}]", fmt_vec_output(&p_values));

    Ok(DriftAnalysis {
        regression,
        target_drift,
        feature_drift,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_timestamp, ObservationTable};
    use crate::fitter::ScoredWindow;
    use chrono::Duration;

    fn scored_window(offset: usize, x: Vec<f64>, y: Vec<f64>) -> ScoredWindow {
        let start = parse_timestamp("2011-01-01").unwrap();
        let stamps = (0..x.len()).map(|i| start + Duration::hours((offset + i) as i64)).collect();
        let predictions = y.clone();
        ScoredWindow {
            table: ObservationTable::new(stamps, vec![("x".to_string(), x), ("y".to_string(), y)]).unwrap(),
            predictions,
        }
    }

    #[test]
    fn test_analyze() {
        let scored = ScoredWindows {
            reference: scored_window(0, vec![1., 2., 3., 4., 5.], vec![1., 2., 3., 4., 5.]),
            current: scored_window(5, vec![10., 11., 12., 13., 14., 15.], vec![2., 4., 6., 8., 10., 12.]),
        };
        let analysis = analyze(&scored, "y", &["x".to_string()]).unwrap();

        assert_eq!(analysis.regression.mse, 0.0);
        assert_eq!(analysis.regression.r2, 1.0);
        assert_eq!(analysis.target_drift.column, "y");
        assert_eq!(analysis.target_drift.outcome, welch_t_test(&[1., 2., 3., 4., 5.], &[2., 4., 6., 8., 10., 12.]));
        assert_eq!(analysis.feature_drift.len(), 1);
        assert_eq!(analysis.feature_drift[0].column, "x");
        assert_eq!(analysis.feature_drift[0].outcome.statistic, 1.0);
    }

    #[test]
    fn test_analyze_empty_current_window() {
        let scored = ScoredWindows {
            reference: scored_window(0, vec![1., 2., 3.], vec![1., 2., 3.]),
            current: scored_window(3, vec![], vec![]),
        };
        let analysis = analyze(&scored, "y", &["x".to_string()]).unwrap();
        assert!(analysis.target_drift.outcome.p_value.is_nan());
        assert!(analysis.feature_drift[0].outcome.p_value.is_nan());

        // NaN is written as null.
        let json = serde_json::to_string(&analysis.feature_drift[0]).unwrap();
        assert_eq!(json, r#"{"column":"x","outcome":{"statistic":null,"p_value":null}}"#);
    }

    #[test]
    fn test_analyze_missing_feature() {
        let scored = ScoredWindows {
            reference: scored_window(0, vec![1., 2.], vec![1., 2.]),
            current: scored_window(2, vec![3., 4.], vec![3., 4.]),
        };
        let res = analyze(&scored, "y", &["temp".to_string()]);
        assert!(matches!(res, Err(DriftError::MissingColumn(ref c)) if c == "temp"));
    }
}
