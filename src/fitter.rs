//! Model Fitter
//!
//! Fits a regressor on the reference window only and scores both windows with
//! it. Windows are not modified; each is paired with its predictions in a new
//! [`ScoredWindow`].
use crate::data::{Matrix, ObservationTable};
use crate::errors::DriftError;
use crate::forest::RandomForestRegressor;
use log::info;

/// Anything that can be fitted on a feature matrix and then predict from one.
pub trait Regressor {
    fn fit(&mut self, data: &Matrix<f64>, y: &[f64]) -> Result<(), DriftError>;
    fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Vec<f64>;
}

impl Regressor for RandomForestRegressor {
    fn fit(&mut self, data: &Matrix<f64>, y: &[f64]) -> Result<(), DriftError> {
        RandomForestRegressor::fit(self, data, y)
    }

    fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Vec<f64> {
        RandomForestRegressor::predict(self, data, parallel)
    }
}

/// A window together with the model's predictions for each of its rows.
#[derive(Clone, Debug)]
pub struct ScoredWindow {
    pub table: ObservationTable,
    pub predictions: Vec<f64>,
}

#[derive(Clone, Debug)]
pub struct ScoredWindows {
    pub reference: ScoredWindow,
    pub current: ScoredWindow,
}

fn score<R: Regressor>(model: &R, table: &ObservationTable, features: &[String]) -> Result<Vec<f64>, DriftError> {
    let data = table.feature_data(features)?;
    let matrix = Matrix::new(&data, table.rows(), features.len());
    Ok(model.predict(&matrix, true))
}

/// Fit `model` on the reference window and predict both windows.
///
/// # Arguments
///
/// * `model` - Unfitted regressor, fitted exactly once here.
/// * `reference` - Training window.
/// * `current` - Comparison window, only ever predicted.
/// * `features` - Feature columns, in matrix column order.
/// * `target` - Target column.
pub fn fit_and_score<R: Regressor>(
    model: &mut R,
    reference: ObservationTable,
    current: ObservationTable,
    features: &[String],
    target: &str,
) -> Result<ScoredWindows, DriftError> {
    let data = reference.feature_data(features)?;
    let y = reference.column(target)?;
    let matrix = Matrix::new(&data, reference.rows(), features.len());
    model.fit(&matrix, y)?;

    let reference_predictions = model.predict(&matrix, true);
    let current_predictions = score(model, &current, features)?;
    info!(
        "Scored {} reference rows and {} current rows",
        reference_predictions.len(),
        current_predictions.len()
    );

    Ok(ScoredWindows {
        reference: ScoredWindow {
            table: reference,
            predictions: reference_predictions,
        },
        current: ScoredWindow {
            table: current,
            predictions: current_predictions,
        },
    })
}
