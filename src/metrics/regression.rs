use serde::{Deserialize, Serialize};

/// Scalar summary of how well predictions track the target.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RegressionQuality {
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionQuality {
    pub fn compute(y: &[f64], yhat: &[f64]) -> Self {
        let mse = mean_squared_error(y, yhat);
        RegressionQuality {
            mse,
            rmse: mse.sqrt(),
            r2: r2_score(y, yhat),
        }
    }
}

/// Mean of squared residuals, NaN for empty input.
pub fn mean_squared_error(y: &[f64], yhat: &[f64]) -> f64 {
    if y.is_empty() {
        return f64::NAN;
    }
    let res = y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).powi(2)).sum::<f64>();
    res / y.len() as f64
}

pub fn root_mean_squared_error(y: &[f64], yhat: &[f64]) -> f64 {
    mean_squared_error(y, yhat).sqrt()
}

/// Coefficient of determination.
///
/// A constant target has no variance to explain: a perfect fit scores 1 and
/// anything else scores 0, rather than dividing by zero.
pub fn r2_score(y: &[f64], yhat: &[f64]) -> f64 {
    if y.is_empty() {
        return f64::NAN;
    }
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_res = y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).powi(2)).sum::<f64>();
    let ss_tot = y.iter().map(|y_| (y_ - mean).powi(2)).sum::<f64>();
    if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    }
}
