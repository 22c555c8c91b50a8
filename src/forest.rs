//! Random Forest
//!
//! Bagged ensemble of CART regression trees. Every split considers all
//! features, trees are grown until pure unless a depth limit is set, and the
//! prediction is the plain mean of the trees.
use crate::config::ForestConfig;
use crate::data::Matrix;
use crate::errors::DriftError;
use crate::metrics::r2_score;
use crate::sampler::SampleMethod;
use crate::tree::{Tree, TreeParams};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RandomForestRegressor {
    pub n_estimators: usize,
    pub seed: u64,
    pub sample_method: SampleMethod,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub trees: Vec<Tree>,
    /// R² of out-of-bag predictions, available after a bootstrap fit.
    pub oob_score: Option<f64>,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::from_config(&ForestConfig::default())
    }
}

impl RandomForestRegressor {
    pub fn from_config(cfg: &ForestConfig) -> Self {
        RandomForestRegressor {
            n_estimators: cfg.n_estimators,
            seed: cfg.seed,
            sample_method: if cfg.bootstrap {
                SampleMethod::Bootstrap
            } else {
                SampleMethod::None
            },
            max_depth: cfg.max_depth,
            min_samples_split: cfg.min_samples_split,
            min_samples_leaf: cfg.min_samples_leaf,
            trees: Vec::new(),
            oob_score: None,
        }
    }

    /// Set the number of trees.
    pub fn set_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Set the random seed.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit the forest, replacing any previously fitted trees.
    ///
    /// # Arguments
    ///
    /// * `data` - Feature matrix, every value finite.
    /// * `y` - Target, one finite value per row of `data`.
    pub fn fit(&mut self, data: &Matrix<f64>, y: &[f64]) -> Result<(), DriftError> {
        if data.rows == 0 {
            return Err(DriftError::EmptyTrainingSet);
        }
        if y.len() != data.rows {
            return Err(DriftError::LengthMismatch("target".to_string(), data.rows, y.len()));
        }
        if let Some(row) = y.iter().position(|v| !v.is_finite()) {
            return Err(DriftError::NonFiniteValue("target".to_string(), row));
        }
        for col in 0..data.cols {
            if let Some(row) = data.get_col(col).iter().position(|v| !v.is_finite()) {
                return Err(DriftError::NonFiniteValue(format!("feature {}", col), row));
            }
        }

        let start = Instant::now();
        let params = TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        };

        // Per tree seeds are drawn up front, so the parallel fit is reproducible.
        let mut rng = StdRng::seed_from_u64(self.seed);
        let seeds: Vec<u64> = (0..self.n_estimators).map(|_| rng.gen()).collect();
        let sample_method = self.sample_method;

        let fitted: Vec<(Tree, Vec<usize>)> = seeds
            .par_iter()
            .map(|&seed| {
                let mut tree_rng = StdRng::seed_from_u64(seed);
                let (chosen, excluded) = sample_method.sampler().sample(&mut tree_rng, &data.index);
                let mut tree = Tree::new();
                tree.fit(data, y, chosen, &params, &mut tree_rng);
                (tree, excluded)
            })
            .collect();

        self.oob_score = out_of_bag_score(&fitted, data, y);
        self.trees = fitted.into_iter().map(|(tree, _)| tree).collect();

        let mean_leaves = self.trees.iter().map(|t| t.n_leaves).sum::<usize>() as f64 / self.trees.len() as f64;
        debug!(
            "Tree depths: {:?}",
            self.trees.iter().map(|t| t.depth).collect::<Vec<_>>()
        );
        info!(
            "Fitted {} trees on {} rows x {} features in {:.3}s, mean leaves {:.1}, oob r2 {:?}",
            self.trees.len(),
            data.rows,
            data.cols,
            start.elapsed().as_secs_f64(),
            mean_leaves,
            self.oob_score
        );
        Ok(())
    }

    /// Generate predictions for the given data.
    ///
    /// # Arguments
    ///
    /// * `data` - The feature matrix, same columns as used for fitting.
    /// * `parallel` - If `true`, rows are predicted in parallel using Rayon.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Vec<f64> {
        let n_trees = self.trees.len() as f64;
        let predict_row = |i: &usize| self.trees.iter().map(|t| t.predict_row(data, *i)).sum::<f64>() / n_trees;
        if parallel {
            data.index.par_iter().map(predict_row).collect()
        } else {
            data.index.iter().map(predict_row).collect()
        }
    }
}

/// R² over the rows left out of at least one tree, each predicted only by the
/// trees that did not see it.
fn out_of_bag_score(fitted: &[(Tree, Vec<usize>)], data: &Matrix<f64>, y: &[f64]) -> Option<f64> {
    let mut oob_sum = vec![0.0; data.rows];
    let mut oob_n = vec![0usize; data.rows];
    for (tree, excluded) in fitted {
        for &i in excluded {
            oob_sum[i] += tree.predict_row(data, i);
            oob_n[i] += 1;
        }
    }
    let (y_oob, yhat_oob): (Vec<f64>, Vec<f64>) = (0..data.rows)
        .filter(|&i| oob_n[i] > 0)
        .map(|i| (y[i], oob_sum[i] / oob_n[i] as f64))
        .unzip();
    if y_oob.is_empty() {
        None
    } else {
        Some(r2_score(&y_oob, &yhat_oob))
    }
}
