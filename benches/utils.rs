#![allow(dead_code)]
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// create_data
//
// Column major features and a linear target with uniform noise.
pub(crate) fn create_data(n_samples: usize, n_features: usize) -> (Vec<f64>, Vec<f64>) {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    let feature_distribution = Uniform::new(0.0, 1.0);
    let noise_distribution = Uniform::new(-1.0, 1.0);
    let weight_distribution = Uniform::new(-1.0, 1.0);

    let weights: Vec<f64> = (0..n_features).map(|_| rng.sample(weight_distribution)).collect();
    let mut feature_space: Vec<Vec<f64>> = vec![Vec::with_capacity(n_samples); n_features];
    let mut target_variable: Vec<f64> = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let mut linear = 0.0;
        for (j, col) in feature_space.iter_mut().enumerate() {
            let v = rng.sample(feature_distribution);
            col.push(v);
            linear += v * weights[j];
        }
        target_variable.push(linear + rng.sample(noise_distribution));
    }

    (feature_space.into_iter().flatten().collect(), target_variable)
}

// shifted_sample
//
// Uniform sample on [shift, shift + 1).
pub(crate) fn shifted_sample(n_samples: usize, shift: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let distribution = Uniform::new(shift, shift + 1.0);
    (0..n_samples).map(|_| rng.sample(distribution)).collect()
}
