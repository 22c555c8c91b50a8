//! Sampler
//!
//! Strategies for choosing the rows each tree of the forest is fitted on.
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub enum SampleMethod {
    None,
    Bootstrap,
}

// A sampler can be used to subset the data prior to fitting a new tree.
pub trait Sampler {
    /// Sample the data, returning a tuple, where the first item is the samples
    /// chosen for training, and the second are the samples excluded.
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> (Vec<usize>, Vec<usize>);
}

/// Every row, once.
pub struct FullSampler;

impl Sampler for FullSampler {
    fn sample(&mut self, _rng: &mut StdRng, index: &[usize]) -> (Vec<usize>, Vec<usize>) {
        (index.to_vec(), Vec::new())
    }
}

/// Draws as many rows as there are in `index`, with replacement. The excluded
/// rows are the ones never drawn (out of bag).
pub struct BootstrapSampler;

impl Sampler for BootstrapSampler {
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let n = index.len();
        if n == 0 {
            return (Vec::new(), Vec::new());
        }
        let mut drawn = vec![false; n];
        let mut chosen = Vec::with_capacity(n);
        for _ in 0..n {
            let pos = rng.gen_range(0..n);
            drawn[pos] = true;
            chosen.push(index[pos]);
        }
        let excluded = index
            .iter()
            .zip(drawn)
            .filter(|(_, d)| !d)
            .map(|(i, _)| *i)
            .collect();
        (chosen, excluded)
    }
}

impl SampleMethod {
    pub fn sampler(&self) -> Box<dyn Sampler> {
        match self {
            SampleMethod::None => Box::new(FullSampler),
            SampleMethod::Bootstrap => Box::new(BootstrapSampler),
        }
    }
}
