//! Two-sample tests
//!
//! Welch's t-test for the target and the Kolmogorov-Smirnov test for features.
//! Both only report a statistic and a two-sided p-value, no decision is taken.
//! Degenerate input (an empty sample, or a single row for the t-test) gives NaN.
use crate::constants::KS_EXACT_LIMIT;
use crate::utils::{mean, sample_variance};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Statistic and two-sided p-value of a test.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestOutcome {
    fn undefined() -> Self {
        TestOutcome {
            statistic: f64::NAN,
            p_value: f64::NAN,
        }
    }
}

/// Welch's unequal variance t-test of `a` against `b`.
///
/// The statistic is positive when `a` has the larger mean.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> TestOutcome {
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let se_a = sample_variance(a) / n_a;
    let se_b = sample_variance(b) / n_b;
    let se = se_a + se_b;
    let statistic = (mean(a) - mean(b)) / se.sqrt();

    // Welch-Satterthwaite
    let df = se * se / (se_a * se_a / (n_a - 1.0) + se_b * se_b / (n_b - 1.0));
    if !df.is_finite() || df <= 0.0 || statistic.is_nan() {
        return TestOutcome {
            statistic,
            p_value: f64::NAN,
        };
    }

    let p_value = match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(statistic.abs())).min(1.0),
        Err(_) => f64::NAN,
    };
    TestOutcome { statistic, p_value }
}

/// Largest distance between the empirical distribution functions of two sorted samples.
fn ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n_a - j as f64 / n_b).abs());
    }
    d
}

/// P(D >= d) for samples of size `m` and `n` under the null, from the lattice
/// paths from (0, 0) to (m, n) that stay strictly inside the band.
///
/// Each cell holds the fraction of the paths reaching it that stayed inside,
/// not their count, so every value lies in [0, 1] whatever the sample sizes.
fn ks_exact_sf(d: f64, m: usize, n: usize) -> f64 {
    let (m, n) = if m > n { (n, m) } else { (m, n) };
    let (md, nd) = (m as f64, n as f64);
    // Half a lattice step below d, so paths reaching exactly d count as outside.
    let q = (0.5 + (d * md * nd - 1e-7).floor()) / (md * nd);

    let mut inside = vec![0.0; n + 1];
    inside[0] = 1.0;
    for j in 1..=n {
        inside[j] = if j as f64 / nd > q { 0.0 } else { inside[j - 1] };
    }
    for i in 1..=m {
        let x = i as f64 / md;
        if x > q {
            inside[0] = 0.0;
        }
        for j in 1..=n {
            inside[j] = if (x - j as f64 / nd).abs() > q {
                0.0
            } else {
                // A share i / (i + j) of the paths into (i, j) arrives from (i - 1, j).
                (i as f64 * inside[j] + j as f64 * inside[j - 1]) / (i + j) as f64
            };
        }
    }
    (1.0 - inside[n]).clamp(0.0, 1.0)
}

/// Survival function of the limiting Kolmogorov distribution.
pub fn kolmogorov_sf(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < 1.18 {
        // Small x: the alternating series converges slowly, use the theta form of the cdf.
        let k = std::f64::consts::PI * std::f64::consts::PI / (8.0 * x * x);
        let cdf = (2.0 * std::f64::consts::PI).sqrt() / x
            * (1..=20)
                .map(|j| {
                    let m = (2 * j - 1) as f64;
                    (-m * m * k).exp()
                })
                .sum::<f64>();
        return (1.0 - cdf).clamp(0.0, 1.0);
    }
    let sf = 2.0
        * (1..=100)
            .map(|j| {
                let jf = j as f64;
                let sign = if j % 2 == 1 { 1.0 } else { -1.0 };
                sign * (-2.0 * jf * jf * x * x).exp()
            })
            .sum::<f64>();
    sf.clamp(0.0, 1.0)
}

/// Two-sample Kolmogorov-Smirnov test, two-sided.
///
/// The p-value is exact while the larger sample has at most 10 000 rows, and
/// asymptotic beyond that.
pub fn ks_2samp(a: &[f64], b: &[f64]) -> TestOutcome {
    if a.is_empty() || b.is_empty() {
        return TestOutcome::undefined();
    }
    let mut a_sorted = a.to_vec();
    let mut b_sorted = b.to_vec();
    a_sorted.sort_by(|x, y| x.total_cmp(y));
    b_sorted.sort_by(|x, y| x.total_cmp(y));
    let statistic = ks_statistic(&a_sorted, &b_sorted);

    let (m, n) = (a.len(), b.len());
    let p_value = if m.max(n) <= KS_EXACT_LIMIT {
        ks_exact_sf(statistic, m, n)
    } else {
        let en = (m * n) as f64 / (m + n) as f64;
        kolmogorov_sf(en.sqrt() * statistic)
    };
    TestOutcome { statistic, p_value }
}
