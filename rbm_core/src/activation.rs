//! Unit activation variants.
//!
//! A layer is either binary (Bernoulli units) or real-valued (Gaussian units
//! with unit variance). Both use the logistic link for their mean; they only
//! differ in how a sample is drawn from that mean.

use std::fmt::{self, Display};

use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::matrix::{logistic, par_map_inplace};

/// Type of stochastic unit used by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Bernoulli units: samples are exactly 0 or 1
    #[default]
    Binary,
    /// Gaussian units with σ² = 1 around the logistic mean
    #[serde(alias = "gaussian")]
    RealValued,
}

impl UnitKind {
    /// Mean of a unit given its pre-activation.
    pub fn mean(self, pre_activation: f64) -> f64 {
        match self {
            UnitKind::Binary | UnitKind::RealValued => logistic(pre_activation),
        }
    }

    /// Turns a matrix of pre-activations into means, in place.
    pub fn activate(self, mut pre_activation: Array2<f64>) -> Array2<f64> {
        par_map_inplace(&mut pre_activation, move |x| self.mean(x));
        pre_activation
    }

    /// Draws a single value around `mean`.
    pub fn draw<R: Rng + ?Sized>(self, mean: f64, rng: &mut R) -> f64 {
        match self {
            UnitKind::Binary => {
                if rng.gen::<f64>() < mean {
                    1.0
                } else {
                    0.0
                }
            }
            UnitKind::RealValued => mean + rng.sample::<f64, _>(StandardNormal),
        }
    }

    /// Samples every element of `means` independently.
    ///
    /// Draws are taken in logical row-major order, so the same seeded
    /// generator always yields the same matrix.
    pub fn sample<R: Rng + ?Sized>(self, means: &Array2<f64>, rng: &mut R) -> Array2<f64> {
        means.mapv(|mean| self.draw(mean, rng))
    }
}

impl Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Binary => write!(f, "binary"),
            UnitKind::RealValued => write!(f, "real_valued"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_binary_samples_are_exactly_zero_or_one() {
        let mut rng = StdRng::seed_from_u64(7);
        let means = Array2::from_elem((8, 8), 0.3);
        let samples = UnitKind::Binary.sample(&means, &mut rng);
        assert!(samples.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_binary_empirical_mean_per_cell() {
        let mut rng = StdRng::seed_from_u64(42);
        let means = Array2::from_elem((2, 3), 0.5);
        let draws = 10_000;

        let mut totals = Array2::<f64>::zeros((2, 3));
        for _ in 0..draws {
            totals += &UnitKind::Binary.sample(&means, &mut rng);
        }
        let empirical = totals / draws as f64;

        // σ of the estimate is 0.005, so 0.03 is a six-sigma band
        for &p in empirical.iter() {
            assert!((p - 0.5).abs() < 0.03, "cell mean {p} too far from 0.5");
        }
    }

    #[test]
    fn test_binary_extreme_means_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(1);
        let zeros = UnitKind::Binary.sample(&Array2::zeros((3, 3)), &mut rng);
        assert!(zeros.iter().all(|&v| v == 0.0));
        let ones = UnitKind::Binary.sample(&Array2::ones((3, 3)), &mut rng);
        assert!(ones.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_real_valued_samples_center_on_mean() {
        let mut rng = StdRng::seed_from_u64(3);
        let means = Array2::from_elem((100, 100), 0.25);
        let samples = UnitKind::RealValued.sample(&means, &mut rng);

        let n = samples.len() as f64;
        let mean = samples.sum() / n;
        let variance = samples.mapv(|v| (v - mean).powi(2)).sum() / n;
        assert!((mean - 0.25).abs() < 0.05);
        assert!((variance - 1.0).abs() < 0.1);
        assert!(samples.iter().any(|&v| !(0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let means = Array2::from_elem((4, 5), 0.5);
        let a = UnitKind::Binary.sample(&means, &mut StdRng::seed_from_u64(11));
        let b = UnitKind::Binary.sample(&means, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_activate_applies_logistic() {
        let pre = ndarray::array![[0.0, 100.0], [-100.0, 1.0]];
        let means = UnitKind::Binary.activate(pre);
        assert!((means[[0, 0]] - 0.5).abs() < 1e-12);
        assert!(means[[0, 1]] > 0.999);
        assert!(means[[1, 0]] < 0.001);
        assert!((means[[1, 1]] - logistic(1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_unit_kind_names() {
        let kind: UnitKind = serde_json::from_str("\"gaussian\"").unwrap();
        assert_eq!(kind, UnitKind::RealValued);
        assert_eq!(UnitKind::RealValued.to_string(), "real_valued");
        assert_eq!(
            serde_json::to_string(&UnitKind::Binary).unwrap(),
            "\"binary\""
        );
    }
}
