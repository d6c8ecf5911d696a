//! Training loop and inference entry points.
//!
//! Epochs walk the data in fixed column order, one mini-batch at a time.
//! After every epoch the mean pseudo-likelihood over the full dataset is
//! recorded as the training signal.

use std::time::Instant;

use ndarray::{Array2, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{batch_count, column_batches};
use crate::error::{RbmError, RbmResult};
use crate::estimator::Estimator;
use crate::gibbs::ensure_steps;
use crate::matrix::{ensure_rows, ensure_unit_interval};
use crate::model::Rbm;

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Use persistent contrastive divergence instead of plain CD
    pub persistent: bool,
    /// Base learning rate, divided by the batch width before each update
    pub learning_rate: f64,
    /// Number of passes over the data
    pub epochs: usize,
    /// Columns per mini-batch
    pub batch_size: usize,
    /// Gibbs transitions per negative phase
    pub gibbs_steps: usize,
    /// Maximum number of columns scored by the pseudo-likelihood
    pub score_sample_size: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            persistent: true,
            learning_rate: 0.1,
            epochs: 10,
            batch_size: 100,
            gibbs_steps: 1,
            score_sample_size: 10_000,
        }
    }
}

impl TrainingConfig {
    pub fn estimator(&self) -> Estimator {
        Estimator::from_persistent(self.persistent)
    }

    pub fn validate(&self) -> RbmResult<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(RbmError::config(
                "learning_rate",
                self.learning_rate,
                "must be finite and > 0",
            ));
        }
        if self.batch_size == 0 {
            return Err(RbmError::config("batch_size", self.batch_size, "must be ≥ 1"));
        }
        if self.score_sample_size == 0 {
            return Err(RbmError::config(
                "score_sample_size",
                self.score_sample_size,
                "must be ≥ 1",
            ));
        }
        ensure_steps(self.gibbs_steps)
    }
}

/// Metrics recorded after a single epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based epoch number
    pub epoch: usize,
    /// Mean pseudo-likelihood over the dataset (higher is better, ≤ 0)
    pub pseudo_likelihood: f64,
    /// Mean squared one-step reconstruction error
    pub reconstruction_error: f64,
    /// Wall-clock time of the epoch, scoring included
    pub elapsed_ms: u128,
}

/// Complete training result
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub estimator: Estimator,
    pub epochs: Vec<EpochMetrics>,
    pub total_elapsed_ms: u128,
}

impl TrainingReport {
    pub fn final_pseudo_likelihood(&self) -> Option<f64> {
        self.epochs.last().map(|m| m.pseudo_likelihood)
    }

    pub fn pseudo_likelihoods(&self) -> Vec<f64> {
        self.epochs.iter().map(|m| m.pseudo_likelihood).collect()
    }
}

impl Rbm {
    /// Trains the model on `data` (columns are samples).
    ///
    /// Configuration, shape, emptiness and the [0, 1] range of every element
    /// are checked before the first update, so a rejected call leaves the
    /// model untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use rbm_core::data::bars_and_stripes;
    /// use rbm_core::{Rbm, RbmConfig, TrainingConfig};
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let data = bars_and_stripes(3);
    /// let mut rbm = Rbm::new(&RbmConfig::bernoulli(9, 6), &mut rng).unwrap();
    ///
    /// let config = TrainingConfig { epochs: 2, batch_size: 7, ..Default::default() };
    /// let report = rbm.fit(data.view(), &config, &mut rng).unwrap();
    /// assert_eq!(report.epochs.len(), 2);
    /// ```
    pub fn fit<R: Rng + ?Sized>(
        &mut self,
        data: ArrayView2<'_, f64>,
        config: &TrainingConfig,
        rng: &mut R,
    ) -> RbmResult<TrainingReport> {
        config.validate()?;
        ensure_rows("fit", &data, self.n_visible())?;
        if data.ncols() == 0 {
            return Err(RbmError::EmptyInput {
                context: "fit".to_string(),
            });
        }
        ensure_unit_interval(&data)?;

        let estimator = config.estimator();
        tracing::info!(
            samples = data.ncols(),
            batches = batch_count(data.ncols(), config.batch_size),
            epochs = config.epochs,
            gibbs_steps = config.gibbs_steps,
            persistent = config.persistent,
            "starting RBM training"
        );

        let start_time = Instant::now();
        let mut epochs = Vec::with_capacity(config.epochs);

        for epoch in 1..=config.epochs {
            let epoch_start = Instant::now();

            for batch in column_batches(data, config.batch_size) {
                let sample = estimator.estimate(self, batch, config.gibbs_steps, rng)?;
                let learning_rate = config.learning_rate / batch.ncols() as f64;
                self.update_weights(&sample, learning_rate)?;
            }

            let pseudo_likelihood = self
                .pseudo_likelihood(data, config.score_sample_size, rng)?
                .mean()
                .unwrap_or(f64::NAN);
            let reconstruction_error = self.reconstruction_error(data, rng)?;
            let elapsed_ms = epoch_start.elapsed().as_millis();

            if !pseudo_likelihood.is_finite() {
                tracing::warn!(epoch, pseudo_likelihood, "non-finite pseudo-likelihood");
            }
            tracing::info!(
                epoch,
                pseudo_likelihood,
                reconstruction_error,
                elapsed_ms = elapsed_ms as u64,
                "epoch complete"
            );

            epochs.push(EpochMetrics {
                epoch,
                pseudo_likelihood,
                reconstruction_error,
                elapsed_ms,
            });
        }

        Ok(TrainingReport {
            estimator,
            epochs,
            total_elapsed_ms: start_time.elapsed().as_millis(),
        })
    }

    /// Hidden-unit means for each column: the learned feature representation.
    pub fn transform(&self, data: ArrayView2<'_, f64>) -> RbmResult<Array2<f64>> {
        self.hidden_means(data)
    }

    /// Visible samples after `gibbs_steps` transitions starting from `seed`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        seed: ArrayView2<'_, f64>,
        gibbs_steps: usize,
        rng: &mut R,
    ) -> RbmResult<Array2<f64>> {
        Ok(self.gibbs(seed, gibbs_steps, rng)?.v_neg)
    }
}
