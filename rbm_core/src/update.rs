//! Momentum gradient-ascent update of the RBM parameters.
//!
//! Implements the update rule:
//! ```text
//! ΔW             = h_pos · v_posᵗ − h_neg · v_negᵗ
//! W              = W + lr · ΔW + momentum · previous_delta
//! previous_delta = ΔW
//! hidden_bias   += lr · (Σ_cols h_pos − Σ_cols h_neg)
//! visible_bias  += lr · (Σ_cols v_pos − Σ_cols v_neg)
//! ```

use ndarray::Axis;

use crate::error::{RbmError, RbmResult};
use crate::gibbs::GibbsSample;
use crate::matrix::ensure_rows;
use crate::model::Rbm;

impl Rbm {
    /// Applies one update from a positive/negative sample pair.
    ///
    /// `learning_rate` is the per-sample rate: the caller divides its base
    /// rate by the batch column count before calling. Every shape is checked
    /// before the first parameter is written.
    pub fn update_weights(&mut self, sample: &GibbsSample, learning_rate: f64) -> RbmResult<()> {
        self.ensure_sample_layout(sample)?;

        let delta = sample.h_pos.dot(&sample.v_pos.t()) - sample.h_neg.dot(&sample.v_neg.t());
        let hidden_step = sample.h_pos.sum_axis(Axis(1)) - sample.h_neg.sum_axis(Axis(1));
        let visible_step = sample.v_pos.sum_axis(Axis(1)) - sample.v_neg.sum_axis(Axis(1));

        self.weights.scaled_add(learning_rate, &delta);
        self.weights.scaled_add(self.momentum, &self.previous_delta);
        self.previous_delta = delta;
        self.hidden_bias.scaled_add(learning_rate, &hidden_step);
        self.visible_bias.scaled_add(learning_rate, &visible_step);
        Ok(())
    }

    fn ensure_sample_layout(&self, sample: &GibbsSample) -> RbmResult<()> {
        ensure_rows("update v_pos", &sample.v_pos.view(), self.n_visible())?;
        ensure_rows("update v_neg", &sample.v_neg.view(), self.n_visible())?;
        ensure_rows("update h_pos", &sample.h_pos.view(), self.n_hidden())?;
        ensure_rows("update h_neg", &sample.h_neg.view(), self.n_hidden())?;

        let cols = sample.columns();
        for (context, matrix) in [
            ("update h_pos columns", &sample.h_pos),
            ("update v_neg columns", &sample.v_neg),
            ("update h_neg columns", &sample.h_neg),
        ] {
            if matrix.ncols() != cols {
                return Err(RbmError::shape(context, cols, matrix.ncols()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::UnitKind;
    use crate::estimator::Estimator;
    use ndarray::{array, Array1, Array2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn zero_model(momentum: f64) -> Rbm {
        Rbm::from_parameters(
            UnitKind::Binary,
            UnitKind::Binary,
            Array2::zeros((2, 3)),
            Array1::zeros(3),
            Array1::zeros(2),
            momentum,
        )
        .unwrap()
    }

    fn fixed_sample() -> GibbsSample {
        GibbsSample {
            v_pos: array![[1.0, 1.0], [0.0, 1.0], [1.0, 0.0]],
            h_pos: array![[1.0, 0.0], [1.0, 1.0]],
            v_neg: array![[0.0, 1.0], [0.0, 0.0], [1.0, 1.0]],
            h_neg: array![[0.0, 0.0], [1.0, 0.0]],
        }
    }

    #[test]
    fn test_update_without_momentum() {
        let mut rbm = zero_model(0.0);
        let sample = fixed_sample();
        rbm.update_weights(&sample, 0.5).unwrap();

        // h_pos·v_posᵗ = [[1,0,1],[2,1,1]], h_neg·v_negᵗ = [[0,0,0],[0,0,1]]
        let delta = array![[1.0, 0.0, 1.0], [2.0, 1.0, 0.0]];
        assert_eq!(rbm.weights(), &(&delta * 0.5));
        assert_eq!(rbm.previous_delta(), &delta);
        assert_eq!(rbm.hidden_bias(), &array![0.5, 0.5]);
        assert_eq!(rbm.visible_bias(), &array![0.5, 0.5, -0.5]);
    }

    #[test]
    fn test_momentum_carries_previous_delta() {
        let mut rbm = zero_model(0.5);
        let sample = fixed_sample();
        rbm.update_weights(&sample, 1.0).unwrap();
        rbm.update_weights(&sample, 1.0).unwrap();

        let delta = array![[1.0, 0.0, 1.0], [2.0, 1.0, 0.0]];
        // first: ΔW; second: ΔW + ΔW + 0.5·ΔW
        assert_eq!(rbm.weights(), &(&delta * 2.5));
        assert_eq!(rbm.previous_delta(), &delta);
    }

    #[test]
    fn test_cd_gradient_from_zero_model() {
        let mut rbm = zero_model(0.0);
        let batch = Array2::<f64>::ones((3, 1));

        let sample = Estimator::ContrastiveDivergence
            .estimate(&mut rbm, batch.view(), 1, &mut StdRng::seed_from_u64(99))
            .unwrap();
        rbm.update_weights(&sample, 1.0).unwrap();

        let expected =
            sample.h_pos.dot(&sample.v_pos.t()) - sample.h_neg.dot(&sample.v_neg.t());
        assert_eq!(rbm.weights(), &expected);

        // Same seed, same gradient
        let mut again = zero_model(0.0);
        let replay = Estimator::ContrastiveDivergence
            .estimate(&mut again, batch.view(), 1, &mut StdRng::seed_from_u64(99))
            .unwrap();
        again.update_weights(&replay, 1.0).unwrap();
        assert_eq!(again.weights(), rbm.weights());
    }

    #[test]
    fn test_mismatched_sample_leaves_model_untouched() {
        let mut rbm = zero_model(0.9);
        let mut sample = fixed_sample();
        sample.h_neg = array![[0.0], [1.0]];

        let before = rbm.clone();
        let err = rbm.update_weights(&sample, 1.0).unwrap_err();
        assert_eq!(err, RbmError::shape("update h_neg columns", 2, 1));
        assert_eq!(rbm.weights(), before.weights());
        assert_eq!(rbm.visible_bias(), before.visible_bias());
        assert_eq!(rbm.hidden_bias(), before.hidden_bias());
    }
}
