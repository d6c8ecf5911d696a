//! Block Gibbs sampling.

use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::error::{RbmError, RbmResult};
use crate::model::Rbm;

/// Positive and negative phase states of one gradient estimation step.
///
/// All four matrices have the same column count. `v_*` have `n_visible`
/// rows and `h_*` have `n_hidden` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GibbsSample {
    /// Visible input of the positive phase
    pub v_pos: Array2<f64>,
    /// Hidden sample drawn from `v_pos`
    pub h_pos: Array2<f64>,
    /// Visible state at the end of the chain
    pub v_neg: Array2<f64>,
    /// Hidden sample drawn from `v_neg`
    pub h_neg: Array2<f64>,
}

impl GibbsSample {
    pub fn columns(&self) -> usize {
        self.v_pos.ncols()
    }
}

impl Rbm {
    /// Runs a Gibbs chain of `steps` negative transitions from `visible`.
    ///
    /// ```text
    /// h_pos ~ p(h | v_pos)
    /// v_neg ~ p(v | h_pos), h_neg ~ p(h | v_neg)        step 1
    /// v_neg ~ p(v | h_neg), h_neg ~ p(h | v_neg)        steps 2..=k
    /// ```
    pub fn gibbs<R: Rng + ?Sized>(
        &self,
        visible: ArrayView2<'_, f64>,
        steps: usize,
        rng: &mut R,
    ) -> RbmResult<GibbsSample> {
        ensure_steps(steps)?;

        let h_pos = self.sample_hidden(visible, rng)?;
        let mut v_neg = self.sample_visible(h_pos.view(), rng)?;
        let mut h_neg = self.sample_hidden(v_neg.view(), rng)?;
        for _ in 1..steps {
            v_neg = self.sample_visible(h_neg.view(), rng)?;
            h_neg = self.sample_hidden(v_neg.view(), rng)?;
        }

        Ok(GibbsSample {
            v_pos: visible.to_owned(),
            h_pos,
            v_neg,
            h_neg,
        })
    }
}

pub(crate) fn ensure_steps(steps: usize) -> RbmResult<()> {
    if steps == 0 {
        return Err(RbmError::config("gibbs_steps", steps, "must be ≥ 1"));
    }
    Ok(())
}
