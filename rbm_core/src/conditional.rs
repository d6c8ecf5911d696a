//! Conditional distributions between the two layers.

use ndarray::{Array2, ArrayView2};
use rand::Rng;

use crate::error::RbmResult;
use crate::matrix::{add_row_bias, ensure_rows};
use crate::model::Rbm;

impl Rbm {
    /// `logistic(W·v + hidden_bias)`, shape `(n_hidden, cols)`.
    pub fn hidden_means(&self, visible: ArrayView2<'_, f64>) -> RbmResult<Array2<f64>> {
        ensure_rows("hidden_means", &visible, self.n_visible())?;
        Ok(self.hidden.activate(self.hidden_pre_activation(visible)))
    }

    /// `logistic(Wᵗ·h + visible_bias)`, shape `(n_visible, cols)`.
    pub fn visible_means(&self, hidden: ArrayView2<'_, f64>) -> RbmResult<Array2<f64>> {
        ensure_rows("visible_means", &hidden, self.n_hidden())?;
        let mut pre = self.weights.t().dot(&hidden);
        add_row_bias(&mut pre, &self.visible_bias);
        Ok(self.visible.activate(pre))
    }

    /// Draws hidden states from `p(h | v)` using the hidden unit kind.
    pub fn sample_hidden<R: Rng + ?Sized>(
        &self,
        visible: ArrayView2<'_, f64>,
        rng: &mut R,
    ) -> RbmResult<Array2<f64>> {
        let means = self.hidden_means(visible)?;
        Ok(self.hidden.sample(&means, rng))
    }

    /// Draws visible states from `p(v | h)` using the visible unit kind.
    pub fn sample_visible<R: Rng + ?Sized>(
        &self,
        hidden: ArrayView2<'_, f64>,
        rng: &mut R,
    ) -> RbmResult<Array2<f64>> {
        let means = self.visible_means(hidden)?;
        Ok(self.visible.sample(&means, rng))
    }

    /// `W·v + hidden_bias` without the link function. Callers check shapes.
    pub(crate) fn hidden_pre_activation(&self, visible: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut pre = self.weights.dot(&visible);
        add_row_bias(&mut pre, &self.hidden_bias);
        pre
    }
}
