//! Free energy and pseudo-likelihood scoring used to monitor training.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::seq::index;
use rand::Rng;

use crate::error::RbmResult;
use crate::matrix::{ensure_rows, log_logistic, par_map_inplace, softplus};
use crate::model::Rbm;

impl Rbm {
    /// Free energy of every column of `visible`.
    ///
    /// ```text
    /// F(v) = −vbᵗ·v − Σ_j ln(1 + exp((W·v + hb)_j))
    /// ```
    pub fn free_energy(&self, visible: ArrayView2<'_, f64>) -> RbmResult<Array1<f64>> {
        ensure_rows("free_energy", &visible, self.n_visible())?;

        let visible_term = self.visible_bias.dot(&visible);
        let mut hidden_term = self.hidden_pre_activation(visible);
        par_map_inplace(&mut hidden_term, softplus);

        Ok(-visible_term - hidden_term.sum_axis(Axis(0)))
    }

    /// Stochastic pseudo-likelihood of each scored column.
    ///
    /// When `sample_size` is below the column count, that many distinct
    /// columns are drawn and scored; otherwise every column is scored. One
    /// randomly chosen feature per column is flipped to `1 − x`, and the
    /// score is `n_features · ln σ(F(flipped) − F(original))`. The result is
    /// never positive; values closer to zero indicate a better fit.
    pub fn pseudo_likelihood<R: Rng + ?Sized>(
        &self,
        visible: ArrayView2<'_, f64>,
        sample_size: usize,
        rng: &mut R,
    ) -> RbmResult<Array1<f64>> {
        ensure_rows("pseudo_likelihood", &visible, self.n_visible())?;
        let (n_features, n_samples) = visible.dim();

        let original: Array2<f64> = if sample_size < n_samples {
            let columns = index::sample(rng, n_samples, sample_size).into_vec();
            visible.select(Axis(1), &columns)
        } else {
            visible.to_owned()
        };

        let mut corrupted = original.clone();
        for mut column in corrupted.columns_mut() {
            let feature = rng.gen_range(0..n_features);
            column[feature] = 1.0 - column[feature];
        }

        let energy = self.free_energy(original.view())?;
        let corrupted_energy = self.free_energy(corrupted.view())?;
        let scale = n_features as f64;
        Ok((corrupted_energy - energy).mapv(|gap| scale * log_logistic(gap)))
    }

    /// Mean squared error between `visible` and its one-step reconstruction
    /// `p(v | h)`, `h ~ p(h | visible)`.
    pub fn reconstruction_error<R: Rng + ?Sized>(
        &self,
        visible: ArrayView2<'_, f64>,
        rng: &mut R,
    ) -> RbmResult<f64> {
        let hidden = self.sample_hidden(visible, rng)?;
        let reconstructed = self.visible_means(hidden.view())?;
        if reconstructed.is_empty() {
            return Ok(0.0);
        }
        let squared = (&visible - &reconstructed).mapv(|d| d * d);
        Ok(squared.sum() / squared.len() as f64)
    }
}
