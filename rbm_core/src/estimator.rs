//! Gradient estimators: contrastive divergence and its persistent variant.
//!
//! Both produce a [`GibbsSample`]. The positive phase always comes from the
//! real batch; they differ in where the negative chain starts.

use ndarray::{Array2, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::RbmResult;
use crate::gibbs::{ensure_steps, GibbsSample};
use crate::matrix::ensure_rows;
use crate::model::Rbm;

/// Negative-phase policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Estimator {
    /// CD-k: the chain restarts from the batch every time
    ContrastiveDivergence,
    /// PCD-k: fantasy particles persist across batches
    #[default]
    PersistentContrastiveDivergence,
}

impl Estimator {
    pub fn from_persistent(persistent: bool) -> Self {
        if persistent {
            Estimator::PersistentContrastiveDivergence
        } else {
            Estimator::ContrastiveDivergence
        }
    }

    pub fn is_persistent(self) -> bool {
        matches!(self, Estimator::PersistentContrastiveDivergence)
    }

    /// Produces the positive/negative sample pairs for one batch.
    ///
    /// The persistent variant replaces the model's fantasy particles with the
    /// chain end, so it takes the model mutably.
    pub fn estimate<R: Rng + ?Sized>(
        self,
        rbm: &mut Rbm,
        batch: ArrayView2<'_, f64>,
        steps: usize,
        rng: &mut R,
    ) -> RbmResult<GibbsSample> {
        match self {
            Estimator::ContrastiveDivergence => rbm.gibbs(batch, steps, rng),
            Estimator::PersistentContrastiveDivergence => {
                persistent_divergence(rbm, batch, steps, rng)
            }
        }
    }
}

fn persistent_divergence<R: Rng + ?Sized>(
    rbm: &mut Rbm,
    batch: ArrayView2<'_, f64>,
    steps: usize,
    rng: &mut R,
) -> RbmResult<GibbsSample> {
    ensure_steps(steps)?;
    ensure_rows("persistent batch", &batch, rbm.n_visible())?;

    let h_pos = rbm.sample_hidden(batch, rng)?;
    let particles = take_chain_or_restart(rbm, batch);
    let negative = rbm.gibbs(particles.view(), steps, rng)?;
    rbm.persistent_chain = Some(negative.v_neg.clone());

    Ok(GibbsSample {
        v_pos: batch.to_owned(),
        h_pos,
        v_neg: negative.v_neg,
        h_neg: negative.h_neg,
    })
}

/// Takes the fantasy particles out of the model, or seeds fresh ones from
/// the batch when none exist or their shape differs from the batch.
///
/// A restarted chain is not burned in; every shape change (typically the
/// short last batch of an epoch) costs one cold start.
fn take_chain_or_restart(rbm: &mut Rbm, batch: ArrayView2<'_, f64>) -> Array2<f64> {
    match rbm.persistent_chain.take() {
        Some(chain) if chain.dim() == batch.dim() => chain,
        _ => {
            tracing::debug!(
                rows = batch.nrows(),
                cols = batch.ncols(),
                "restarting persistent chain from batch"
            );
            batch.to_owned()
        }
    }
}
