//! RBM parameters and construction.

use std::fmt::{self, Display};

use ndarray::{Array1, Array2, ArrayView2};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::activation::UnitKind;
use crate::error::{RbmError, RbmResult};

/// Construction options for an [`Rbm`].
///
/// # Examples
///
/// ```
/// use rbm_core::{RbmConfig, UnitKind};
///
/// let config = RbmConfig::bernoulli(784, 100).with_momentum(0.5);
/// assert_eq!(config.visible, UnitKind::Binary);
/// assert_eq!(config.momentum, 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RbmConfig {
    /// Unit type of the visible layer
    pub visible: UnitKind,
    /// Unit type of the hidden layer
    pub hidden: UnitKind,
    /// Number of visible units (features)
    pub n_visible: usize,
    /// Number of hidden units
    pub n_hidden: usize,
    /// Standard deviation of the initial weights
    pub init_scale: f64,
    /// Fraction of the previous weight delta carried into each update
    pub momentum: f64,
}

impl RbmConfig {
    pub fn new(visible: UnitKind, hidden: UnitKind, n_visible: usize, n_hidden: usize) -> Self {
        Self {
            visible,
            hidden,
            n_visible,
            n_hidden,
            init_scale: 0.001,
            momentum: 0.9,
        }
    }

    /// Binary visible and binary hidden units.
    pub fn bernoulli(n_visible: usize, n_hidden: usize) -> Self {
        Self::new(UnitKind::Binary, UnitKind::Binary, n_visible, n_hidden)
    }

    /// Real-valued visible units with binary hidden units.
    pub fn gaussian_bernoulli(n_visible: usize, n_hidden: usize) -> Self {
        Self::new(UnitKind::RealValued, UnitKind::Binary, n_visible, n_hidden)
    }

    pub fn with_init_scale(mut self, init_scale: f64) -> Self {
        self.init_scale = init_scale;
        self
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn validate(&self) -> RbmResult<()> {
        if self.n_visible == 0 {
            return Err(RbmError::config("n_visible", self.n_visible, "must be ≥ 1"));
        }
        if self.n_hidden == 0 {
            return Err(RbmError::config("n_hidden", self.n_hidden, "must be ≥ 1"));
        }
        if !self.init_scale.is_finite() || self.init_scale < 0.0 {
            return Err(RbmError::config(
                "init_scale",
                self.init_scale,
                "must be finite and ≥ 0",
            ));
        }
        validate_momentum(self.momentum)
    }
}

fn validate_momentum(momentum: f64) -> RbmResult<()> {
    if !(0.0..1.0).contains(&momentum) {
        return Err(RbmError::config("momentum", momentum, "must lie in [0, 1)"));
    }
    Ok(())
}

/// A Restricted Boltzmann Machine.
///
/// Layout:
///
/// ```text
/// weights          [n_hidden, n_visible]
/// visible_bias     [n_visible]
/// hidden_bias      [n_hidden]
/// previous_delta   [n_hidden, n_visible]   last unscaled gradient, for momentum
/// persistent_chain [n_visible, batch]      fantasy particles, PCD only
/// ```
///
/// All mutation goes through `&mut self`, so at most one batch update can be
/// in flight for a given model.
#[derive(Debug, Clone)]
pub struct Rbm {
    pub(crate) visible: UnitKind,
    pub(crate) hidden: UnitKind,
    pub(crate) weights: Array2<f64>,
    pub(crate) visible_bias: Array1<f64>,
    pub(crate) hidden_bias: Array1<f64>,
    pub(crate) previous_delta: Array2<f64>,
    pub(crate) persistent_chain: Option<Array2<f64>>,
    pub(crate) momentum: f64,
}

impl Rbm {
    /// Creates a model with weights drawn from `Normal(0, init_scale)` and
    /// zero biases.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use rbm_core::{Rbm, RbmConfig};
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let rbm = Rbm::new(&RbmConfig::bernoulli(6, 3), &mut rng).unwrap();
    /// assert_eq!(rbm.weights().dim(), (3, 6));
    /// ```
    pub fn new<R: Rng + ?Sized>(config: &RbmConfig, rng: &mut R) -> RbmResult<Self> {
        config.validate()?;

        let shape = (config.n_hidden, config.n_visible);
        let weights = if config.init_scale == 0.0 {
            Array2::zeros(shape)
        } else {
            let normal = Normal::new(0.0, config.init_scale).map_err(|err| {
                RbmError::config("init_scale", config.init_scale, &err.to_string())
            })?;
            Array2::from_shape_simple_fn(shape, || normal.sample(rng))
        };

        Ok(Self {
            visible: config.visible,
            hidden: config.hidden,
            weights,
            visible_bias: Array1::zeros(config.n_visible),
            hidden_bias: Array1::zeros(config.n_hidden),
            previous_delta: Array2::zeros(shape),
            persistent_chain: None,
            momentum: config.momentum,
        })
    }

    /// Builds a model from explicit parameters.
    ///
    /// The momentum buffer starts at zero and there is no persistent chain.
    pub fn from_parameters(
        visible: UnitKind,
        hidden: UnitKind,
        weights: Array2<f64>,
        visible_bias: Array1<f64>,
        hidden_bias: Array1<f64>,
        momentum: f64,
    ) -> RbmResult<Self> {
        let (n_hidden, n_visible) = weights.dim();
        if n_hidden == 0 || n_visible == 0 {
            return Err(RbmError::config(
                "weights",
                format!("{n_hidden}x{n_visible}"),
                "both dimensions must be ≥ 1",
            ));
        }
        if visible_bias.len() != n_visible {
            return Err(RbmError::shape("visible_bias", n_visible, visible_bias.len()));
        }
        if hidden_bias.len() != n_hidden {
            return Err(RbmError::shape("hidden_bias", n_hidden, hidden_bias.len()));
        }
        validate_momentum(momentum)?;

        Ok(Self {
            visible,
            hidden,
            previous_delta: Array2::zeros(weights.dim()),
            weights,
            visible_bias,
            hidden_bias,
            persistent_chain: None,
            momentum,
        })
    }

    pub fn n_visible(&self) -> usize {
        self.weights.ncols()
    }

    pub fn n_hidden(&self) -> usize {
        self.weights.nrows()
    }

    pub fn visible_kind(&self) -> UnitKind {
        self.visible
    }

    pub fn hidden_kind(&self) -> UnitKind {
        self.hidden
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// Weight matrix, shape `(n_hidden, n_visible)`.
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn visible_bias(&self) -> &Array1<f64> {
        &self.visible_bias
    }

    pub fn hidden_bias(&self) -> &Array1<f64> {
        &self.hidden_bias
    }

    /// Unscaled gradient applied by the most recent update.
    pub fn previous_delta(&self) -> &Array2<f64> {
        &self.previous_delta
    }

    /// Current fantasy particles, if persistent training has run.
    pub fn persistent_chain(&self) -> Option<&Array2<f64>> {
        self.persistent_chain.as_ref()
    }

    /// Drops the fantasy particles; the next persistent batch restarts the
    /// chain from data.
    pub fn reset_persistent_chain(&mut self) {
        self.persistent_chain = None;
    }

    /// Learned filters.
    ///
    /// With `transpose` the view is `(n_visible, n_hidden)`, one column per
    /// hidden unit; otherwise the raw `(n_hidden, n_visible)` matrix.
    pub fn components(&self, transpose: bool) -> ArrayView2<'_, f64> {
        if transpose {
            self.weights.t()
        } else {
            self.weights.view()
        }
    }
}

impl Display for Rbm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rbm({} visible {}, {} hidden {}) momentum={}",
            self.n_visible(),
            self.visible,
            self.n_hidden(),
            self.hidden,
            self.momentum,
        )
    }
}
