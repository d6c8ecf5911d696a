//! # RBM Core
//!
//! A deterministic Restricted Boltzmann Machine training engine. Samples are
//! the columns of a matrix, features its rows, and every stochastic step
//! draws from a caller-supplied random generator so that seeded runs are
//! reproducible bit for bit.
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use rbm_core::data::{bars_and_stripes, noisy_copies};
//! use rbm_core::{Rbm, RbmConfig, TrainingConfig};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let data = noisy_copies(bars_and_stripes(3).view(), 4, 0.05, &mut rng);
//!
//! let mut rbm = Rbm::new(&RbmConfig::bernoulli(9, 8), &mut rng).unwrap();
//! let config = TrainingConfig { epochs: 3, batch_size: 8, ..Default::default() };
//! let report = rbm.fit(data.view(), &config, &mut rng).unwrap();
//!
//! println!("PL per epoch: {:?}", report.pseudo_likelihoods());
//! let features = rbm.transform(data.view()).unwrap();
//! assert_eq!(features.dim(), (8, data.ncols()));
//! ```
//!
//! ## Core Modules
//!
//! - [`model`] - Parameters and construction
//! - [`activation`] - Unit kinds, means and sampling
//! - [`gibbs`] - Block Gibbs chains
//! - [`estimator`] - CD-k and PCD-k gradient estimates
//! - [`training`] - Epoch loop, transform and generation
//! - [`config`] - Run configuration via TOML
//! - [`logging`] - JSON line-delimited epoch logs
//! - [`checkpoint`] - Versioned binary persistence

mod conditional;
mod scoring;
mod update;

pub mod activation;
pub mod checkpoint;
pub mod config;
pub mod data;
pub mod error;
pub mod estimator;
pub mod gibbs;
pub mod logging;
pub mod matrix;
pub mod model;
pub mod training;

pub use activation::UnitKind;
pub use checkpoint::{CheckpointError, Checkpointable, RbmSnapshot, CHECKPOINT_VERSION};
pub use config::{ConfigError, RunConfig, RunSettings};
pub use error::{RbmError, RbmResult};
pub use estimator::Estimator;
pub use gibbs::GibbsSample;
pub use model::{Rbm, RbmConfig};
pub use training::{EpochMetrics, TrainingConfig, TrainingReport};
