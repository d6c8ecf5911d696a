//! Run configuration via TOML files.
//!
//! A run file has three sections; every key except the layer sizes falls
//! back to its default when missing:
//!
//! ```toml
//! [model]
//! visible = "binary"        # or "real_valued" / "gaussian"
//! hidden = "binary"
//! n_visible = 16
//! n_hidden = 8
//! init_scale = 0.001
//! momentum = 0.9
//!
//! [training]
//! persistent = true
//! learning_rate = 0.1
//! epochs = 10
//! batch_size = 100
//! gibbs_steps = 1
//! score_sample_size = 10000
//!
//! [run]
//! seed = 42
//! log_path = "logs/rbm.jsonl"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activation::UnitKind;
use crate::error::RbmError;
use crate::model::RbmConfig;
use crate::training::TrainingConfig;

/// Errors raised while loading a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Missing required key '{0}'")]
    Missing(&'static str),
    #[error(transparent)]
    Invalid(#[from] RbmError),
}

/// Settings that belong to a run rather than to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    /// Seed for the generator threaded through construction and training
    pub seed: u64,
    /// JSON-lines file receiving one entry per epoch
    pub log_path: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            log_path: None,
        }
    }
}

/// A validated model + training + run configuration.
///
/// # Examples
///
/// ```
/// use rbm_core::RunConfig;
///
/// let config: RunConfig = "[model]\nn_visible = 16\nn_hidden = 8".parse().unwrap();
/// assert_eq!(config.model.n_hidden, 8);
/// assert_eq!(config.training.batch_size, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub model: RbmConfig,
    pub training: TrainingConfig,
    pub run: RunSettings,
}

impl RunConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        contents.parse()
    }
}

impl FromStr for RunConfig {
    type Err = ConfigError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let raw: RawRunConfig = toml::from_str(toml_str)?;

        let model = RbmConfig::try_from(raw.model)?;
        model.validate()?;
        raw.training.validate()?;

        Ok(Self {
            model,
            training: raw.training,
            run: raw.run,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRunConfig {
    model: RawModelConfig,
    training: TrainingConfig,
    run: RunSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawModelConfig {
    visible: UnitKind,
    hidden: UnitKind,
    n_visible: Option<usize>,
    n_hidden: Option<usize>,
    init_scale: f64,
    momentum: f64,
}

impl Default for RawModelConfig {
    fn default() -> Self {
        Self {
            visible: UnitKind::Binary,
            hidden: UnitKind::Binary,
            n_visible: None,
            n_hidden: None,
            init_scale: 0.001,
            momentum: 0.9,
        }
    }
}

impl TryFrom<RawModelConfig> for RbmConfig {
    type Error = ConfigError;

    fn try_from(raw: RawModelConfig) -> Result<Self, Self::Error> {
        let n_visible = raw.n_visible.ok_or(ConfigError::Missing("model.n_visible"))?;
        let n_hidden = raw.n_hidden.ok_or(ConfigError::Missing("model.n_hidden"))?;
        Ok(RbmConfig::new(raw.visible, raw.hidden, n_visible, n_hidden)
            .with_init_scale(raw.init_scale)
            .with_momentum(raw.momentum))
    }
}
