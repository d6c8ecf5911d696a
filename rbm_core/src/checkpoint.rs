//! Versioned binary checkpoints.
//!
//! A checkpoint captures everything training needs to resume exactly where
//! it stopped: parameters, the momentum buffer and the persistent chain.
//!
//! File layout, little-endian fixed-width bincode:
//!
//! ```text
//! u32      CHECKPOINT_VERSION
//! payload  snapshot of the component
//! ```
//!
//! The header is read and checked before the payload is touched, so a file
//! written by an incompatible layout fails with `VersionMismatch` instead of
//! a decoding error.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activation::UnitKind;
use crate::error::RbmError;
use crate::model::Rbm;

/// Layout version written at the start of every checkpoint file.
pub const CHECKPOINT_VERSION: u32 = 2;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("checkpoint payload could not be encoded or decoded: {0}")]
    Serialization(#[from] bincode::Error),
    #[error("checkpoint version {found} is not supported (expected {expected})")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("checkpoint holds an inconsistent model: {0}")]
    InvalidFormat(String),
}

impl From<RbmError> for CheckpointError {
    fn from(err: RbmError) -> Self {
        CheckpointError::InvalidFormat(err.to_string())
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

fn write_versioned<W: Write, T: Serialize>(
    writer: &mut W,
    payload: &T,
) -> Result<(), CheckpointError> {
    codec().serialize_into(&mut *writer, &CHECKPOINT_VERSION)?;
    codec().serialize_into(&mut *writer, payload)?;
    Ok(())
}

fn read_versioned<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, CheckpointError> {
    let found: u32 = codec().deserialize_from(&mut *reader)?;
    if found != CHECKPOINT_VERSION {
        return Err(CheckpointError::VersionMismatch {
            expected: CHECKPOINT_VERSION,
            found,
        });
    }
    Ok(codec().deserialize_from(&mut *reader)?)
}

/// State that can be written to and restored from a checkpoint file.
///
/// Implementors only describe how to convert to and from their snapshot
/// type; the file format and version check are shared.
pub trait Checkpointable: Sized {
    type Snapshot: Serialize + DeserializeOwned;

    fn snapshot(&self) -> Self::Snapshot;

    /// Rebuilds the component, rejecting snapshots that are internally
    /// inconsistent.
    fn restore(snapshot: Self::Snapshot) -> Result<Self, CheckpointError>;

    /// Writes a checkpoint to `path`, creating parent directories.
    fn save_checkpoint<P: AsRef<Path>>(&self, path: P) -> Result<(), CheckpointError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        write_versioned(&mut writer, &self.snapshot())?;
        writer.flush()?;
        Ok(())
    }

    fn load_checkpoint<P: AsRef<Path>>(path: P) -> Result<Self, CheckpointError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::restore(read_versioned(&mut reader)?)
    }
}

/// On-disk form of an [`Rbm`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RbmSnapshot {
    pub visible: UnitKind,
    pub hidden: UnitKind,
    pub weights: Array2<f64>,
    pub visible_bias: Array1<f64>,
    pub hidden_bias: Array1<f64>,
    pub previous_delta: Array2<f64>,
    pub persistent_chain: Option<Array2<f64>>,
    pub momentum: f64,
}

impl Checkpointable for Rbm {
    type Snapshot = RbmSnapshot;

    fn snapshot(&self) -> RbmSnapshot {
        RbmSnapshot {
            visible: self.visible,
            hidden: self.hidden,
            weights: self.weights.clone(),
            visible_bias: self.visible_bias.clone(),
            hidden_bias: self.hidden_bias.clone(),
            previous_delta: self.previous_delta.clone(),
            persistent_chain: self.persistent_chain.clone(),
            momentum: self.momentum,
        }
    }

    fn restore(snapshot: RbmSnapshot) -> Result<Self, CheckpointError> {
        if snapshot.previous_delta.dim() != snapshot.weights.dim() {
            return Err(CheckpointError::InvalidFormat(format!(
                "previous_delta is {:?}, weights are {:?}",
                snapshot.previous_delta.dim(),
                snapshot.weights.dim()
            )));
        }
        if let Some(chain) = &snapshot.persistent_chain {
            if chain.nrows() != snapshot.weights.ncols() {
                return Err(CheckpointError::InvalidFormat(format!(
                    "persistent chain has {} rows, model has {} visible units",
                    chain.nrows(),
                    snapshot.weights.ncols()
                )));
            }
        }

        let mut rbm = Rbm::from_parameters(
            snapshot.visible,
            snapshot.hidden,
            snapshot.weights,
            snapshot.visible_bias,
            snapshot.hidden_bias,
            snapshot.momentum,
        )?;
        rbm.previous_delta = snapshot.previous_delta;
        rbm.persistent_chain = snapshot.persistent_chain;
        Ok(rbm)
    }
}
