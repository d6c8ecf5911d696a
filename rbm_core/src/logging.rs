//! JSON line-delimited training logs.
//!
//! Live progress goes through `tracing`; this module keeps a durable record
//! of every epoch that can be replayed or plotted after the run.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::training::{EpochMetrics, TrainingReport};

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn append_json_line<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> io::Result<()> {
    ensure_parent_dir(path.as_ref())?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    serde_json::to_writer(&mut file, value).map_err(io::Error::other)?;
    file.write_all(b"\n")
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Serialize)]
pub struct EpochLogEntry {
    pub epoch: usize,
    pub pseudo_likelihood: f64,
    pub reconstruction_error: f64,
    pub elapsed_ms: u128,
    pub timestamp_ms: u128,
}

/// Appends one epoch to the JSONL file at `path`.
pub fn log_epoch<P: AsRef<Path>>(path: P, metrics: &EpochMetrics) -> io::Result<()> {
    let entry = EpochLogEntry {
        epoch: metrics.epoch,
        pseudo_likelihood: metrics.pseudo_likelihood,
        reconstruction_error: metrics.reconstruction_error,
        elapsed_ms: metrics.elapsed_ms,
        timestamp_ms: now_ms(),
    };
    append_json_line(path, &entry)
}

/// Appends every epoch of a finished run.
pub fn log_report<P: AsRef<Path>>(path: P, report: &TrainingReport) -> io::Result<()> {
    for metrics in &report.epochs {
        log_epoch(path.as_ref(), metrics)?;
    }
    Ok(())
}
