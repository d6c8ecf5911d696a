//! Train an RBM on noisy bars-and-stripes patterns.
//!
//! Run with: cargo run --example train_bars [path/to/config.toml]
//! Set RUST_LOG=rbm_core=debug to see persistent chain restarts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rbm_core::data::{bars_and_stripes, noisy_copies};
use rbm_core::{logging, Checkpointable, Rbm, RbmConfig, RunConfig, TrainingConfig};
use tracing_subscriber::EnvFilter;

const GRID_SIDE: usize = 4;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/rbm.toml".to_string());
    let config = load_config(&config_path);
    println!(
        "Loaded config: visible={} hidden={} epochs={} seed={}",
        config.model.n_visible, config.model.n_hidden, config.training.epochs, config.run.seed
    );

    let mut rng = StdRng::seed_from_u64(config.run.seed);
    let prototypes = bars_and_stripes(GRID_SIDE);
    let data = noisy_copies(prototypes.view(), 8, 0.05, &mut rng);

    let mut rbm = Rbm::new(&config.model, &mut rng).context("building model")?;
    println!("{rbm}");

    let report = rbm
        .fit(data.view(), &config.training, &mut rng)
        .context("training")?;

    if let Some(path) = &config.run.log_path {
        logging::log_report(path, &report)
            .with_context(|| format!("writing epoch log to {}", path.display()))?;
    }

    let first = report.epochs.first().map(|m| m.pseudo_likelihood);
    println!(
        "Pseudo-likelihood: first {:?} final {:?} ({} ms)",
        first,
        report.final_pseudo_likelihood(),
        report.total_elapsed_ms
    );

    let reconstructed = rbm.generate(prototypes.view(), 1, &mut rng)?;
    let errors = (&reconstructed - &prototypes).mapv(f64::abs).sum();
    println!(
        "Reconstruction: {errors} of {} pixels differ",
        prototypes.len()
    );

    let checkpoint = PathBuf::from("out/train_bars.bin");
    rbm.save_checkpoint(&checkpoint)
        .with_context(|| format!("saving {}", checkpoint.display()))?;
    let restored = Rbm::load_checkpoint(&checkpoint)?;
    println!("Checkpoint written to {} ({restored})", checkpoint.display());

    Ok(())
}

fn load_config(path: &str) -> RunConfig {
    RunConfig::load_from_file(path).unwrap_or_else(|err| {
        eprintln!("Falling back to default config: {err}");
        let side_pixels = GRID_SIDE * GRID_SIDE;
        RunConfig {
            model: RbmConfig::bernoulli(side_pixels, 12).with_momentum(0.5),
            training: TrainingConfig {
                epochs: 40,
                batch_size: 10,
                ..Default::default()
            },
            run: Default::default(),
        }
    })
}
