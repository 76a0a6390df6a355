mod config;
mod gestures;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use config::{AppConfig, load_config, save_config};
use recognizer::display::{STATUS_LOADING, STATUS_READY};
use recognizer::{BoxClassifier, BurnDigitModel, ConsoleSink, DisplaySink, ModelConfig, ModelSlot};
use sketch::Sketchpad;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "digits",
    version,
    about = "Replay recorded pen gestures and classify each one as a digit"
)]
struct Args {
    /// Gesture file: JSON array of gestures, each an array of [x, y] points
    #[arg(long, required_unless_present = "write_config")]
    strokes: Option<PathBuf>,

    /// TOML configuration file; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model directory (contains digit_net and optionally labels.json)
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Write the drawing with gesture boxes outlined to this PNG
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Classify immediately instead of waiting for the model to finish loading
    #[arg(long, default_value_t = false)]
    no_wait: bool,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(dir) = &args.model_dir {
        config.model = ModelConfig::from_dir(dir, config.model.input_size);
    }

    if let Some(path) = &args.write_config {
        save_config(&config, path)?;
        info!(path = %path.display(), "configuration written");
        return Ok(());
    }

    let strokes = args
        .strokes
        .as_deref()
        .context("--strokes is required")?;
    let recorded = gestures::load_gestures(strokes)?;

    let mut sink = ConsoleSink;
    let slot = ModelSlot::new();
    sink.status(STATUS_LOADING);
    let model_config = config.model.clone();
    let loading = slot.spawn_initialize(move || BurnDigitModel::load(&model_config))?;

    let mut pad = Sketchpad::new(config.canvas.clone(), config.tracker.padding);
    for gesture in &recorded {
        pad.replay(gesture);
    }
    info!(gestures = recorded.len(), boxes = pad.boxes().len(), "gestures replayed");

    if let Some(path) = &args.annotated {
        pad.annotated()
            .save(path)
            .with_context(|| format!("failed to write annotated image {}", path.display()))?;
        info!(path = %path.display(), "annotated drawing written");
    }

    if !args.no_wait {
        loading
            .join()
            .map_err(|_| anyhow!("model loader thread panicked"))??;
        sink.status(STATUS_READY);
    }

    let classifier = BoxClassifier::new(slot, config.classifier);
    let snapshot = pad.snapshot();
    classifier.render(pad.boxes(), &snapshot, &mut sink)?;

    Ok(())
}
