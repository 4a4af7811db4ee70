use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;
use vinput::{AxisBounds, Mouse, TouchPad};

mod config;
mod script;

use script::Target;

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive a virtual mouse or touchpad from a JSON action script", long_about = None)]
struct Args {
    /// Path to the uinput node (defaults to $VINPUT_DEVICE, then /dev/uinput)
    #[arg(short, long, global = true)]
    device: Option<PathBuf>,

    /// Device name reported to the system
    #[arg(short, long, global = true)]
    name: Option<String>,

    #[command(subcommand)]
    kind: Kind,
}

#[derive(Subcommand, Debug)]
enum Kind {
    /// Relative-motion mouse
    Mouse {
        /// Action script, `-` for stdin
        script: PathBuf,
    },
    /// Absolute-position touchpad
    Touchpad {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        min_x: i32,
        #[arg(long)]
        max_x: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        min_y: i32,
        #[arg(long)]
        max_y: i32,
        /// Action script, `-` for stdin
        script: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let device = config::device_path(args.device);

    let (steps, target) = match args.kind {
        Kind::Mouse { script } => {
            let steps = script::load(&script)?;
            script::check(&steps, true)?;
            let name = args.name.unwrap_or_else(|| "vinput-mouse".to_string());
            let mouse = Mouse::create(&device, name.as_bytes())
                .with_context(|| format!("Failed to create mouse on {}", device.display()))?;
            (steps, Target::Mouse(mouse))
        }
        Kind::Touchpad {
            min_x,
            max_x,
            min_y,
            max_y,
            script,
        } => {
            let steps = script::load(&script)?;
            script::check(&steps, false)?;
            let name = args.name.unwrap_or_else(|| "vinput-touchpad".to_string());
            let bounds = AxisBounds::new(min_x, max_x, min_y, max_y);
            let pad = TouchPad::create(&device, name.as_bytes(), bounds)
                .with_context(|| format!("Failed to create touchpad on {}", device.display()))?;
            (steps, Target::TouchPad(pad))
        }
    };

    tracing::info!("Running {} steps on {}", steps.len(), device.display());

    let stop = Arc::new(AtomicBool::new(false));
    let worker_stop = Arc::clone(&stop);
    let mut worker = tokio::task::spawn_blocking(move || script::run(target, &steps, worker_stop));

    let result = tokio::select! {
        joined = &mut worker => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, finishing current step");
            stop.store(true, Ordering::Relaxed);
            worker.await
        }
    };

    result.context("Script worker panicked")??;
    tracing::info!("Done");
    Ok(())
}
