//! # OLDSCHOOL
//!
//! Real-time XOR and tunnel effects, rendered in software and shown in a
//! window.
//!
//! ## Usage
//!
//! ```bash
//! oldschool --fps --effect tunnel
//! oldschool --fullscreen --vsync --threads 1
//! RUST_LOG=debug oldschool --handoff locks
//! ```
//!
//! Any key release quits.

mod cli;
mod window;

use std::process::ExitCode;

use oldschool_core::{DemoConfig, Engine, EngineResult, MonotonicClock, RunReport};
use tracing::{error, info};

use cli::{Command, USAGE};
use window::WindowPresenter;

fn main() -> ExitCode {
    // RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = match cli::parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            eprint!("{USAGE}");
            return ExitCode::from(1);
        }
        Err(err) => {
            eprintln!("{err}");
            eprint!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    match run(&config) {
        Ok(report) => {
            info!(
                produced = report.produced,
                presented = report.presented,
                duplicates = report.duplicates,
                lost = report.lost,
                "bye"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &DemoConfig) -> EngineResult<RunReport> {
    // a bad size is rejected before any window opens
    config.geometry()?;
    let mut presenter = WindowPresenter::open(config)?;
    let (width, height) = presenter.drawable_size();
    let engine = Engine::new(config.clone().with_drawable_size(width, height)?)?;
    engine.run(&mut presenter, &MonotonicClock::new())
}
