//! Live-coding binary for Brunzit.
//!
//! Reads command-language lines from stdin, one per line, and ticks every
//! flock at the configured frame rate until stdin closes or Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`BRUNZIT_CONFIG`, else `brunzit-config.yaml`,
//!    else defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Build the runtime
//! 4. Run the session loop
//! 5. Log the result

mod error;
mod frame_feed;

use std::path::{Path, PathBuf};

use brunzit_core::Runtime;
use brunzit_core::config::{BrunzitConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use brunzit_core::runner::{self, SessionOptions};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::frame_feed::FrameFeed;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, runtime construction, or the session
/// loop fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config_path, explicit) = config_path();
    let config = load_config(&config_path, explicit)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        frame_rate = config.world.frame_rate,
        "brunzit-engine starting"
    );

    // 3. Build the runtime.
    let mut runtime = Runtime::from_config(&config).map_err(EngineError::from)?;
    info!(background = ?runtime.background(), "Runtime initialized");

    // 4. Run the session.
    let options = SessionOptions::for_runtime(&runtime, config.logging.summary_interval_ticks);
    let mut feed = FrameFeed::new(1);
    let input = BufReader::new(tokio::io::stdin());
    let result = runner::run_session(&mut runtime, input, shutdown_signal(), options, &mut feed)
        .await
        .map_err(EngineError::from)?;

    // 5. Log results.
    runner::log_session_end(&result);
    info!(
        frames_published = feed.published(),
        groups = runtime.group_names().count(),
        "brunzit-engine shutdown complete"
    );

    Ok(())
}

/// Resolve where the configuration lives and whether the user asked for it
/// explicitly.
fn config_path() -> (PathBuf, bool) {
    std::env::var_os(CONFIG_PATH_ENV).map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |path| (PathBuf::from(path), true),
    )
}

/// Load configuration from `path`.
///
/// A missing default file falls back to built-in defaults. A missing file
/// named through `BRUNZIT_CONFIG` is an error.
fn load_config(path: &Path, explicit: bool) -> Result<BrunzitConfig, EngineError> {
    if explicit || path.exists() {
        Ok(BrunzitConfig::from_file(path)?)
    } else {
        Ok(BrunzitConfig::default())
    }
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed the
/// session runs until stdin closes.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_default_file_uses_defaults() {
        let config = load_config(Path::new("definitely-not-here.yaml"), false).unwrap();
        assert_eq!(config, BrunzitConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(Path::new("definitely-not-here.yaml"), true).unwrap_err();
        assert!(matches!(err, EngineError::Config { .. }));
    }

    #[test]
    fn project_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../brunzit-config.yaml");
        let config = load_config(&path, true).unwrap();
        assert_eq!(config.world.frame_rate, 30);
        assert!(Runtime::from_config(&config).is_ok());
    }
}
