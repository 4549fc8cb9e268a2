//! Logging setup
//!
//! Log level comes from SLENG_LOG (default `warn`). Logs go to
//! `config.log_file` when set, otherwise to stderr so stdout stays free
//! for the interactive menu.

use std::fs::File;
use std::sync::Mutex;

use sleng_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber
pub fn init(config: &Config) {
    let level = std::env::var("SLENG_LOG").unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
    let env_filter = EnvFilter::new(format!("sleng={},sleng_core={}", level, level));

    let Some(log_path) = &config.log_file else {
        init_stderr(env_filter);
        return;
    };

    let log_file = match File::options().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
            init_stderr(env_filter);
            return;
        }
    };

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();

    info!("Logging to {:?}", log_path);
}

fn init_stderr(env_filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
