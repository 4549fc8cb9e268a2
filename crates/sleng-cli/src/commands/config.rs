//! Config command handlers

use std::path::PathBuf;

use anyhow::Result;

use sleng_core::Config;

/// Show the effective configuration
pub fn show(config: &Config, config_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(config));
        return Ok(());
    }

    let effective_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    println!("Configuration:");
    println!("  data_dir:  {}", config.data_dir.display());
    println!("  data_file: {}", config.data_file_path().display());
    println!("  bind_addr: {}", config.bind_addr);
    println!(
        "  log_file:  {}",
        config
            .log_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!();
    println!("Config file: {}", effective_path.display());

    Ok(())
}

fn render_json(config: &Config) -> serde_json::Value {
    serde_json::json!({
        "data_dir": config.data_dir,
        "data_file": config.data_file_path(),
        "bind_addr": config.bind_addr,
        "log_file": config.log_file
    })
}
