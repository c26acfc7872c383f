use anyhow::Context;
use std::path::Path;

use monta_core::settings::{FileSettings, MontaConfig};

use crate::output;

/// `monta config`: show the effective configuration. The password is
/// masked in every output mode.
pub fn run(settings_path: &Path, json: bool) -> anyhow::Result<()> {
    let settings = FileSettings::load(settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    let config = MontaConfig::from_store(&settings)?;

    if json {
        output::print_json(&serde_json::json!({
            "username": config.username,
            "password": "***",
            "base_url": config.base_url,
            "timeout_seconds": config.timeout.as_secs(),
        }))?;
    } else {
        println!("username: {}", config.username);
        println!("password: ***");
        println!("base_url: {}", config.base_url);
        println!("timeout:  {}s", config.timeout.as_secs());
    }
    Ok(())
}
