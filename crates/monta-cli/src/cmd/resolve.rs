use anyhow::Context;
use serde::Serialize;
use std::path::Path;

use monta_client::{MontaClient, StatusResolver};
use monta_core::settings::{FileSettings, MontaConfig};

use crate::output;

#[derive(Serialize)]
struct ResolveReport<'a> {
    reference: &'a str,
    status: Option<String>,
    source: Option<String>,
    status_code: Option<String>,
    track_trace: Option<String>,
    reason: Option<String>,
}

/// `monta resolve <reference>`: one-shot ladder resolution, printed.
pub fn run(settings_path: &Path, reference: &str, json: bool) -> anyhow::Result<()> {
    let settings = FileSettings::load(settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    let config = MontaConfig::from_store(&settings)?;
    let client = MontaClient::new(config)?;

    let (status, meta) = StatusResolver::new(&client).resolve(reference);

    if json {
        output::print_json(&ResolveReport {
            reference,
            status,
            source: meta.source.map(|s| s.to_string()),
            status_code: meta.status_code,
            track_trace: meta.track_trace,
            reason: meta.reason,
        })?;
        return Ok(());
    }

    match &status {
        Some(status) => println!("{reference}: {status}"),
        None => println!(
            "{reference}: no status ({})",
            meta.reason.as_deref().unwrap_or("unknown")
        ),
    }
    if let Some(source) = meta.source {
        println!("  source: {source}");
    }
    if let Some(code) = meta.status_code {
        println!("  status code: {code}");
    }
    if let Some(track_trace) = meta.track_trace {
        println!("  track & trace: {track_trace}");
    }
    Ok(())
}
