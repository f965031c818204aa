//! Validate command implementation.

use anyhow::Result;

use super::load_store;
use crate::config::Settings;

/// Load the config and print what the host would see.
///
/// Returns `false` when the file could not be used at all.
pub fn execute(settings: &Settings) -> Result<bool> {
    let (store, report) = load_store(settings)?;
    let path = settings.paths.config_file();

    if report.created_default {
        println!("Created default config: {}", path.display());
    }

    for warning in &report.warnings {
        println!("⚠️  {warning}");
    }

    if let Some(failure) = &report.failure {
        eprintln!("❌ {}: {failure}", path.display());
        eprintln!("The host would run with no restrictions.");
        return Ok(false);
    }

    let table = store.snapshot();
    println!(
        "✅ {} customer(s) configured, {} warning(s)",
        report.configured_customers,
        report.warnings.len()
    );
    for (customer, forbidden) in table.iter() {
        let names: Vec<&str> = forbidden.iter().map(|c| c.name()).collect();
        println!("  {customer}: {}", names.join(", "));
    }

    Ok(true)
}
