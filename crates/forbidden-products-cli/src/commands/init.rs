//! Init command implementation.

use anyhow::{Context, Result};
use forbidden_products_core::ConfigStore;
use tracing::info;

use crate::config::Settings;

/// Write the default config, leaving an existing one alone unless forced.
pub fn execute(settings: &Settings, force: bool) -> Result<()> {
    let path = settings.paths.config_file();

    if path.exists() && !force {
        println!("Config already exists: {}", path.display());
        println!("Use --force to overwrite it with the defaults.");
        return Ok(());
    }

    let store = ConfigStore::new(settings.paths.clone());
    store
        .write_default(&path)
        .with_context(|| format!("Failed to write default config to {}", path.display()))?;
    info!(path = %path.display(), force, "Wrote default config");

    println!("✅ Wrote default config: {}", path.display());
    Ok(())
}
