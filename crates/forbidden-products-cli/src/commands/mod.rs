//! CLI command implementations.

pub mod debug;
pub mod init;
pub mod paths;
pub mod show;
pub mod validate;

use std::path::Path;

use anyhow::Result;
use forbidden_products_core::{ConfigStore, LoadReport};

use crate::config::Settings;

/// Open and load the store, failing only on a broken embedded template.
pub(crate) fn load_store(settings: &Settings) -> Result<(ConfigStore, LoadReport)> {
    let store = ConfigStore::new(settings.paths.clone());
    let report = store.load()?;
    Ok((store, report))
}

pub(crate) fn exists_marker(path: &Path) -> &'static str {
    if path.exists() {
        "present"
    } else {
        "missing"
    }
}
