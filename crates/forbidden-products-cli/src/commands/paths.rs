//! Paths command implementation.

use anyhow::Result;

use super::exists_marker;
use crate::config::Settings;

/// Print the resolved locations.
pub fn execute(settings: &Settings) -> Result<()> {
    let paths = &settings.paths;

    println!("Forbidden Products Paths");
    println!("{:-<40}", "");
    println!("Directory:     {} ({})", paths.dir().display(), settings.source);

    let config_file = paths.config_file();
    println!(
        "Config:        {} [{}]",
        config_file.display(),
        exists_marker(&config_file)
    );
    let debug_flag = paths.debug_flag();
    println!(
        "Debug flag:    {} [{}]",
        debug_flag.display(),
        exists_marker(&debug_flag)
    );
    let debug_filter = paths.debug_filter();
    println!(
        "Debug filter:  {} [{}]",
        debug_filter.display(),
        exists_marker(&debug_filter)
    );

    Ok(())
}
