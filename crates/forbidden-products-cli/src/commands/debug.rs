//! Debug command implementation.

use anyhow::Result;
use forbidden_products_core::{ConfigStore, DebugFilter};

use super::exists_marker;
use crate::config::Settings;

/// Report the debug switches and the decision for one customer.
pub fn execute(settings: &Settings, customer: &str) -> Result<()> {
    let store = ConfigStore::new(settings.paths.clone());
    let flag = settings.paths.debug_flag();
    let filter_path = settings.paths.debug_filter();

    println!("Debug flag:   {} [{}]", flag.display(), exists_marker(&flag));
    println!(
        "Debug filter: {} [{}]",
        filter_path.display(),
        exists_marker(&filter_path)
    );

    if filter_path.exists() {
        match std::fs::read_to_string(&filter_path) {
            Ok(text) => {
                let filter = DebugFilter::parse(&text);
                if filter.is_empty() {
                    println!("Filter has no entries: every customer is traced.");
                }
            }
            Err(err) => println!("Filter unreadable ({err}): every customer is traced."),
        }
    }

    let traced = store.should_debug(Some(customer));
    println!(
        "{customer}: {}",
        if traced { "traced" } else { "not traced" }
    );
    Ok(())
}
