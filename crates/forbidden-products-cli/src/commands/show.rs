//! Show command implementation.

use anyhow::Result;
use forbidden_products_core::{display, AffinityEntry, PreferenceRanker, ProductCategory};
use serde::Serialize;

use super::load_store;
use crate::config::Settings;

/// What the host would apply for one customer.
#[derive(Debug, Serialize)]
struct CustomerReport<'a> {
    customer: &'a str,
    forbidden: Vec<ProductCategory>,
    wants: Vec<&'static str>,
    annotations: Vec<String>,
}

/// Parse `CATEGORY=SCORE` into an affinity entry.
pub fn parse_affinity(value: &str) -> Result<AffinityEntry, String> {
    let (category, score) = value
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=SCORE, got '{value}'"))?;
    let category: ProductCategory = category.parse().map_err(|e| format!("{e}"))?;
    let score: f32 = score
        .trim()
        .parse()
        .map_err(|_| format!("invalid score '{}'", score.trim()))?;
    Ok(AffinityEntry::new(category, score))
}

/// Print the forbidden set and the Wants/Refuses preview.
pub fn execute(
    settings: &Settings,
    customer: &str,
    affinities: &[AffinityEntry],
    json: bool,
) -> Result<()> {
    let (store, _) = load_store(settings)?;
    let forbidden = store.lookup(Some(customer));
    let ranker = PreferenceRanker::default();

    let report = CustomerReport {
        customer,
        forbidden: forbidden.iter().collect(),
        wants: ranker.top_names(affinities, &forbidden),
        annotations: display::annotation_lines(affinities, &forbidden, &ranker)
            .into_iter()
            .map(|line| line.text)
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Customer: {}", report.customer);
    if report.forbidden.is_empty() {
        println!("Forbidden: (none)");
    } else {
        let names: Vec<String> = report
            .forbidden
            .iter()
            .map(|c| {
                if c.is_implemented() {
                    c.name().to_string()
                } else {
                    format!("{} (not sold)", c.name())
                }
            })
            .collect();
        println!("Forbidden: {}", names.join(", "));
    }

    if !affinities.is_empty() {
        println!(
            "Wants:     {}",
            if report.wants.is_empty() {
                "(none)".to_string()
            } else {
                report.wants.join(", ")
            }
        );
    }

    if !report.annotations.is_empty() {
        println!("\nAnnotation preview:");
        for line in &report.annotations {
            println!("{line}");
        }
    }

    Ok(())
}
