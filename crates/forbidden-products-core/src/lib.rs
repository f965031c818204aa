//! Policy core for per-customer forbidden product categories.
//!
//! The host simulation owns customers, the product catalog and every UI
//! widget. This crate owns the decision: which categories a customer refuses,
//! whether a given item falls into one of them, and how that is annotated on
//! display surfaces.
//!
//! ## Components
//!
//! - [`ConfigStore`]: customer id → [`ForbiddenSet`], loaded from a JSON
//!   document and published as an atomically swapped snapshot
//! - [`resolver`]: maps host items onto a [`ProductDefinition`] through a
//!   fixed fallback chain
//! - [`PolicyEvaluator`]: set intersection between a product's categories and
//!   the customer's forbidden set
//! - [`PreferenceRanker`]: deterministic top-3 of allowed affinities
//! - [`display`]: idempotent Wants/Refuses annotation of host text fields
//! - [`LogThrottle`]: rate-limited diagnostic tracing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use forbidden_products_core::{ConfigPaths, ConfigStore};
//!
//! let store = ConfigStore::new(ConfigPaths::default_location());
//! let report = store.load()?;
//! println!("{} customers restricted", report.configured_customers);
//!
//! let refused = store.lookup(Some("kyle_cooley"));
//! println!("kyle refuses {} categories", refused.len());
//! # Ok::<(), forbidden_products_core::PolicyError>(())
//! ```

mod category;
mod config;
pub mod display;
mod error;
mod host;
mod policy;
mod ranker;
pub mod resolver;
mod throttle;

pub use category::{ForbiddenSet, ProductCategory, UnknownCategory};
pub use config::{
    ConfigPaths, ConfigStore, ConfigWarning, DebugFilter, LoadReport, PolicyTable,
    DEFAULT_TEMPLATE,
};
pub use error::{PolicyError, PolicyResult};
pub use host::{AffinityEntry, Catalog, CustomerProfile, ItemDefinition, ItemHandle, ProductDefinition};
pub use policy::PolicyEvaluator;
pub use ranker::{PreferenceRanker, PREFERENCE_THRESHOLD, TOP_PREFERENCES};
pub use throttle::{should_emit, LogThrottle};
