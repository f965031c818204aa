//! Configuration store: customer id → forbidden categories.
//!
//! ## File Structure
//!
//! ```text
//! <user data>/ForbiddenProducts/
//! ├── customer_forbidden_products.json   # policy, created from the embedded template
//! ├── forbidden_products.debug           # marker: enables diagnostic tracing
//! └── forbidden_products.debug_npcs.txt  # optional: restricts tracing to these customers
//! ```
//!
//! The policy table is rebuilt wholesale on every load and published with a
//! single pointer swap, so readers observe either the previous or the new
//! table and never a partially populated one.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use directories::ProjectDirs;
use parking_lot::Mutex;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::category::{ForbiddenSet, ProductCategory};
use crate::error::{PolicyError, PolicyResult};

/// Default policy shipped inside the binary.
pub const DEFAULT_TEMPLATE: &str = include_str!("../assets/customer_forbidden_products.default.json");

/// Subdirectory of the user data directory owned by this layer.
const DIR_NAME: &str = "ForbiddenProducts";

const CONFIG_FILE: &str = "customer_forbidden_products.json";
const DEBUG_FLAG_FILE: &str = "forbidden_products.debug";
const DEBUG_FILTER_FILE: &str = "forbidden_products.debug_npcs.txt";

/// Locations of the configuration resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    dir: PathBuf,
}

impl ConfigPaths {
    /// Paths under `<user_data_dir>/ForbiddenProducts`.
    pub fn new(user_data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: user_data_dir.as_ref().join(DIR_NAME),
        }
    }

    /// Paths under the platform data directory, falling back to `./UserData`.
    pub fn default_location() -> Self {
        let root = ProjectDirs::from("dev", "forbidden-products", "forbidden-products")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("UserData"));
        Self::new(root)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn debug_flag(&self) -> PathBuf {
        self.dir.join(DEBUG_FLAG_FILE)
    }

    pub fn debug_filter(&self) -> PathBuf {
        self.dir.join(DEBUG_FILTER_FILE)
    }
}

/// Non-fatal problem found while normalizing the policy file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigWarning {
    #[error("unknown product category '{token}' for customer '{customer}'")]
    UnknownCategory { customer: String, token: String },

    #[error("customer '{customer}' has no usable categories; entry dropped")]
    EmptyEntry { customer: String },

    #[error("blank customer id; entry dropped")]
    BlankCustomerId,

    #[error("customer '{customer}' is listed more than once (case-insensitive); entries merged")]
    DuplicateCustomer { customer: String },
}

/// Raw policy document: every entry in file order, repeated keys included.
/// Nulls are tolerated everywhere and tokens may be any JSON value.
struct RawPolicy(Vec<(String, Option<Vec<Value>>)>);

impl<'de> Deserialize<'de> for RawPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawPolicy;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping customer ids to category lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<RawPolicy, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(RawPolicy(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Category token as text. Non-string scalars keep their JSON spelling so
/// they surface as unknown categories.
fn token_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(token) => Some(token),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone)]
struct PolicyEntry {
    customer: String,
    forbidden: ForbiddenSet,
}

/// Normalized, immutable mapping from customer id to forbidden set.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    /// Keyed by the trimmed, lowercased customer id.
    entries: HashMap<String, PolicyEntry>,
}

impl PolicyTable {
    /// Parse and normalize a policy document.
    pub fn from_json(json: &str) -> PolicyResult<(Self, Vec<ConfigWarning>)> {
        let raw: Option<RawPolicy> = serde_json::from_str(json)?;
        let entries = raw.map(|raw| raw.0).unwrap_or_default();
        let entries = entries.into_iter().map(|(customer, tokens)| {
            let tokens: Option<Vec<Option<String>>> =
                tokens.map(|tokens| tokens.into_iter().map(token_text).collect());
            (customer, tokens)
        });
        Ok(Self::from_raw(entries))
    }

    /// Normalize raw entries: unknown tokens skipped, empty entries dropped,
    /// repeated ids (in any case) merged.
    pub fn from_raw<I, L>(raw: I) -> (Self, Vec<ConfigWarning>)
    where
        I: IntoIterator<Item = (String, Option<L>)>,
        L: IntoIterator<Item = Option<String>>,
    {
        let mut warnings = Vec::new();
        let mut merged: HashMap<String, (String, Vec<ProductCategory>)> = HashMap::new();

        for (customer, list) in raw {
            let customer = customer.trim();
            if customer.is_empty() {
                warnings.push(ConfigWarning::BlankCustomerId);
                continue;
            }

            let mut categories = Vec::new();
            for token in list.into_iter().flatten().flatten() {
                if token.trim().is_empty() {
                    continue;
                }
                match token.parse::<ProductCategory>() {
                    Ok(category) => categories.push(category),
                    Err(_) => warnings.push(ConfigWarning::UnknownCategory {
                        customer: customer.to_string(),
                        token,
                    }),
                }
            }

            if categories.is_empty() {
                warnings.push(ConfigWarning::EmptyEntry {
                    customer: customer.to_string(),
                });
                continue;
            }

            let key = customer.to_lowercase();
            match merged.get_mut(&key) {
                Some((_, existing)) => {
                    warnings.push(ConfigWarning::DuplicateCustomer {
                        customer: customer.to_string(),
                    });
                    existing.extend(categories);
                }
                None => {
                    merged.insert(key, (customer.to_string(), categories));
                }
            }
        }

        let entries = merged
            .into_iter()
            .map(|(key, (customer, categories))| {
                let entry = PolicyEntry {
                    customer,
                    forbidden: categories.into_iter().collect(),
                };
                (key, entry)
            })
            .collect();

        (Self { entries }, warnings)
    }

    /// Forbidden set for `customer_id`; empty for blank or unknown ids.
    pub fn get(&self, customer_id: &str) -> ForbiddenSet {
        let id = customer_id.trim();
        if id.is_empty() {
            return ForbiddenSet::empty();
        }
        self.entries
            .get(&id.to_lowercase())
            .map(|entry| entry.forbidden.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries as (customer id as written, forbidden set), sorted
    /// case-insensitively by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ForbiddenSet)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .into_iter()
            .map(|(_, entry)| (entry.customer.as_str(), &entry.forbidden))
    }
}

/// Customer ids the diagnostic tracing is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugFilter {
    ids: HashSet<String>,
}

impl DebugFilter {
    /// One id per line; blank lines and `#` comments are ignored.
    pub fn parse(text: &str) -> Self {
        let ids = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { ids }
    }

    /// Whether the filter names no customer at all.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// An empty filter matches everyone.
    pub fn matches(&self, customer_id: Option<&str>) -> bool {
        if self.ids.is_empty() {
            return true;
        }
        match customer_id.map(str::trim) {
            Some(id) if !id.is_empty() => self.ids.contains(&id.to_lowercase()),
            _ => false,
        }
    }
}

/// Outcome of a [`ConfigStore::load`].
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Customers with at least one forbidden category.
    pub configured_customers: usize,
    /// The default file was written during this load.
    pub created_default: bool,
    /// Per-entry problems that were skipped.
    pub warnings: Vec<ConfigWarning>,
    /// Set when the file could not be read or parsed and the table was left
    /// empty.
    pub failure: Option<String>,
}

/// Owner of the policy table and the debug side files.
#[derive(Debug)]
pub struct ConfigStore {
    paths: ConfigPaths,
    template: Option<&'static str>,
    current: ArcSwap<PolicyTable>,
    load_lock: Mutex<()>,
}

impl ConfigStore {
    /// Create a store using the embedded default template. Nothing is read
    /// until [`ConfigStore::load`].
    pub fn new(paths: ConfigPaths) -> Self {
        Self::with_template(paths, Some(DEFAULT_TEMPLATE))
    }

    /// Create a store with an explicit default template.
    pub fn with_template(paths: ConfigPaths, template: Option<&'static str>) -> Self {
        Self {
            paths,
            template,
            current: ArcSwap::from_pointee(PolicyTable::default()),
            load_lock: Mutex::new(()),
        }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    /// Load the policy file, creating it from the template if absent.
    ///
    /// Only a missing or broken embedded template is an error. Any problem
    /// with the user file is logged and leaves the table empty.
    pub fn load(&self) -> PolicyResult<LoadReport> {
        let _guard = self.load_lock.lock();
        let path = self.paths.config_file();

        let created_default = match self.ensure_config_file(&path) {
            Ok(created) => created,
            Err(err @ (PolicyError::MissingTemplate | PolicyError::InvalidTemplate(_))) => {
                self.current.store(Arc::new(PolicyTable::default()));
                error!(path = %path.display(), error = %err, "Cannot materialize default config");
                return Err(err);
            }
            Err(err) => return Ok(self.fail_open(&path, err, false)),
        };

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| PolicyError::io(&path, e))
            .and_then(|json| PolicyTable::from_json(&json));

        match parsed {
            Ok((table, warnings)) => {
                for warning in &warnings {
                    warn!(path = %path.display(), "{}", warning);
                }
                let configured_customers = table.len();
                self.current.store(Arc::new(table));
                debug!(path = %path.display(), configured_customers, "Loaded forbidden products config");
                Ok(LoadReport {
                    configured_customers,
                    created_default,
                    warnings,
                    failure: None,
                })
            }
            Err(err) => Ok(self.fail_open(&path, err, created_default)),
        }
    }

    /// Re-read the policy file. Readers keep the previous table until the
    /// new one is complete.
    pub fn reload(&self) -> PolicyResult<LoadReport> {
        let report = self.load()?;
        info!(
            configured_customers = report.configured_customers,
            "Reloaded forbidden products config"
        );
        Ok(report)
    }

    /// Publish a table built elsewhere.
    pub fn install(&self, table: PolicyTable) {
        let _guard = self.load_lock.lock();
        self.current.store(Arc::new(table));
    }

    /// Current table. The returned snapshot never changes underneath the caller.
    pub fn snapshot(&self) -> Arc<PolicyTable> {
        self.current.load_full()
    }

    /// Forbidden set for a customer id; empty for `None`, blank or unknown ids.
    pub fn lookup(&self, customer_id: Option<&str>) -> ForbiddenSet {
        match customer_id {
            Some(id) => self.current.load().get(id),
            None => ForbiddenSet::empty(),
        }
    }

    pub fn configured_customers(&self) -> usize {
        self.current.load().len()
    }

    /// Diagnostic tracing is on while the flag marker exists.
    pub fn debug_enabled(&self) -> bool {
        self.paths.debug_flag().exists()
    }

    /// Whether diagnostics should be emitted for this customer.
    ///
    /// The filter file is re-read on every call. A filter with no real
    /// entries, or one that cannot be read, means "everyone".
    pub fn should_debug(&self, customer_id: Option<&str>) -> bool {
        if !self.debug_enabled() {
            return false;
        }

        let filter_path = self.paths.debug_filter();
        if !filter_path.exists() {
            return true;
        }

        match std::fs::read_to_string(&filter_path) {
            Ok(text) => DebugFilter::parse(&text).matches(customer_id),
            Err(err) => {
                debug!(path = %filter_path.display(), error = %err, "Unreadable debug filter, tracing everyone");
                true
            }
        }
    }

    /// Write the embedded template to `path` with keys sorted
    /// case-insensitively.
    pub fn write_default(&self, path: &Path) -> PolicyResult<()> {
        let template = self.template.ok_or(PolicyError::MissingTemplate)?;
        let rendered = render_sorted(template)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PolicyError::io(parent, e))?;
        }
        std::fs::write(path, rendered).map_err(|e| PolicyError::io(path, e))?;
        Ok(())
    }

    fn ensure_config_file(&self, path: &Path) -> PolicyResult<bool> {
        let dir = self.paths.dir();
        std::fs::create_dir_all(dir).map_err(|e| PolicyError::io(dir, e))?;

        if path.exists() {
            return Ok(false);
        }

        self.write_default(path)?;
        warn!(path = %path.display(), "Created default forbidden products config");
        Ok(true)
    }

    fn fail_open(&self, path: &Path, err: PolicyError, created_default: bool) -> LoadReport {
        error!(path = %path.display(), error = %err, "Failed to load config; no restrictions active");
        self.current.store(Arc::new(PolicyTable::default()));
        LoadReport {
            configured_customers: 0,
            created_default,
            warnings: Vec::new(),
            failure: Some(err.to_string()),
        }
    }
}

/// JSON object serialized in the order of its entries.
struct OrderedObject<'a>(&'a [(String, serde_json::Value)]);

impl Serialize for OrderedObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn render_sorted(template: &str) -> PolicyResult<String> {
    let parsed: Option<BTreeMap<String, serde_json::Value>> =
        serde_json::from_str(template).map_err(PolicyError::InvalidTemplate)?;

    let mut entries: Vec<_> = parsed.unwrap_or_default().into_iter().collect();
    entries.sort_by(|a, b| {
        a.0.to_lowercase()
            .cmp(&b.0.to_lowercase())
            .then_with(|| a.0.cmp(&b.0))
    });

    Ok(serde_json::to_string_pretty(&OrderedObject(&entries))?)
}
