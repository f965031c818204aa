//! Plugin state shared by every interception point.

use std::time::Duration;

use forbidden_products_core::{
    display, Catalog, ConfigPaths, ConfigStore, CustomerProfile, ItemHandle, LogThrottle,
    PolicyEvaluator, PolicyResult, PreferenceRanker,
};
use tracing::{info, warn};

/// Throttle interval for "unresolved" and "ok" traces.
pub(crate) const TRACE_INTERVAL: Duration = Duration::from_secs(1);
/// Throttle interval for "forbidden" traces.
pub(crate) const FORBIDDEN_TRACE_INTERVAL: Duration = Duration::from_millis(500);

/// Policy state plus the host catalog handle.
#[derive(Debug)]
pub struct ForbiddenProducts<K> {
    store: ConfigStore,
    catalog: K,
    throttle: LogThrottle,
    ranker: PreferenceRanker,
}

impl<K: Catalog> ForbiddenProducts<K> {
    /// Load configuration and get ready to serve interception points.
    ///
    /// Fails only when the embedded default config is missing from the
    /// build.
    pub fn init(paths: ConfigPaths, catalog: K) -> PolicyResult<Self> {
        let store = ConfigStore::new(paths);
        let report = store.load()?;

        info!(
            configured_customers = report.configured_customers,
            "ForbiddenProducts enabled"
        );
        if store.debug_enabled() {
            warn!(
                flag = %store.paths().debug_flag().display(),
                "ForbiddenProducts debug tracing enabled"
            );
        }

        Ok(Self::new(store, catalog))
    }

    /// Wrap an already loaded store.
    pub fn new(store: ConfigStore, catalog: K) -> Self {
        Self {
            store,
            catalog,
            throttle: LogThrottle::new(),
            ranker: PreferenceRanker::default(),
        }
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn catalog(&self) -> &K {
        &self.catalog
    }

    pub fn throttle(&self) -> &LogThrottle {
        &self.throttle
    }

    pub fn evaluator(&self) -> PolicyEvaluator<'_, K> {
        PolicyEvaluator::new(&self.store, &self.catalog)
    }

    /// Wants/Refuses lines for a customer.
    pub fn annotation_lines<C: CustomerProfile + ?Sized>(
        &self,
        customer: &C,
    ) -> Vec<display::AnnotationLine> {
        let forbidden = self.store.lookup(customer.npc_id());
        display::annotation_lines(customer.affinities(), &forbidden, &self.ranker)
    }

    pub(crate) fn should_debug<C: CustomerProfile + ?Sized>(&self, customer: &C) -> bool {
        self.store.should_debug(customer.npc_id())
    }

    pub(crate) fn trace_unresolved<C, I>(&self, point: &str, customer: &C, item: &I)
    where
        C: CustomerProfile + ?Sized,
        I: ItemHandle + ?Sized,
    {
        if !self.should_debug(customer) {
            return;
        }
        let npc = customer.npc_id().unwrap_or_default();
        let item_id = item.declared_id().unwrap_or("<none>");
        self.throttle.warn_throttled(
            &format!("fp:{point}:defnull:{npc}:{item_id}"),
            TRACE_INTERVAL,
            &format!(
                "ForbiddenProducts[{point}]: npcId='{npc}' itemId='{item_id}' def=null (product item: {}).",
                item.is_product_item()
            ),
        );
    }
}
