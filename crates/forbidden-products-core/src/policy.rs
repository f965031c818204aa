//! Forbidden-ness decisions.
//!
//! Every interception point asks the same three questions through this type,
//! so decision paths and display surfaces cannot disagree.

use std::sync::Arc;

use crate::category::{ForbiddenSet, ProductCategory};
use crate::config::ConfigStore;
use crate::host::{Catalog, CustomerProfile, ItemHandle, ProductDefinition};
use crate::resolver;

/// Decides whether products are forbidden for a customer.
pub struct PolicyEvaluator<'a, K: Catalog + ?Sized> {
    store: &'a ConfigStore,
    catalog: &'a K,
}

impl<'a, K: Catalog + ?Sized> PolicyEvaluator<'a, K> {
    pub fn new(store: &'a ConfigStore, catalog: &'a K) -> Self {
        Self { store, catalog }
    }

    pub fn catalog(&self) -> &'a K {
        self.catalog
    }

    /// Forbidden set for a customer; empty when the customer has no id.
    pub fn forbidden_for<C: CustomerProfile + ?Sized>(&self, customer: &C) -> ForbiddenSet {
        self.store.lookup(customer.npc_id())
    }

    /// Any overlap between the product's categories and the customer's
    /// forbidden set forbids the whole product. Unresolved products are
    /// allowed.
    pub fn is_forbidden<C: CustomerProfile + ?Sized>(
        &self,
        customer: &C,
        product: Option<&ProductDefinition>,
    ) -> bool {
        self.is_forbidden_in(&self.forbidden_for(customer), product)
    }

    /// The decision itself, against a forbidden set the caller already
    /// fetched. Lets a batch reuse one snapshot.
    pub fn is_forbidden_in(
        &self,
        forbidden: &ForbiddenSet,
        product: Option<&ProductDefinition>,
    ) -> bool {
        product.is_some_and(|product| forbidden.intersects(&product.categories))
    }

    /// Resolve an item and decide.
    pub fn is_item_forbidden<C, I>(&self, customer: &C, item: &I) -> bool
    where
        C: CustomerProfile + ?Sized,
        I: ItemHandle + ?Sized,
    {
        let forbidden = self.forbidden_for(customer);
        if forbidden.is_empty() {
            return false;
        }
        self.is_forbidden_in(&forbidden, self.resolve(item).as_deref())
    }

    /// True as soon as one item resolves to a forbidden product.
    pub fn contains_forbidden<'i, C, I>(
        &self,
        customer: &C,
        items: impl IntoIterator<Item = &'i I>,
    ) -> bool
    where
        C: CustomerProfile + ?Sized,
        I: ItemHandle + ?Sized + 'i,
    {
        let forbidden = self.forbidden_for(customer);
        if forbidden.is_empty() {
            return false;
        }
        items
            .into_iter()
            .any(|item| self.is_forbidden_in(&forbidden, self.resolve(item).as_deref()))
    }

    /// True iff `product` is forbidden for the customer and `category` is
    /// one of the reasons.
    pub fn forbids_category<C: CustomerProfile + ?Sized>(
        &self,
        customer: &C,
        product: &ProductDefinition,
        category: ProductCategory,
    ) -> bool {
        let forbidden = self.forbidden_for(customer);
        self.is_forbidden_in(&forbidden, Some(product)) && forbidden.contains(category)
    }

    /// Resolve an item through the catalog.
    pub fn resolve<I: ItemHandle + ?Sized>(&self, item: &I) -> Option<Arc<ProductDefinition>> {
        resolver::resolve_item(self.catalog, item)
    }
}
