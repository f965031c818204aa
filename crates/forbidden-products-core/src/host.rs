//! The slice of the host's entity model the policy core reads from.
//!
//! Nothing here is owned by this layer. The host implements these traits over
//! its own customer, item and registry objects.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::category::ProductCategory;

/// A product entry in the host catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDefinition {
    /// Catalog identifier.
    pub id: String,
    /// Category tags, in the order the host declares them.
    pub categories: Vec<ProductCategory>,
}

impl ProductDefinition {
    pub fn new(id: impl Into<String>, categories: impl IntoIterator<Item = ProductCategory>) -> Self {
        Self {
            id: id.into(),
            categories: categories.into_iter().collect(),
        }
    }
}

/// A definition attached to an item, or returned by an untyped catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemDefinition {
    /// The definition is a product.
    Product(Arc<ProductDefinition>),
    /// Any other kind of definition (tools, packaging, ingredients).
    Other { id: String },
}

impl ItemDefinition {
    /// Narrow to a product definition.
    pub fn into_product(self) -> Option<Arc<ProductDefinition>> {
        match self {
            ItemDefinition::Product(def) => Some(def),
            ItemDefinition::Other { .. } => None,
        }
    }
}

/// One (category, score) entry of a customer's affinity list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffinityEntry {
    pub category: ProductCategory,
    pub score: f32,
}

impl AffinityEntry {
    pub fn new(category: ProductCategory, score: f32) -> Self {
        Self { category, score }
    }
}

/// Read access to a customer.
pub trait CustomerProfile {
    /// Stable NPC identifier, if the customer has one.
    fn npc_id(&self) -> Option<&str>;

    /// First name used in refusal messages.
    fn first_name(&self) -> Option<&str> {
        None
    }

    /// Default affinity list in the host's declared order.
    fn affinities(&self) -> &[AffinityEntry] {
        &[]
    }
}

/// An opaque item reference handed over by the host.
pub trait ItemHandle {
    /// Identifier the item was created with.
    fn declared_id(&self) -> Option<&str>;

    /// Whether the item's dynamic type is the host's product item type.
    fn is_product_item(&self) -> bool;

    /// Definition cached on the item itself.
    fn attached_definition(&self) -> Option<ItemDefinition>;
}

/// The host item registry.
pub trait Catalog {
    /// Typed lookup: returns a definition only if the entry is a product.
    fn product(&self, id: &str) -> Option<Arc<ProductDefinition>>;

    /// Untyped lookup.
    fn definition(&self, id: &str) -> Option<ItemDefinition>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn product(&self, id: &str) -> Option<Arc<ProductDefinition>> {
        (**self).product(id)
    }

    fn definition(&self, id: &str) -> Option<ItemDefinition> {
        (**self).definition(id)
    }
}

impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    fn product(&self, id: &str) -> Option<Arc<ProductDefinition>> {
        (**self).product(id)
    }

    fn definition(&self, id: &str) -> Option<ItemDefinition> {
        (**self).definition(id)
    }
}
