//! Mapping host items onto product definitions.
//!
//! Host data is allowed to be inconsistent (an item half torn down, a
//! definition of the wrong type). Every step is tried in a fixed order and
//! "nothing resolved" is a normal answer, not an error.

use std::sync::Arc;

use crate::host::{Catalog, ItemHandle, ProductDefinition};

/// Resolve an item already known to be a product item.
///
/// Registry lookup by declared id first, then the definition attached to the
/// item.
pub fn resolve_product_item<K, I>(catalog: &K, item: &I) -> Option<Arc<ProductDefinition>>
where
    K: Catalog + ?Sized,
    I: ItemHandle + ?Sized,
{
    item.declared_id()
        .filter(|id| !id.is_empty())
        .and_then(|id| catalog.product(id))
        .or_else(|| item.attached_definition().and_then(|def| def.into_product()))
}

/// Resolve any item.
///
/// Product items take the typed path. Other items try their attached
/// definition, then the registry by id (typed, then untyped).
pub fn resolve_item<K, I>(catalog: &K, item: &I) -> Option<Arc<ProductDefinition>>
where
    K: Catalog + ?Sized,
    I: ItemHandle + ?Sized,
{
    if item.is_product_item() {
        return resolve_product_item(catalog, item);
    }

    if let Some(def) = item.attached_definition().and_then(|def| def.into_product()) {
        return Some(def);
    }

    let id = item.declared_id().filter(|id| !id.is_empty())?;
    catalog
        .product(id)
        .or_else(|| catalog.definition(id).and_then(|def| def.into_product()))
}
