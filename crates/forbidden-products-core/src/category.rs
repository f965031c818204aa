//! Product category tags and the immutable forbidden set built from them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category tag carried by a product definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Marijuana,
    Methamphetamine,
    Cocaine,
    Shrooms,
    Mdma,
    Heroin,
}

impl ProductCategory {
    /// Every known category, in declaration order.
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Marijuana,
        ProductCategory::Methamphetamine,
        ProductCategory::Cocaine,
        ProductCategory::Shrooms,
        ProductCategory::Mdma,
        ProductCategory::Heroin,
    ];

    /// Display name, also the token accepted in the config file.
    pub fn name(&self) -> &'static str {
        match self {
            ProductCategory::Marijuana => "Marijuana",
            ProductCategory::Methamphetamine => "Methamphetamine",
            ProductCategory::Cocaine => "Cocaine",
            ProductCategory::Shrooms => "Shrooms",
            ProductCategory::Mdma => "Mdma",
            ProductCategory::Heroin => "Heroin",
        }
    }

    /// Whether the host actually sells this category.
    ///
    /// Display surfaces only ever mention implemented categories.
    pub fn is_implemented(&self) -> bool {
        matches!(
            self,
            ProductCategory::Marijuana
                | ProductCategory::Methamphetamine
                | ProductCategory::Cocaine
                | ProductCategory::Shrooms
        )
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A category token that matched no [`ProductCategory`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown product category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for ProductCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        ProductCategory::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Immutable set of categories a customer refuses.
///
/// Cloning is a reference-count bump; the set itself is never mutated once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenSet(Arc<BTreeSet<ProductCategory>>);

impl ForbiddenSet {
    /// The shared empty set ("no restriction").
    pub fn empty() -> Self {
        static EMPTY: OnceLock<ForbiddenSet> = OnceLock::new();
        EMPTY
            .get_or_init(|| ForbiddenSet(Arc::new(BTreeSet::new())))
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, category: ProductCategory) -> bool {
        self.0.contains(&category)
    }

    /// True if any of `categories` is in this set.
    pub fn intersects<'a>(&self, categories: impl IntoIterator<Item = &'a ProductCategory>) -> bool {
        if self.is_empty() {
            return false;
        }
        categories.into_iter().any(|c| self.0.contains(c))
    }

    /// Categories in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ProductCategory> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ForbiddenSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<ProductCategory> for ForbiddenSet {
    fn from_iter<T: IntoIterator<Item = ProductCategory>>(iter: T) -> Self {
        let set: BTreeSet<_> = iter.into_iter().collect();
        if set.is_empty() {
            return Self::empty();
        }
        ForbiddenSet(Arc::new(set))
    }
}
