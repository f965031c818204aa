//! End-to-end tests of the policy core through its public API.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use forbidden_products_core::{
    display, AffinityEntry, Catalog, ConfigPaths, ConfigStore, CustomerProfile, ItemDefinition,
    ItemHandle, PolicyEvaluator, PreferenceRanker, ProductCategory, ProductDefinition,
};
use tempfile::TempDir;

use ProductCategory::*;

struct Shop(HashMap<String, Arc<ProductDefinition>>);

impl Shop {
    fn new() -> Self {
        let mut products = HashMap::new();
        for (id, category) in [
            ("ogkush", Marijuana),
            ("meth", Methamphetamine),
            ("cocaine", Cocaine),
            ("shroom", Shrooms),
        ] {
            products.insert(
                id.to_string(),
                Arc::new(ProductDefinition::new(id, [category])),
            );
        }
        Self(products)
    }
}

impl Catalog for Shop {
    fn product(&self, id: &str) -> Option<Arc<ProductDefinition>> {
        self.0.get(id).cloned()
    }

    fn definition(&self, id: &str) -> Option<ItemDefinition> {
        self.product(id).map(ItemDefinition::Product)
    }
}

struct Npc {
    id: &'static str,
    affinities: Vec<AffinityEntry>,
}

impl CustomerProfile for Npc {
    fn npc_id(&self) -> Option<&str> {
        Some(self.id)
    }

    fn affinities(&self) -> &[AffinityEntry] {
        &self.affinities
    }
}

struct Bag {
    id: &'static str,
    attached: Option<Arc<ProductDefinition>>,
}

impl ItemHandle for Bag {
    fn declared_id(&self) -> Option<&str> {
        Some(self.id)
    }

    fn is_product_item(&self) -> bool {
        true
    }

    fn attached_definition(&self) -> Option<ItemDefinition> {
        self.attached.clone().map(ItemDefinition::Product)
    }
}

fn loaded_store(temp: &TempDir) -> ConfigStore {
    let store = ConfigStore::new(ConfigPaths::new(temp.path()));
    store.load().unwrap();
    store
}

#[test]
fn test_default_config_drives_decisions() {
    let temp = TempDir::new().unwrap();
    let store = loaded_store(&temp);
    let shop = Shop::new();
    let evaluator = PolicyEvaluator::new(&store, &shop);

    let kyle = Npc {
        id: "KYLE_COOLEY",
        affinities: Vec::new(),
    };
    let meth = Bag {
        id: "meth",
        attached: None,
    };
    let weed = Bag {
        id: "ogkush",
        attached: None,
    };

    assert!(evaluator.is_item_forbidden(&kyle, &meth));
    assert!(!evaluator.is_item_forbidden(&kyle, &weed));
    assert!(evaluator.contains_forbidden(&kyle, [&weed, &meth]));
    assert!(!evaluator.contains_forbidden(&kyle, [&weed]));
}

#[test]
fn test_edited_config_takes_effect_on_reload() {
    let temp = TempDir::new().unwrap();
    let store = loaded_store(&temp);
    let before = store.snapshot();

    fs::write(
        store.paths().config_file(),
        r#"{"kyle_cooley": ["Cocaine"], "new_face": ["Marijuana"]}"#,
    )
    .unwrap();
    let report = store.reload().unwrap();

    assert_eq!(report.configured_customers, 2);
    assert!(store.lookup(Some("kyle_cooley")).contains(Cocaine));
    assert!(!store.lookup(Some("kyle_cooley")).contains(Methamphetamine));
    assert!(before.get("kyle_cooley").contains(Methamphetamine));
}

#[test]
fn test_unlisted_customer_is_unrestricted() {
    let temp = TempDir::new().unwrap();
    let store = loaded_store(&temp);
    let shop = Shop::new();
    let evaluator = PolicyEvaluator::new(&store, &shop);

    let stranger = Npc {
        id: "stranger",
        affinities: Vec::new(),
    };
    for id in ["ogkush", "meth", "cocaine", "shroom"] {
        let bag = Bag { id, attached: None };
        assert!(!evaluator.is_item_forbidden(&stranger, &bag));
    }
}

#[test]
fn test_attached_definition_used_when_catalog_misses() {
    let temp = TempDir::new().unwrap();
    let store = loaded_store(&temp);
    let shop = Shop::new();
    let evaluator = PolicyEvaluator::new(&store, &shop);

    let chloe = Npc {
        id: "chloe_bowers",
        affinities: Vec::new(),
    };
    let custom = Bag {
        id: "custom_mix",
        attached: Some(Arc::new(ProductDefinition::new("custom_mix", [Cocaine]))),
    };
    assert!(evaluator.is_item_forbidden(&chloe, &custom));
}

#[test]
fn test_annotation_for_configured_customer() {
    let temp = TempDir::new().unwrap();
    let store = loaded_store(&temp);

    let austin = Npc {
        id: "austin_steiner",
        affinities: vec![
            AffinityEntry::new(Shrooms, 0.9),
            AffinityEntry::new(Marijuana, 0.9),
            AffinityEntry::new(Cocaine, 0.99),
            AffinityEntry::new(Methamphetamine, 0.46),
        ],
    };
    let forbidden = store.lookup(austin.npc_id());
    let ranker = PreferenceRanker::default();

    assert_eq!(
        ranker.top_categories(austin.affinities(), &forbidden),
        vec![Shrooms, Marijuana]
    );

    let lines = display::annotation_lines(austin.affinities(), &forbidden, &ranker);
    let text = display::merge_annotations("Sedating", &lines);
    assert_eq!(
        text,
        "Sedating\n\n\
         <color=#A6E3A1><b>Wants:</b> Shrooms, Marijuana</color>\n\
         <color=#FF6B6B><b>Refuses:</b> Cocaine, Methamphetamine</color>"
    );
    assert_eq!(display::merge_annotations(&text, &lines), text);
}
