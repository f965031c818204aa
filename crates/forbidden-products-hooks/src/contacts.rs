//! Adapter on the phone contacts detail panel.

use forbidden_products_core::{display, Catalog, CustomerProfile};

use crate::host::ContactsDetailPanel;
use crate::plugin::ForbiddenProducts;

impl<K: Catalog> ForbiddenProducts<K> {
    /// Contact opened: annotate the properties section, but only when the
    /// host chose to show it.
    pub fn on_contacts_detail_open<P, C>(&self, panel: &mut P, customer: Option<&C>)
    where
        P: ContactsDetailPanel,
        C: CustomerProfile + ?Sized,
    {
        let Some(customer) = customer else {
            return;
        };
        if !panel.properties_visible() {
            return;
        }
        let Some(current) = panel.properties_text() else {
            return;
        };

        let merged = display::merge_annotations(current, &self.annotation_lines(customer));
        if merged != current {
            panel.set_properties_text(merged);
        }
    }
}
