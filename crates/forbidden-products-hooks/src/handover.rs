//! Adapters on the handover screen and its detail panel.
//!
//! The screen redraws often and several of its hooks can fire for the same
//! user action. Every adapter here recomputes from scratch and writes
//! absolute state (disabled, zero, refusal text), so repeating one is
//! harmless.

use forbidden_products_core::{display, Catalog, CustomerProfile, ItemHandle};

use crate::host::{HandoverDetailPanel, HandoverScreen, HookFlow};
use crate::plugin::{ForbiddenProducts, FORBIDDEN_TRACE_INTERVAL, TRACE_INTERVAL};

/// Success label text while a forbidden product is on offer.
pub const ZERO_CHANCE_LABEL: &str = "0% chance of success";

/// First forbidden item found in the customer slots.
struct ForbiddenHit {
    npc: String,
    item_id: String,
    def_id: String,
    refusal: String,
}

fn refusal_message<C: CustomerProfile + ?Sized>(customer: &C) -> String {
    format!(
        "{} refuses this product.",
        customer.first_name().unwrap_or("Customer")
    )
}

impl<K: Catalog> ForbiddenProducts<K> {
    fn find_forbidden_slot<S: HandoverScreen>(&self, screen: &S, point: &str) -> Option<ForbiddenHit> {
        let customer = screen.current_customer()?;
        let evaluator = self.evaluator();

        for item in screen.customer_items() {
            let def = evaluator.resolve(item);
            if def.is_none() {
                self.trace_unresolved(point, customer, item);
            }
            if !evaluator.is_forbidden(customer, def.as_deref()) {
                continue;
            }

            return Some(ForbiddenHit {
                npc: customer.npc_id().unwrap_or_default().to_string(),
                item_id: item.declared_id().unwrap_or_default().to_string(),
                def_id: def.map(|d| d.id.clone()).unwrap_or_default(),
                refusal: refusal_message(customer),
            });
        }

        if self.should_debug(customer) {
            let npc = customer.npc_id().unwrap_or_default();
            self.throttle().info_throttled(
                &format!("fp:{point}:ok:{npc}"),
                TRACE_INTERVAL,
                &format!("ForbiddenProducts[{point}]: npcId='{npc}' -> ok (no forbidden items detected)."),
            );
        }
        None
    }

    fn trace_forbidden<S: HandoverScreen>(&self, screen: &S, point: &str, hit: &ForbiddenHit, effect: &str) {
        let debug = screen
            .current_customer()
            .is_some_and(|customer| self.should_debug(customer));
        if !debug {
            return;
        }
        self.throttle().warn_throttled(
            &format!("fp:{point}:forbidden:{}:{}", hit.npc, hit.item_id),
            FORBIDDEN_TRACE_INTERVAL,
            &format!(
                "ForbiddenProducts[{point}]: npcId='{}' itemId='{}' -> FORBIDDEN ({effect}, defId='{}').",
                hit.npc, hit.item_id, hit.def_id
            ),
        );
    }

    /// Validation: report a refusal when the host found nothing wrong.
    pub fn on_handover_error<S: HandoverScreen>(&self, screen: &S, err: &mut String, result: &mut bool) {
        if *result || !screen.mode().is_player_choice() {
            return;
        }

        if let Some(hit) = self.find_forbidden_slot(screen, "GetError") {
            *err = hit.refusal.clone();
            *result = true;
            self.trace_forbidden(screen, "GetError", &hit, "reporting error");
        }
    }

    /// Done pressed: block finalizing a forbidden handover.
    pub fn on_handover_done_pressed<S: HandoverScreen>(&self, screen: &mut S) -> HookFlow {
        if !screen.mode().is_player_choice() {
            return HookFlow::Continue;
        }

        match self.find_forbidden_slot(screen, "DonePressed") {
            Some(hit) => {
                apply_forbidden_ui_state(screen, &hit.refusal);
                self.trace_forbidden(screen, "DonePressed", &hit, "blocked finalize");
                HookFlow::Skip
            }
            None => HookFlow::Continue,
        }
    }

    /// Done button refresh: keep it disabled while anything is forbidden.
    pub fn on_handover_update_done_button<S: HandoverScreen>(&self, screen: &mut S) {
        if let Some(hit) = self.find_forbidden_slot(screen, "UpdateDoneButton") {
            apply_forbidden_ui_state(screen, &hit.refusal);
            self.trace_forbidden(screen, "UpdateDoneButton", &hit, "forcing Done disabled");
        }
    }

    /// Success chance refresh: show an explicit zero.
    pub fn on_handover_update_success_chance<S: HandoverScreen>(&self, screen: &mut S) {
        if !screen.mode().is_player_choice() {
            return;
        }

        if let Some(hit) = self.find_forbidden_slot(screen, "UpdateSuccessChance") {
            screen.show_success_chance(ZERO_CHANCE_LABEL, 0.0);
            self.trace_forbidden(screen, "UpdateSuccessChance", &hit, "forcing 0% label");
        }
    }

    /// Detail panel opened: annotate the effects label with Wants/Refuses.
    pub fn on_handover_detail_open<P, C>(&self, panel: &mut P, customer: &C)
    where
        P: HandoverDetailPanel,
        C: CustomerProfile + ?Sized,
    {
        let Some(current) = panel.effects_text() else {
            return;
        };

        let merged = display::merge_annotations(current, &self.annotation_lines(customer));
        if merged == current {
            return;
        }

        panel.set_effects_text(merged);
        panel.rebuild_layout();
    }
}

fn apply_forbidden_ui_state<S: HandoverScreen>(screen: &mut S, refusal: &str) {
    screen.set_done_interactable(false);
    screen.show_error(refusal);
}
