//! Adapters on the customer's deal, sample and save paths.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use anyhow::Context;
use forbidden_products_core::{resolver, Catalog, CustomerProfile, ItemHandle, ProductDefinition};
use tracing::{debug, error, info, warn};

use crate::host::{CustomerHost, HookFlow, VariableStore};
use crate::plugin::ForbiddenProducts;

/// Delay before the host's end-of-wait follow-up after a refused sample.
pub const END_WAIT_DELAY: Duration = Duration::from_millis(1500);

/// Host variable counting rejected samples.
pub const SAMPLE_REJECTION_COUNT: &str = "SampleRejectionCount";

impl<K: Catalog> ForbiddenProducts<K> {
    /// Orderable products: drop forbidden entries in place, keeping the
    /// order of the rest.
    pub fn filter_orderable_products<C, T, F>(&self, customer: &C, products: &mut Vec<T>, product_of: F)
    where
        C: CustomerProfile + ?Sized,
        F: Fn(&T) -> Option<&ProductDefinition>,
    {
        let evaluator = self.evaluator();
        let forbidden = evaluator.forbidden_for(customer);
        if forbidden.is_empty() || products.is_empty() {
            return;
        }

        for i in (0..products.len()).rev() {
            if evaluator.is_forbidden_in(&forbidden, product_of(&products[i])) {
                products.remove(i);
            }
        }
    }

    /// Deal offered or finalized: a forbidden item rejects it outright.
    pub fn on_offer_deal<C, I>(
        &self,
        customer: &mut C,
        items: &[I],
        offered_by_player: bool,
        accepted: &mut bool,
    ) -> HookFlow
    where
        C: CustomerHost,
        I: ItemHandle,
    {
        // The host handles its own guard clauses.
        if !customer.has_current_contract() || items.is_empty() {
            return HookFlow::Continue;
        }

        if !self.evaluator().contains_forbidden(&*customer, items) {
            return HookFlow::Continue;
        }

        *accepted = false;
        customer.reject_deal(offered_by_player);
        HookFlow::Skip
    }

    /// Sample success: the host consumes the first item, so only that one
    /// is judged.
    pub fn on_sample_success<C, I>(&self, customer: &C, items: &[I], result: &mut f32)
    where
        C: CustomerProfile + ?Sized,
        I: ItemHandle,
    {
        let Some(first) = items.first() else {
            return;
        };
        if !first.is_product_item() {
            return;
        }

        let def = resolver::resolve_product_item(self.catalog(), first);
        if self.evaluator().is_forbidden(customer, def.as_deref()) {
            *result = 0.0;
        }
    }

    /// Sample consumed: a forbidden sample always takes the "insufficient"
    /// path. Cleanup runs even when the host fails halfway.
    pub fn on_sample_consumed<C, V>(&self, customer: &mut C, vars: &mut V) -> HookFlow
    where
        C: CustomerHost,
        V: VariableStore + ?Sized,
    {
        let def = match customer.consumed_sample() {
            Some(sample) => resolver::resolve_product_item(self.catalog(), sample),
            None => return HookFlow::Continue,
        };
        if !self.evaluator().is_forbidden(&*customer, def.as_deref()) {
            return HookFlow::Continue;
        }

        let npc = customer.npc_id().unwrap_or_default().to_string();
        let forced = panic::catch_unwind(AssertUnwindSafe(|| {
            force_insufficient_sample(&mut *customer, &mut *vars)
        }));
        match forced {
            Ok(Ok(())) => debug!(npc_id = %npc, "Forced insufficient sample"),
            Ok(Err(err)) => {
                error!(npc_id = %npc, error = ?err, "Failed forcing insufficient sample")
            }
            Err(_) => error!(npc_id = %npc, "Host panicked while forcing insufficient sample"),
        }

        customer.clear_consumed_sample();
        customer.schedule_end_wait(END_WAIT_DELAY);
        HookFlow::Skip
    }

    /// Counteroffer for a forbidden product is always refused.
    pub fn on_counteroffer<C>(
        &self,
        customer: &C,
        product: Option<&ProductDefinition>,
        result: &mut bool,
    ) -> HookFlow
    where
        C: CustomerProfile + ?Sized,
    {
        if !self.evaluator().is_forbidden(customer, product) {
            return HookFlow::Continue;
        }

        *result = false;
        HookFlow::Skip
    }

    /// Offer success chance is zero whenever a forbidden item is included.
    pub fn on_offer_success_chance<C, I>(
        &self,
        customer: &C,
        items: &[I],
        asking_price: f32,
        result: &mut f32,
    ) where
        C: CustomerProfile + ?Sized,
        I: ItemHandle,
    {
        if items.is_empty() {
            return;
        }

        let before = *result;
        let contains = self.evaluator().contains_forbidden(customer, items);
        if contains {
            *result = 0.0;
        }

        if self.should_debug(customer) {
            let npc = customer.npc_id().unwrap_or_default();
            info!(
                "ForbiddenProducts[GetOfferSuccessChance]: npcId='{npc}' askingPrice={asking_price} \
                 containsForbidden={contains} result={before:.3}->{:.3} items={}",
                *result,
                items.len()
            );
            for (i, item) in items.iter().enumerate() {
                info!(
                    "ForbiddenProducts[GetOfferSuccessChance]:   item[{i}] id='{}'",
                    item.declared_id().unwrap_or("<null>")
                );
            }
        }
    }

    /// Customer restored from a save: an offered contract for a forbidden
    /// product must not resurface.
    pub fn on_customer_loaded<C: CustomerHost>(&self, customer: &mut C) {
        let Some(product_id) = customer.offered_contract_product() else {
            return;
        };
        let Some(def) = self.catalog().product(product_id) else {
            return;
        };
        if !self.evaluator().is_forbidden(&*customer, Some(&*def)) {
            return;
        }

        warn!(
            npc_id = customer.npc_id().unwrap_or_default(),
            product = %def.id,
            "Clearing forbidden offered contract"
        );
        customer.clear_offered_contract();
    }
}

fn force_insufficient_sample<C, V>(customer: &mut C, vars: &mut V) -> anyhow::Result<()>
where
    C: CustomerHost + ?Sized,
    V: VariableStore + ?Sized,
{
    customer
        .clear_consume_listeners()
        .context("clearing consume listeners")?;
    customer.enable_dialogue().context("enabling dialogue")?;
    customer
        .sample_was_insufficient()
        .context("running insufficient sample reaction")?;

    let rejections = vars
        .get_f32(SAMPLE_REJECTION_COUNT)
        .context("reading sample rejection count")?;
    vars.set_f32(SAMPLE_REJECTION_COUNT, rejections + 1.0)
        .context("writing sample rejection count")?;
    Ok(())
}
