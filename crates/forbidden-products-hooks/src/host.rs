//! Host objects touched by the enforcement adapters.
//!
//! These mirror the handful of members each interception point needs. Host
//! calls that can fail report through `anyhow` so the adapters can log them
//! with context and carry on.

use std::time::Duration;

use forbidden_products_core::{CustomerProfile, ItemHandle};

/// Whether the host's own implementation should run after an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookFlow {
    /// Run the original.
    Continue,
    /// The adapter has handled the event; skip the original.
    Skip,
}

impl HookFlow {
    pub fn should_continue(self) -> bool {
        self == HookFlow::Continue
    }
}

/// Mutable customer state reached from the deal and sample paths.
pub trait CustomerHost: CustomerProfile {
    type Item: ItemHandle;

    /// The customer is in the middle of a contract negotiation.
    fn has_current_contract(&self) -> bool;

    /// The host's own "deal rejected" reaction.
    fn reject_deal(&mut self, offered_by_player: bool);

    /// Sample currently being consumed, if any.
    fn consumed_sample(&self) -> Option<&Self::Item>;

    fn clear_consumed_sample(&mut self);

    /// Detach the listeners waiting for the consume animation.
    fn clear_consume_listeners(&mut self) -> anyhow::Result<()>;

    /// Give the customer back their generic dialogue.
    fn enable_dialogue(&mut self) -> anyhow::Result<()>;

    /// The host's "sample was insufficient" reaction.
    fn sample_was_insufficient(&mut self) -> anyhow::Result<()>;

    /// Schedule the host's end-of-wait follow-up.
    fn schedule_end_wait(&mut self, delay: Duration);

    /// Product id of the first entry of the offered contract restored from
    /// a save, if any.
    fn offered_contract_product(&self) -> Option<&str>;

    fn clear_offered_contract(&mut self);
}

/// The host's global variable database.
pub trait VariableStore {
    fn get_f32(&self, name: &str) -> anyhow::Result<f32>;
    fn set_f32(&mut self, name: &str, value: f32) -> anyhow::Result<()>;
}

/// Mode of the handover screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoverMode {
    Sample,
    Offer,
    Contract,
}

impl HandoverMode {
    /// Modes in which the player picks what to hand over.
    pub fn is_player_choice(self) -> bool {
        matches!(self, HandoverMode::Sample | HandoverMode::Offer)
    }
}

/// The handover (confirmation) screen.
pub trait HandoverScreen {
    type Customer: CustomerProfile;
    type Item: ItemHandle;

    fn mode(&self) -> HandoverMode;

    fn current_customer(&self) -> Option<&Self::Customer>;

    /// Items placed in the customer slots; empty slots are skipped.
    fn customer_items(&self) -> Vec<&Self::Item>;

    fn set_done_interactable(&mut self, interactable: bool);

    /// Show `message` in the error label.
    fn show_error(&mut self, message: &str);

    /// Set the success label, coloured by the host's map at `chance`.
    fn show_success_chance(&mut self, text: &str, chance: f32);
}

/// Customer detail panel on the handover screen.
pub trait HandoverDetailPanel {
    /// `None` when the panel has no effects label.
    fn effects_text(&self) -> Option<&str>;

    fn set_effects_text(&mut self, text: String);

    /// Recompute layout after the text changed size.
    fn rebuild_layout(&mut self);
}

/// Contact detail panel in the phone app.
pub trait ContactsDetailPanel {
    /// The host decided to show the properties section.
    fn properties_visible(&self) -> bool;

    /// `None` when the panel has no properties label.
    fn properties_text(&self) -> Option<&str>;

    fn set_properties_text(&mut self, text: String);
}
