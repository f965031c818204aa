//! Enforcement adapters for the forbidden products policy.
//!
//! Each host interception point gets one method on [`ForbiddenProducts`].
//! Prefix-style points return a [`HookFlow`] telling the host whether its
//! own implementation should still run; postfix-style points overwrite the
//! result slot they are handed. All of them are total: host errors are
//! logged and swallowed, never propagated back into the host.
//!
//! ```text
//! host event ──► adapter ──► PolicyEvaluator ──► ConfigStore snapshot
//!                   │
//!                   └──► effect: reject / zero / strip / disable / annotate
//! ```

mod contacts;
mod customer;
mod handover;
mod host;
mod plugin;

pub use customer::{END_WAIT_DELAY, SAMPLE_REJECTION_COUNT};
pub use handover::ZERO_CHANCE_LABEL;
pub use host::{
    ContactsDetailPanel, CustomerHost, HandoverDetailPanel, HandoverMode, HandoverScreen,
    HookFlow, VariableStore,
};
pub use plugin::ForbiddenProducts;
