//! Behaviour tests for Mikasa.
//!
//! - `harness.rs`     - MockProvider and TestHarness
//! - `inbox.rs`       - subscribe / unsubscribe / unknown command handling
//! - `submissions.rs` - flair qualification and ledger recording
//! - `notify.rs`      - fan-out to subscribers and failure isolation
//! - `dispatch.rs`    - round-robin polling, gaps and transport errors
//! - `replay.rs`      - idempotence across redelivery and restarts

mod inbox;
mod submissions;

#[allow(unused_imports)]
pub use harness::{MockProvider, TestHarness};
