//! # Tracing setup
//!
//! Initializes the global `tracing` subscriber: compact output, no module paths, level taken
//! from `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info cargo run      # State changes only
//! RUST_LOG=debug cargo run     # Full payloads (drafts, session requests, listings)
//! ```
//!
//! A typical order flow at `info`:
//!
//! ```text
//! INFO create: Created entity_type="Order" id=0192... size=1
//! INFO create: Order created order_id=0192... total_amount=35
//! INFO create_payment_session: Payment session created order_id=0192...
//! INFO Payment event applied order_id=0192... charge_id=ch_1
//! ```

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use entity_type and span names instead
        .compact()
        .init();
}
