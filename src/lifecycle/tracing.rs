//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Module paths are hidden (`with_target(false)`); the actors tag their lines
//! with `entity_type` instead.
//!
//! ```bash
//! RUST_LOG=info cargo run     # placements, commits, deliveries
//! RUST_LOG=debug cargo run    # plus payloads and every actor request
//! RUST_LOG=rider_dispatch::dispatch=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` one placement reads roughly:
//!
//! ```text
//! INFO place_order: Rider went off shift, dispatching again attempt=1 rider_id=rider_4
//! INFO Order committed order_id=order_1 rider_id=rider_2 price=50
//! INFO place_order: Order placed order_id=order_1 rider_id=rider_2 attempt=2
//! INFO Created entity_type="Notification" id=notification_1 size=1
//! ```
//!
//! Client-side spans (`place_order`, `commit_order`, ...) nest inline; debug level adds the
//! full `PlaceOrder` and `DispatchDecision` once at the start of each.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
