//! # Rider Dispatch
//!
//! > **Rider assignment and the order ledger for a food marketplace.**
//!
//! A consumer buys a dish; the system picks a nearby active rider, prices the delivery, and
//! records the order together with the rider's income and the dish's sales count in one
//! all-or-nothing commit. The rider and the shop owner are notified once it lands, and the
//! consumer once the promised delivery time passes.
//!
//! ## Design
//!
//! ### Actors own state
//! Every table lives inside exactly one actor task and is only touched by that task, one
//! request at a time. Nothing is behind a lock. Callers hold cheap, cloneable clients.
//!
//! ### One ledger for everything a purchase writes
//! Orders, rider income and dish sales must change together, so they belong to a single
//! [`ledger_actor`]. Its commits run inside a [`ledger::Transaction`] that undoes every
//! applied write if any later step fails. Consumers and notifications have no such coupling
//! and use the generic [`framework::ResourceActor`].
//!
//! ### Dispatch reads, the ledger decides
//! The [`dispatch::Dispatcher`] works from a sampled snapshot of active riders and never
//! writes. The ledger re-checks the chosen rider inside the commit; if they went off shift
//! meanwhile, [`clients::OrderClient`] dispatches again.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic `ResourceActor<T>`, its client and the [`mock`](framework::mock) test double.
//!
//! ### 2. The Rules ([`cost`], [`dispatch`], [`ledger`])
//! Pure distance and fare arithmetic, rider selection, and the transactional store.
//!
//! ### 3. The Actors ([`ledger_actor`], [`consumer_actor`], [`notification_actor`])
//! Each owns one part of the state and defines its own error type.
//!
//! ### 4. The Interface ([`clients`])
//! Typed clients, plus the order flow that coordinates them.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Configuration, tracing, startup and shutdown. Start with
//! [`DispatchSystem`](lifecycle::DispatchSystem).
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod consumer_actor;
pub mod cost;
pub mod dispatch;
pub mod framework;
pub mod ledger;
pub mod ledger_actor;
pub mod lifecycle;
pub mod model;
pub mod notification_actor;
