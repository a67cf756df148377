//! Typed clients for the actors, plus the order flow that coordinates them.

pub mod consumer_client;
pub mod ledger_client;
pub mod notification_client;
pub mod order_client;

pub use consumer_client::*;
pub use ledger_client::*;
pub use notification_client::*;
pub use order_client::*;
