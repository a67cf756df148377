//! The ledger actor: sole owner of riders, the catalog and orders.

pub mod actor;
pub mod error;
pub mod message;

pub use actor::LedgerActor;
pub use error::*;
pub use message::LedgerRequest;

use crate::clients::LedgerClient;
use crate::ledger::Store;
use tokio::sync::mpsc;

/// Creates the ledger actor and its client.
///
/// `seed` fixes the rider-sampling RNG; `None` seeds it from the OS.
pub fn new(buffer_size: usize, seed: Option<u64>) -> (LedgerActor, LedgerClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let actor = LedgerActor::new(receiver, Store::new(seed));
    (actor, LedgerClient::new(sender))
}
