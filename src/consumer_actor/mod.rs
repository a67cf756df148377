//! Consumer accounts, managed by a generic [`ResourceActor`].

pub mod entity;
pub mod error;

pub use entity::ConsumerAction;
pub use error::*;

use crate::clients::ConsumerClient;
use crate::framework::ResourceActor;
use crate::model::Consumer;

/// Creates a new Consumer actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Consumer>, ConsumerClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, ConsumerClient::new(generic_client))
}
