//! Generic actor framework for record collections.
//!
//! - [`ActorEntity`] - trait a record type implements to be managed by an actor
//! - [`ResourceActor`] - the actor owning a collection of records
//! - [`ResourceClient`] - typed, cloneable handle used to talk to it
//! - [`ActorClient`] - default `get`/`list`/`delete` for domain clients
//! - [`FrameworkError`] - transport errors
//!
//! See [`mock`] for testing clients without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response};
