//! # ActorEntity Trait
//!
//! The contract a record type implements so that a [`ResourceActor`](crate::framework::ResourceActor)
//! can own a collection of it. Consumers and notifications are managed this way; the
//! rider/dish/order tables live in the ledger actor instead because they must change together.
//!
//! Associated types pin every payload to its entity: a `NotificationCreate` can only ever
//! reach the notification actor.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! Both default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// The hooks are `#[async_trait]` so they may call other actors. `Context` is injected into
/// every hook when the actor is started with `run(context)`, which lets dependencies be
/// wired after construction.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier, generated by the actor from a `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a new record.
    type Create: Send + Sync + Debug;

    /// Payload for updating an existing record.
    type Update: Send + Sync + Debug;

    /// Record-specific operations beyond CRUD (e.g. `ConsumerAction::Confirm`).
    type Action: Send + Sync + Debug;

    /// Result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Dependencies injected into the actor. `()` when there are none.
    type Context: Send + Sync;

    /// One error enum per actor rather than one per message.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the record from its generated id and the create payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Runs after construction, before the record is stored. Returning an error discards it.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Runs before removal. Returning an error keeps the record.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
