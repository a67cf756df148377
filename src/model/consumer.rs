use crate::model::{Position, UserId};
use serde::{Deserialize, Serialize};

/// A marketplace user as seen by the ordering flow.
///
/// Only the fields placement needs are kept: identity, default delivery location and
/// whether the account has been confirmed.
///
/// # Actor Framework
/// Implements [`ActorEntity`](crate::framework::ActorEntity); see
/// [`consumer_actor`](crate::consumer_actor) for the create/update/action payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumer {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub position: Position,
    pub confirmed: bool,
}

/// Payload for registering a user. Accounts start unconfirmed.
#[derive(Debug, Clone)]
pub struct ConsumerCreate {
    pub name: String,
    pub email: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsumerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<Position>,
}
