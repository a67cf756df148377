//! [`ActorEntity`] implementation for [`Consumer`].

use super::ConsumerError;
use crate::framework::ActorEntity;
use crate::model::{Consumer, ConsumerCreate, ConsumerUpdate, UserId};
use async_trait::async_trait;

/// Operations on a consumer beyond CRUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerAction {
    /// Marks the account confirmed. Returns whether it was unconfirmed before.
    Confirm,
}

fn validate(name: &str, email: &str) -> Result<(), ConsumerError> {
    if name.trim().is_empty() {
        return Err(ConsumerError::ValidationError("name must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(ConsumerError::ValidationError(format!(
            "invalid email: {email}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for Consumer {
    type Id = UserId;
    type Create = ConsumerCreate;
    type Update = ConsumerUpdate;
    type Action = ConsumerAction;
    type ActionResult = bool;
    type Context = ();
    type Error = ConsumerError;

    fn from_create_params(id: UserId, params: ConsumerCreate) -> Result<Self, ConsumerError> {
        validate(&params.name, &params.email)?;
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
            position: params.position,
            confirmed: false,
        })
    }

    /// Applies whichever fields are set. The whole update is rejected if the result would be
    /// invalid.
    async fn on_update(&mut self, update: ConsumerUpdate, _ctx: &()) -> Result<(), ConsumerError> {
        let name = update.name.unwrap_or_else(|| self.name.clone());
        let email = update.email.unwrap_or_else(|| self.email.clone());
        validate(&name, &email)?;
        self.name = name;
        self.email = email;
        if let Some(position) = update.position {
            self.position = position;
        }
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ConsumerAction,
        _ctx: &(),
    ) -> Result<bool, ConsumerError> {
        match action {
            ConsumerAction::Confirm => {
                let changed = !self.confirmed;
                self.confirmed = true;
                Ok(changed)
            }
        }
    }
}
