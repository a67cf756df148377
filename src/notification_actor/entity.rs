use super::NotificationError;
use crate::framework::ActorEntity;
use crate::model::{Notification, NotificationCreate, NotificationId};
use async_trait::async_trait;

/// Notifications support no actions.
#[derive(Debug)]
pub enum NotificationAction {}

#[async_trait]
impl ActorEntity for Notification {
    type Id = NotificationId;
    type Create = NotificationCreate;
    type Update = ();
    type Action = NotificationAction;
    type ActionResult = ();
    type Context = ();
    type Error = NotificationError;

    fn from_create_params(
        id: NotificationId,
        params: NotificationCreate,
    ) -> Result<Self, NotificationError> {
        Ok(Self {
            id,
            kind: params.kind,
            order_id: params.order_id,
            receiver: params.receiver,
            message: params.render(),
            timestamp: params.timestamp,
        })
    }

    async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), NotificationError> {
        Err(NotificationError::Immutable(self.id))
    }

    async fn on_delete(&self, _ctx: &()) -> Result<(), NotificationError> {
        Err(NotificationError::Immutable(self.id))
    }

    async fn handle_action(
        &mut self,
        action: NotificationAction,
        _ctx: &(),
    ) -> Result<(), NotificationError> {
        match action {}
    }
}
