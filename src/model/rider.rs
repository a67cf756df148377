use crate::model::{Position, RiderId, UserId};
use serde::{Deserialize, Serialize};

/// A delivery agent.
///
/// Riders live in the ledger store: `active` is changed by the owner's toggle and `income`
/// only by committed orders, so both need the store's exclusivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rider {
    pub id: RiderId,
    /// The user account that owns this rider profile.
    pub user_id: UserId,
    /// Last reported position.
    pub position: Position,
    /// Eligible for new orders.
    pub active: bool,
    /// Sum of the fares of every order assigned to this rider.
    pub income: u64,
}

impl Rider {
    /// New riders start off-shift with no income.
    pub fn new(id: RiderId, user_id: UserId, position: Position) -> Self {
        Self {
            id,
            user_id,
            position,
            active: false,
            income: 0,
        }
    }
}

/// Payload for registering a rider profile.
#[derive(Debug, Clone)]
pub struct RiderCreate {
    pub user_id: UserId,
    pub position: Position,
}
