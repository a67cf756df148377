//! Type-safe identifiers.
//!
//! Every id wraps a `u32` and displays with its table prefix (`rider_3`, `order_12`), so a
//! `DishId` can never be passed where a `RiderId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

typed_id!(
    /// A user account. Consumers, riders' owners and shop owners are all users.
    UserId,
    "user"
);
typed_id!(RiderId, "rider");
typed_id!(ShopId, "shop");
typed_id!(DishId, "dish");
typed_id!(OrderId, "order");
typed_id!(NotificationId, "notification");
