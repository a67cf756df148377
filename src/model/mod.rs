//! Plain data records. [`Consumer`] and [`Notification`] implement
//! [`ActorEntity`](crate::framework::ActorEntity); riders, shops, dishes and orders are owned
//! by the [`ledger`](crate::ledger).

pub mod catalog;
pub mod consumer;
pub mod ids;
pub mod notification;
pub mod order;
pub mod position;
pub mod rider;

pub use catalog::*;
pub use consumer::*;
pub use ids::*;
pub use notification::*;
pub use order::*;
pub use position::*;
pub use rider::*;
