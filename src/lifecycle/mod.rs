//! System lifecycle: configuration, tracing, startup and shutdown.

pub mod config;
pub mod delivery;
pub mod dispatch_system;
pub mod tracing;

pub use config::{ConfigError, DispatchConfig};
pub use delivery::schedule_delivery;
pub use dispatch_system::DispatchSystem;
pub use self::tracing::setup_tracing;
