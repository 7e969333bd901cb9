pub mod call_bridge;
pub mod error;
pub mod startup;

pub use call_bridge::ConsumerCallBridge;
pub use error::{ApplicationError, Result};
pub use startup::{start_partitions, StartupMode};
