pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use application::error::{ApplicationError, Result};
pub use application::call_bridge::ConsumerCallBridge;
pub use domain::partition::{OffsetAndTimestamp, TopicPartition};
