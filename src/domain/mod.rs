pub mod error;
pub mod partition;

pub use error::DomainError;
pub use partition::*;
