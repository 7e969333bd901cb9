pub mod outgoing;
pub mod protocol;
