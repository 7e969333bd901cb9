pub mod broker_consumer;
pub mod memory_consumer;

pub use broker_consumer::BrokerConsumer;
pub use memory_consumer::MemoryConsumer;
