pub mod consumer_handle;

pub use consumer_handle::ConsumerHandle;
