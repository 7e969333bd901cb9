pub mod partition_positioner;

pub use partition_positioner::PartitionPositioner;
