use crate::domain::partition::{OffsetAndTimestamp, TopicPartition};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// An open consumer owned by the caller. Implementations are not expected to be
/// shared between tasks; every mutating call takes `&mut self`.
#[async_trait]
pub trait ConsumerHandle: Send {
    async fn assign(&mut self, partitions: &[TopicPartition]) -> Result<()>;

    fn assignment(&self) -> Vec<TopicPartition>;

    async fn seek_to_beginning(&mut self, partitions: &[TopicPartition]) -> Result<()>;

    async fn seek_to_end(&mut self, partitions: &[TopicPartition]) -> Result<()>;

    /// Partitions without a record at or after the requested timestamp are left out
    /// of the returned map.
    async fn offsets_for_times(
        &mut self,
        timestamps: &HashMap<TopicPartition, i64>,
    ) -> Result<HashMap<TopicPartition, OffsetAndTimestamp>>;

    async fn seek(&mut self, partition: &TopicPartition, offset: i64) -> Result<()>;

    /// Current cursor, if one has been set since the partition was assigned.
    fn position(&self, partition: &TopicPartition) -> Option<i64>;
}
