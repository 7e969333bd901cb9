use crate::domain::partition::TopicPartition;
use crate::ports::outgoing::consumer_handle::ConsumerHandle;
use crate::Result;
use async_trait::async_trait;

/// Operations a connector drives against a consumer it owns.
#[async_trait]
pub trait PartitionPositioner: Send + Sync {
    /// Replaces the handle's assignment with exactly `partitions`. An empty slice
    /// means "consume nothing".
    async fn assign_partitions(
        &self,
        handle: &mut dyn ConsumerHandle,
        partitions: &[TopicPartition],
    ) -> Result<()>;

    async fn seek_to_beginning(
        &self,
        handle: &mut dyn ConsumerHandle,
        partition: &TopicPartition,
    ) -> Result<()>;

    async fn seek_to_end(
        &self,
        handle: &mut dyn ConsumerHandle,
        partition: &TopicPartition,
    ) -> Result<()>;

    /// Seeks to the first record at or after the configured startup timestamp,
    /// or to the end of the log when there is none.
    async fn seek_to_date(
        &self,
        handle: &mut dyn ConsumerHandle,
        partition: &TopicPartition,
    ) -> Result<()>;
}
