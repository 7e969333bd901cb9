use crate::domain::partition::{timestamp_millis, TopicPartition};
use crate::ports::incoming::partition_positioner::PartitionPositioner;
use crate::ports::outgoing::consumer_handle::ConsumerHandle;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::SystemTime;
use tracing::debug;

/// Positions a caller-owned consumer. The bridge holds nothing but the startup
/// timestamp used by `seek_to_date`; it never closes or locks the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerCallBridge {
    startup_timestamp_ms: i64,
}

impl ConsumerCallBridge {
    pub fn new(startup_date: SystemTime) -> Self {
        Self::from_timestamp_millis(timestamp_millis(startup_date))
    }

    pub fn from_timestamp_millis(startup_timestamp_ms: i64) -> Self {
        Self {
            startup_timestamp_ms,
        }
    }

    pub fn startup_timestamp_ms(&self) -> i64 {
        self.startup_timestamp_ms
    }
}

#[async_trait]
impl PartitionPositioner for ConsumerCallBridge {
    async fn assign_partitions(
        &self,
        handle: &mut dyn ConsumerHandle,
        partitions: &[TopicPartition],
    ) -> Result<()> {
        debug!(count = partitions.len(), "assigning partitions");
        handle.assign(partitions).await
    }

    async fn seek_to_beginning(
        &self,
        handle: &mut dyn ConsumerHandle,
        partition: &TopicPartition,
    ) -> Result<()> {
        debug!(%partition, "seeking to beginning");
        handle.seek_to_beginning(std::slice::from_ref(partition)).await
    }

    async fn seek_to_end(
        &self,
        handle: &mut dyn ConsumerHandle,
        partition: &TopicPartition,
    ) -> Result<()> {
        debug!(%partition, "seeking to end");
        handle.seek_to_end(std::slice::from_ref(partition)).await
    }

    async fn seek_to_date(
        &self,
        handle: &mut dyn ConsumerHandle,
        partition: &TopicPartition,
    ) -> Result<()> {
        let mut timestamps = HashMap::with_capacity(1);
        timestamps.insert(partition.clone(), self.startup_timestamp_ms);

        let offsets = handle.offsets_for_times(&timestamps).await?;
        match offsets.get(partition) {
            Some(found) => {
                debug!(
                    %partition,
                    offset = found.offset,
                    timestamp = self.startup_timestamp_ms,
                    "seeking to date"
                );
                handle.seek(partition, found.offset).await
            }
            None => {
                debug!(
                    %partition,
                    timestamp = self.startup_timestamp_ms,
                    "no record at or after timestamp, falling back to end"
                );
                self.seek_to_end(handle, partition).await
            }
        }
    }
}
