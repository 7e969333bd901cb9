use crate::application::error::ApplicationError;
use crate::domain::partition::TopicPartition;
use crate::ports::incoming::partition_positioner::PartitionPositioner;
use crate::ports::outgoing::consumer_handle::ConsumerHandle;
use crate::Result;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Where freshly assigned partitions start reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupMode {
    Earliest,
    #[default]
    Latest,
    Timestamp,
}

impl FromStr for StartupMode {
    type Err = ApplicationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "earliest" => Ok(StartupMode::Earliest),
            "latest" => Ok(StartupMode::Latest),
            "timestamp" => Ok(StartupMode::Timestamp),
            other => Err(ApplicationError::Config(format!(
                "unknown startup mode '{}', expected earliest, latest or timestamp",
                other
            ))),
        }
    }
}

impl fmt::Display for StartupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StartupMode::Earliest => "earliest",
            StartupMode::Latest => "latest",
            StartupMode::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// Assigns `partitions` once, then positions each of them according to `mode`.
/// Stops at the first failure.
pub async fn start_partitions(
    positioner: &dyn PartitionPositioner,
    handle: &mut dyn ConsumerHandle,
    partitions: &[TopicPartition],
    mode: StartupMode,
) -> Result<()> {
    info!(count = partitions.len(), %mode, "starting partitions");
    positioner.assign_partitions(handle, partitions).await?;

    for partition in partitions {
        match mode {
            StartupMode::Earliest => positioner.seek_to_beginning(handle, partition).await?,
            StartupMode::Latest => positioner.seek_to_end(handle, partition).await?,
            StartupMode::Timestamp => positioner.seek_to_date(handle, partition).await?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outgoing::memory_consumer::MemoryConsumer;
    use crate::application::call_bridge::ConsumerCallBridge;

    fn consumer() -> MemoryConsumer {
        let mut consumer = MemoryConsumer::new();
        consumer.add_partition(TopicPartition::new("orders", 0), 10, vec![100, 200, 300]);
        consumer.add_partition(TopicPartition::new("orders", 1), 0, vec![50, 150]);
        consumer
    }

    fn partitions() -> Vec<TopicPartition> {
        vec![TopicPartition::new("orders", 0), TopicPartition::new("orders", 1)]
    }

    async fn positions_after(mode: StartupMode, timestamp: i64) -> Result<Vec<Option<i64>>> {
        let bridge = ConsumerCallBridge::from_timestamp_millis(timestamp);
        let mut consumer = consumer();
        start_partitions(&bridge, &mut consumer, &partitions(), mode).await?;
        Ok(partitions().iter().map(|tp| consumer.position(tp)).collect())
    }

    #[tokio::test]
    async fn test_start_partitions_per_mode() -> Result<()> {
        assert_eq!(
            positions_after(StartupMode::Earliest, 0).await?,
            vec![Some(10), Some(0)]
        );
        assert_eq!(
            positions_after(StartupMode::Latest, 0).await?,
            vec![Some(13), Some(2)]
        );
        // orders-1 has nothing at or after 180, so it lands on its end
        assert_eq!(
            positions_after(StartupMode::Timestamp, 180).await?,
            vec![Some(11), Some(2)]
        );
        Ok(())
    }

    #[test]
    fn test_parse_startup_mode() {
        assert_eq!("Earliest".parse::<StartupMode>().unwrap(), StartupMode::Earliest);
        assert_eq!(" latest ".parse::<StartupMode>().unwrap(), StartupMode::Latest);
        assert_eq!(StartupMode::Timestamp.to_string(), "timestamp");
        assert!(matches!(
            "group-offsets".parse::<StartupMode>(),
            Err(ApplicationError::Config(_))
        ));
    }
}
