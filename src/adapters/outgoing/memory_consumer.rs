use crate::adapters::protocol::dto::ErrorCode;
use crate::application::error::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::partition::{OffsetAndTimestamp, TopicPartition};
use crate::ports::outgoing::consumer_handle::ConsumerHandle;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

// 파티션 하나의 로그: 보존 시작 오프셋 + 레코드별 타임스탬프
#[derive(Debug, Clone, Default)]
struct PartitionLog {
    log_start_offset: i64,
    timestamps: Vec<i64>,
}

impl PartitionLog {
    fn log_end_offset(&self) -> i64 {
        self.log_start_offset + self.timestamps.len() as i64
    }

    fn offset_for_time(&self, target: i64) -> Option<OffsetAndTimestamp> {
        self.timestamps
            .iter()
            .position(|ts| *ts >= target)
            .map(|idx| OffsetAndTimestamp::new(self.log_start_offset + idx as i64, self.timestamps[idx]))
    }
}

/// Consumer over in-memory partition logs. Offsets and timestamps behave like a
/// broker's, so it can stand in for a real connection.
#[derive(Debug, Default)]
pub struct MemoryConsumer {
    logs: HashMap<TopicPartition, PartitionLog>,
    assignment: Vec<TopicPartition>,
    positions: HashMap<TopicPartition, i64>,
}

impl MemoryConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a partition whose first retained record sits at `log_start_offset`
    /// and whose records carry `timestamps` in offset order.
    pub fn add_partition(
        &mut self,
        partition: TopicPartition,
        log_start_offset: i64,
        timestamps: Vec<i64>,
    ) {
        self.logs.insert(
            partition,
            PartitionLog {
                log_start_offset,
                timestamps,
            },
        );
    }

    /// Appends a record and returns its offset.
    pub fn append(&mut self, partition: &TopicPartition, timestamp: i64) -> i64 {
        let log = self.logs.entry(partition.clone()).or_default();
        log.timestamps.push(timestamp);
        log.log_end_offset() - 1
    }

    fn log(&self, partition: &TopicPartition) -> Result<&PartitionLog> {
        self.logs
            .get(partition)
            .ok_or_else(|| ApplicationError::Broker {
                partition: partition.clone(),
                code: ErrorCode::UnknownTopicOrPartition,
            })
    }

    fn ensure_assigned(&self, partition: &TopicPartition) -> Result<()> {
        if self.assignment.contains(partition) {
            Ok(())
        } else {
            Err(ApplicationError::NotAssigned(partition.clone()))
        }
    }

    fn reset_to<F>(&mut self, partitions: &[TopicPartition], offset_of: F) -> Result<()>
    where
        F: Fn(&PartitionLog) -> i64,
    {
        let mut resolved = Vec::with_capacity(partitions.len());
        for partition in partitions {
            self.ensure_assigned(partition)?;
            resolved.push((partition.clone(), offset_of(self.log(partition)?)));
        }
        self.positions.extend(resolved);
        Ok(())
    }
}

#[async_trait]
impl ConsumerHandle for MemoryConsumer {
    async fn assign(&mut self, partitions: &[TopicPartition]) -> Result<()> {
        let mut assignment: Vec<TopicPartition> = Vec::with_capacity(partitions.len());
        for partition in partitions {
            if !assignment.contains(partition) {
                assignment.push(partition.clone());
            }
        }
        self.positions.retain(|tp, _| assignment.contains(tp));
        self.assignment = assignment;
        Ok(())
    }

    fn assignment(&self) -> Vec<TopicPartition> {
        self.assignment.clone()
    }

    async fn seek_to_beginning(&mut self, partitions: &[TopicPartition]) -> Result<()> {
        self.reset_to(partitions, |log| log.log_start_offset)
    }

    async fn seek_to_end(&mut self, partitions: &[TopicPartition]) -> Result<()> {
        self.reset_to(partitions, PartitionLog::log_end_offset)
    }

    async fn offsets_for_times(
        &mut self,
        timestamps: &HashMap<TopicPartition, i64>,
    ) -> Result<HashMap<TopicPartition, OffsetAndTimestamp>> {
        let mut found = HashMap::with_capacity(timestamps.len());
        for (partition, target) in timestamps {
            if *target < 0 {
                return Err(DomainError::NegativeTimestamp(*target).into());
            }
            if let Some(hit) = self.log(partition)?.offset_for_time(*target) {
                found.insert(partition.clone(), hit);
            }
        }
        Ok(found)
    }

    async fn seek(&mut self, partition: &TopicPartition, offset: i64) -> Result<()> {
        if offset < 0 {
            return Err(DomainError::NegativeOffset(offset).into());
        }
        self.ensure_assigned(partition)?;
        self.positions.insert(partition.clone(), offset);
        Ok(())
    }

    fn position(&self, partition: &TopicPartition) -> Option<i64> {
        self.positions.get(partition).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tp(partition: i32) -> TopicPartition {
        TopicPartition::new("events", partition)
    }

    #[tokio::test]
    async fn test_assign_dedups_and_drops_stale_positions() -> Result<()> {
        let mut consumer = MemoryConsumer::new();
        consumer.add_partition(tp(0), 0, vec![10, 20]);
        consumer.add_partition(tp(1), 5, vec![10]);

        consumer.assign(&[tp(0), tp(1), tp(0)]).await?;
        assert_eq!(consumer.assignment(), vec![tp(0), tp(1)]);

        consumer.seek_to_end(&[tp(0), tp(1)]).await?;
        assert_eq!(consumer.position(&tp(0)), Some(2));
        assert_eq!(consumer.position(&tp(1)), Some(6));

        consumer.assign(&[tp(1)]).await?;
        assert_eq!(consumer.position(&tp(0)), None);
        assert_eq!(consumer.position(&tp(1)), Some(6));
        Ok(())
    }

    #[tokio::test]
    async fn test_offsets_for_times_skips_partitions_without_match() -> Result<()> {
        let mut consumer = MemoryConsumer::new();
        consumer.add_partition(tp(0), 0, vec![10, 20, 30]);
        consumer.add_partition(tp(1), 0, vec![5]);

        let request = HashMap::from([(tp(0), 15), (tp(1), 15)]);
        let found = consumer.offsets_for_times(&request).await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[&tp(0)], OffsetAndTimestamp::new(1, 20));
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_partition_and_bad_arguments() -> Result<()> {
        let mut consumer = MemoryConsumer::new();
        consumer.assign(&[tp(9)]).await?;

        let err = consumer.seek_to_beginning(&[tp(9)]).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Broker { code: ErrorCode::UnknownTopicOrPartition, .. }
        ));

        let err = consumer.seek(&tp(9), -1).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(DomainError::NegativeOffset(-1))));

        let err = consumer
            .offsets_for_times(&HashMap::from([(tp(9), -5)]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(DomainError::NegativeTimestamp(-5))));
        Ok(())
    }

    #[tokio::test]
    async fn test_append_extends_log_end() -> Result<()> {
        let mut consumer = MemoryConsumer::new();
        assert_eq!(consumer.append(&tp(0), 1), 0);
        assert_eq!(consumer.append(&tp(0), 2), 1);

        consumer.assign(&[tp(0)]).await?;
        consumer.seek_to_end(&[tp(0)]).await?;
        assert_eq!(consumer.position(&tp(0)), Some(2));
        Ok(())
    }
}
