use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::error::DomainError;

/// One ordered log within a topic.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct TopicPartition {
    pub topic: String,
    pub partition: i32,
}

impl TopicPartition {
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.topic, self.partition)
    }
}

/// Parses the `topic:partition` form used on the command line.
impl FromStr for TopicPartition {
    type Err = DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (topic, partition) = s
            .rsplit_once(':')
            .ok_or_else(|| DomainError::InvalidPartitionSpec(s.to_string()))?;

        let topic = topic.trim();
        if topic.is_empty() {
            return Err(DomainError::InvalidPartitionSpec(s.to_string()));
        }

        let partition = partition
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|p| *p >= 0)
            .ok_or_else(|| DomainError::InvalidPartitionSpec(s.to_string()))?;

        Ok(Self::new(topic, partition))
    }
}

/// Result of a timestamp lookup: the first offset whose record timestamp is at or
/// after the requested time, together with that record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetAndTimestamp {
    pub offset: i64,
    pub timestamp: i64,
}

impl OffsetAndTimestamp {
    pub fn new(offset: i64, timestamp: i64) -> Self {
        Self { offset, timestamp }
    }
}

/// Milliseconds since the Unix epoch. Dates before the epoch clamp to 0.
pub fn timestamp_millis(date: SystemTime) -> i64 {
    date.duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_topic_partition() {
        let tp: TopicPartition = "orders:3".parse().unwrap();
        assert_eq!(tp, TopicPartition::new("orders", 3));
        assert_eq!(tp.to_string(), "orders-3");
        assert_eq!(" orders : 3".parse::<TopicPartition>().unwrap(), tp);
    }

    #[test]
    fn test_parse_topic_partition_rejects_bad_input() {
        for spec in ["orders", ":1", " :3", "orders:", "orders:-1", "orders:x"] {
            assert_eq!(
                spec.parse::<TopicPartition>(),
                Err(DomainError::InvalidPartitionSpec(spec.to_string()))
            );
        }
    }

    #[test]
    fn test_timestamp_millis() {
        let date = UNIX_EPOCH + Duration::from_millis(1_700_000_000_123);
        assert_eq!(timestamp_millis(date), 1_700_000_000_123);
        assert_eq!(timestamp_millis(UNIX_EPOCH - Duration::from_secs(10)), 0);
    }
}
