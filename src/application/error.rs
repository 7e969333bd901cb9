use crate::adapters::protocol::dto::ErrorCode;
use crate::domain::error::DomainError;
use crate::domain::partition::TopicPartition;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Protocol error: {0}")]
    Protocol(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("No current assignment for partition {0}")]
    NotAssigned(TopicPartition),
    #[error("Broker returned {code:?} for partition {partition}")]
    Broker {
        partition: TopicPartition,
        code: ErrorCode,
    },
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ApplicationError>;
