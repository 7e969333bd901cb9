#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    InvalidPartitionSpec(String),
    NegativeOffset(i64),
    NegativeTimestamp(i64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidPartitionSpec(spec) => {
                write!(f, "Invalid partition spec '{}', expected topic:partition", spec)
            }
            DomainError::NegativeOffset(offset) => {
                write!(f, "Seek offset must not be negative: {}", offset)
            }
            DomainError::NegativeTimestamp(ts) => {
                write!(f, "Target timestamp must not be negative: {}", ts)
            }
        }
    }
}

impl std::error::Error for DomainError {}
