use crate::adapters::protocol::constants::{
    CONSUMER_REPLICA_ID, EARLIEST_TIMESTAMP, LATEST_TIMESTAMP, LIST_OFFSETS_KEY,
    LIST_OFFSETS_VERSION, UNKNOWN_OFFSET,
};
use crate::adapters::protocol::dto::{
    ErrorCode, ListOffsetsPartition, ListOffsetsPartitionResponse, ListOffsetsRequest,
    ListOffsetsResponse, ListOffsetsTopic, RequestHeader,
};
use crate::adapters::protocol::ListOffsetsCodec;
use crate::application::error::ApplicationError;
use crate::config::app_config::AppConfig;
use crate::domain::error::DomainError;
use crate::domain::partition::{OffsetAndTimestamp, TopicPartition};
use crate::ports::outgoing::consumer_handle::ConsumerHandle;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, trace};

const MAX_RESPONSE_SIZE: usize = 64 * 1024 * 1024;

/// Consumer bound to a single broker. Assignment and cursors live here; the
/// broker is only asked to resolve offsets via ListOffsets, so it must lead
/// every partition it is asked about.
///
/// A request that fails before its response is fully read (timeout, IO,
/// framing) closes the connection; the next request reconnects.
pub struct BrokerConsumer {
    addr: String,
    stream: Option<TcpStream>,
    client_id: String,
    request_timeout: Duration,
    codec: ListOffsetsCodec,
    next_correlation_id: i32,
    assignment: Vec<TopicPartition>,
    positions: HashMap<TopicPartition, i64>,
}

impl BrokerConsumer {
    pub async fn connect(
        addr: &str,
        client_id: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let stream = open(addr, request_timeout).await?;
        let client_id = client_id.into();
        info!(%addr, %client_id, "connected to broker");

        Ok(Self {
            addr: addr.to_string(),
            stream: Some(stream),
            client_id,
            request_timeout,
            codec: ListOffsetsCodec::new(),
            next_correlation_id: 0,
            assignment: Vec::new(),
            positions: HashMap::new(),
        })
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        Self::connect(
            &config.bootstrap_server,
            config.client_id.clone(),
            config.request_timeout,
        )
        .await
    }

    fn ensure_assigned(&self, partition: &TopicPartition) -> Result<()> {
        if self.assignment.contains(partition) {
            Ok(())
        } else {
            Err(ApplicationError::NotAssigned(partition.clone()))
        }
    }

    /// Resolves one offset per partition. Any partition-level error code fails the
    /// whole lookup, except UNSUPPORTED_FOR_MESSAGE_FORMAT which leaves the
    /// partition out of the result.
    async fn list_offsets(
        &mut self,
        targets: &[(TopicPartition, i64)],
    ) -> Result<HashMap<TopicPartition, ListOffsetsPartitionResponse>> {
        if targets.is_empty() {
            return Ok(HashMap::new());
        }

        let mut topics: Vec<ListOffsetsTopic> = Vec::new();
        for (tp, timestamp) in targets {
            let partition = ListOffsetsPartition {
                partition_index: tp.partition,
                timestamp: *timestamp,
            };
            match topics.iter_mut().find(|t| t.name == tp.topic) {
                Some(topic) => topic.partitions.push(partition),
                None => topics.push(ListOffsetsTopic {
                    name: tp.topic.clone(),
                    partitions: vec![partition],
                }),
            }
        }

        let response = self
            .round_trip(ListOffsetsRequest {
                replica_id: CONSUMER_REPLICA_ID,
                topics,
            })
            .await?;

        let mut resolved = HashMap::with_capacity(targets.len());
        for topic in response.topics {
            for partition in topic.partitions {
                let tp = TopicPartition::new(topic.name.clone(), partition.partition_index);
                let code = ErrorCode::from(partition.error_code);
                if code == ErrorCode::UnsupportedForMessageFormat {
                    debug!(partition = %tp, "timestamp lookup unsupported by message format");
                    continue;
                }
                if code != ErrorCode::None {
                    return Err(ApplicationError::Broker { partition: tp, code });
                }
                resolved.insert(tp, partition);
            }
        }
        Ok(resolved)
    }

    async fn round_trip(&mut self, request: ListOffsetsRequest) -> Result<ListOffsetsResponse> {
        let correlation_id = self.next_correlation_id;
        self.next_correlation_id = self.next_correlation_id.wrapping_add(1);

        let header = RequestHeader {
            api_key: LIST_OFFSETS_KEY,
            api_version: LIST_OFFSETS_VERSION,
            correlation_id,
            client_id: Some(self.client_id.clone()),
        };
        let frame = self.codec.encode_request(&header, &request)?;
        trace!(correlation_id, frame = %hex::encode(&frame), "sending ListOffsets");

        // 실패하면 연결은 버려지고 다음 요청에서 다시 연결함
        let mut stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                info!(addr = %self.addr, "reconnecting to broker");
                open(&self.addr, self.request_timeout).await?
            }
        };

        let body = with_timeout(self.request_timeout, exchange(&mut stream, &frame)).await??;
        trace!(correlation_id, frame = %hex::encode(&body), "received ListOffsets");

        let response = self.codec.decode_response(&body)?;
        if response.correlation_id != correlation_id {
            return Err(ApplicationError::Protocol(format!(
                "correlation id mismatch: expected {} but got {}",
                correlation_id, response.correlation_id
            )));
        }

        self.stream = Some(stream);
        Ok(response)
    }

    async fn reset_to(&mut self, partitions: &[TopicPartition], timestamp: i64) -> Result<()> {
        for partition in partitions {
            self.ensure_assigned(partition)?;
        }

        let targets: Vec<(TopicPartition, i64)> =
            partitions.iter().map(|tp| (tp.clone(), timestamp)).collect();
        let resolved = self.list_offsets(&targets).await?;

        let mut positions = Vec::with_capacity(partitions.len());
        for partition in partitions {
            let found = resolved.get(partition).ok_or_else(|| {
                ApplicationError::NotFound(format!("no offset returned for {}", partition))
            })?;
            positions.push((partition.clone(), found.offset));
        }
        for (partition, offset) in positions {
            debug!(%partition, offset, "cursor reset");
            self.positions.insert(partition, offset);
        }
        Ok(())
    }
}

async fn with_timeout<F: Future>(timeout: Duration, future: F) -> Result<F::Output> {
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| ApplicationError::Timeout(timeout))
}

async fn open(addr: &str, timeout: Duration) -> Result<TcpStream> {
    let stream = with_timeout(timeout, TcpStream::connect(addr)).await??;
    stream.set_nodelay(true)?;
    Ok(stream)
}

async fn exchange(stream: &mut TcpStream, frame: &[u8]) -> Result<Vec<u8>> {
    stream.write_all(frame).await?;

    // 1. 응답 크기 읽기
    let mut size_bytes = [0u8; 4];
    stream.read_exact(&mut size_bytes).await?;
    let size = i32::from_be_bytes(size_bytes);
    if size < 0 || size as usize > MAX_RESPONSE_SIZE {
        return Err(ApplicationError::Protocol(format!(
            "invalid response size: {}",
            size
        )));
    }

    // 2. 응답 데이터 읽기
    let mut body = vec![0; size as usize];
    stream.read_exact(&mut body).await?;
    Ok(body)
}

#[async_trait]
impl ConsumerHandle for BrokerConsumer {
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
        self.reset_to(partitions, EARLIEST_TIMESTAMP).await
    }

    async fn seek_to_end(&mut self, partitions: &[TopicPartition]) -> Result<()> {
        self.reset_to(partitions, LATEST_TIMESTAMP).await
    }

    async fn offsets_for_times(
        &mut self,
        timestamps: &HashMap<TopicPartition, i64>,
    ) -> Result<HashMap<TopicPartition, OffsetAndTimestamp>> {
        let mut targets = Vec::with_capacity(timestamps.len());
        for (partition, timestamp) in timestamps {
            if *timestamp < 0 {
                return Err(DomainError::NegativeTimestamp(*timestamp).into());
            }
            targets.push((partition.clone(), *timestamp));
        }

        let resolved = self.list_offsets(&targets).await?;
        Ok(resolved
            .into_iter()
            .filter(|(_, p)| p.offset != UNKNOWN_OFFSET)
            .map(|(tp, p)| (tp, OffsetAndTimestamp::new(p.offset, p.timestamp)))
            .collect())
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
