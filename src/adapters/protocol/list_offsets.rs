use bytes::{BufMut, Bytes, BytesMut};

use crate::adapters::protocol::dto::{
    ListOffsetsPartition, ListOffsetsPartitionResponse, ListOffsetsRequest, ListOffsetsResponse,
    ListOffsetsTopic, ListOffsetsTopicResponse, RequestHeader,
};
use crate::application::error::ApplicationError;

use super::parser::{ArrayParser, BaseParser, PrimitiveParser, StringParser};

/// ListOffsets v1 wire codec. Encoders emit the i32 size prefix, decoders expect
/// the frame body without it.
#[derive(Debug, Default, Clone)]
pub struct ListOffsetsCodec {
    parser: BaseParser,
}

fn put_string(buf: &mut BytesMut, value: &str) -> Result<(), ApplicationError> {
    let len = i16::try_from(value.len()).map_err(|_| {
        ApplicationError::Protocol(format!(
            "string of {} bytes exceeds the i16 length limit",
            value.len()
        ))
    })?;
    buf.put_i16(len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn put_nullable_string(buf: &mut BytesMut, value: Option<&str>) -> Result<(), ApplicationError> {
    match value {
        Some(value) => put_string(buf, value),
        None => {
            buf.put_i16(-1);
            Ok(())
        }
    }
}

fn with_size_prefix(body: BytesMut) -> Bytes {
    let mut framed = BytesMut::with_capacity(body.len() + 4);
    framed.put_i32(body.len() as i32);
    framed.extend_from_slice(&body);
    framed.freeze()
}

impl ListOffsetsCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_request(
        &self,
        header: &RequestHeader,
        request: &ListOffsetsRequest,
    ) -> Result<Bytes, ApplicationError> {
        let mut buf = BytesMut::new();

        // request header v1
        buf.put_i16(header.api_key);
        buf.put_i16(header.api_version);
        buf.put_i32(header.correlation_id);
        put_nullable_string(&mut buf, header.client_id.as_deref())?;

        buf.put_i32(request.replica_id);
        buf.put_i32(request.topics.len() as i32);
        for topic in &request.topics {
            put_string(&mut buf, &topic.name)?;
            buf.put_i32(topic.partitions.len() as i32);
            for partition in &topic.partitions {
                buf.put_i32(partition.partition_index);
                buf.put_i64(partition.timestamp);
            }
        }

        Ok(with_size_prefix(buf))
    }

    pub fn decode_request(
        &self,
        data: &[u8],
    ) -> Result<(RequestHeader, ListOffsetsRequest), ApplicationError> {
        let p = &self.parser;
        let mut buf = Bytes::copy_from_slice(data);

        let header = RequestHeader {
            api_key: p.parse_i16(&mut buf)?,
            api_version: p.parse_i16(&mut buf)?,
            correlation_id: p.parse_i32(&mut buf)?,
            client_id: p.parse_nullable_string(&mut buf)?,
        };

        let replica_id = p.parse_i32(&mut buf)?;
        let topics = p.parse_array(&mut buf, |buf| {
            Ok(ListOffsetsTopic {
                name: p.parse_string(buf)?,
                partitions: p.parse_array(buf, |buf| {
                    Ok(ListOffsetsPartition {
                        partition_index: p.parse_i32(buf)?,
                        timestamp: p.parse_i64(buf)?,
                    })
                })?,
            })
        })?;

        Ok((header, ListOffsetsRequest { replica_id, topics }))
    }

    pub fn encode_response(&self, response: &ListOffsetsResponse) -> Result<Bytes, ApplicationError> {
        let mut buf = BytesMut::new();

        // response header v0
        buf.put_i32(response.correlation_id);

        buf.put_i32(response.topics.len() as i32);
        for topic in &response.topics {
            put_string(&mut buf, &topic.name)?;
            buf.put_i32(topic.partitions.len() as i32);
            for partition in &topic.partitions {
                buf.put_i32(partition.partition_index);
                buf.put_i16(partition.error_code);
                buf.put_i64(partition.timestamp);
                buf.put_i64(partition.offset);
            }
        }

        Ok(with_size_prefix(buf))
    }

    pub fn decode_response(&self, data: &[u8]) -> Result<ListOffsetsResponse, ApplicationError> {
        let p = &self.parser;
        let mut buf = Bytes::copy_from_slice(data);

        let correlation_id = p.parse_i32(&mut buf)?;
        let topics = p.parse_array(&mut buf, |buf| {
            Ok(ListOffsetsTopicResponse {
                name: p.parse_string(buf)?,
                partitions: p.parse_array(buf, |buf| {
                    Ok(ListOffsetsPartitionResponse {
                        partition_index: p.parse_i32(buf)?,
                        error_code: p.parse_i16(buf)?,
                        timestamp: p.parse_i64(buf)?,
                        offset: p.parse_i64(buf)?,
                    })
                })?,
            })
        })?;

        Ok(ListOffsetsResponse {
            correlation_id,
            topics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::protocol::constants::{
        CONSUMER_REPLICA_ID, EARLIEST_TIMESTAMP, LIST_OFFSETS_KEY, LIST_OFFSETS_VERSION,
    };

    #[test]
    fn test_encode_list_offsets_request_layout() {
        let codec = ListOffsetsCodec::new();
        let header = RequestHeader {
            api_key: LIST_OFFSETS_KEY,
            api_version: LIST_OFFSETS_VERSION,
            correlation_id: 7,
            client_id: Some("cli".to_string()),
        };
        let request = ListOffsetsRequest {
            replica_id: CONSUMER_REPLICA_ID,
            topics: vec![ListOffsetsTopic {
                name: "t".to_string(),
                partitions: vec![ListOffsetsPartition {
                    partition_index: 3,
                    timestamp: EARLIEST_TIMESTAMP,
                }],
            }],
        };

        let encoded = codec.encode_request(&header, &request).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&2i16.to_be_bytes()); // API Key
        expected.extend_from_slice(&1i16.to_be_bytes()); // API Version
        expected.extend_from_slice(&7i32.to_be_bytes()); // Correlation ID
        expected.extend_from_slice(&3i16.to_be_bytes()); // Client ID length
        expected.extend_from_slice(b"cli");
        expected.extend_from_slice(&(-1i32).to_be_bytes()); // replica id
        expected.extend_from_slice(&1i32.to_be_bytes()); // topics
        expected.extend_from_slice(&1i16.to_be_bytes());
        expected.extend_from_slice(b"t");
        expected.extend_from_slice(&1i32.to_be_bytes()); // partitions
        expected.extend_from_slice(&3i32.to_be_bytes());
        expected.extend_from_slice(&(-2i64).to_be_bytes());

        assert_eq!(&encoded[..4], &(expected.len() as i32).to_be_bytes());
        assert_eq!(&encoded[4..], &expected[..]);

        let (decoded_header, decoded) = codec.decode_request(&encoded[4..]).unwrap();
        assert_eq!(decoded_header, header);
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_encode_rejects_oversized_client_id() {
        let header = RequestHeader {
            api_key: LIST_OFFSETS_KEY,
            api_version: LIST_OFFSETS_VERSION,
            correlation_id: 0,
            client_id: Some("x".repeat(i16::MAX as usize + 1)),
        };
        let request = ListOffsetsRequest {
            replica_id: CONSUMER_REPLICA_ID,
            topics: vec![],
        };

        let result = ListOffsetsCodec::new().encode_request(&header, &request);
        assert!(matches!(result, Err(ApplicationError::Protocol(msg)) if msg.contains("32768 bytes")));
    }

    #[test]
    fn test_decode_list_offsets_response() {
        let mut data = Vec::new();
        data.extend_from_slice(&42i32.to_be_bytes()); // Correlation ID
        data.extend_from_slice(&1i32.to_be_bytes()); // topics
        data.extend_from_slice(&6i16.to_be_bytes());
        data.extend_from_slice(b"orders");
        data.extend_from_slice(&2i32.to_be_bytes()); // partitions
        data.extend_from_slice(&3i32.to_be_bytes());
        data.extend_from_slice(&0i16.to_be_bytes());
        data.extend_from_slice(&1_000i64.to_be_bytes());
        data.extend_from_slice(&250i64.to_be_bytes());
        data.extend_from_slice(&4i32.to_be_bytes());
        data.extend_from_slice(&3i16.to_be_bytes());
        data.extend_from_slice(&(-1i64).to_be_bytes());
        data.extend_from_slice(&(-1i64).to_be_bytes());

        let response = ListOffsetsCodec::new().decode_response(&data).unwrap();

        assert_eq!(response.correlation_id, 42);
        assert_eq!(response.topics.len(), 1);
        assert_eq!(response.topics[0].name, "orders");
        assert_eq!(
            response.topics[0].partitions,
            vec![
                ListOffsetsPartitionResponse {
                    partition_index: 3,
                    error_code: 0,
                    timestamp: 1_000,
                    offset: 250,
                },
                ListOffsetsPartitionResponse {
                    partition_index: 4,
                    error_code: 3,
                    timestamp: -1,
                    offset: -1,
                },
            ]
        );
    }

    #[test]
    fn test_decode_truncated_response() {
        let mut data = Vec::new();
        data.extend_from_slice(&42i32.to_be_bytes());
        data.extend_from_slice(&1i32.to_be_bytes());
        data.extend_from_slice(&6i16.to_be_bytes());
        data.extend_from_slice(b"ord");

        let result = ListOffsetsCodec::new().decode_response(&data);
        assert!(matches!(result, Err(ApplicationError::Protocol(_))));
    }
}
