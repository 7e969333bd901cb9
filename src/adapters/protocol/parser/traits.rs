use bytes::{Buf, Bytes};
use crate::application::error::ApplicationError;

/// 바이트 스트림으로부터 데이터를 파싱하는 trait
pub trait ByteParser {
    /// 남은 바이트가 충분한지 확인
    fn ensure_remaining(&self, buf: &Bytes, required: usize) -> Result<(), ApplicationError> {
        if buf.remaining() < required {
            return Err(ApplicationError::Protocol(format!(
                "buffer too short: need {} bytes but has {}",
                required,
                buf.remaining()
            )));
        }
        Ok(())
    }
}

/// 기본 정수 타입 파싱
pub trait PrimitiveParser: ByteParser {
    fn parse_i16(&self, buf: &mut Bytes) -> Result<i16, ApplicationError>;
    fn parse_i32(&self, buf: &mut Bytes) -> Result<i32, ApplicationError>;
    fn parse_i64(&self, buf: &mut Bytes) -> Result<i64, ApplicationError>;
}

/// i16 길이 접두 문자열 (STRING / NULLABLE_STRING)
pub trait StringParser: ByteParser {
    fn parse_string(&self, buf: &mut Bytes) -> Result<String, ApplicationError>;
    fn parse_nullable_string(&self, buf: &mut Bytes) -> Result<Option<String>, ApplicationError>;
}

/// i32 개수 접두 배열 (ARRAY)
pub trait ArrayParser: ByteParser {
    fn parse_array<T, F>(&self, buf: &mut Bytes, parser: F) -> Result<Vec<T>, ApplicationError>
    where
        F: FnMut(&mut Bytes) -> Result<T, ApplicationError>;
}
