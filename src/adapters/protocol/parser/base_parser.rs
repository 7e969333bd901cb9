use bytes::{Buf, Bytes};
use crate::application::error::ApplicationError;
use super::traits::*;

/// 기본 파서 구현을 제공하는 구조체
#[derive(Debug, Default, Clone)]
pub struct BaseParser;

impl ByteParser for BaseParser {}

impl PrimitiveParser for BaseParser {
    fn parse_i16(&self, buf: &mut Bytes) -> Result<i16, ApplicationError> {
        self.ensure_remaining(buf, 2)?;
        Ok(buf.get_i16())
    }

    fn parse_i32(&self, buf: &mut Bytes) -> Result<i32, ApplicationError> {
        self.ensure_remaining(buf, 4)?;
        Ok(buf.get_i32())
    }

    fn parse_i64(&self, buf: &mut Bytes) -> Result<i64, ApplicationError> {
        self.ensure_remaining(buf, 8)?;
        Ok(buf.get_i64())
    }
}

impl StringParser for BaseParser {
    fn parse_string(&self, buf: &mut Bytes) -> Result<String, ApplicationError> {
        self.parse_nullable_string(buf)?
            .ok_or_else(|| ApplicationError::Protocol("unexpected null string".to_string()))
    }

    fn parse_nullable_string(&self, buf: &mut Bytes) -> Result<Option<String>, ApplicationError> {
        let len = self.parse_i16(buf)?;
        if len < 0 {
            return Ok(None);
        }
        let len = len as usize;

        self.ensure_remaining(buf, len)?;
        let bytes = buf.split_to(len);

        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|e| ApplicationError::Protocol(format!("invalid UTF-8 sequence: {}", e)))
    }
}

impl ArrayParser for BaseParser {
    fn parse_array<T, F>(&self, buf: &mut Bytes, mut parser: F) -> Result<Vec<T>, ApplicationError>
    where
        F: FnMut(&mut Bytes) -> Result<T, ApplicationError>,
    {
        let len = self.parse_i32(buf)?;
        if len < 0 {
            return Ok(Vec::new());
        }

        // 길이 필드를 믿고 미리 할당하지 않음
        let mut items = Vec::with_capacity((len as usize).min(buf.remaining()));
        for _ in 0..len {
            items.push(parser(buf)?);
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nullable_string() {
        let parser = BaseParser;
        let mut buf = Bytes::from_static(&[0x00, 0x03, b'a', b'b', b'c', 0xFF, 0xFF]);
        assert_eq!(parser.parse_nullable_string(&mut buf).unwrap(), Some("abc".to_string()));
        assert_eq!(parser.parse_nullable_string(&mut buf).unwrap(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_parse_string_too_short() {
        let parser = BaseParser;
        let mut buf = Bytes::from_static(&[0x00, 0x05, b'a']);
        let err = parser.parse_string(&mut buf).unwrap_err();
        assert!(matches!(err, ApplicationError::Protocol(msg) if msg.contains("need 5 bytes")));
    }

    #[test]
    fn test_parse_array() {
        let parser = BaseParser;
        let mut buf = Bytes::from_static(&[0, 0, 0, 2, 0, 7, 0, 9]);
        let items = parser.parse_array(&mut buf, |b| BaseParser.parse_i16(b)).unwrap();
        assert_eq!(items, vec![7, 9]);
    }
}
