/// ListOffsets API의 키 값
/// 파티션별 earliest / latest / timestamp 오프셋 조회에 사용함
pub const LIST_OFFSETS_KEY: i16 = 2;

/// v1부터 파티션당 단일 오프셋 + 타임스탬프를 반환함
pub const LIST_OFFSETS_VERSION: i16 = 1;

/// 일반 컨슈머 요청의 replica id
pub const CONSUMER_REPLICA_ID: i32 = -1;

/// ListOffsets 특수 타임스탬프
pub const LATEST_TIMESTAMP: i64 = -1;
pub const EARLIEST_TIMESTAMP: i64 = -2;

/// 조회 결과가 없을 때 브로커가 돌려주는 오프셋
pub const UNKNOWN_OFFSET: i64 = -1;
