//! 전파 에러 타입
//!
//! 싱크별 실패는 [`OomDispatcher`](crate::dispatcher::OomDispatcher)가
//! 개별적으로 격리하므로, 이 에러들은 이벤트 전체를 실패시키지 않습니다.

use oomwatch_core::error::OomwatchError;

/// 전파 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// 레코드 직렬화 실패
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 싱크 쓰기 실패
    #[error("sink error: {sink}: {reason}")]
    Sink {
        /// 싱크 이름 (event_stream, operator_log)
        sink: String,
        /// 실패 사유
        reason: String,
    },

    /// 서비스 메타데이터 조회 실패
    #[error("metadata error: service '{service}': {reason}")]
    Metadata {
        /// 조회 대상 서비스
        service: String,
        /// 실패 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DispatchError> for OomwatchError {
    fn from(err: DispatchError) -> Self {
        OomwatchError::Dispatch(err.to_string())
    }
}
