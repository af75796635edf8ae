//! 스캐너 에러 타입
//!
//! [`ScanError`]는 스캐너 구성 단계에서만 발생합니다.
//! 스캔 자체는 실패하지 않습니다 — 인식되지 않는 라인은 건너뛰고,
//! 입력 종료는 시퀀스의 끝일 뿐 에러가 아닙니다.

use oomwatch_core::error::OomwatchError;

/// 스캐너 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<ScanError> for OomwatchError {
    fn from(err: ScanError) -> Self {
        OomwatchError::Scan(err.to_string())
    }
}
