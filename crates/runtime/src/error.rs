//! 런타임 조회 에러 타입
//!
//! [`RuntimeError`]는 컨테이너 환경 조회 중 발생하는 모든 에러를
//! 표현합니다. 메인 루프는 이 에러를 받으면 해당 이벤트만 버리고
//! 계속 진행합니다 — 조회 시점에는 컨테이너가 이미 사라졌을 수 있으므로
//! 재시도하지 않습니다.

use oomwatch_core::error::OomwatchError;

/// 컨테이너 런타임 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// 유효하지 않은 컨테이너 id
    #[error("invalid container id: {0}")]
    InvalidId(String),

    /// 백엔드 연결 실패
    #[error("connection failed: {0}")]
    Connection(String),

    /// Docker API 에러
    #[error("docker api error: {0}")]
    Api(String),

    /// 컨테이너를 찾을 수 없음
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// containerd RPC 에러
    #[error("containerd rpc error: {0}")]
    Rpc(String),

    /// 컨테이너 스펙 디코딩 실패
    #[error("spec decode error: {0}")]
    SpecDecode(String),
}

impl From<RuntimeError> for OomwatchError {
    fn from(err: RuntimeError) -> Self {
        OomwatchError::Runtime(err.to_string())
    }
}
