//! 에러 타입 — 도메인별 에러 정의

/// oomwatch 최상위 에러 타입
///
/// 각 도메인 크레이트는 자체 에러 타입을 정의하고
/// `From` 변환으로 이 타입에 합류시킵니다.
#[derive(Debug, thiserror::Error)]
pub enum OomwatchError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 스캔 에러
    #[error("scan error: {0}")]
    Scan(String),

    /// 컨테이너 런타임 조회 에러
    #[error("runtime error: {0}")]
    Runtime(String),

    /// 이벤트 전파 에러
    #[error("dispatch error: {0}")]
    Dispatch(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
