#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`enrich`]: 환경변수 맵 -> `LogLine` 매핑
//! - [`sink`]: 이벤트 스트림/운영자 로그 싱크 trait과 구현
//! - [`pool`]: 스케줄링 풀 조회 (`PoolResolver`, `SoaDirPools`)
//! - [`dispatcher`]: 세 싱크로의 순서 있는 fan-out
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! (OomEvent, env map) -> enrich -> LogLine -> OomDispatcher
//!                                                |
//!                               1. EventStreamSink (JSON line)
//!                               2. OperatorLogSink (사람이 읽는 문장)
//!                               3. metrics (옵션, pool 레이블 포함)
//! ```

pub mod dispatcher;
pub mod enrich;
pub mod error;
pub mod pool;
pub mod sink;

// --- 주요 타입 re-export ---

// Dispatcher
pub use dispatcher::{MetricsEmitter, OomDispatcher};

// 보강
pub use enrich::enrich;

// 싱크
pub use sink::{
    EventStreamSink, OperatorLog, OperatorLogSink, SpoolStreamSink, TracingOperatorSink,
};

// 풀 조회
pub use pool::{PoolResolver, SoaDirPools};

// 에러
pub use error::DispatchError;
