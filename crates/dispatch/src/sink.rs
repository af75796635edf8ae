//! 싱크 trait과 구현 — 이벤트가 떠나는 좁은 경계
//!
//! 구조화 이벤트 스트림과 운영자 로그는 외부 협력자입니다. 여기서는
//! 그 경계만 trait으로 정의하고, 기본 배포에서 쓰는 구현을 함께
//! 제공합니다.

use std::future::Future;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::DispatchError;

/// 운영자 로그의 component 값
pub const COMPONENT_OOM: &str = "oom";

/// 운영자 로그의 기본 이벤트 레벨
pub const DEFAULT_LOGLEVEL: &str = "event";

/// 구조화 이벤트 스트림 싱크
///
/// 단일 라인 JSON 레코드를 이름 있는 스트림에 전달합니다.
pub trait EventStreamSink: Send + Sync + 'static {
    /// 한 레코드를 스트림에 기록합니다.
    fn publish(
        &self,
        stream: &str,
        line: &str,
    ) -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// 운영자 로그 레코드
///
/// (service, instance, component, cluster, level, message) 튜플로,
/// 서비스 단위 로깅 채널의 계약입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorLog {
    /// 소유 서비스
    pub service: String,
    /// 서비스 인스턴스
    pub instance: String,
    /// 로그 component (항상 "oom")
    pub component: &'static str,
    /// 클러스터
    pub cluster: String,
    /// 이벤트 레벨
    pub level: &'static str,
    /// 사람이 읽는 메시지
    pub message: String,
}

/// 운영자 로그 싱크
pub trait OperatorLogSink: Send + Sync + 'static {
    /// 레코드를 서비스 단위 로깅 채널로 전달합니다.
    fn log(&self, record: &OperatorLog)
    -> impl Future<Output = Result<(), DispatchError>> + Send;
}

/// 운영자용 OOM kill 메시지를 만듭니다.
///
/// `process_name`이 비어 있으면 "a process", 아니면
/// "a `<name>` process" 형태가 됩니다.
pub fn oom_kill_message(process_name: &str, hostname: &str, container_id: &str) -> String {
    let process = if process_name.is_empty() {
        "a process".to_owned()
    } else {
        format!("a {process_name} process")
    };
    format!("oom-killer killed {process} on {hostname} (container_id: {container_id}).")
}

/// 스풀 디렉토리 기반 이벤트 스트림 싱크
///
/// `<spool_dir>/<stream>.log`에 단일 라인 JSON을 덧붙입니다.
/// 호스트의 로그 포워더가 스풀을 하위 시스템으로 전송합니다.
pub struct SpoolStreamSink {
    spool_dir: PathBuf,
}

impl SpoolStreamSink {
    /// 스풀 디렉토리를 준비하고 싱크를 생성합니다.
    pub async fn new(spool_dir: impl Into<PathBuf>) -> Result<Self, DispatchError> {
        let spool_dir = spool_dir.into();
        tokio::fs::create_dir_all(&spool_dir)
            .await
            .map_err(|e| DispatchError::Sink {
                sink: "event_stream".to_owned(),
                reason: format!("failed to create spool dir {}: {e}", spool_dir.display()),
            })?;
        Ok(Self { spool_dir })
    }

    /// 스트림 이름에 해당하는 스풀 파일 경로를 반환합니다.
    pub fn stream_path(&self, stream: &str) -> PathBuf {
        self.spool_dir.join(format!("{stream}.log"))
    }
}

impl EventStreamSink for SpoolStreamSink {
    async fn publish(&self, stream: &str, line: &str) -> Result<(), DispatchError> {
        let path = self.stream_path(stream);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| DispatchError::Sink {
                sink: "event_stream".to_owned(),
                reason: format!("failed to open {}: {e}", path.display()),
            })?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| DispatchError::Sink {
                sink: "event_stream".to_owned(),
                reason: format!("write failed: {e}"),
            })?;
        file.write_all(b"\n")
            .await
            .map_err(|e| DispatchError::Sink {
                sink: "event_stream".to_owned(),
                reason: format!("write failed: {e}"),
            })?;
        Ok(())
    }
}

/// tracing 기반 운영자 로그 싱크
///
/// 여섯 필드를 모두 구조화 필드로 실어 기존 로깅 파이프라인이
/// service/instance로 라우팅할 수 있게 합니다.
#[derive(Debug, Default)]
pub struct TracingOperatorSink;

impl TracingOperatorSink {
    /// 새 싱크를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl OperatorLogSink for TracingOperatorSink {
    async fn log(&self, record: &OperatorLog) -> Result<(), DispatchError> {
        tracing::info!(
            service = %record.service,
            instance = %record.instance,
            component = record.component,
            cluster = %record.cluster,
            level = record.level,
            "{}",
            record.message,
        );
        Ok(())
    }
}

// --- 테스트용 Mock 싱크 ---

/// 전달된 레코드를 저장하는 mock 이벤트 스트림 싱크
#[cfg(test)]
#[derive(Default)]
pub struct MockEventSink {
    /// (stream, line) 기록
    pub published: std::sync::Mutex<Vec<(String, String)>>,
    /// publish 실패 시뮬레이션
    pub fail: bool,
}

#[cfg(test)]
impl MockEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            published: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[cfg(test)]
impl EventStreamSink for MockEventSink {
    async fn publish(&self, stream: &str, line: &str) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::Sink {
                sink: "event_stream".to_owned(),
                reason: "mock failure".to_owned(),
            });
        }
        self.published
            .lock()
            .expect("mock mutex poisoned")
            .push((stream.to_owned(), line.to_owned()));
        Ok(())
    }
}

/// 전달된 레코드를 저장하는 mock 운영자 로그 싱크
#[cfg(test)]
#[derive(Default)]
pub struct MockOperatorSink {
    /// 수신한 레코드
    pub records: std::sync::Mutex<Vec<OperatorLog>>,
    /// log 실패 시뮬레이션
    pub fail: bool,
}

#[cfg(test)]
impl MockOperatorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[cfg(test)]
impl OperatorLogSink for MockOperatorSink {
    async fn log(&self, record: &OperatorLog) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::Sink {
                sink: "operator_log".to_owned(),
                reason: "mock failure".to_owned(),
            });
        }
        self.records
            .lock()
            .expect("mock mutex poisoned")
            .push(record.clone());
        Ok(())
    }
}
