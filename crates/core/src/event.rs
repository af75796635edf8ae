//! 이벤트 타입 — 파이프라인을 흐르는 두 가지 레코드
//!
//! [`OomEvent`]는 스캐너가 커널 로그에서 인식한 OOM kill 발생을 나타내며,
//! 런타임 메타데이터 해석을 거쳐 [`LogLine`]으로 완성됩니다.
//! `LogLine`은 이벤트 스트림에 기록되는 최종 와이어 레코드입니다.

use std::fmt;

use serde::Serialize;

/// 스캐너가 인식한 OOM kill 발생
///
/// 커널 로그 라인에서 추출한 원시 정보만 담습니다.
/// 컨테이너 런타임 조회를 거치기 전의 일시적인 레코드이며,
/// 메인 루프에서 즉시 소비됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OomEvent {
    /// 발생 시각 (Unix epoch 초, 로그 라인에서 그대로 가져옴)
    pub timestamp: i64,
    /// 로그를 발생시킨 호스트명
    pub hostname: String,
    /// 컨테이너 short id (docker 계열 12자, containerd 계열 최대 64자 hex)
    pub container_id: String,
    /// 직전 "invoked oom-killer" 라인의 프로세스명 (없으면 빈 문자열)
    pub process_name: String,
}

impl fmt::Display for OomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OomEvent[{}] host={} container={} process={}",
            self.timestamp,
            self.hostname,
            self.container_id,
            if self.process_name.is_empty() {
                "-"
            } else {
                &self.process_name
            },
        )
    }
}

/// 이벤트 스트림에 기록되는 최종 레코드
///
/// 정확히 아홉 개 필드로 구성되며, JSON 직렬화 시 필드 순서는
/// 선언 순서 그대로 유지됩니다 (`timestamp`만 숫자, 나머지는 문자열).
/// 발생 이벤트마다 한 번 생성되어 싱크에 전달된 뒤 폐기됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    /// 발생 시각 (Unix epoch 초)
    pub timestamp: i64,
    /// 호스트명
    pub hostname: String,
    /// 컨테이너 short id
    pub container_id: String,
    /// 클러스터 식별자 (프로세스 수명 동안 상수)
    pub cluster: String,
    /// 소유 서비스 (환경변수에 없으면 "unknown")
    pub service: String,
    /// 서비스 인스턴스 (환경변수에 없으면 "unknown")
    pub instance: String,
    /// OOM killer를 호출한 프로세스명 (없으면 빈 문자열)
    pub process_name: String,
    /// 레거시 스케줄러 컨테이너 id (없으면 "mesos-null")
    pub mesos_container_id: String,
    /// 메모리 제한 (환경변수에 없으면 "unknown")
    pub mem_limit: String,
}

impl LogLine {
    /// 단일 라인 JSON으로 직렬화합니다.
    ///
    /// 필드 순서는 구조체 선언 순서를 따릅니다.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LogLine[{}] {}/{} host={} container={}",
            self.timestamp, self.service, self.instance, self.hostname, self.container_id,
        )
    }
}
