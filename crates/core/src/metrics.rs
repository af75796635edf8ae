//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `oomwatch_`
//! - 접미어: `_total` (counter)
//!
//! 서비스 단위 OOM 카운터의 레이블 키(`paasta_*`)는 기존 메트릭 소비자와의
//! 호환을 위해 원래 이름을 유지합니다.

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 클러스터 레이블 키
pub const LABEL_CLUSTER: &str = "paasta_cluster";

/// 서비스 레이블 키
pub const LABEL_SERVICE: &str = "paasta_service";

/// 인스턴스 레이블 키
pub const LABEL_INSTANCE: &str = "paasta_instance";

/// 스케줄링 풀 레이블 키
pub const LABEL_POOL: &str = "paasta_pool";

/// 로그 레이아웃 레이블 키 (docker, kubernetes, ...)
pub const LABEL_LAYOUT: &str = "layout";

/// 런타임 백엔드 레이블 키 (docker, containerd)
pub const LABEL_BACKEND: &str = "backend";

/// 싱크 레이블 키 (event_stream, operator_log, metrics)
pub const LABEL_SINK: &str = "sink";

// ─── Scanner 메트릭 ─────────────────────────────────────────────────

/// Scanner: 읽은 전체 로그 라인 수 (counter)
pub const SCANNER_LINES_TOTAL: &str = "oomwatch_scanner_lines_total";

/// Scanner: 인식된 OOM 발생 수 (counter, label: layout)
pub const SCANNER_EVENTS_TOTAL: &str = "oomwatch_scanner_events_total";

// ─── Resolver 메트릭 ────────────────────────────────────────────────

/// Resolver: 컨테이너 환경 조회 실패 수 (counter, label: backend)
pub const RESOLVER_FAILURES_TOTAL: &str = "oomwatch_resolver_failures_total";

// ─── Dispatch 메트릭 ────────────────────────────────────────────────

/// Dispatch: 완전히 전파된 이벤트 수 (counter)
pub const DISPATCHED_EVENTS_TOTAL: &str = "oomwatch_dispatched_events_total";

/// Dispatch: 싱크별 전파 실패 수 (counter, label: sink)
pub const DISPATCH_FAILURES_TOTAL: &str = "oomwatch_dispatch_failures_total";

// ─── 서비스 단위 OOM 메트릭 ─────────────────────────────────────────
// labels: paasta_cluster, paasta_service, paasta_instance, paasta_pool

/// 서비스별 OOM 이벤트 (discrete event, counter)
pub const OOM_EVENTS_TOTAL: &str = "oomwatch_oom_events_total";

/// 서비스별 OOM kill 횟수 (counter)
pub const OOM_KILLS_TOTAL: &str = "oomwatch_oom_kills_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`를 호출하여 Prometheus HELP 텍스트를
/// 설정합니다. 전역 레코더 설치 후 한 번만 호출해야 하며, 일반적으로
/// `oomwatch-daemon`의 시작 시점에서 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        SCANNER_LINES_TOTAL,
        "Total number of syslog lines read from the input stream"
    );
    describe_counter!(
        SCANNER_EVENTS_TOTAL,
        "Total number of OOM kill occurrences recognized, per log layout"
    );
    describe_counter!(
        RESOLVER_FAILURES_TOTAL,
        "Total number of failed container environment lookups, per backend"
    );
    describe_counter!(
        DISPATCHED_EVENTS_TOTAL,
        "Total number of OOM events dispatched to all sinks"
    );
    describe_counter!(
        DISPATCH_FAILURES_TOTAL,
        "Total number of sink delivery failures, per sink"
    );
    describe_counter!(
        OOM_EVENTS_TOTAL,
        "Per-service OOM events with cluster/service/instance/pool labels"
    );
    describe_counter!(
        OOM_KILLS_TOTAL,
        "Per-service OOM kill count with cluster/service/instance/pool labels"
    );
}
