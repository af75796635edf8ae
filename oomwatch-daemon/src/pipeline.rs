//! 메인 처리 루프 — 스캔, 해석, 전파를 잇는 상태 기계
//!
//! ```text
//! awaiting-line -> occurrence-detected -> resolving-metadata -> dispatching -+
//!       ^                                                                   |
//!       +-------------------------------------------------------------------+
//! ```
//!
//! 한 이벤트가 완전히 해석/전파된 뒤에야 다음 라인을 읽습니다.
//! resolver 실패는 해당 이벤트만 버리고 루프를 계속합니다 — 정상 처리
//! 중에는 도달 가능한 치명 상태가 없고, 입력 소진 시 깨끗하게
//! 종료합니다.

use metrics::counter;
use tokio::io::AsyncBufRead;
use tracing::{debug, info, warn};

use oomwatch_core::metrics::{LABEL_BACKEND, RESOLVER_FAILURES_TOTAL};
use oomwatch_dispatch::{EventStreamSink, OomDispatcher, OperatorLogSink, PoolResolver, enrich};
use oomwatch_runtime::EnvResolver;
use oomwatch_scanner::OomScanner;

/// 루프 종료 시의 처리 요약
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// 읽은 라인 수
    pub lines_seen: u64,
    /// 인식된 OOM 발생 수
    pub events_seen: u64,
    /// 세 싱크에 전파된 이벤트 수
    pub events_dispatched: u64,
    /// resolver 실패로 버린 이벤트 수
    pub events_dropped: u64,
}

/// 입력이 소진될 때까지 파이프라인을 실행합니다.
///
/// 백엔드는 시작 시 한 번 선택되어 전달되며, 이 함수는 백엔드를
/// 바꾸지 않습니다.
pub async fn run<S, R, E, O, P>(
    mut scanner: OomScanner<S>,
    resolver: &R,
    cluster: &str,
    dispatcher: &OomDispatcher<E, O, P>,
) -> PipelineReport
where
    S: AsyncBufRead + Unpin,
    R: EnvResolver,
    E: EventStreamSink,
    O: OperatorLogSink,
    P: PoolResolver,
{
    let mut events_dispatched = 0u64;
    let mut events_dropped = 0u64;

    while let Some(event) = scanner.next_event().await {
        debug!(%event, "occurrence detected, resolving container metadata");

        let env = match resolver.container_env(&event.container_id).await {
            Ok(env) => env,
            Err(e) => {
                counter!(RESOLVER_FAILURES_TOTAL, LABEL_BACKEND => resolver.backend_name())
                    .increment(1);
                warn!(
                    container_id = %event.container_id,
                    backend = resolver.backend_name(),
                    error = %e,
                    "failed to resolve container environment, dropping event"
                );
                events_dropped += 1;
                continue;
            }
        };

        let line = enrich(event, cluster, &env);
        dispatcher.dispatch(&line).await;
        events_dispatched += 1;
    }

    info!(
        dispatched = events_dispatched,
        dropped = events_dropped,
        "input stream ended"
    );

    PipelineReport {
        lines_seen: scanner.lines_seen(),
        events_seen: scanner.events_emitted(),
        events_dispatched,
        events_dropped,
    }
}
