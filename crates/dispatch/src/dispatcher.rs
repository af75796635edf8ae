//! 이벤트 fan-out — 세 싱크로의 순서 있는 전파
//!
//! [`OomDispatcher`]는 최종 레코드를 (1) 구조화 이벤트 스트림,
//! (2) 운영자 로그, (3) 메트릭 순서로 전달합니다. 각 싱크는 독립
//! 실패 도메인입니다: 하나의 실패는 진단 로그와 실패 카운터만 남기고
//! 나머지 싱크 전달을 막지 않습니다.

use metrics::counter;

use oomwatch_core::event::LogLine;
use oomwatch_core::metrics::{
    DISPATCH_FAILURES_TOTAL, DISPATCHED_EVENTS_TOTAL, LABEL_CLUSTER, LABEL_INSTANCE, LABEL_POOL,
    LABEL_SERVICE, LABEL_SINK, OOM_EVENTS_TOTAL, OOM_KILLS_TOTAL,
};

use crate::error::DispatchError;
use crate::pool::PoolResolver;
use crate::sink::{
    COMPONENT_OOM, DEFAULT_LOGLEVEL, EventStreamSink, OperatorLog, OperatorLogSink,
    oom_kill_message,
};

/// 서비스 단위 OOM 메트릭 방출기
///
/// 풀을 조회한 뒤 discrete 이벤트와 카운터를 하나씩,
/// {cluster, service, instance, pool} 레이블로 방출합니다.
pub struct MetricsEmitter<P: PoolResolver> {
    pools: P,
}

impl<P: PoolResolver> MetricsEmitter<P> {
    /// 새 방출기를 생성합니다.
    pub fn new(pools: P) -> Self {
        Self { pools }
    }

    /// 레코드 하나에 대한 메트릭을 방출합니다.
    async fn emit(&self, line: &LogLine) -> Result<(), DispatchError> {
        let pool = self.pools.pool(&line.service, &line.instance).await?;
        let labels = [
            (LABEL_CLUSTER, line.cluster.clone()),
            (LABEL_SERVICE, line.service.clone()),
            (LABEL_INSTANCE, line.instance.clone()),
            (LABEL_POOL, pool),
        ];
        counter!(OOM_EVENTS_TOTAL, &labels).increment(1);
        counter!(OOM_KILLS_TOTAL, &labels).increment(1);
        Ok(())
    }
}

/// 이벤트 디스패처
///
/// 메트릭 방출기는 선택 사항입니다 — 최소 배포에서는 `None`이며,
/// 그 경우 메트릭 단계 전체가 no-op입니다 (실패가 아님).
pub struct OomDispatcher<E, O, P>
where
    E: EventStreamSink,
    O: OperatorLogSink,
    P: PoolResolver,
{
    /// 구조화 이벤트가 기록되는 스트림 이름
    stream: String,
    /// 구조화 이벤트 싱크
    events: E,
    /// 운영자 로그 싱크
    operator: O,
    /// 메트릭 방출기 (옵션)
    metrics: Option<MetricsEmitter<P>>,
}

impl<E, O, P> OomDispatcher<E, O, P>
where
    E: EventStreamSink,
    O: OperatorLogSink,
    P: PoolResolver,
{
    /// 새 디스패처를 생성합니다.
    pub fn new(
        stream: impl Into<String>,
        events: E,
        operator: O,
        metrics: Option<MetricsEmitter<P>>,
    ) -> Self {
        Self {
            stream: stream.into(),
            events,
            operator,
            metrics,
        }
    }

    /// 레코드 하나를 세 싱크에 순서대로 전파합니다.
    ///
    /// 어떤 싱크가 실패해도 나머지 싱크 전달은 계속됩니다.
    pub async fn dispatch(&self, line: &LogLine) {
        // 1. 구조화 이벤트 스트림
        match line.to_json() {
            Ok(json) => {
                if let Err(e) = self.events.publish(&self.stream, &json).await {
                    counter!(DISPATCH_FAILURES_TOTAL, LABEL_SINK => "event_stream").increment(1);
                    tracing::error!(
                        stream = %self.stream,
                        error = %e,
                        "failed to publish structured event"
                    );
                }
            }
            Err(e) => {
                counter!(DISPATCH_FAILURES_TOTAL, LABEL_SINK => "event_stream").increment(1);
                tracing::error!(error = %e, "failed to serialize event record");
            }
        }

        // 2. 운영자 로그
        let record = OperatorLog {
            service: line.service.clone(),
            instance: line.instance.clone(),
            component: COMPONENT_OOM,
            cluster: line.cluster.clone(),
            level: DEFAULT_LOGLEVEL,
            message: oom_kill_message(&line.process_name, &line.hostname, &line.container_id),
        };
        if let Err(e) = self.operator.log(&record).await {
            counter!(DISPATCH_FAILURES_TOTAL, LABEL_SINK => "operator_log").increment(1);
            tracing::error!(error = %e, "failed to write operator log");
        }

        // 3. 메트릭 (옵션)
        if let Some(emitter) = &self.metrics {
            if let Err(e) = emitter.emit(line).await {
                counter!(DISPATCH_FAILURES_TOTAL, LABEL_SINK => "metrics").increment(1);
                tracing::warn!(
                    service = %line.service,
                    instance = %line.instance,
                    error = %e,
                    "failed to emit oom metrics"
                );
            }
        }

        counter!(DISPATCHED_EVENTS_TOTAL).increment(1);
    }

    /// 스트림 이름을 반환합니다.
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// 메트릭 방출기 존재 여부를 반환합니다.
    pub fn metrics_enabled(&self) -> bool {
        self.metrics.is_some()
    }
}
