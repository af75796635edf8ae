//! 이벤트 보강 — 환경변수 맵을 도메인 속성으로 매핑합니다.
//!
//! 컨테이너의 선언된 환경변수에서 소유 서비스/인스턴스/메모리 제한을
//! 읽어 최종 레코드를 만듭니다. 변수가 없으면 각 속성의 고정 기본값이
//! 사용됩니다 — 보강은 실패하지 않습니다.

use std::collections::HashMap;

use oomwatch_core::event::{LogLine, OomEvent};

/// 소유 서비스명 환경변수
pub const ENV_SERVICE: &str = "PAASTA_SERVICE";

/// 서비스 인스턴스명 환경변수
pub const ENV_INSTANCE: &str = "PAASTA_INSTANCE";

/// 레거시 스케줄러 컨테이너명 환경변수
pub const ENV_MESOS_CONTAINER_NAME: &str = "MESOS_CONTAINER_NAME";

/// 메모리 제한 환경변수
pub const ENV_MEM_LIMIT: &str = "PAASTA_RESOURCE_MEM";

/// 서비스 기본값
pub const DEFAULT_SERVICE: &str = "unknown";

/// 인스턴스 기본값
pub const DEFAULT_INSTANCE: &str = "unknown";

/// 레거시 컨테이너 id 기본값 — 비레거시 스케줄러에서도 항상 채워짐
pub const DEFAULT_MESOS_CONTAINER_ID: &str = "mesos-null";

/// 메모리 제한 기본값
pub const DEFAULT_MEM_LIMIT: &str = "unknown";

/// OOM 발생과 환경변수 맵으로 최종 레코드를 만듭니다.
///
/// `cluster`는 프로세스 전역 설정값으로 모든 레코드에 동일하게
/// 들어갑니다.
pub fn enrich(event: OomEvent, cluster: &str, env: &HashMap<String, String>) -> LogLine {
    let lookup = |key: &str, default: &str| {
        env.get(key)
            .cloned()
            .unwrap_or_else(|| default.to_owned())
    };

    LogLine {
        timestamp: event.timestamp,
        hostname: event.hostname,
        container_id: event.container_id,
        cluster: cluster.to_owned(),
        service: lookup(ENV_SERVICE, DEFAULT_SERVICE),
        instance: lookup(ENV_INSTANCE, DEFAULT_INSTANCE),
        process_name: event.process_name,
        mesos_container_id: lookup(ENV_MESOS_CONTAINER_NAME, DEFAULT_MESOS_CONTAINER_ID),
        mem_limit: lookup(ENV_MEM_LIMIT, DEFAULT_MEM_LIMIT),
    }
}
