//! 스케줄링 풀 조회
//!
//! 메트릭 레이블에 들어가는 풀은 서비스 인스턴스 설정에서 옵니다.
//! [`SoaDirPools`]는 `<soa_dir>/<service>.yaml`의
//! `instances.<instance>.pool` 값을 읽습니다. 설정이 없으면 기본 풀을
//! 사용합니다 — 풀 조회 부재는 메트릭 단계만 기본값으로 진행시킬 뿐
//! 이벤트 전파를 막지 않습니다.

use std::future::Future;
use std::path::PathBuf;

use crate::error::DispatchError;

/// 풀을 알 수 없을 때의 기본값
pub const DEFAULT_POOL: &str = "default";

/// 서비스 인스턴스의 스케줄링 풀 조회
pub trait PoolResolver: Send + Sync + 'static {
    /// (service, instance)의 풀 이름을 반환합니다.
    fn pool(
        &self,
        service: &str,
        instance: &str,
    ) -> impl Future<Output = Result<String, DispatchError>> + Send;
}

/// SOA 설정 디렉토리 기반 풀 조회
///
/// 파일 형식 (서비스당 하나):
///
/// ```yaml
/// instances:
///   main:
///     pool: default
///   canary:
///     pool: canary-pool
/// ```
pub struct SoaDirPools {
    soa_dir: PathBuf,
}

impl SoaDirPools {
    /// 새 풀 조회기를 생성합니다.
    pub fn new(soa_dir: impl Into<PathBuf>) -> Self {
        Self {
            soa_dir: soa_dir.into(),
        }
    }
}

impl PoolResolver for SoaDirPools {
    async fn pool(&self, service: &str, instance: &str) -> Result<String, DispatchError> {
        // 서비스명은 컨테이너 환경변수에서 오므로 경로로 쓰기 전에 거른다
        if service.is_empty() || service.starts_with('.') || service.contains(['/', '\\']) {
            tracing::debug!(service, "service name unusable as soa path, using default pool");
            return Ok(DEFAULT_POOL.to_owned());
        }

        let path = self.soa_dir.join(format!("{service}.yaml"));
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(DEFAULT_POOL.to_owned());
            }
            Err(e) => {
                return Err(DispatchError::Metadata {
                    service: service.to_owned(),
                    reason: format!("failed to read {}: {e}", path.display()),
                });
            }
        };

        let doc: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| DispatchError::Metadata {
                service: service.to_owned(),
                reason: format!("invalid yaml in {}: {e}", path.display()),
            })?;

        Ok(doc
            .get("instances")
            .and_then(|instances| instances.get(instance))
            .and_then(|instance| instance.get("pool"))
            .and_then(|pool| pool.as_str())
            .unwrap_or(DEFAULT_POOL)
            .to_owned())
    }
}
