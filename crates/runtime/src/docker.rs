//! Docker 엔진 백엔드
//!
//! 로컬 Docker 데몬의 inspect API를 통해 컨테이너의 `Config.Env`를
//! 읽습니다. 연결은 Unix 소켓 기준이며 프로세스 수명 동안 유지됩니다.

use std::collections::HashMap;
use std::sync::Arc;

use crate::env::parse_env_list;
use crate::error::RuntimeError;
use crate::resolver::{EnvResolver, validate_container_id};

/// Docker 엔진 기반 환경 resolver
///
/// 내부적으로 `Arc<bollard::Docker>`를 사용하여 비동기 컨텍스트 간
/// 안전하게 공유합니다.
///
/// # 연결 관리
///
/// - 연결 타임아웃: 120초
/// - API 버전: 기본 (자동 협상)
/// - 소켓 경로: 설정 가능 (기본 `/var/run/docker.sock`)
pub struct DockerEnvResolver {
    docker: Arc<bollard::Docker>,
}

impl DockerEnvResolver {
    /// 플랫폼 기본 로컬 소켓으로 Docker에 연결합니다.
    ///
    /// # Errors
    ///
    /// 연결 실패 시 `RuntimeError::Connection`을 반환합니다
    /// (소켓 없음, 권한 거부, 데몬 미실행 등).
    pub fn connect_local() -> Result<Self, RuntimeError> {
        let docker = bollard::Docker::connect_with_local_defaults().map_err(|e| {
            RuntimeError::Connection(format!("failed to connect to docker: {e}"))
        })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }

    /// 지정한 소켓 경로로 Docker에 연결합니다.
    pub fn connect_with_socket(socket_path: &str) -> Result<Self, RuntimeError> {
        let docker =
            bollard::Docker::connect_with_socket(socket_path, 120, bollard::API_DEFAULT_VERSION)
                .map_err(|e| {
                    RuntimeError::Connection(format!(
                        "failed to connect to docker at {socket_path}: {e}"
                    ))
                })?;
        Ok(Self {
            docker: Arc::new(docker),
        })
    }
}

impl EnvResolver for DockerEnvResolver {
    fn backend_name(&self) -> &'static str {
        "docker"
    }

    async fn container_env(
        &self,
        container_id: &str,
    ) -> Result<HashMap<String, String>, RuntimeError> {
        validate_container_id(container_id)?;

        let details = self
            .docker
            .inspect_container(container_id, None)
            .await
            .map_err(|e| {
                if e.to_string().contains("404") {
                    RuntimeError::ContainerNotFound(container_id.to_owned())
                } else {
                    RuntimeError::Api(format!("inspect container failed: {e}"))
                }
            })?;

        // Config 또는 Env가 없는 컨테이너는 빈 맵
        let env_list = details.config.and_then(|c| c.env).unwrap_or_default();
        let env = parse_env_list(env_list);
        tracing::debug!(
            container_id,
            vars = env.len(),
            "resolved container environment via docker"
        );
        Ok(env)
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        self.docker
            .ping()
            .await
            .map_err(|e| RuntimeError::Connection(format!("docker ping failed: {e}")))?;
        Ok(())
    }
}
