//! Runtime backend abstraction for testability.
//!
//! The [`EnvResolver`] trait models one capability: "resolve the declared
//! environment for a container id". Production code selects exactly one of
//! [`DockerEnvResolver`](crate::docker::DockerEnvResolver) or
//! [`ContainerdEnvResolver`](crate::containerd::ContainerdEnvResolver) at
//! startup, while tests use `MockEnvResolver`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │  Main Loop   │
//! └──────┬───────┘
//!        │
//!        ▼
//!  ┌───────────┐
//!  │EnvResolver│ (trait)
//!  └───────────┘
//!     │      │
//!     ▼      ▼
//! ┌──────┐ ┌──────────┐
//! │Docker│ │containerd│
//! └──────┘ └──────────┘
//! ```
//!
//! # Container ID Validation
//!
//! All implementations validate ids before touching the backend:
//! - Must be 1-64 characters
//! - Must contain only ASCII hex digits ([0-9a-fA-F])

use std::collections::HashMap;
use std::future::Future;

use crate::error::RuntimeError;

/// Validates a container ID before a backend call.
///
/// Container ids are 64-character hex strings (or shorter prefix forms, 12
/// characters for the docker layouts). The recognizers only capture `\w`
/// runs, so anything else reaching this point is hostile or corrupt input.
pub fn validate_container_id(id: &str) -> Result<(), RuntimeError> {
    if id.is_empty() || id.len() > 64 {
        return Err(RuntimeError::InvalidId(format!(
            "length {} (must be 1-64)",
            id.len()
        )));
    }
    if !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(RuntimeError::InvalidId(
            "contains non-hex characters".to_owned(),
        ));
    }
    Ok(())
}

/// Trait abstracting container environment lookup.
///
/// The trait is `Send + Sync + 'static`, allowing safe sharing across async
/// contexts. Exactly one implementation is chosen at startup and kept for
/// the life of the process; there is no automatic fallback between backends.
pub trait EnvResolver: Send + Sync + 'static {
    /// Backend name for logging and metric labels ("docker", "containerd").
    fn backend_name(&self) -> &'static str;

    /// Resolves the declared environment for a container id.
    ///
    /// An absent or null config section yields an empty map, not an error.
    ///
    /// # Errors
    ///
    /// - `RuntimeError::InvalidId`: id failed validation
    /// - `RuntimeError::ContainerNotFound`: backend no longer knows the id
    /// - `RuntimeError::Api` / `RuntimeError::Rpc`: backend-reported failure
    /// - `RuntimeError::SpecDecode`: malformed containerd spec payload
    fn container_env(
        &self,
        container_id: &str,
    ) -> impl Future<Output = Result<HashMap<String, String>, RuntimeError>> + Send;

    /// Checks backend connectivity, used for a startup diagnostic only.
    fn ping(&self) -> impl Future<Output = Result<(), RuntimeError>> + Send;
}

/// 테스트용 Mock resolver
///
/// 설정 가능한 응답을 반환하여 런타임 데몬 없이도 테스트할 수 있습니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockEnvResolver {
    /// 컨테이너 id -> 환경변수 맵
    pub containers: HashMap<String, HashMap<String, String>>,
    /// 조회 실패를 시뮬레이션할지 여부
    pub fail_lookups: bool,
}

#[cfg(test)]
impl MockEnvResolver {
    /// 빈 mock resolver를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 테스트용 컨테이너 환경을 추가합니다.
    pub fn with_container(mut self, id: &str, env: &[(&str, &str)]) -> Self {
        self.containers.insert(
            id.to_owned(),
            env.iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        );
        self
    }

    /// 조회가 실패하도록 설정합니다.
    pub fn with_failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }
}

#[cfg(test)]
impl EnvResolver for MockEnvResolver {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn container_env(
        &self,
        container_id: &str,
    ) -> Result<HashMap<String, String>, RuntimeError> {
        validate_container_id(container_id)?;
        if self.fail_lookups {
            return Err(RuntimeError::Api("mock failure".to_owned()));
        }
        self.containers
            .get(container_id)
            .cloned()
            .ok_or_else(|| RuntimeError::ContainerNotFound(container_id.to_owned()))
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        Ok(())
    }
}
