//! 설정 관리 — oomwatch.toml 파싱 및 런타임 설정
//!
//! [`OomwatchConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`OOMWATCH_RUNTIME_BACKEND=containerd` 형식)
//! 3. 설정 파일 (`oomwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), oomwatch_core::error::OomwatchError> {
//! use oomwatch_core::config::OomwatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = OomwatchConfig::load("oomwatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = OomwatchConfig::parse("[cluster]\nname = \"norcal-devc\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, OomwatchError};

/// oomwatch 통합 설정
///
/// `oomwatch.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 크레이트는 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OomwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 클러스터 설정
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// 컨테이너 런타임 설정
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// 이벤트 스트림 설정
    #[serde(default)]
    pub events: EventStreamConfig,
    /// 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl OomwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, OomwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, OomwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OomwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                OomwatchError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, OomwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            OomwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `OOMWATCH_{SECTION}_{FIELD}`
    /// 예: `OOMWATCH_CLUSTER_NAME=norcal-prod`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "OOMWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "OOMWATCH_GENERAL_LOG_FORMAT");

        // Cluster
        override_string(&mut self.cluster.name, "OOMWATCH_CLUSTER_NAME");

        // Runtime
        override_string(&mut self.runtime.backend, "OOMWATCH_RUNTIME_BACKEND");
        override_string(
            &mut self.runtime.docker_socket,
            "OOMWATCH_RUNTIME_DOCKER_SOCKET",
        );
        override_string(
            &mut self.runtime.containerd_socket,
            "OOMWATCH_RUNTIME_CONTAINERD_SOCKET",
        );
        override_string(
            &mut self.runtime.containerd_namespace,
            "OOMWATCH_RUNTIME_CONTAINERD_NAMESPACE",
        );

        // Events
        override_string(&mut self.events.stream, "OOMWATCH_EVENTS_STREAM");
        override_string(&mut self.events.spool_dir, "OOMWATCH_EVENTS_SPOOL_DIR");

        // Metrics
        override_bool(&mut self.metrics.enabled, "OOMWATCH_METRICS_ENABLED");
        override_string(&mut self.metrics.listen_addr, "OOMWATCH_METRICS_LISTEN_ADDR");
        override_u16(&mut self.metrics.port, "OOMWATCH_METRICS_PORT");
        override_string(&mut self.metrics.soa_dir, "OOMWATCH_METRICS_SOA_DIR");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), OomwatchError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // runtime.backend 검증
        let valid_backends = ["docker", "containerd"];
        if !valid_backends.contains(&self.runtime.backend.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "runtime.backend".to_owned(),
                reason: format!("must be one of: {}", valid_backends.join(", ")),
            }
            .into());
        }

        // 이벤트 스트림 이름 검증
        if self.events.stream.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "events.stream".to_owned(),
                reason: "stream name must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

// Default는 derive 매크로로 자동 생성 (각 필드가 Default를 구현하므로)

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 클러스터 설정
///
/// 클러스터 식별자는 시작 시 한 번 읽어 프로세스 수명 동안 상수로 사용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// 클러스터 이름 (모든 최종 레코드의 `cluster` 필드)
    pub name: String,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            name: "unknown".to_owned(),
        }
    }
}

/// 컨테이너 런타임 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// 기본 백엔드 (docker, containerd) — CLI의 `--containerd`가 우선
    pub backend: String,
    /// Docker 소켓 경로
    pub docker_socket: String,
    /// containerd 소켓 경로
    pub containerd_socket: String,
    /// containerd 네임스페이스 (kubernetes 노드에서는 k8s.io)
    pub containerd_namespace: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            backend: "docker".to_owned(),
            docker_socket: "/var/run/docker.sock".to_owned(),
            containerd_socket: "/run/containerd/containerd.sock".to_owned(),
            containerd_namespace: "k8s.io".to_owned(),
        }
    }
}

/// 이벤트 스트림 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventStreamConfig {
    /// 구조화 이벤트가 기록되는 스트림 이름
    pub stream: String,
    /// 스트림별 스풀 파일이 쌓이는 디렉토리
    pub spool_dir: String,
}

impl Default for EventStreamConfig {
    fn default() -> Self {
        Self {
            stream: "tmp_paasta_oom_events".to_owned(),
            spool_dir: "/var/spool/oomwatch".to_owned(),
        }
    }
}

/// 메트릭 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 메트릭 방출 활성화 여부 (비활성 시 메트릭 단계 전체가 no-op)
    pub enabled: bool,
    /// Prometheus 엔드포인트 수신 주소
    pub listen_addr: String,
    /// Prometheus 엔드포인트 포트
    pub port: u16,
    /// 서비스 인스턴스 설정(yelpsoa-configs 스타일) 디렉토리
    pub soa_dir: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9105,
            soa_dir: "/etc/oomwatch/soa".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}
