//! oomwatch-daemon — syslog-ng destination으로 실행되는 OOM 이벤트 파이프라인
//!
//! 커널 OOM 라인만 걸러 이 프로그램의 표준 입력으로 넘기는 syslog-ng
//! 설정 예:
//!
//! ```text
//! destination oomwatch {
//!   program("exec /usr/bin/oomwatch-daemon" template("${UNIXTIME} ${HOST} ${MESSAGE}\n"));
//! };
//!
//! filter f_cgroup_oom {
//!   match(" killed as a result of limit of ") or match(" invoked oom-killer: ");
//! };
//!
//! log {
//!   source(s_all);
//!   filter(f_cgroup_oom);
//!   destination(oomwatch);
//! };
//! ```
//!
//! 종료 코드: 로깅 트랜스포트를 구성하지 못하면 1, 그 외에는 0
//! (루프는 보통 입력이 끊길 때까지 계속 돕니다).

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;

use oomwatch_core::config::OomwatchConfig;
use oomwatch_core::error::{ConfigError, OomwatchError};
use oomwatch_daemon::cli::DaemonCli;
use oomwatch_daemon::{logging, metrics_server, pipeline};
use oomwatch_dispatch::{
    MetricsEmitter, OomDispatcher, SoaDirPools, SpoolStreamSink, TracingOperatorSink,
};
use oomwatch_runtime::{ContainerdEnvResolver, DockerEnvResolver, EnvResolver};
use oomwatch_scanner::OomScanner;

#[tokio::main]
async fn main() {
    let cli = DaemonCli::parse();

    // 설정 로드: 파일이 없으면 기본값으로 진행 (syslog-ng 배포에서는
    // 설정 파일 없이 CLI/환경변수만으로 뜨는 경우가 흔함)
    let (mut config, config_missing) = match OomwatchConfig::from_file(&cli.config).await {
        Ok(config) => (config, false),
        Err(OomwatchError::Config(ConfigError::FileNotFound { .. })) => {
            (OomwatchConfig::default(), true)
        }
        Err(e) => {
            eprintln!("oomwatch-daemon: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    config.apply_env_overrides();

    // CLI 오버라이드 (최고 우선)
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format = format.clone();
    }
    if cli.containerd {
        config.runtime.backend = "containerd".to_owned();
    }

    if let Err(e) = config.validate() {
        eprintln!("oomwatch-daemon: invalid configuration: {e}");
        std::process::exit(1);
    }

    // 로깅 트랜스포트 구성 실패는 유일한 치명 경로
    if let Err(e) = logging::init_tracing(&config.general) {
        eprintln!("oomwatch-daemon: failed to initialize logging transport: {e}");
        std::process::exit(1);
    }

    if config_missing {
        tracing::warn!(
            path = %cli.config.display(),
            "config file not found, using defaults"
        );
    }

    if let Err(e) = run(&config).await {
        tracing::error!(error = %e, "oomwatch-daemon failed during startup");
        std::process::exit(1);
    }
}

/// 싱크와 백엔드를 준비하고 입력이 끊길 때까지 파이프라인을 돌립니다.
async fn run(config: &OomwatchConfig) -> Result<()> {
    tracing::info!(
        cluster = %config.cluster.name,
        backend = %config.runtime.backend,
        stream = %config.events.stream,
        "oomwatch-daemon starting"
    );

    // 메트릭은 선택 사항: 레코더 설치 실패는 경고 후 no-op으로 진행
    if config.metrics.enabled {
        if let Err(e) = metrics_server::install_metrics_recorder(&config.metrics) {
            tracing::warn!(error = %e, "metrics recorder unavailable, continuing without metrics");
        }
    }

    // 구조화 이벤트 싱크는 로깅 트랜스포트의 일부 — 준비 실패는 치명적
    let events = SpoolStreamSink::new(&config.events.spool_dir).await?;
    let metrics_emitter = config
        .metrics
        .enabled
        .then(|| MetricsEmitter::new(SoaDirPools::new(&config.metrics.soa_dir)));
    let dispatcher = OomDispatcher::new(
        &config.events.stream,
        events,
        TracingOperatorSink::new(),
        metrics_emitter,
    );

    let scanner = OomScanner::new(BufReader::new(tokio::io::stdin()))?;

    // 백엔드는 여기서 한 번 선택되어 프로세스 수명 동안 유지됨
    let report = match config.runtime.backend.as_str() {
        "containerd" => {
            let resolver = ContainerdEnvResolver::connect_lazy(
                &config.runtime.containerd_socket,
                &config.runtime.containerd_namespace,
            );
            if let Err(e) = resolver.ping().await {
                tracing::warn!(
                    socket = %config.runtime.containerd_socket,
                    error = %e,
                    "containerd not reachable at startup, lookups may fail"
                );
            }
            pipeline::run(scanner, &resolver, &config.cluster.name, &dispatcher).await
        }
        _ => {
            let resolver = DockerEnvResolver::connect_with_socket(&config.runtime.docker_socket)?;
            if let Err(e) = resolver.ping().await {
                tracing::warn!(
                    socket = %config.runtime.docker_socket,
                    error = %e,
                    "docker daemon not reachable at startup, lookups may fail"
                );
            }
            pipeline::run(scanner, &resolver, &config.cluster.name, &dispatcher).await
        }
    };

    tracing::info!(
        lines = report.lines_seen,
        events = report.events_seen,
        dispatched = report.events_dispatched,
        dropped = report.events_dropped,
        "oomwatch-daemon shut down"
    );
    Ok(())
}
