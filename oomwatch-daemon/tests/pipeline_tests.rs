//! 통합 테스트 -- 라인 입력부터 스풀 기록까지의 전체 파이프라인 검증
//!
//! 런타임 백엔드만 고정 응답 resolver로 대체하고, 싱크는 실제 구현을
//! tempdir 위에서 사용합니다.

use std::collections::HashMap;

use oomwatch_daemon::pipeline;
use oomwatch_dispatch::{OomDispatcher, SoaDirPools, SpoolStreamSink, TracingOperatorSink};
use oomwatch_runtime::{EnvResolver, RuntimeError};
use oomwatch_scanner::OomScanner;

const STREAM: &str = "tmp_paasta_oom_events";

/// 고정 응답 resolver — 등록되지 않은 id는 조회 실패
struct StaticResolver {
    containers: HashMap<String, HashMap<String, String>>,
}

impl StaticResolver {
    fn new() -> Self {
        Self {
            containers: HashMap::new(),
        }
    }

    fn with_container(mut self, id: &str, env: &[(&str, &str)]) -> Self {
        self.containers.insert(
            id.to_owned(),
            env.iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        );
        self
    }
}

impl EnvResolver for StaticResolver {
    fn backend_name(&self) -> &'static str {
        "static"
    }

    async fn container_env(
        &self,
        container_id: &str,
    ) -> Result<HashMap<String, String>, RuntimeError> {
        self.containers
            .get(container_id)
            .cloned()
            .ok_or_else(|| RuntimeError::ContainerNotFound(container_id.to_owned()))
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        Ok(())
    }
}

async fn dispatcher_on(
    dir: &tempfile::TempDir,
) -> OomDispatcher<SpoolStreamSink, TracingOperatorSink, SoaDirPools> {
    let sink = SpoolStreamSink::new(dir.path()).await.expect("sink builds");
    OomDispatcher::new(STREAM, sink, TracingOperatorSink::new(), None)
}

fn spool_lines(dir: &tempfile::TempDir) -> Vec<serde_json::Value> {
    let path = dir.path().join(format!("{STREAM}.log"));
    if !path.exists() {
        return Vec::new();
    }
    std::fs::read_to_string(path)
        .expect("spool readable")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect()
}

#[tokio::test]
async fn end_to_end_docker_example() {
    let input = "1700000000 nodeA kernel: Task in /docker/abcdef012345abcdef killed as a result of limit of /docker/abcdef012345abcdef\n";
    let resolver = StaticResolver::new().with_container(
        "abcdef012345",
        &[("PAASTA_SERVICE", "web"), ("PAASTA_INSTANCE", "main")],
    );

    let dir = tempfile::tempdir().expect("tempdir");
    let dispatcher = dispatcher_on(&dir).await;
    let scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");

    let report = pipeline::run(scanner, &resolver, "test-cluster", &dispatcher).await;
    assert_eq!(report.events_seen, 1);
    assert_eq!(report.events_dispatched, 1);
    assert_eq!(report.events_dropped, 0);

    let lines = spool_lines(&dir);
    assert_eq!(lines.len(), 1);
    let value = &lines[0];
    assert_eq!(value["timestamp"], 1_700_000_000_i64);
    assert_eq!(value["hostname"], "nodeA");
    assert_eq!(value["container_id"], "abcdef012345");
    assert_eq!(value["cluster"], "test-cluster");
    assert_eq!(value["service"], "web");
    assert_eq!(value["instance"], "main");
    assert_eq!(value["process_name"], "");
    assert_eq!(value["mesos_container_id"], "mesos-null");
    assert_eq!(value["mem_limit"], "unknown");
}

#[tokio::test]
async fn resolver_failure_does_not_stop_the_stream() {
    // 첫 이벤트의 컨테이너는 이미 사라짐, 두 번째는 정상 조회
    let input = "\
1700000000 nodeA kernel: Task in /docker/deadbeef0000ffff killed as a result of limit of /docker/deadbeef0000ffff
1700000001 nodeB kernel: Task in /docker/abcdef012345abcdef killed as a result of limit of /docker/abcdef012345abcdef
";
    let resolver = StaticResolver::new()
        .with_container("abcdef012345", &[("PAASTA_SERVICE", "web")]);

    let dir = tempfile::tempdir().expect("tempdir");
    let dispatcher = dispatcher_on(&dir).await;
    let scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");

    let report = pipeline::run(scanner, &resolver, "test-cluster", &dispatcher).await;
    assert_eq!(report.events_seen, 2);
    assert_eq!(report.events_dropped, 1);
    assert_eq!(report.events_dispatched, 1);

    let lines = spool_lines(&dir);
    assert_eq!(lines.len(), 1, "only the resolvable event is dispatched");
    assert_eq!(lines[0]["hostname"], "nodeB");
    assert_eq!(lines[0]["service"], "web");
}

#[tokio::test]
async fn process_name_flows_through_the_pipeline() {
    let input = "\
1699999999 nodeA kernel: [11.22] mysqld invoked oom-killer: gfp_mask=0x201da
1700000000 nodeA kernel: Task in /docker/abcdef012345abcdef killed as a result of limit of /docker/abcdef012345abcdef
";
    let resolver = StaticResolver::new().with_container("abcdef012345", &[]);

    let dir = tempfile::tempdir().expect("tempdir");
    let dispatcher = dispatcher_on(&dir).await;
    let scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");

    let report = pipeline::run(scanner, &resolver, "test-cluster", &dispatcher).await;
    assert_eq!(report.events_dispatched, 1);

    let lines = spool_lines(&dir);
    assert_eq!(lines[0]["process_name"], "mysqld");
    // 환경변수가 비어 있으므로 나머지는 기본값
    assert_eq!(lines[0]["service"], "unknown");
}

#[tokio::test]
async fn empty_input_terminates_cleanly() {
    let resolver = StaticResolver::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let dispatcher = dispatcher_on(&dir).await;
    let scanner = OomScanner::new(&b""[..]).expect("scanner builds");

    let report = pipeline::run(scanner, &resolver, "test-cluster", &dispatcher).await;
    assert_eq!(report.lines_seen, 0);
    assert_eq!(report.events_seen, 0);
    assert_eq!(report.events_dispatched, 0);
    assert!(spool_lines(&dir).is_empty());
}

#[tokio::test]
async fn noise_lines_produce_no_spool_output() {
    let input = "\
1700000000 nodeA sshd[999]: Accepted publickey for deploy
1700000001 nodeA CRON[1]: (root) CMD (command -v debian-sa1)
";
    let resolver = StaticResolver::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let dispatcher = dispatcher_on(&dir).await;
    let scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");

    let report = pipeline::run(scanner, &resolver, "test-cluster", &dispatcher).await;
    assert_eq!(report.lines_seen, 2);
    assert_eq!(report.events_seen, 0);
    assert!(spool_lines(&dir).is_empty());
}
