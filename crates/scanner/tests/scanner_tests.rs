//! 통합 테스트 -- 다섯 가지 로그 레이아웃 픽스처로 스캐너 전체 흐름 검증

use oomwatch_scanner::{KillLayout, OomPatternSet, OomScanner};

const DOCKER_ID: &str = "abcdef012345";
const CONTAINERD_ID: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

/// 레이아웃별 픽스처: (라인, 기대 타임스탬프, 기대 호스트, 기대 id, 레이아웃)
fn layout_fixtures() -> Vec<(String, i64, &'static str, String, KillLayout)> {
    vec![
        (
            format!(
                "1700000000 nodeA kernel: Task in /docker/{DOCKER_ID}abcdef killed as a result of limit of /docker/{DOCKER_ID}abcdef"
            ),
            1_700_000_000,
            "nodeA",
            DOCKER_ID.to_owned(),
            KillLayout::Docker,
        ),
        (
            format!(
                "1700000001 kube-node-1 kernel: Task in /kubepods/burstable/podf8a3c912-33aa/{DOCKER_ID}00ff killed as a result of limit"
            ),
            1_700_000_001,
            "kube-node-1",
            DOCKER_ID.to_owned(),
            KillLayout::Kubernetes,
        ),
        (
            format!(
                "1700000002 kube-node-2 kernel: oom-kill:constraint=CONSTRAINT_MEMCG,oom_memcg=/kubepods/pod9,task_memcg=/kubepods/guaranteed/pod9/{DOCKER_ID}77,task=ruby,pid=91,uid=33"
            ),
            1_700_000_002,
            "kube-node-2",
            DOCKER_ID.to_owned(),
            KillLayout::KubernetesStructured,
        ),
        (
            format!(
                "1700000003 kube-node-3 kernel: oom-kill:constraint=CONSTRAINT_MEMCG,task_memcg=/kubepods.slice/kubepods-pod3.slice/docker-{DOCKER_ID}1234.scope,task=java,pid=5,uid=0"
            ),
            1_700_000_003,
            "kube-node-3",
            DOCKER_ID.to_owned(),
            KillLayout::KubernetesSystemd,
        ),
        (
            format!(
                "1700000004 kube-node-4 kernel: oom-kill:constraint=CONSTRAINT_MEMCG,task_memcg=/system.slice/nerdctl-{CONTAINERD_ID}.scope,task=node,pid=6,uid=0"
            ),
            1_700_000_004,
            "kube-node-4",
            CONTAINERD_ID.to_owned(),
            KillLayout::KubernetesContainerdSystemd,
        ),
    ]
}

#[test]
fn each_layout_fixture_matches_its_recognizer() {
    let patterns = OomPatternSet::new().expect("fixed patterns compile");
    for (line, timestamp, hostname, container_id, layout) in layout_fixtures() {
        let cap = patterns
            .match_kill(&line)
            .unwrap_or_else(|| panic!("fixture for {layout} did not match: {line}"));
        assert_eq!(cap.timestamp, timestamp, "timestamp for {layout}");
        assert_eq!(cap.hostname, hostname, "hostname for {layout}");
        assert_eq!(cap.container_id, container_id, "container id for {layout}");
        assert_eq!(cap.layout, layout);
        assert!(
            cap.container_id.len() == 12 || cap.container_id.len() == 64,
            "container id length for {layout}"
        );
    }
}

#[tokio::test]
async fn each_layout_fixture_yields_exactly_one_event() {
    for (line, timestamp, hostname, container_id, _layout) in layout_fixtures() {
        let input = format!("{line}\n");
        let mut scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");
        let event = scanner.next_event().await.expect("fixture yields an event");
        assert_eq!(event.timestamp, timestamp);
        assert_eq!(event.hostname, hostname);
        assert_eq!(event.container_id, container_id);
        assert_eq!(event.process_name, "");
        assert!(scanner.next_event().await.is_none());
    }
}

#[tokio::test]
async fn spec_end_to_end_example_line() {
    let input = "1700000000 nodeA kernel: Task in /docker/abcdef012345abcdef killed as a result of limit of /docker/abcdef012345abcdef\n";
    let mut scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");
    let event = scanner.next_event().await.expect("example line matches");
    assert_eq!(event.timestamp, 1_700_000_000);
    assert_eq!(event.hostname, "nodeA");
    assert_eq!(event.container_id, "abcdef012345");
    assert_eq!(event.process_name, "");
}

#[tokio::test]
async fn mixed_stream_interleaves_names_and_kills() {
    let fixtures = layout_fixtures();
    let mut input = String::new();
    input.push_str("1699999999 nodeA kernel: [11.22] mysqld invoked oom-killer: gfp_mask=0x0\n");
    for (line, ..) in &fixtures {
        input.push_str(line);
        input.push('\n');
        input.push_str("1700000009 nodeA CRON[1]: (root) CMD (command -v debian-sa1)\n");
    }

    let mut scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");
    let mut events = Vec::new();
    while let Some(event) = scanner.next_event().await {
        events.push(event);
    }

    assert_eq!(events.len(), fixtures.len());
    // 프로세스명은 첫 kill 라인에만 부착되고 이후에는 빈 문자열
    assert_eq!(events[0].process_name, "mysqld");
    for event in &events[1..] {
        assert_eq!(event.process_name, "");
    }
}
