//! OOM kill 라인 인식기 — cgroup 레이아웃별 고정 우선순위 패턴
//!
//! cgroup 경로 레이아웃은 오케스트레이터, cgroup 드라이버(cgroupfs/systemd),
//! 런타임(docker/containerd)에 따라 달라집니다. 범용 파서 하나 대신
//! 레이아웃마다 앵커된 패턴을 두고 고정 순서로 시도하며, 첫 매칭에서
//! 멈춥니다 — 한 라인이 두 번 집계되는 일은 없습니다.
//!
//! 정규식은 규칙 로딩 시 한 번만 컴파일하여 캐싱합니다.

use regex::Regex;

use crate::error::ScanError;

/// 인식된 kill 라인의 cgroup 레이아웃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillLayout {
    /// docker cgroupfs: `Task in /docker/<id>`
    Docker,
    /// kubernetes cgroupfs: `Task in /kubepods/[qos/]pod<name>/<id>`
    Kubernetes,
    /// kubernetes 구조화 커널 메시지: `oom-kill:...task_memcg=/kubepods/...`
    KubernetesStructured,
    /// kubernetes + systemd cgroup driver + docker: `docker-<id>.scope`
    KubernetesSystemd,
    /// kubernetes + systemd cgroup driver + containerd: `nerdctl-<id>.scope`
    KubernetesContainerdSystemd,
}

impl KillLayout {
    /// 레이블/로깅에 사용하는 레이아웃 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Kubernetes => "kubernetes",
            Self::KubernetesStructured => "kubernetes_structured",
            Self::KubernetesSystemd => "kubernetes_systemd",
            Self::KubernetesContainerdSystemd => "kubernetes_containerd_systemd",
        }
    }
}

impl std::fmt::Display for KillLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// kill 라인에서 추출한 원시 캡처
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillCapture {
    /// 발생 시각 (Unix epoch 초)
    pub timestamp: i64,
    /// 호스트명
    pub hostname: String,
    /// 컨테이너 short id
    pub container_id: String,
    /// 매칭된 레이아웃
    pub layout: KillLayout,
}

/// OOM 라인 인식기 집합
///
/// kill 인식기 다섯 개는 고정 순서로 평가되며 첫 매칭이 승리합니다.
/// 프로세스명 인식기는 kill 인식기와 무관하게 모든 라인에 대해
/// 독립적으로 평가됩니다.
///
/// containerd의 64자 id는 12자 캡처 패턴에도 앞 12자가 매칭될 수
/// 있습니다. 실제 레이아웃은 상호 배타적이라 고정 순서가 이를
/// 구분합니다.
pub struct OomPatternSet {
    /// "invoked oom-killer" 라인에서 프로세스명을 추출
    process_name: Regex,
    /// 레이아웃별 kill 인식기 (평가 순서 = 벡터 순서)
    kill_recognizers: Vec<(KillLayout, Regex)>,
}

impl OomPatternSet {
    /// 모든 인식기를 컴파일합니다.
    pub fn new() -> Result<Self, ScanError> {
        let process_name = Regex::new(r"^\d+\s[a-zA-Z0-9\-]+\s.*\]\s(.+)\sinvoked\soom-killer:")?;

        let docker =
            Regex::new(r"^(\d+)\s([a-zA-Z0-9\-]+)\s.*Task in /docker/(\w{12})\w+ killed as a")?;
        let kubernetes = Regex::new(
            r"^(\d+)\s([a-zA-Z0-9\-]+)\s.*Task\sin\s/kubepods/(?:[a-zA-Z]+/)?pod[-\w]+/(\w{12}(?:\w{52})?)\w*\skilled\sas\sa*",
        )?;
        let kubernetes_structured = Regex::new(
            r"^(\d+)\s([a-zA-Z0-9\-]+)\s.*oom-kill:.*task_memcg=/kubepods/(?:[a-zA-Z]+/)?pod[-\w]+/(\w{12}(?:\w{52})?)\w*,.*$",
        )?;
        let kubernetes_systemd = Regex::new(
            r"^(\d+)\s([a-zA-Z0-9\-]+)\s.*oom-kill:.*task_memcg=/kubepods\.slice/[^,]+docker-(\w{12})\w+\.scope,.*$",
        )?;
        let kubernetes_containerd_systemd = Regex::new(
            r"^(\d+)\s([a-zA-Z0-9\-]+)\s.*oom-kill:.*task_memcg=/system\.slice/.*nerdctl-(\w{64})\w*\.scope,.*$",
        )?;

        Ok(Self {
            process_name,
            kill_recognizers: vec![
                (KillLayout::Docker, docker),
                (KillLayout::Kubernetes, kubernetes),
                (KillLayout::KubernetesStructured, kubernetes_structured),
                (KillLayout::KubernetesSystemd, kubernetes_systemd),
                (
                    KillLayout::KubernetesContainerdSystemd,
                    kubernetes_containerd_systemd,
                ),
            ],
        })
    }

    /// "invoked oom-killer" 라인이면 프로세스명을 반환합니다.
    pub fn process_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.process_name
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// kill 라인이면 첫 번째로 매칭되는 인식기의 캡처를 반환합니다.
    ///
    /// 타임스탬프가 i64 범위를 벗어나는 비정상 라인은 매칭 실패로
    /// 취급합니다.
    pub fn match_kill(&self, line: &str) -> Option<KillCapture> {
        for (layout, recognizer) in &self.kill_recognizers {
            if let Some(caps) = recognizer.captures(line) {
                let timestamp = caps[1].parse::<i64>().ok()?;
                return Some(KillCapture {
                    timestamp,
                    hostname: caps[2].to_owned(),
                    container_id: caps[3].to_owned(),
                    layout: *layout,
                });
            }
        }
        None
    }
}
