//! 스트림 스캐너 — 라인 스트림을 OomEvent 시퀀스로 변환합니다.
//!
//! 라인은 `<unix-timestamp> <hostname> <message>` 형식의 syslog 레코드로,
//! syslog-ng destination program의 표준 입력으로 전달됩니다.
//!
//! 스캔은 실패하지 않습니다. 인식되지 않거나 비정상적인 라인은 건너뛰고,
//! 입력 종료 시 `next_event()`가 `None`을 반환하며 시퀀스가 끝납니다.
//! UTF-8이 아닌 바이트는 lossy 디코딩으로 흡수합니다.

use metrics::counter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use oomwatch_core::event::OomEvent;
use oomwatch_core::metrics::{LABEL_LAYOUT, SCANNER_EVENTS_TOTAL, SCANNER_LINES_TOTAL};

use crate::error::ScanError;
use crate::pattern::OomPatternSet;

/// OOM 이벤트 스캐너
///
/// 단일 슬롯 프로세스명 상태를 명시적 필드로 소유합니다.
/// 새 "invoked oom-killer" 라인이 올 때마다 슬롯을 덮어쓰고,
/// kill 라인에 부착되는 순간 비웁니다 — 프로세스명은 다음 kill 라인에
/// 최대 한 번만 전달됩니다.
pub struct OomScanner<R> {
    /// 라인 소스
    reader: R,
    /// 인식기 집합
    patterns: OomPatternSet,
    /// 대기 중인 프로세스명 (스캔 전역 단일 슬롯)
    pending_process_name: String,
    /// 라인 읽기 버퍼 (재사용)
    buf: Vec<u8>,
    /// 읽은 라인 수
    lines_seen: u64,
    /// 생성한 이벤트 수
    events_emitted: u64,
}

impl<R: AsyncBufRead + Unpin> OomScanner<R> {
    /// 새 스캐너를 생성합니다.
    pub fn new(reader: R) -> Result<Self, ScanError> {
        Ok(Self {
            reader,
            patterns: OomPatternSet::new()?,
            pending_process_name: String::new(),
            buf: Vec::with_capacity(1024),
            lines_seen: 0,
            events_emitted: 0,
        })
    }

    /// 다음 OOM 이벤트를 반환합니다.
    ///
    /// 입력이 끝나면 `None`을 반환합니다. 읽기 에러는 경고 로그 후
    /// 입력 종료와 동일하게 처리합니다 (syslog-ng 쪽 파이프 단절은
    /// 입력의 끝과 같은 의미입니다).
    pub async fn next_event(&mut self) -> Option<OomEvent> {
        loop {
            self.buf.clear();
            let n = match self.reader.read_until(b'\n', &mut self.buf).await {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(error = %e, "read failure on input stream, ending scan");
                    return None;
                }
            };
            if n == 0 {
                tracing::debug!(
                    lines = self.lines_seen,
                    events = self.events_emitted,
                    "input stream exhausted"
                );
                return None;
            }

            self.lines_seen += 1;
            counter!(SCANNER_LINES_TOTAL).increment(1);

            let decoded = String::from_utf8_lossy(&self.buf);
            let line = decoded.trim_end_matches(['\n', '\r']);

            // 프로세스명 인식기는 kill 인식기와 무관하게 모든 라인에 적용
            if let Some(name) = self.patterns.process_name(line) {
                tracing::debug!(process_name = name, "pending process name updated");
                self.pending_process_name = name.to_owned();
            }

            if let Some(capture) = self.patterns.match_kill(line) {
                let process_name = std::mem::take(&mut self.pending_process_name);
                self.events_emitted += 1;
                counter!(SCANNER_EVENTS_TOTAL, LABEL_LAYOUT => capture.layout.as_str())
                    .increment(1);
                tracing::debug!(
                    layout = %capture.layout,
                    hostname = %capture.hostname,
                    container_id = %capture.container_id,
                    "oom kill line recognized"
                );
                return Some(OomEvent {
                    timestamp: capture.timestamp,
                    hostname: capture.hostname,
                    container_id: capture.container_id,
                    process_name,
                });
            }

            // 어느 인식기에도 걸리지 않는 라인은 조용히 건너뜀
        }
    }

    /// 지금까지 읽은 라인 수를 반환합니다.
    pub fn lines_seen(&self) -> u64 {
        self.lines_seen
    }

    /// 지금까지 생성한 이벤트 수를 반환합니다.
    pub fn events_emitted(&self) -> u64 {
        self.events_emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCKER_ID: &str = "abcdef012345";

    fn kill_line(ts: u64, host: &str) -> String {
        format!(
            "{ts} {host} kernel: Task in /docker/{DOCKER_ID}abcdef killed as a result of limit of /docker/{DOCKER_ID}abcdef"
        )
    }

    fn process_name_line(ts: u64, host: &str, name: &str) -> String {
        format!("{ts} {host} kernel: [1234567.890123] {name} invoked oom-killer: gfp_mask=0x201da")
    }

    async fn scan_all(input: String) -> Vec<OomEvent> {
        let mut scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");
        let mut events = Vec::new();
        while let Some(event) = scanner.next_event().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn kill_line_without_process_name_yields_empty_name() {
        let events = scan_all(kill_line(1_700_000_000, "nodeA") + "\n").await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 1_700_000_000);
        assert_eq!(events[0].hostname, "nodeA");
        assert_eq!(events[0].container_id, DOCKER_ID);
        assert_eq!(events[0].process_name, "");
    }

    #[tokio::test]
    async fn process_name_attaches_to_following_kill_line() {
        let input = format!(
            "{}\n{}\n",
            process_name_line(1_700_000_000, "nodeA", "apache2"),
            kill_line(1_700_000_001, "nodeA"),
        );
        let events = scan_all(input).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].process_name, "apache2");
    }

    #[tokio::test]
    async fn process_name_slot_is_cleared_after_use() {
        // kill 두 개 사이에 프로세스명 하나: 첫 kill은 이름 없이,
        // 이름은 두 번째 kill에 붙고, 세 번째 kill은 다시 빈 이름
        let input = format!(
            "{}\n{}\n{}\n{}\n",
            kill_line(1, "nodeA"),
            process_name_line(2, "nodeA", "uwsgi"),
            kill_line(3, "nodeA"),
            kill_line(4, "nodeA"),
        );
        let events = scan_all(input).await;
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].process_name, "");
        assert_eq!(events[1].process_name, "uwsgi");
        assert_eq!(events[2].process_name, "");
    }

    #[tokio::test]
    async fn newer_process_name_overwrites_pending_slot() {
        let input = format!(
            "{}\n{}\n{}\n",
            process_name_line(1, "nodeA", "apache2"),
            process_name_line(2, "nodeA", "uwsgi"),
            kill_line(3, "nodeA"),
        );
        let events = scan_all(input).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].process_name, "uwsgi");
    }

    #[tokio::test]
    async fn unmatched_lines_are_skipped_and_do_not_touch_slot() {
        let input = format!(
            "{}\nnot a syslog line at all\n{}\n{}\n",
            process_name_line(1, "nodeA", "apache2"),
            "1700000000 nodeA sshd[999]: Accepted publickey for deploy",
            kill_line(2, "nodeA"),
        );
        let events = scan_all(input).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].process_name, "apache2");
    }

    #[tokio::test]
    async fn empty_input_ends_immediately() {
        let events = scan_all(String::new()).await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn non_utf8_bytes_do_not_abort_the_scan() {
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(b"\xff\xfe garbage line\n");
        input.extend_from_slice(kill_line(5, "nodeA").as_bytes());
        input.extend_from_slice(b"\n");
        let mut scanner = OomScanner::new(&input[..]).expect("scanner builds");
        let event = scanner.next_event().await.expect("kill line survives");
        assert_eq!(event.timestamp, 5);
        assert!(scanner.next_event().await.is_none());
    }

    #[tokio::test]
    async fn final_line_without_newline_is_processed() {
        let events = scan_all(kill_line(7, "nodeA")).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 7);
    }

    #[tokio::test]
    async fn counters_track_lines_and_events() {
        let input = format!("noise\n{}\n", kill_line(1, "nodeA"));
        let mut scanner = OomScanner::new(input.as_bytes()).expect("scanner builds");
        while scanner.next_event().await.is_some() {}
        assert_eq!(scanner.lines_seen(), 2);
        assert_eq!(scanner.events_emitted(), 1);
    }
}
