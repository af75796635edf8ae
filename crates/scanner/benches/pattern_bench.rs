//! OOM 라인 인식기 벤치마크
//!
//! 레이아웃별 kill 인식기와 비매칭 라인의 처리량을 측정합니다.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oomwatch_scanner::OomPatternSet;

/// docker cgroupfs kill 라인
const DOCKER_LINE: &str = "1700000000 nodeA kernel: Task in /docker/abcdef012345abcdef killed as a result of limit of /docker/abcdef012345abcdef";

/// kubernetes 구조화 oom-kill 라인 (인식기 목록의 세 번째)
const STRUCTURED_LINE: &str = "1700000002 kube-node-2 kernel: oom-kill:constraint=CONSTRAINT_MEMCG,oom_memcg=/kubepods/pod9,task_memcg=/kubepods/guaranteed/pod9/abcdef01234577,task=ruby,pid=91,uid=33";

/// containerd/nerdctl systemd 라인 (인식기 목록의 마지막)
const NERDCTL_LINE: &str = "1700000004 kube-node-4 kernel: oom-kill:constraint=CONSTRAINT_MEMCG,task_memcg=/system.slice/nerdctl-0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef.scope,task=node,pid=6,uid=0";

/// 프로세스명 라인
const PROCESS_NAME_LINE: &str =
    "1700000000 nodeA kernel: [1234567.890123] apache2 invoked oom-killer: gfp_mask=0x201da";

/// 어느 인식기에도 걸리지 않는 일반 syslog 라인 (가장 흔한 경우)
const NOISE_LINE: &str = "1700000000 nodeA sshd[999]: Accepted publickey for deploy from 10.0.0.1";

fn bench_kill_recognizers(c: &mut Criterion) {
    let patterns = OomPatternSet::new().expect("fixed patterns compile");

    let mut group = c.benchmark_group("kill_recognizers");
    group.throughput(Throughput::Elements(1));

    group.bench_with_input(BenchmarkId::new("layout", "docker"), &DOCKER_LINE, |b, &line| {
        b.iter(|| patterns.match_kill(black_box(line)))
    });

    group.bench_with_input(
        BenchmarkId::new("layout", "kubernetes_structured"),
        &STRUCTURED_LINE,
        |b, &line| b.iter(|| patterns.match_kill(black_box(line))),
    );

    group.bench_with_input(
        BenchmarkId::new("layout", "kubernetes_containerd_systemd"),
        &NERDCTL_LINE,
        |b, &line| b.iter(|| patterns.match_kill(black_box(line))),
    );

    group.finish();
}

fn bench_non_matching(c: &mut Criterion) {
    let patterns = OomPatternSet::new().expect("fixed patterns compile");

    let mut group = c.benchmark_group("non_matching");

    // 비매칭 라인은 다섯 인식기를 모두 통과하므로 최악 경로
    group.throughput(Throughput::Elements(1));
    group.bench_function("noise_line", |b| {
        b.iter(|| patterns.match_kill(black_box(NOISE_LINE)))
    });

    // 1000건 반복 처리량
    group.throughput(Throughput::Elements(1000));
    group.bench_function("noise_throughput_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                patterns.match_kill(black_box(NOISE_LINE));
            }
        })
    });

    group.finish();
}

fn bench_process_name(c: &mut Criterion) {
    let patterns = OomPatternSet::new().expect("fixed patterns compile");

    let mut group = c.benchmark_group("process_name");
    group.throughput(Throughput::Elements(1));

    group.bench_function("matching", |b| {
        b.iter(|| patterns.process_name(black_box(PROCESS_NAME_LINE)))
    });

    group.bench_function("non_matching", |b| {
        b.iter(|| patterns.process_name(black_box(NOISE_LINE)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_kill_recognizers,
    bench_non_matching,
    bench_process_name
);
criterion_main!(benches);
