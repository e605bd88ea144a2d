//! Benchmarks for the hot, pure parts of the engine: trigger evaluation
//! and archive-name parsing. Filesystem stages are excluded; their cost
//! is the syscalls, not the logic.

use std::path::PathBuf;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rollover::{should_rotate, LogFile, RotationPolicy, Schedule};
use rollover_engine::naming;

fn bench_should_rotate(c: &mut Criterion) {
    let policy = RotationPolicy::builder()
        .max_size_bytes(50_000_000)
        .schedule(Schedule::Daily)
        .build()
        .unwrap();
    let now = Utc::now();
    let file = LogFile {
        path: PathBuf::from("/var/log/app.log"),
        size_bytes: 49_000_000,
        last_rotated_at: Some(now - chrono::Duration::hours(2)),
        modified_at: now,
    };

    c.bench_function("should_rotate", |b| {
        b.iter(|| should_rotate(black_box(&file), black_box(&policy), now))
    });
}

fn bench_parse_sibling(c: &mut Criterion) {
    c.bench_function("parse_sibling_indexed", |b| {
        b.iter(|| naming::parse_sibling(black_box("app.log.12.gz"), black_box("app.log")))
    });
    c.bench_function("parse_sibling_timestamp", |b| {
        b.iter(|| {
            naming::parse_sibling(black_box("app.log.20260807T123005Z.zst"), black_box("app.log"))
        })
    });
}

criterion_group!(benches, bench_should_rotate, bench_parse_sibling);
criterion_main!(benches);
