//! Benchmarks for duscan
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use duscan::config::ScanConfig;
use duscan::topk::LargestFiles;
use duscan::walker::Scanner;
use std::fs;
use tempfile::TempDir;

fn benchmark_largest_files_offer(c: &mut Criterion) {
    c.bench_function("largest_files_offer_mixed", |b| {
        let collector = LargestFiles::new(10);
        let mut size = 0i64;
        b.iter(|| {
            // most offers land below the watermark once the set is warm
            size = (size + 7919) % 10_000;
            collector.offer(black_box(size), "/bench/file");
        })
    });

    c.bench_function("largest_files_offer_rejected", |b| {
        let collector = LargestFiles::new(10);
        for size in 1_000_000..1_000_010 {
            collector.offer(size, "/bench/warm");
        }
        b.iter(|| {
            collector.offer(black_box(1), "/bench/cold");
        })
    });
}

fn benchmark_scan_small_tree(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    for d in 0..10 {
        let dir = tmp.path().join(format!("dir{d}"));
        fs::create_dir(&dir).unwrap();
        for f in 0..50 {
            fs::write(dir.join(format!("f{f}")), vec![0u8; 64]).unwrap();
        }
    }

    let mut group = c.benchmark_group("scan_small_tree");
    group.sample_size(20);
    for workers in [1usize, 4] {
        group.bench_function(format!("workers_{workers}"), |b| {
            b.iter(|| {
                let mut config = ScanConfig::new(tmp.path());
                config.worker_count = workers;
                let outcome = Scanner::new(config).run();
                black_box(outcome.root.rec_size)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_largest_files_offer, benchmark_scan_small_tree);
criterion_main!(benches);
