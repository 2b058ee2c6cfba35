// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_popover::coordinator::Coordinator;
use understory_popover::geometry::resolve;
use understory_popover::measure::Pipeline;
use understory_popover::request::PopoverRequest;
use understory_popover::types::{AnchorConfig, AnchorPosition};

fn gen_origins(n: usize, container: Size) -> Vec<Rect> {
    // Deterministic spread over the container, including rects that hang off its edges.
    let mut out = Vec::with_capacity(n);
    let mut s: u64 = 0x9E37_79B9_7F4A_7C15;
    for _ in 0..n {
        s ^= s << 13;
        s ^= s >> 7;
        s ^= s << 17;
        let fx = (s % 10_000) as f64 / 10_000.0;
        let fy = ((s >> 20) % 10_000) as f64 / 10_000.0;
        let x0 = fx * (container.width + 80.0) - 40.0;
        let y0 = fy * (container.height + 40.0) - 20.0;
        out.push(Rect::from_origin_size((x0, y0), (80.0, 24.0)));
    }
    out
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let container = Size::new(1280.0, 800.0);
    let content = Some(Size::new(220.0, 140.0));
    for &n in &[64usize, 1024] {
        let origins = gen_origins(n, container);
        group.throughput(Throughput::Elements((n * AnchorPosition::ALL.len()) as u64));
        group.bench_function(format!("all_origin_anchors_n{}", n), |b| {
            b.iter(|| {
                let mut acc = 0.0;
                for &origin in &origins {
                    for &anchor in &AnchorPosition::ALL {
                        let config = AnchorConfig::default().with_origin_anchor(anchor);
                        let p = resolve(Some(origin), content, container, &config);
                        acc += p.x + p.y;
                    }
                }
                black_box(acc);
            })
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let origin = Rect::from_origin_size((600.0, 380.0), (80.0, 24.0));

    let mut warm = Pipeline::new();
    warm.set_container_size(Size::new(1280.0, 800.0));
    warm.begin(origin, AnchorConfig::default());
    warm.set_content_size(Size::new(220.0, 140.0));
    group.bench_function("placement_memoized", |b| {
        b.iter(|| black_box(warm.placement()))
    });

    let sizes: Vec<Size> = (0..64)
        .map(|i| Size::new(900.0 + 10.0 * i as f64, 600.0 + 5.0 * i as f64))
        .collect();
    group.throughput(Throughput::Elements(sizes.len() as u64));
    group.bench_function("placement_after_container_resize", |b| {
        b.iter_batched(
            || {
                let mut p = Pipeline::new();
                p.begin(origin, AnchorConfig::default());
                p.set_content_size(Size::new(220.0, 140.0));
                p
            },
            |mut p| {
                for &s in &sizes {
                    p.set_container_size(s);
                    black_box(p.placement());
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_coordinator(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinator");
    let origins = gen_origins(64, Size::new(1280.0, 800.0));
    group.throughput(Throughput::Elements(origins.len() as u64));
    group.bench_function("open_reveal_place_replace", |b| {
        b.iter_batched(
            || {
                let mut c: Coordinator<u32, u32> = Coordinator::default();
                c.set_container_size(Size::new(1280.0, 800.0));
                c
            },
            |mut c| {
                for (i, &origin) in origins.iter().enumerate() {
                    let key = i as u32;
                    let request = PopoverRequest::new(move |_| key);
                    if let Some(id) = c.open(key, request, Some(origin)) {
                        c.set_content_size(id, Size::new(220.0, 140.0));
                    }
                    black_box(c.placement());
                }
                black_box(c.close());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_pipeline, bench_coordinator);
criterion_main!(benches);
