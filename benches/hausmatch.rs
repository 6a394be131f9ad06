use criterion::{criterion_group, criterion_main, Criterion};
use hausmatch::{
    combined_shape_distance, CancelToken, DistanceField, DistanceNorm, EdgeMask, MatchConfig,
    Matcher, Offset, Shape, SweepRange,
};
use std::hint::black_box;

fn ring_points(cx: usize, cy: usize, radius: f32, samples: usize) -> Vec<(usize, usize)> {
    (0..samples)
        .map(|i| {
            let t = i as f32 / samples as f32 * std::f32::consts::TAU;
            let x = cx as f32 + radius * t.cos();
            let y = cy as f32 + radius * t.sin() * 0.6;
            (x.round() as usize, y.round() as usize)
        })
        .collect()
}

fn make_scene() -> (Shape, Shape) {
    let mut hay_points = ring_points(300, 200, 40.0, 400);
    for i in 0..512 {
        hay_points.push(((i * 37) % 512, (i * 91) % 384));
    }
    let haystack = Shape::from_edges(
        EdgeMask::from_points(512, 384, &hay_points).unwrap(),
        DistanceNorm::L1,
    );
    let needle = Shape::from_edges(
        EdgeMask::from_points(96, 64, &ring_points(48, 32, 40.0, 400)).unwrap(),
        DistanceNorm::L1,
    );
    (needle, haystack)
}

fn bench_metric(c: &mut Criterion) {
    let (needle, haystack) = make_scene();
    c.bench_function("combined_distance", |b| {
        b.iter(|| {
            combined_shape_distance(
                black_box(&needle),
                black_box(&haystack),
                black_box(Offset::new(252, 168)),
            )
        })
    });

    let edges = haystack.edges().clone();
    c.bench_function("distance_transform_l1", |b| {
        b.iter(|| DistanceField::from_edges(black_box(&edges), DistanceNorm::L1))
    });
    c.bench_function("distance_transform_euclidean", |b| {
        b.iter(|| DistanceField::from_edges(black_box(&edges), DistanceNorm::Euclidean))
    });
}

fn bench_search(c: &mut Criterion) {
    let (needle, haystack) = make_scene();
    let translation = Matcher::new(needle.clone(), haystack.clone()).with_config(MatchConfig {
        initial_step: 16,
        ..MatchConfig::default()
    });
    c.bench_function("translation_hierarchical", |b| {
        b.iter(|| black_box(translation.search_translation_with(&CancelToken::new())))
    });

    let pose = Matcher::new(needle, haystack).with_config(MatchConfig {
        initial_step: 16,
        rotation: SweepRange::new(-8.0, 8.0, 4.0),
        scale: SweepRange::new(0.9, 1.1, 0.1),
        ..MatchConfig::default()
    });
    let mut group = c.benchmark_group("pose_sweep");
    group.sample_size(10);
    group.bench_function("rotation_scale", |b| b.iter(|| black_box(pose.search_pose())));
    group.finish();
}

criterion_group!(benches, bench_metric, bench_search);
criterion_main!(benches);
