#![cfg(feature = "rayon")]

use hausmatch::{DistanceNorm, EdgeMask, MatchConfig, Matcher, Shape, SweepRange};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_shape(rng: &mut StdRng, width: usize, height: usize, count: usize) -> Shape {
    let points: Vec<(usize, usize)> = (0..count)
        .map(|_| (rng.random_range(0..width), rng.random_range(0..height)))
        .collect();
    Shape::from_edges(
        EdgeMask::from_points(width, height, &points).unwrap(),
        DistanceNorm::L1,
    )
}

#[test]
fn parallel_matches_sequential_translation() {
    let mut rng = StdRng::seed_from_u64(11);
    let haystack = random_shape(&mut rng, 90, 70, 300);
    let needle = random_shape(&mut rng, 17, 13, 25);
    let base = MatchConfig {
        initial_step: 16,
        ..MatchConfig::default()
    };

    let seq = Matcher::new(needle.clone(), haystack.clone()).with_config(MatchConfig {
        parallel: false,
        ..base.clone()
    });
    let par = Matcher::new(needle, haystack).with_config(MatchConfig {
        parallel: true,
        ..base
    });

    assert_eq!(seq.search_translation(), par.search_translation());
}

#[test]
fn parallel_matches_sequential_pose_sweep() {
    let mut rng = StdRng::seed_from_u64(5);
    let haystack = random_shape(&mut rng, 64, 48, 180);
    let needle = random_shape(&mut rng, 15, 15, 20);
    let base = MatchConfig {
        initial_step: 8,
        rotation: SweepRange::new(-20.0, 20.0, 10.0),
        scale: SweepRange::new(0.75, 1.25, 0.25),
        ..MatchConfig::default()
    };

    let seq = Matcher::new(needle.clone(), haystack.clone()).with_config(MatchConfig {
        parallel: false,
        ..base.clone()
    });
    let par = Matcher::new(needle, haystack).with_config(MatchConfig {
        parallel: true,
        ..base
    });

    let seq_best = seq.search_pose().unwrap();
    let par_best = par.search_pose().unwrap();
    assert_eq!(seq_best, par_best);
}
