use hausmatch::{
    combined_shape_distance, search_grid, search_hierarchical, search_hierarchical_passes,
    CancelToken, DistanceField, DistanceNorm, EdgeMask, Offset, SearchBounds, Shape,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn square_outline(x0: usize, y0: usize, side: usize) -> Vec<(usize, usize)> {
    let mut points = Vec::new();
    for i in 0..side {
        points.push((x0 + i, y0));
        points.push((x0 + i, y0 + side - 1));
        points.push((x0, y0 + i));
        points.push((x0 + side - 1, y0 + i));
    }
    points
}

#[test]
fn single_edge_lands_on_the_zero_cell() {
    let needle = Shape::from_edges(
        EdgeMask::from_points(10, 10, &[(5, 5)]).unwrap(),
        DistanceNorm::L1,
    );
    let mut values = vec![1.0f32; 30 * 30];
    values[12 * 30 + 15] = 0.0;
    let haystack = Shape::new(
        EdgeMask::from_points(30, 30, &[(15, 12)]).unwrap(),
        DistanceField::from_vec(values, 30, 30).unwrap(),
    )
    .unwrap();

    let found = search_grid(&needle, &haystack, 1, SearchBounds::new(0, 0, 20, 20)).unwrap();
    assert_eq!(found.offset(), Offset::new(10, 7));
    assert_eq!(found.score, 0.0);
    assert!(found.has_overlap());
}

#[test]
fn empty_bounds_report_no_result() {
    let needle = Shape::from_edges(
        EdgeMask::from_points(4, 4, &[(1, 1)]).unwrap(),
        DistanceNorm::L1,
    );
    let haystack = Shape::from_edges(
        EdgeMask::from_points(16, 16, &[(8, 8)]).unwrap(),
        DistanceNorm::L1,
    );
    assert!(search_grid(&needle, &haystack, 1, SearchBounds::new(5, 0, 5, 12)).is_none());
    assert!(search_grid(&needle, &haystack, 2, SearchBounds::new(0, 7, 12, 3)).is_none());
}

#[test]
fn needle_larger_than_haystack_reports_no_result() {
    let needle = Shape::from_edges(
        EdgeMask::from_points(20, 20, &[(1, 1)]).unwrap(),
        DistanceNorm::L1,
    );
    let haystack = Shape::from_edges(
        EdgeMask::from_points(16, 16, &[(8, 8)]).unwrap(),
        DistanceNorm::L1,
    );
    assert!(search_hierarchical(&needle, &haystack, 4, &CancelToken::new()).is_none());
}

#[test]
fn unit_step_grid_matches_exhaustive_scan() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..10 {
        let hay_points: Vec<(usize, usize)> = (0..30)
            .map(|_| (rng.random_range(0..20), rng.random_range(0..20)))
            .collect();
        let needle_points: Vec<(usize, usize)> = (0..6)
            .map(|_| (rng.random_range(0..7), rng.random_range(0..7)))
            .collect();
        let haystack = Shape::from_edges(
            EdgeMask::from_points(20, 20, &hay_points).unwrap(),
            DistanceNorm::L1,
        );
        let needle = Shape::from_edges(
            EdgeMask::from_points(7, 7, &needle_points).unwrap(),
            DistanceNorm::L1,
        );

        let bounds = SearchBounds::placements(needle.dims(), haystack.dims());
        let mut expected_offset = None;
        let mut expected_score = f32::INFINITY;
        for dy in bounds.min_y..bounds.max_y {
            for dx in bounds.min_x..bounds.max_x {
                let offset = Offset::new(dx, dy);
                let score = combined_shape_distance(&needle, &haystack, offset);
                if score < expected_score {
                    expected_score = score;
                    expected_offset = Some(offset);
                }
            }
        }

        let found = search_grid(&needle, &haystack, 1, bounds).unwrap();
        assert_eq!(found.score, expected_score);
        assert_eq!(Some(found.offset()), expected_offset);
    }
}

#[test]
fn coarse_to_fine_finds_planted_square() {
    let haystack = Shape::from_edges(
        EdgeMask::from_points(64, 64, &square_outline(25, 19, 12)).unwrap(),
        DistanceNorm::L1,
    );
    let needle = Shape::from_edges(
        EdgeMask::from_points(16, 16, &square_outline(2, 2, 12)).unwrap(),
        DistanceNorm::L1,
    );

    let found = search_hierarchical(&needle, &haystack, 8, &CancelToken::new()).unwrap();
    assert_eq!(found.offset(), Offset::new(23, 17));
    assert_eq!(found.score, 0.0);
}

#[test]
fn passes_never_get_worse() {
    let mut rng = StdRng::seed_from_u64(99);
    let hay_points: Vec<(usize, usize)> = (0..80)
        .map(|_| (rng.random_range(0..48), rng.random_range(0..40)))
        .collect();
    let haystack = Shape::from_edges(
        EdgeMask::from_points(48, 40, &hay_points).unwrap(),
        DistanceNorm::L1,
    );
    let needle = Shape::from_edges(
        EdgeMask::from_points(12, 10, &square_outline(1, 1, 8)).unwrap(),
        DistanceNorm::L1,
    );

    let cancel = CancelToken::new();
    let passes = search_hierarchical_passes(&needle, &haystack, 16, &cancel);
    // Steps 16, 8, 4, 2, 1.
    assert_eq!(passes.len(), 5);
    for pair in passes.windows(2) {
        assert!(pair[1].score <= pair[0].score);
    }
    let last = search_hierarchical(&needle, &haystack, 16, &cancel).unwrap();
    assert_eq!(passes.last().copied(), Some(last));
}

#[test]
fn zero_initial_step_reports_no_result() {
    let needle = Shape::from_edges(
        EdgeMask::from_points(4, 4, &[(1, 1)]).unwrap(),
        DistanceNorm::L1,
    );
    let haystack = Shape::from_edges(
        EdgeMask::from_points(16, 16, &[(8, 8)]).unwrap(),
        DistanceNorm::L1,
    );
    assert!(search_hierarchical(&needle, &haystack, 0, &CancelToken::new()).is_none());
    assert!(search_hierarchical_passes(&needle, &haystack, 0, &CancelToken::new()).is_empty());
}
