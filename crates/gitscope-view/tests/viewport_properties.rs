//! Property tests for viewport math and pinch tracking.

#![allow(clippy::unwrap_used)]

use gitscope_graph::model::Bounds;
use gitscope_view::viewport::{MAX_SCALE, MIN_SCALE, Viewport};
use gitscope_view::{Pinch, TouchPoint};
use proptest::prelude::*;

fn factor() -> impl Strategy<Value = f64> {
    prop_oneof![
        0.0..100.0_f64,
        Just(0.0),
        Just(f64::INFINITY),
        Just(f64::NAN),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn zoom_never_leaves_the_clamp(factors in prop::collection::vec(factor(), 1..30)) {
        let mut vp = Viewport::default();
        for f in factors {
            vp.zoom_by(f);
            prop_assert!(vp.scale.is_finite());
            prop_assert!((MIN_SCALE..=MAX_SCALE).contains(&vp.scale));
        }
    }

    #[test]
    fn fitted_viewport_shows_whole_graph(
        x0 in -5_000.0..5_000.0_f64,
        y0 in -5_000.0..5_000.0_f64,
        w in 0.0..4_000.0_f64,
        h in 0.0..4_000.0_f64,
        cols in 10_u16..300,
        rows in 5_u16..100,
    ) {
        let bounds = Bounds { min_x: x0, min_y: y0, max_x: x0 + w, max_y: y0 + h };
        let vp = Viewport::fitted(bounds, cols, rows);
        // Only guaranteed while the scale is not pinned at the minimum.
        prop_assume!(vp.scale > MIN_SCALE);
        let [left, right] = vp.x_bounds(cols);
        let [bottom, top] = vp.y_bounds(rows);
        prop_assert!(left <= bounds.min_x + 1e-6 && right >= bounds.max_x - 1e-6);
        prop_assert!(bottom <= bounds.min_y + 1e-6 && top >= bounds.max_y - 1e-6);
    }

    #[test]
    fn pinch_factor_is_distance_ratio(d1 in 1.0..1_000.0_f64, d2 in 1.0..1_000.0_f64) {
        let mut pinch = Pinch::default();
        let at = |d: f64| [TouchPoint::new(0.0, 0.0), TouchPoint::new(d, 0.0)];
        prop_assert_eq!(pinch.on_move(&at(d1)), None);
        let factor = pinch.on_move(&at(d2)).unwrap();
        prop_assert!((factor - d2 / d1).abs() < 1e-9);
    }

    #[test]
    fn pinch_never_yields_degenerate_factor(
        points in prop::collection::vec((-1e3..1e3_f64, -1e3..1e3_f64), 0..4),
        repeat in 1_usize..4,
    ) {
        let points: Vec<TouchPoint> = points.into_iter().map(|(x, y)| TouchPoint::new(x, y)).collect();
        let mut pinch = Pinch::default();
        for _ in 0..repeat {
            if let Some(f) = pinch.on_move(&points) {
                prop_assert!(f.is_finite() && f > 0.0);
            }
        }
    }
}
