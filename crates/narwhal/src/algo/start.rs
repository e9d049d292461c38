use std::f64::consts::PI;

use nalgebra::Vector2;

use super::rng::XorShift64Star;
use crate::point::Point;

/// Relative jitter applied to the default circle so symmetric graphs do not start on a saddle.
const START_JITTER: f64 = 0.01;

/// Initial positions for an iterative solver.
///
/// Caller-provided locations win. Otherwise vertices sit on a circle, in index order, with a
/// chord of `optimal_distance` between consecutive vertices, jittered by the seeded generator.
pub(super) fn start_positions(
    n: usize,
    optimal_distance: f64,
    initial_locs: Option<&[Point]>,
    random_seed: u64,
) -> Vec<Vector2<f64>> {
    if let Some(locs) = initial_locs {
        return locs.iter().map(|p| Vector2::new(p.x, p.y)).collect();
    }
    if n <= 1 {
        return vec![Vector2::zeros(); n];
    }

    let mut rng = XorShift64Star::new(random_seed);
    let radius = optimal_distance / (2.0 * (PI / n as f64).sin());
    let jitter = START_JITTER * optimal_distance;
    (0..n)
        .map(|i| {
            let angle = 2.0 * PI * (i as f64) / (n as f64);
            let jx = rng.next_f64_signed() * jitter;
            let jy = rng.next_f64_signed() * jitter;
            Vector2::new(radius * angle.cos() + jx, radius * angle.sin() + jy)
        })
        .collect()
}

pub(super) fn to_points(positions: &[Vector2<f64>]) -> Vec<Point> {
    positions.iter().map(|p| Point::new(p.x, p.y)).collect()
}
