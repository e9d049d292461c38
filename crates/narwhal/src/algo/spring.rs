//! Force-directed spring layout.
//!
//! Every pair of vertices repels with magnitude `REPULSION_STRENGTH * k^2 / d`, every edge pulls
//! its endpoints together with Hooke force `d - k`, where `k` is the optimal distance. A sweep
//! computes all net forces against the previous iterate (Jacobi update), so vertex order never
//! affects the result. Each movable vertex then moves by its net force divided by
//! `2 * max(degree, 1)`, clamped to the current temperature, which cools linearly from
//! `initial_speed` towards zero over `max_iter` sweeps. There is no convergence check: exactly
//! `max_iter` sweeps run.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::start::{start_positions, to_points};
use super::{
    DEFAULT_OPTIMAL_DISTANCE, check_initial_locs, check_mask, check_optimal_distance,
    golden_direction, is_movable,
};
use crate::error::{Error, Result};
use crate::graph::{GraphView, Topology};
use crate::point::Point;

pub const DEFAULT_MAX_ITER: usize = 100;

/// Scale of the pairwise repulsion relative to the edge springs.
///
/// Repulsion is summed over all pairs, so edges settle slightly longer than the optimal distance:
/// a regular 6-cycle ends with edges about 1.05x `k`. Larger graphs stretch further.
const REPULSION_STRENGTH: f64 = 0.02;

/// Separations below `MIN_SEPARATION * k` are treated as exactly this far apart.
const MIN_SEPARATION: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringLayout {
    /// Target length of an edge.
    pub optimal_distance: f64,
    /// Number of update sweeps.
    pub max_iter: usize,
    /// Starting temperature (maximum displacement per sweep). `None` means
    /// `2 * optimal_distance`.
    pub initial_speed: Option<f64>,
    /// `false` pins a vertex at its start position.
    pub mask: Option<Vec<bool>>,
    pub initial_locs: Option<Vec<Point>>,
    /// Seed for the default start placement; ignored when `initial_locs` is set.
    pub random_seed: u64,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            optimal_distance: DEFAULT_OPTIMAL_DISTANCE,
            max_iter: DEFAULT_MAX_ITER,
            initial_speed: None,
            mask: None,
            initial_locs: None,
            random_seed: 0,
        }
    }
}

impl SpringLayout {
    pub fn new(optimal_distance: f64) -> Self {
        Self {
            optimal_distance,
            ..Self::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_initial_speed(mut self, initial_speed: f64) -> Self {
        self.initial_speed = Some(initial_speed);
        self
    }

    pub fn with_mask(mut self, mask: Vec<bool>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_initial_locs(mut self, locs: Vec<Point>) -> Self {
        self.initial_locs = Some(locs);
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    /// Temperature at the start of the first sweep.
    pub fn effective_initial_speed(&self) -> f64 {
        self.initial_speed.unwrap_or(2.0 * self.optimal_distance)
    }

    pub fn solve<G: GraphView>(&self, graph: &G) -> Result<Vec<Point>> {
        layout(&Topology::from_view(graph)?, self)
    }

    fn validate(&self, n: usize) -> Result<()> {
        check_optimal_distance(self.optimal_distance)?;
        if let Some(speed) = self.initial_speed {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(Error::config(format!(
                    "initial_speed must be finite and non-negative, got {speed}"
                )));
            }
        }
        check_mask(self.mask.as_deref(), n)?;
        check_initial_locs(self.initial_locs.as_deref(), n)
    }
}

pub(crate) fn layout(topology: &Topology, opts: &SpringLayout) -> Result<Vec<Point>> {
    let n = topology.vertex_count();
    opts.validate(n)?;

    let k = opts.optimal_distance;
    let initial_speed = opts.effective_initial_speed();
    let mask = opts.mask.as_deref();
    let mut pos = start_positions(n, k, opts.initial_locs.as_deref(), opts.random_seed);

    debug!(
        vertices = n,
        edges = topology.edge_count(),
        optimal_distance = k,
        max_iter = opts.max_iter,
        initial_speed,
        "spring layout start"
    );
    let start = std::time::Instant::now();

    let step_scale: Vec<f64> = (0..n)
        .map(|v| 1.0 / (2.0 * topology.degree(v).max(1) as f64))
        .collect();
    let mut force: Vec<Vector2<f64>> = vec![Vector2::zeros(); n];

    for iter in 0..opts.max_iter {
        let temperature = initial_speed * (1.0 - iter as f64 / opts.max_iter as f64);
        force.fill(Vector2::zeros());

        for i in 0..n {
            for j in (i + 1)..n {
                let (dir, dist) = separation(&pos, i, j, k);
                let repulsion = dir * (REPULSION_STRENGTH * k * k / dist);
                force[i] -= repulsion;
                force[j] += repulsion;
            }
        }

        for (a, b, _) in topology.edges() {
            let (dir, dist) = separation(&pos, a, b, k);
            let spring = dir * (dist - k);
            force[a] += spring;
            force[b] -= spring;
        }

        let mut total_displacement = 0.0;
        for v in 0..n {
            if !is_movable(mask, v) {
                continue;
            }
            let mut step = force[v] * step_scale[v];
            let len = step.norm();
            if len > temperature {
                step *= temperature / len;
            }
            pos[v] += step;
            total_displacement += step.norm();
        }
        trace!(iter, temperature, total_displacement, "spring sweep");
    }

    debug!(
        iterations = opts.max_iter,
        elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
        "spring layout finished"
    );
    Ok(to_points(&pos))
}

/// Unit vector from `i` towards `j` and their distance, floored at `MIN_SEPARATION * k`.
///
/// Coincident vertices get a fixed direction derived from the pair's indices, so repeated runs
/// split them the same way.
fn separation(pos: &[Vector2<f64>], i: usize, j: usize, k: f64) -> (Vector2<f64>, f64) {
    let delta = pos[j] - pos[i];
    let dist = delta.norm();
    let min_dist = MIN_SEPARATION * k;
    let dir = if dist > 0.0 {
        delta / dist
    } else {
        golden_direction((i + 1) * (j + 1))
    };
    (dir, dist.max(min_dist))
}
