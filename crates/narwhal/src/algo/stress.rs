//! Stress majorization (SMACOF).
//!
//! Minimizes `sum_{i<j} w_ij (|x_i - x_j| - d_ij)^2` where `d_ij` is the shortest-path distance
//! scaled by the optimal distance. Each iteration replaces the movable rows of `X` with the exact
//! minimizer of the quadratic majorizer at the previous iterate (the Guttman transform), so the
//! stress never increases.
//!
//! The transform cannot separate vertices that sit on the same point. Before the first iteration,
//! every movable vertex sharing its start position with another vertex is nudged by
//! `COINCIDENT_OFFSET * k` along `golden_direction(v + 1)`.

use nalgebra::DMatrix;
use nalgebra::linalg::SVD;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::start::start_positions;
use super::{
    DEFAULT_OPTIMAL_DISTANCE, check_initial_locs, check_mask, check_optimal_distance,
    golden_direction, is_movable,
};
use crate::error::{Error, Result};
use crate::graph::{GraphView, Topology, all_pairs_shortest_paths};
use crate::point::Point;

pub const DEFAULT_REL_TOL: f64 = 1e-2;

/// Target distance for pairs in different components, as a multiple of the longest finite
/// shortest path (at least one hop).
pub const DISCONNECTED_DISTANCE_FACTOR: f64 = 1.5;

const PSEUDO_INVERSE_EPS: f64 = 1e-10;

/// Start offset for coincident vertices, as a fraction of the optimal distance.
const COINCIDENT_OFFSET: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressLayout {
    pub optimal_distance: f64,
    /// Iteration cap. `None` means `400 * n^2`.
    pub max_iter: Option<usize>,
    /// Stop once an iteration improves stress by at most this fraction.
    pub rel_tol: f64,
    /// Per-pair stress weights, `n x n`, symmetric and non-negative. `None` means
    /// `1 / d_ij^2`.
    pub weights: Option<Vec<Vec<f64>>>,
    pub mask: Option<Vec<bool>>,
    pub initial_locs: Option<Vec<Point>>,
    pub random_seed: u64,
}

impl Default for StressLayout {
    fn default() -> Self {
        Self {
            optimal_distance: DEFAULT_OPTIMAL_DISTANCE,
            max_iter: None,
            rel_tol: DEFAULT_REL_TOL,
            weights: None,
            mask: None,
            initial_locs: None,
            random_seed: 0,
        }
    }
}

impl StressLayout {
    pub fn new(optimal_distance: f64) -> Self {
        Self {
            optimal_distance,
            ..Self::default()
        }
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    pub fn with_rel_tol(mut self, rel_tol: f64) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    pub fn with_weights(mut self, weights: Vec<Vec<f64>>) -> Self {
        self.weights = Some(weights);
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

    pub fn effective_max_iter(&self, n: usize) -> usize {
        self.max_iter.unwrap_or_else(|| 400usize.saturating_mul(n.saturating_mul(n)))
    }

    pub fn solve<G: GraphView>(&self, graph: &G) -> Result<Vec<Point>> {
        layout(&Topology::from_view(graph)?, self)
    }

    /// Weighted stress of `positions` under this configuration's targets and weights.
    pub fn stress<G: GraphView>(&self, graph: &G, positions: &[Point]) -> Result<f64> {
        let topology = Topology::from_view(graph)?;
        let n = topology.vertex_count();
        self.validate(n)?;
        check_initial_locs(Some(positions), n)?;
        let problem = StressProblem::new(&topology, self);
        let x = DMatrix::<f64>::from_fn(n, 2, |i, c| {
            if c == 0 {
                positions[i].x
            } else {
                positions[i].y
            }
        });
        Ok(problem.stress(&x))
    }

    fn validate(&self, n: usize) -> Result<()> {
        check_optimal_distance(self.optimal_distance)?;
        if !(self.rel_tol.is_finite() && self.rel_tol >= 0.0) {
            return Err(Error::config(format!(
                "rel_tol must be finite and non-negative, got {}",
                self.rel_tol
            )));
        }
        if let Some(w) = &self.weights {
            check_weights(w, n)?;
        }
        check_mask(self.mask.as_deref(), n)?;
        check_initial_locs(self.initial_locs.as_deref(), n)
    }
}

fn check_weights(w: &[Vec<f64>], n: usize) -> Result<()> {
    if w.len() != n || w.iter().any(|row| row.len() != n) {
        return Err(Error::config(format!("weights must be a {n}x{n} matrix")));
    }
    for i in 0..n {
        for j in 0..n {
            let v = w[i][j];
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::config(format!(
                    "weights[{i}][{j}] must be finite and non-negative, got {v}"
                )));
            }
            if (v - w[j][i]).abs() > 1e-12 * v.abs().max(1.0) {
                return Err(Error::config(format!(
                    "weights must be symmetric: weights[{i}][{j}] = {v}, weights[{j}][{i}] = {}",
                    w[j][i]
                )));
            }
        }
    }
    Ok(())
}

/// Targets and weights for one solve.
struct StressProblem {
    target: DMatrix<f64>,
    weight: DMatrix<f64>,
}

impl StressProblem {
    fn new(topology: &Topology, opts: &StressLayout) -> Self {
        let n = topology.vertex_count();
        let k = opts.optimal_distance;
        let hops = all_pairs_shortest_paths(topology);
        let longest = hops
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(0.0f64, f64::max);
        let fallback = DISCONNECTED_DISTANCE_FACTOR * longest.max(1.0);

        let target = DMatrix::<f64>::from_fn(n, n, |i, j| {
            if i == j {
                0.0
            } else if hops[(i, j)].is_finite() {
                hops[(i, j)] * k
            } else {
                fallback * k
            }
        });
        let weight = DMatrix::<f64>::from_fn(n, n, |i, j| {
            if i == j {
                0.0
            } else if let Some(w) = &opts.weights {
                w[i][j]
            } else {
                1.0 / (target[(i, j)] * target[(i, j)])
            }
        });
        Self { target, weight }
    }

    fn stress(&self, x: &DMatrix<f64>) -> f64 {
        let n = x.nrows();
        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let w = self.weight[(i, j)];
                if w == 0.0 {
                    continue;
                }
                let e = row_distance(x, i, j) - self.target[(i, j)];
                total += w * e * e;
            }
        }
        total
    }

    fn weighted_laplacian(&self) -> DMatrix<f64> {
        let n = self.weight.nrows();
        let mut l = -self.weight.clone();
        for i in 0..n {
            l[(i, i)] = (0..n).filter(|&j| j != i).map(|j| self.weight[(i, j)]).sum();
        }
        l
    }

    /// `L_Z(X) X`, the right-hand side of the Guttman transform.
    fn majorizer_rhs(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        let n = x.nrows();
        let mut lz = DMatrix::<f64>::zeros(n, n);
        for i in 0..n {
            for j in (i + 1)..n {
                let dist = row_distance(x, i, j);
                if dist <= 0.0 {
                    continue;
                }
                let v = -self.weight[(i, j)] * self.target[(i, j)] / dist;
                lz[(i, j)] = v;
                lz[(j, i)] = v;
                lz[(i, i)] -= v;
                lz[(j, j)] -= v;
            }
        }
        lz * x
    }
}

/// Linear solve for the movable rows, fixed for the whole run.
enum UpdateSolver {
    /// Every vertex moves: `X' = L_w^+ L_Z X`.
    Free { inverse: DMatrix<f64> },
    /// `L_w[M,M] X'_M = (L_Z X)_M - L_w[M,P] X_P`.
    Pinned {
        movable: Vec<usize>,
        inverse: DMatrix<f64>,
        pinned_term: DMatrix<f64>,
    },
}

impl UpdateSolver {
    fn new(lw: DMatrix<f64>, mask: Option<&[bool]>, x0: &DMatrix<f64>) -> Option<Self> {
        let n = lw.nrows();
        let (movable, pinned): (Vec<usize>, Vec<usize>) =
            (0..n).partition(|&v| is_movable(mask, v));
        if movable.is_empty() {
            return None;
        }
        if pinned.is_empty() {
            return Some(UpdateSolver::Free {
                inverse: pseudo_inverse(lw),
            });
        }

        let lmm = lw.select_rows(&movable).select_columns(&movable);
        let lmp = lw.select_rows(&movable).select_columns(&pinned);
        let pinned_term = lmp * x0.select_rows(&pinned);
        let inverse = match lmm.clone().cholesky() {
            Some(chol) => chol.inverse(),
            None => pseudo_inverse(lmm),
        };
        Some(UpdateSolver::Pinned {
            movable,
            inverse,
            pinned_term,
        })
    }

    fn apply(&self, rhs: &DMatrix<f64>, x: &DMatrix<f64>) -> DMatrix<f64> {
        match self {
            UpdateSolver::Free { inverse } => inverse * rhs,
            UpdateSolver::Pinned {
                movable,
                inverse,
                pinned_term,
            } => {
                let solved = inverse * (rhs.select_rows(movable) - pinned_term);
                let mut next = x.clone();
                for (row, &v) in movable.iter().enumerate() {
                    next[(v, 0)] = solved[(row, 0)];
                    next[(v, 1)] = solved[(row, 1)];
                }
                next
            }
        }
    }
}

pub(crate) fn layout(topology: &Topology, opts: &StressLayout) -> Result<Vec<Point>> {
    let n = topology.vertex_count();
    opts.validate(n)?;

    let k = opts.optimal_distance;
    let max_iter = opts.effective_max_iter(n);
    let start = start_positions(n, k, opts.initial_locs.as_deref(), opts.random_seed);
    let mut x = DMatrix::<f64>::from_fn(n, 2, |i, c| start[i][c]);

    debug!(
        vertices = n,
        edges = topology.edge_count(),
        optimal_distance = k,
        max_iter,
        rel_tol = opts.rel_tol,
        "stress layout start"
    );
    let timer = std::time::Instant::now();

    let problem = StressProblem::new(topology, opts);
    let solver = UpdateSolver::new(problem.weighted_laplacian(), opts.mask.as_deref(), &x);
    if solver.is_some() && max_iter > 0 {
        let moved = split_coincident(&mut x, opts.mask.as_deref(), k);
        if moved > 0 {
            debug!(vertices = moved, "split coincident start positions");
        }
    }
    let mut current = problem.stress(&x);
    let mut iterations = 0usize;

    if let Some(solver) = solver {
        while iterations < max_iter && current > 0.0 {
            let next = solver.apply(&problem.majorizer_rhs(&x), &x);
            let next_stress = problem.stress(&next);
            iterations += 1;
            if !(next_stress.is_finite() && next_stress <= current) {
                break;
            }
            let improvement = (current - next_stress) / current;
            x = next;
            current = next_stress;
            trace!(iteration = iterations, stress = current, improvement, "stress step");
            if improvement <= opts.rel_tol {
                break;
            }
        }
    }

    debug!(
        iterations,
        stress = current,
        elapsed_ms = timer.elapsed().as_secs_f64() * 1e3,
        "stress layout finished"
    );
    Ok((0..n).map(|i| Point::new(x[(i, 0)], x[(i, 1)])).collect())
}

/// Nudges each movable vertex that shares its position with another vertex. Returns the number
/// of vertices moved.
fn split_coincident(x: &mut DMatrix<f64>, mask: Option<&[bool]>, k: f64) -> usize {
    let n = x.nrows();
    let stacked: Vec<usize> = (0..n)
        .filter(|&v| is_movable(mask, v))
        .filter(|&v| (0..n).any(|u| u != v && row_distance(x, u, v) == 0.0))
        .collect();
    for &v in &stacked {
        let dir = golden_direction(v + 1);
        x[(v, 0)] += COINCIDENT_OFFSET * k * dir.x;
        x[(v, 1)] += COINCIDENT_OFFSET * k * dir.y;
    }
    stacked.len()
}

fn row_distance(x: &DMatrix<f64>, i: usize, j: usize) -> f64 {
    (x[(i, 0)] - x[(j, 0)]).hypot(x[(i, 1)] - x[(j, 1)])
}

/// Moore-Penrose inverse of a symmetric positive semi-definite matrix; singular values below
/// `PSEUDO_INVERSE_EPS` (relative to the largest) are treated as zero.
fn pseudo_inverse(m: DMatrix<f64>) -> DMatrix<f64> {
    let (rows, cols) = m.shape();
    let svd = SVD::new(m, true, true);
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return DMatrix::zeros(cols, rows);
    };
    let s = svd.singular_values;
    let cutoff = PSEUDO_INVERSE_EPS * s.iter().copied().fold(0.0f64, f64::max);
    let sigma_inv = DMatrix::<f64>::from_fn(s.len(), s.len(), |i, j| {
        if i == j && s[i] > cutoff {
            1.0 / s[i]
        } else {
            0.0
        }
    });
    v_t.transpose() * sigma_inv * u.transpose()
}
