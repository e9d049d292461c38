//! Spectral layout: coordinates from the Laplacian eigenvectors with the smallest non-zero
//! eigenvalues.
//!
//! Disconnected graphs get a virtual hub vertex joined to one minimum-degree vertex of every
//! component, so the Laplacian has a single zero eigenvalue. The hub is dropped from the output.

use nalgebra::DMatrix;
use nalgebra::linalg::SymmetricEigen;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DEFAULT_OPTIMAL_DISTANCE, check_optimal_distance};
use crate::error::{Error, Result};
use crate::graph::{GraphView, Topology, connected_components};
use crate::point::{Locations, Point, Point3};

const HUB_EDGE_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralLayout {
    /// Mean pairwise distance of the output.
    pub optimal_distance: f64,
    /// 2 or 3.
    pub dimension: usize,
}

impl Default for SpectralLayout {
    fn default() -> Self {
        Self {
            optimal_distance: DEFAULT_OPTIMAL_DISTANCE,
            dimension: 2,
        }
    }
}

impl SpectralLayout {
    pub fn new(optimal_distance: f64) -> Self {
        Self {
            optimal_distance,
            ..Self::default()
        }
    }

    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn solve<G: GraphView>(&self, graph: &G) -> Result<Locations> {
        layout(&Topology::from_view(graph)?, self)
    }

    fn validate(&self) -> Result<()> {
        check_optimal_distance(self.optimal_distance)?;
        if !matches!(self.dimension, 2 | 3) {
            return Err(Error::config(format!(
                "spectral dimension must be 2 or 3, got {}",
                self.dimension
            )));
        }
        Ok(())
    }
}

pub(crate) fn layout(topology: &Topology, opts: &SpectralLayout) -> Result<Locations> {
    opts.validate()?;
    let n = topology.vertex_count();
    let dim = opts.dimension;

    let laplacian = connected_laplacian(topology);
    debug!(
        vertices = n,
        edges = topology.edge_count(),
        hub = laplacian.nrows() > n,
        dimension = dim,
        "spectral layout start"
    );
    let timer = std::time::Instant::now();

    let mut coords = DMatrix::<f64>::zeros(n, dim);
    if n > 1 {
        let eigen = SymmetricEigen::new(laplacian);
        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[a]
                .total_cmp(&eigen.eigenvalues[b])
                .then(a.cmp(&b))
        });

        // The first mode is the constant vector.
        let modes: Vec<usize> = order.iter().skip(1).take(dim).copied().collect();
        for (axis, &mode) in modes.iter().enumerate() {
            let values: Vec<f64> = eigen
                .eigenvectors
                .column(mode)
                .rows(0, n)
                .iter()
                .copied()
                .collect();
            let sign = orientation(&values);
            for (i, v) in values.iter().enumerate() {
                coords[(i, axis)] = sign * v;
            }
        }
        let spectrum: Vec<f64> = modes.iter().map(|&m| eigen.eigenvalues[m]).collect();
        debug!(?spectrum, "spectral modes");
    }

    center_and_scale(&mut coords, opts.optimal_distance);
    debug!(elapsed_ms = timer.elapsed().as_secs_f64() * 1e3, "spectral layout finished");

    Ok(match dim {
        2 => Locations::Planar(
            (0..n)
                .map(|i| Point::new(coords[(i, 0)], coords[(i, 1)]))
                .collect(),
        ),
        _ => Locations::Spatial(
            (0..n)
                .map(|i| Point3::new(coords[(i, 0)], coords[(i, 1)], coords[(i, 2)]))
                .collect(),
        ),
    })
}

/// Weighted Laplacian `D - A`, with a hub row/column appended when the graph is disconnected.
fn connected_laplacian(topology: &Topology) -> DMatrix<f64> {
    let n = topology.vertex_count();
    let components = connected_components(topology);
    let size = if components.len() > 1 { n + 1 } else { n };

    let mut l = DMatrix::<f64>::zeros(size, size);
    let mut couple = |a: usize, b: usize, w: f64| {
        l[(a, b)] -= w;
        l[(b, a)] -= w;
        l[(a, a)] += w;
        l[(b, b)] += w;
    };
    for (a, b, w) in topology.edges() {
        couple(a, b, w);
    }
    if size > n {
        for comp in &components {
            let mut best = comp[0];
            for &v in comp {
                if topology.degree(v) < topology.degree(best) {
                    best = v;
                }
            }
            couple(n, best, HUB_EDGE_WEIGHT);
        }
    }
    l
}

/// `1.0` or `-1.0`, chosen so the first entry of largest magnitude becomes positive.
fn orientation(values: &[f64]) -> f64 {
    let max = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let lead = values
        .iter()
        .copied()
        .find(|v| v.abs() >= max * (1.0 - 1e-9))
        .unwrap_or(0.0);
    if lead < 0.0 { -1.0 } else { 1.0 }
}

/// Moves the centroid to the origin and rescales so the mean pairwise distance is
/// `optimal_distance`. All-coincident inputs are only centered.
fn center_and_scale(coords: &mut DMatrix<f64>, optimal_distance: f64) {
    let n = coords.nrows();
    if n == 0 {
        return;
    }
    for mut col in coords.column_iter_mut() {
        let mean = col.mean();
        col.add_scalar_mut(-mean);
    }
    if n < 2 {
        return;
    }

    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += (coords.row(i) - coords.row(j)).norm();
        }
    }
    let mean = total / ((n * (n - 1) / 2) as f64);
    if mean.is_finite() && mean > f64::EPSILON {
        *coords *= optimal_distance / mean;
    }
}

#[cfg(test)]
mod tests {
    use super::{center_and_scale, connected_laplacian, orientation};
    use crate::graph::{Graph, Topology};
    use nalgebra::DMatrix;

    #[test]
    fn connected_graph_has_no_hub() {
        let t = Topology::from_view(&Graph::path(3)).unwrap();
        let l = connected_laplacian(&t);
        assert_eq!(l.nrows(), 3);
        assert_eq!(l[(1, 1)], 2.0);
        assert_eq!(l[(0, 1)], -1.0);
    }

    #[test]
    fn hub_joins_the_minimum_degree_vertex_of_each_component() {
        // Component {0,1,2} is a path (0 and 2 have degree 1), component {3} is isolated.
        let t = Topology::from_view(&Graph::from_edges(4, [(0, 1), (1, 2)])).unwrap();
        let l = connected_laplacian(&t);
        assert_eq!(l.nrows(), 5);
        assert_eq!(l[(4, 0)], -1.0);
        assert_eq!(l[(4, 2)], 0.0);
        assert_eq!(l[(4, 3)], -1.0);
        assert_eq!(l[(4, 4)], 2.0);
        for i in 0..5 {
            assert!(l.row(i).sum().abs() < 1e-12);
        }
    }

    #[test]
    fn orientation_makes_the_largest_entry_positive() {
        assert_eq!(orientation(&[0.1, -0.7, 0.3]), -1.0);
        assert_eq!(orientation(&[0.1, 0.7, -0.3]), 1.0);
        // Ties go to the first entry.
        assert_eq!(orientation(&[-0.5, 0.5]), -1.0);
    }

    #[test]
    fn scaling_sets_mean_pairwise_distance() {
        let mut c = DMatrix::from_row_slice(3, 2, &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
        center_and_scale(&mut c, 10.0);
        let mut total = 0.0;
        for i in 0..3 {
            for j in (i + 1)..3 {
                total += (c.row(i) - c.row(j)).norm();
            }
        }
        assert!((total / 3.0 - 10.0).abs() < 1e-9);
        assert!(c.column(0).sum().abs() < 1e-9);
    }
}
