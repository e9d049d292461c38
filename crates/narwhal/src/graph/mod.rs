use crate::error::{Error, Result};
use rustc_hash::FxHashMap;

mod paths;

pub(crate) use paths::{all_pairs_shortest_paths, connected_components};

/// An undirected edge between two vertex indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    /// `1.0` for unweighted graphs. Stress layout treats it as the edge length in shortest-path
    /// distances, spectral layout as the coupling strength in the Laplacian.
    pub weight: f64,
}

impl Edge {
    pub const fn new(source: usize, target: usize) -> Self {
        Self {
            source,
            target,
            weight: 1.0,
        }
    }

    pub const fn weighted(source: usize, target: usize, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

/// Read-only view of a caller-owned graph.
///
/// Vertices are the dense range `0..vertex_count()`. Edges are undirected; the direction of
/// `source`/`target` carries no meaning for layout.
pub trait GraphView {
    fn vertex_count(&self) -> usize;

    fn edges(&self) -> impl Iterator<Item = Edge> + '_;

    /// Vertices adjacent to `v`, with the connecting edge weight.
    fn neighbors(&self, v: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.edges().filter_map(move |e| {
            if e.source == v {
                Some((e.target, e.weight))
            } else if e.target == v {
                Some((e.source, e.weight))
            } else {
                None
            }
        })
    }
}

/// Edge-list graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            vertex_count,
            edges: Vec::new(),
        }
    }

    pub fn from_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut g = Self::new(vertex_count);
        for (a, b) in edges {
            g.add_edge(a, b);
        }
        g
    }

    /// `0 - 1 - ... - (n-1) - 0`.
    pub fn cycle(n: usize) -> Self {
        let mut g = Self::path(n);
        if n > 2 {
            g.add_edge(n - 1, 0);
        }
        g
    }

    /// `0 - 1 - ... - (n-1)`.
    pub fn path(n: usize) -> Self {
        Self::from_edges(n, (1..n).map(|i| (i - 1, i)))
    }

    pub fn complete(n: usize) -> Self {
        Self::from_edges(n, (0..n).flat_map(|i| ((i + 1)..n).map(move |j| (i, j))))
    }

    pub fn add_edge(&mut self, source: usize, target: usize) -> &mut Self {
        self.edges.push(Edge::new(source, target));
        self
    }

    pub fn add_weighted_edge(&mut self, source: usize, target: usize, weight: f64) -> &mut Self {
        self.edges.push(Edge::weighted(source, target, weight));
        self
    }

    /// Appends `count` isolated vertices and returns the index of the first one.
    pub fn add_vertices(&mut self, count: usize) -> usize {
        let first = self.vertex_count;
        self.vertex_count += count;
        first
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl GraphView for Graph {
    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }
}

/// Validated adjacency snapshot of a [`GraphView`], taken once per layout call.
///
/// Parallel edges collapse to the smallest weight; self-loops are dropped.
#[derive(Debug, Clone)]
pub(crate) struct Topology {
    adjacency: Vec<Vec<(usize, f64)>>,
    edge_count: usize,
    unit_weights: bool,
}

impl Topology {
    pub(crate) fn from_view<G: GraphView>(graph: &G) -> Result<Self> {
        let n = graph.vertex_count();
        let mut unique: FxHashMap<(usize, usize), f64> = FxHashMap::default();

        for (idx, e) in graph.edges().enumerate() {
            if e.source >= n || e.target >= n {
                return Err(Error::graph(format!(
                    "edge #{idx} ({}, {}) references a vertex outside 0..{n}",
                    e.source, e.target
                )));
            }
            if !(e.weight.is_finite() && e.weight > 0.0) {
                return Err(Error::graph(format!(
                    "edge #{idx} ({}, {}) has weight {}; weights must be finite and positive",
                    e.source, e.target, e.weight
                )));
            }
            if e.source == e.target {
                continue;
            }
            let key = (e.source.min(e.target), e.source.max(e.target));
            unique
                .entry(key)
                .and_modify(|w| *w = w.min(e.weight))
                .or_insert(e.weight);
        }

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut unit_weights = true;
        for (&(a, b), &w) in &unique {
            adjacency[a].push((b, w));
            adjacency[b].push((a, w));
            unit_weights &= w == 1.0;
        }
        for neigh in &mut adjacency {
            neigh.sort_unstable_by_key(|&(v, _)| v);
        }

        Ok(Self {
            adjacency,
            edge_count: unique.len(),
            unit_weights,
        })
    }

    pub(crate) fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub(crate) fn degree(&self, v: usize) -> usize {
        self.adjacency[v].len()
    }

    pub(crate) fn neighbors(&self, v: usize) -> &[(usize, f64)] {
        &self.adjacency[v]
    }

    pub(crate) fn has_unit_weights(&self) -> bool {
        self.unit_weights
    }

    /// Each undirected edge once, as `(a, b, weight)` with `a < b`, in index order.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, neigh)| {
            neigh
                .iter()
                .filter(move |&&(b, _)| a < b)
                .map(move |&(b, w)| (a, b, w))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Graph, Topology};

    #[test]
    fn topology_collapses_parallel_edges_to_the_lightest_weight() {
        let mut g = Graph::new(3);
        g.add_weighted_edge(0, 1, 3.0);
        g.add_weighted_edge(1, 0, 2.0);
        g.add_edge(1, 2);
        let t = Topology::from_view(&g).unwrap();
        assert_eq!(t.edge_count(), 2);
        assert_eq!(t.neighbors(0), &[(1, 2.0)]);
        assert_eq!(t.neighbors(1), &[(0, 2.0), (2, 1.0)]);
        assert!(!t.has_unit_weights());
    }

    #[test]
    fn topology_drops_self_loops() {
        let mut g = Graph::new(2);
        g.add_edge(0, 0);
        g.add_edge(0, 1);
        let t = Topology::from_view(&g).unwrap();
        assert_eq!(t.edge_count(), 1);
        assert_eq!(t.degree(0), 1);
        assert_eq!(t.edges().collect::<Vec<_>>(), vec![(0, 1, 1.0)]);
    }
}
