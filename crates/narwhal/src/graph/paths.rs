use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use nalgebra::DMatrix;

use super::Topology;

/// Shortest-path lengths between every pair of vertices; `f64::INFINITY` marks pairs in different
/// components.
///
/// Unit-weight graphs use one BFS per source, weighted graphs one Dijkstra per source.
pub(crate) fn all_pairs_shortest_paths(topology: &Topology) -> DMatrix<f64> {
    let n = topology.vertex_count();
    let mut dist = DMatrix::<f64>::from_element(n, n, f64::INFINITY);
    for source in 0..n {
        let row = if topology.has_unit_weights() {
            bfs_distances(topology, source)
        } else {
            dijkstra_distances(topology, source)
        };
        for (target, d) in row.into_iter().enumerate() {
            dist[(source, target)] = d;
        }
    }
    dist
}

fn bfs_distances(topology: &Topology, source: usize) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; topology.vertex_count()];
    let mut q: VecDeque<usize> = VecDeque::new();
    dist[source] = 0.0;
    q.push_back(source);

    while let Some(v) = q.pop_front() {
        for &(u, _) in topology.neighbors(v) {
            if dist[u].is_infinite() {
                dist[u] = dist[v] + 1.0;
                q.push_back(u);
            }
        }
    }
    dist
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: f64,
    vertex: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; vertex index breaks ties.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra_distances(topology: &Topology, source: usize) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; topology.vertex_count()];
    let mut heap = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Frontier {
        dist: 0.0,
        vertex: source,
    });

    while let Some(Frontier { dist: d, vertex: v }) = heap.pop() {
        if d > dist[v] {
            continue;
        }
        for &(u, w) in topology.neighbors(v) {
            let next = d + w;
            if next < dist[u] {
                dist[u] = next;
                heap.push(Frontier {
                    dist: next,
                    vertex: u,
                });
            }
        }
    }
    dist
}

/// Connected components, each sorted ascending, ordered by their smallest vertex.
pub(crate) fn connected_components(topology: &Topology) -> Vec<Vec<usize>> {
    let n = topology.vertex_count();
    let mut visited = vec![false; n];
    let mut out: Vec<Vec<usize>> = Vec::new();
    let mut q: VecDeque<usize> = VecDeque::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        q.push_back(start);
        let mut comp: Vec<usize> = Vec::new();

        while let Some(v) = q.pop_front() {
            comp.push(v);
            for &(u, _) in topology.neighbors(v) {
                if !visited[u] {
                    visited[u] = true;
                    q.push_back(u);
                }
            }
        }

        comp.sort_unstable();
        out.push(comp);
    }

    out
}
