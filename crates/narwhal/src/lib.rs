#![forbid(unsafe_code)]

//! Headless graph layout algorithms.
//!
//! `narwhal` computes one coordinate per vertex for a graph given only its topology (and
//! optionally edge weights). Rendering is left to the caller: [`render_locs`] hands back a
//! [`Locations`] buffer and keeps no reference to it.
//!
//! ```
//! use narwhal::{Graph, Layout, SpringLayout, render_locs};
//!
//! let graph = Graph::cycle(6);
//! let locs = render_locs(&graph, &Layout::Spring(SpringLayout::new(50.0))).unwrap();
//! assert_eq!(locs.len(), 6);
//! ```

pub mod algo;
pub mod error;
pub mod graph;
pub mod point;

pub use algo::{
    DEFAULT_OPTIMAL_DISTANCE, FixedLayout, LayeredLayout, Layout, SpectralLayout, SpringLayout,
    StressLayout,
};
pub use error::{Error, Result};
pub use graph::{Edge, Graph, GraphView};
pub use point::{Locations, Point, Point3};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lays out `graph` with the given strategy.
///
/// Every call is an independent solve. Invalid graphs fail with [`Error::InvalidGraph`] and
/// out-of-range settings with [`Error::InvalidConfiguration`], both before any iteration runs.
/// Valid input always yields `graph.vertex_count()` finite positions.
pub fn render_locs<G: GraphView>(graph: &G, layout: &Layout) -> Result<Locations> {
    let _span = tracing::debug_span!("render_locs", layout = layout.name()).entered();
    let topology = graph::Topology::from_view(graph)?;
    algo::render(&topology, layout)
}
