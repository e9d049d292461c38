use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Layout, render};
use crate::error::{Error, Result};
use crate::graph::{GraphView, Topology};
use crate::point::{Locations, Point3};

pub const DEFAULT_ASPECT_RATIO: f64 = 0.2;

/// Lifts a planar layout into 3D: vertex `i` gets `z = z_coords[i] * aspect_ratio` on top of the
/// parent's untouched `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredLayout {
    pub parent: Box<Layout>,
    /// One height per vertex.
    pub z_coords: Vec<f64>,
    /// Scale of the z axis relative to the xy plane.
    pub aspect_ratio: f64,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            parent: Box::default(),
            z_coords: Vec::new(),
            aspect_ratio: DEFAULT_ASPECT_RATIO,
        }
    }
}

impl LayeredLayout {
    pub fn new(parent: Layout, z_coords: Vec<f64>, aspect_ratio: f64) -> Self {
        Self {
            parent: Box::new(parent),
            z_coords,
            aspect_ratio,
        }
    }

    pub fn solve<G: GraphView>(&self, graph: &G) -> Result<Vec<Point3>> {
        layout(&Topology::from_view(graph)?, self)
    }

    fn validate(&self, n: usize) -> Result<()> {
        if self.parent.dimension() != 2 {
            return Err(Error::config(format!(
                "layered layout needs a planar parent, got a {}-dimensional {} layout",
                self.parent.dimension(),
                self.parent.name()
            )));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(Error::config(format!(
                "aspect_ratio must be finite and positive, got {}",
                self.aspect_ratio
            )));
        }
        if self.z_coords.len() != n {
            return Err(Error::config(format!(
                "z_coords has {} entries for {n} vertices",
                self.z_coords.len()
            )));
        }
        if let Some(i) = self.z_coords.iter().position(|z| !z.is_finite()) {
            return Err(Error::config(format!(
                "z_coords[{i}] is not finite: {}",
                self.z_coords[i]
            )));
        }
        Ok(())
    }
}

pub(crate) fn layout(topology: &Topology, opts: &LayeredLayout) -> Result<Vec<Point3>> {
    let n = topology.vertex_count();
    opts.validate(n)?;
    debug!(
        vertices = n,
        parent = opts.parent.name(),
        aspect_ratio = opts.aspect_ratio,
        "layered layout"
    );

    let Locations::Planar(base) = render(topology, &opts.parent)? else {
        return Err(Error::config("layered layout parent produced spatial output"));
    };
    Ok(base
        .into_iter()
        .zip(&opts.z_coords)
        .map(|(p, &z)| p.with_z(z * opts.aspect_ratio))
        .collect())
}
