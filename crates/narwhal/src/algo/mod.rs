pub mod layered;
pub mod spectral;
pub mod spring;
pub mod stress;

mod rng;
mod start;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::Topology;
use crate::point::{Locations, Point};

pub use layered::LayeredLayout;
pub use spectral::SpectralLayout;
pub use spring::SpringLayout;
pub use stress::StressLayout;

/// Default target distance between adjacent vertices.
pub const DEFAULT_OPTIMAL_DISTANCE: f64 = 50.0;

const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Layout strategy for [`crate::render_locs`].
///
/// Each variant is plain configuration; solving never mutates it and keeps no state between
/// calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layout {
    /// Force-directed simulation with a linear cooling schedule.
    Spring(SpringLayout),
    /// Stress majorization (SMACOF) against graph-theoretic target distances.
    Stress(StressLayout),
    /// Laplacian eigenvector embedding.
    Spectral(SpectralLayout),
    /// A planar parent layout lifted to 3D with caller-supplied heights.
    Layered(LayeredLayout),
    /// Caller-supplied locations, returned as-is.
    Fixed(FixedLayout),
}

impl Default for Layout {
    fn default() -> Self {
        Layout::Spring(SpringLayout::default())
    }
}

impl Layout {
    /// Spring layout lifted to 3D.
    pub fn layered_spring(z_coords: Vec<f64>, optimal_distance: f64, aspect_ratio: f64) -> Self {
        Layout::Layered(LayeredLayout::new(
            Layout::Spring(SpringLayout::new(optimal_distance)),
            z_coords,
            aspect_ratio,
        ))
    }

    /// Stress layout lifted to 3D.
    pub fn layered_stress(z_coords: Vec<f64>, optimal_distance: f64, aspect_ratio: f64) -> Self {
        Layout::Layered(LayeredLayout::new(
            Layout::Stress(StressLayout::new(optimal_distance)),
            z_coords,
            aspect_ratio,
        ))
    }

    pub fn fixed(locations: impl Into<Locations>) -> Self {
        Layout::Fixed(FixedLayout {
            locations: locations.into(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layout::Spring(_) => "spring",
            Layout::Stress(_) => "stress",
            Layout::Spectral(_) => "spectral",
            Layout::Layered(_) => "layered",
            Layout::Fixed(_) => "fixed",
        }
    }

    /// Number of coordinates per position this layout produces.
    pub fn dimension(&self) -> usize {
        match self {
            Layout::Spring(_) | Layout::Stress(_) => 2,
            Layout::Spectral(opts) => opts.dimension,
            Layout::Layered(_) => 3,
            Layout::Fixed(opts) => opts.locations.dimension(),
        }
    }
}

impl From<SpringLayout> for Layout {
    fn from(opts: SpringLayout) -> Self {
        Layout::Spring(opts)
    }
}

impl From<StressLayout> for Layout {
    fn from(opts: StressLayout) -> Self {
        Layout::Stress(opts)
    }
}

impl From<SpectralLayout> for Layout {
    fn from(opts: SpectralLayout) -> Self {
        Layout::Spectral(opts)
    }
}

impl From<LayeredLayout> for Layout {
    fn from(opts: LayeredLayout) -> Self {
        Layout::Layered(opts)
    }
}

/// Explicit locations, one per vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedLayout {
    pub locations: Locations,
}

impl FixedLayout {
    fn layout(&self, topology: &Topology) -> Result<Locations> {
        let n = topology.vertex_count();
        if self.locations.len() != n {
            return Err(Error::config(format!(
                "fixed layout has {} locations for {n} vertices",
                self.locations.len()
            )));
        }
        if !self.locations.is_finite() {
            return Err(Error::config("fixed layout contains non-finite coordinates"));
        }
        Ok(self.locations.clone())
    }
}

pub(crate) fn render(topology: &Topology, layout: &Layout) -> Result<Locations> {
    match layout {
        Layout::Spring(opts) => spring::layout(topology, opts).map(Locations::Planar),
        Layout::Stress(opts) => stress::layout(topology, opts).map(Locations::Planar),
        Layout::Spectral(opts) => spectral::layout(topology, opts),
        Layout::Layered(opts) => layered::layout(topology, opts).map(Locations::Spatial),
        Layout::Fixed(opts) => opts.layout(topology),
    }
}

pub(crate) fn check_optimal_distance(optimal_distance: f64) -> Result<()> {
    if optimal_distance.is_finite() && optimal_distance > 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!(
            "optimal_distance must be finite and positive, got {optimal_distance}"
        )))
    }
}

pub(crate) fn check_mask(mask: Option<&[bool]>, n: usize) -> Result<()> {
    match mask {
        Some(m) if m.len() != n => Err(Error::config(format!(
            "mask has {} entries for {n} vertices",
            m.len()
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn check_initial_locs(locs: Option<&[Point]>, n: usize) -> Result<()> {
    let Some(locs) = locs else {
        return Ok(());
    };
    if locs.len() != n {
        return Err(Error::config(format!(
            "initial_locs has {} entries for {n} vertices",
            locs.len()
        )));
    }
    if let Some(i) = locs.iter().position(|p| !p.is_finite()) {
        return Err(Error::config(format!(
            "initial_locs[{i}] is not finite: {:?}",
            locs[i]
        )));
    }
    Ok(())
}

pub(crate) fn is_movable(mask: Option<&[bool]>, v: usize) -> bool {
    mask.is_none_or(|m| m[v])
}

/// Unit vector at `GOLDEN_ANGLE * index`; distinct indices never share a direction.
pub(crate) fn golden_direction(index: usize) -> Vector2<f64> {
    let angle = GOLDEN_ANGLE * index as f64;
    Vector2::new(angle.cos(), angle.sin())
}
