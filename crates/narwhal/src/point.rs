use serde::{Deserialize, Serialize};

/// A planar vertex position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lifts the point into 3D space at height `z`.
    pub fn with_z(self, z: f64) -> Point3 {
        Point3 {
            x: self.x,
            y: self.y,
            z,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// A vertex position in 3D space (spectral `dimension = 3` and layered layouts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Drops the third coordinate.
    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<(f64, f64, f64)> for Point3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

/// The position buffer produced by a layout call: one entry per vertex, index `i` is vertex `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locations {
    Planar(Vec<Point>),
    Spatial(Vec<Point3>),
}

impl Locations {
    pub fn len(&self) -> usize {
        match self {
            Locations::Planar(v) => v.len(),
            Locations::Spatial(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of coordinates per position (2 or 3).
    pub fn dimension(&self) -> usize {
        match self {
            Locations::Planar(_) => 2,
            Locations::Spatial(_) => 3,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Locations::Planar(v) => v.iter().all(Point::is_finite),
            Locations::Spatial(v) => v.iter().all(Point3::is_finite),
        }
    }

    pub fn as_planar(&self) -> Option<&[Point]> {
        match self {
            Locations::Planar(v) => Some(v),
            Locations::Spatial(_) => None,
        }
    }

    pub fn as_spatial(&self) -> Option<&[Point3]> {
        match self {
            Locations::Planar(_) => None,
            Locations::Spatial(v) => Some(v),
        }
    }

    pub fn into_planar(self) -> Option<Vec<Point>> {
        match self {
            Locations::Planar(v) => Some(v),
            Locations::Spatial(_) => None,
        }
    }

    pub fn into_spatial(self) -> Option<Vec<Point3>> {
        match self {
            Locations::Planar(_) => None,
            Locations::Spatial(v) => Some(v),
        }
    }
}

impl From<Vec<Point>> for Locations {
    fn from(v: Vec<Point>) -> Self {
        Locations::Planar(v)
    }
}

impl From<Vec<Point3>> for Locations {
    fn from(v: Vec<Point3>) -> Self {
        Locations::Spatial(v)
    }
}
