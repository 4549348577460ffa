use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coord {
  pub x: f64,
  pub y: f64,
}

/// A single boundary ring. Rings are stored exactly as decoded; the first
/// coordinate is not repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
  pub coords: Vec<Coord>,
}
pub type Polygon = Ring;

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon {
  pub polygons: Vec<Polygon>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
  Polygon(Polygon),
  MultiPolygon(MultiPolygon),
}

impl Ring {
  pub fn is_closed(&self) -> bool {
    match (self.coords.first(), self.coords.last()) {
      (Some(first), Some(last)) => first == last,
      _ => false,
    }
  }
}

impl Geometry {
  /// Number of polygons in the geometry; a plain polygon counts as one.
  pub fn polygon_count(&self) -> usize {
    match self {
      Geometry::Polygon(_) => 1,
      Geometry::MultiPolygon(multi) => multi.polygons.len(),
    }
  }
}
