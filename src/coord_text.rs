//! Codec for the flat-text coordinate encoding used by the boundary tables.
//!
//! A polygon is a comma-separated list of points, each point being two
//! whitespace-separated numbers: `"51.1 35.2,51.9 35.2,51.5 35.9"`. A
//! multipolygon joins several such rings with `|`. Rings are decoded in
//! input order and are not closed here; closing happens when the geometry
//! is rendered as GeoJSON.

use std::str::FromStr;

use thiserror::Error;

use crate::geom::{Coord, Geometry, MultiPolygon, Ring};

/// Fewest coordinates that can bound an area.
pub const MIN_RING_COORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
  #[error("empty geometry encoding")]
  EmptyEncoding,
  #[error("unsupported geometry kind `{0}`")]
  UnsupportedKind(String),
  #[error("point `{0}` is not two whitespace-separated values")]
  MalformedPoint(String),
  #[error("coordinate `{0}` is not a finite number")]
  InvalidCoordinate(String),
  #[error("ring has {0} coordinates, at least {MIN_RING_COORDS} are required")]
  RingTooShort(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
  Polygon,
  MultiPolygon,
}

impl FromStr for GeometryKind {
  type Err = DecodeError;

  fn from_str(tag: &str) -> Result<GeometryKind, DecodeError> {
    match tag {
      "Polygon" => Ok(GeometryKind::Polygon),
      "MultiPolygon" => Ok(GeometryKind::MultiPolygon),
      _ => Err(DecodeError::UnsupportedKind(tag.to_string())),
    }
  }
}

/// Decodes a flat-text geometry of the given kind.
///
/// The decoder is strict: one bad point or coordinate rejects the whole
/// encoding, there is no partial output.
pub fn decode(raw: &str, kind: GeometryKind) -> Result<Geometry, DecodeError> {
  if raw.is_empty() {
    return Err(DecodeError::EmptyEncoding);
  }
  match kind {
    GeometryKind::Polygon => Ok(Geometry::Polygon(decode_ring(raw)?)),
    GeometryKind::MultiPolygon => {
      let polygons = raw
        .split('|')
        .map(decode_ring)
        .collect::<Result<Vec<_>, _>>()?;
      Ok(Geometry::MultiPolygon(MultiPolygon { polygons }))
    }
  }
}

/// Renders a geometry back into the flat-text encoding.
pub fn encode(geometry: &Geometry) -> String {
  match geometry {
    Geometry::Polygon(ring) => encode_ring(ring),
    Geometry::MultiPolygon(multi) => {
      let rings: Vec<String> = multi.polygons.iter().map(encode_ring).collect();
      rings.join("|")
    }
  }
}

fn decode_ring(segment: &str) -> Result<Ring, DecodeError> {
  let coords = segment
    .split(',')
    .map(decode_point)
    .collect::<Result<Vec<_>, _>>()?;
  if coords.len() < MIN_RING_COORDS {
    return Err(DecodeError::RingTooShort(coords.len()));
  }
  Ok(Ring { coords })
}

fn decode_point(token: &str) -> Result<Coord, DecodeError> {
  let mut parts = token.split_whitespace();
  let (x, y) = match (parts.next(), parts.next(), parts.next()) {
    (Some(x), Some(y), None) => (x, y),
    _ => return Err(DecodeError::MalformedPoint(token.to_string())),
  };
  Ok(Coord {
    x: decode_value(x)?,
    y: decode_value(y)?,
  })
}

fn decode_value(token: &str) -> Result<f64, DecodeError> {
  let value: f64 = token
    .parse()
    .map_err(|_| DecodeError::InvalidCoordinate(token.to_string()))?;
  if !value.is_finite() {
    return Err(DecodeError::InvalidCoordinate(token.to_string()));
  }
  Ok(value)
}

fn encode_ring(ring: &Ring) -> String {
  let points: Vec<String> = ring
    .coords
    .iter()
    .map(|coord| format!("{} {}", coord.x, coord.y))
    .collect();
  points.join(",")
}
