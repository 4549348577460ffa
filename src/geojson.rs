//! Minimal serde model for the GeoJSON emitted to the map layers.
//!
//! Decoded rings are open; GeoJSON linear rings must end where they start,
//! so the conversion appends the first position when needed. Only the two
//! geometry types the boundary tables contain are modeled.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geom;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
  Polygon { coordinates: Vec<Vec<(f64, f64)>> },
  MultiPolygon { coordinates: Vec<Vec<Vec<(f64, f64)>>> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
  pub r#type: String,
  pub id: String,
  pub properties: Map<String, Value>,
  pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
  pub r#type: String,
  pub features: Vec<Feature>,
}

impl Feature {
  pub fn new(id: String, geometry: &geom::Geometry) -> Feature {
    Feature::with_properties(id, geometry, Map::new())
  }

  pub fn with_properties(
    id: String,
    geometry: &geom::Geometry,
    properties: Map<String, Value>,
  ) -> Feature {
    Feature {
      r#type: "Feature".to_string(),
      id,
      properties,
      geometry: Geometry::from(geometry),
    }
  }
}

impl FeatureCollection {
  pub fn new(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
      r#type: "FeatureCollection".to_string(),
      features,
    }
  }

  pub fn len(&self) -> usize {
    self.features.len()
  }

  pub fn is_empty(&self) -> bool {
    self.features.is_empty()
  }
}

impl From<&geom::Geometry> for Geometry {
  fn from(geometry: &geom::Geometry) -> Geometry {
    match geometry {
      geom::Geometry::Polygon(ring) => Geometry::Polygon {
        coordinates: vec![closed_ring(ring)],
      },
      geom::Geometry::MultiPolygon(multi) => Geometry::MultiPolygon {
        coordinates: multi
          .polygons
          .iter()
          .map(|ring| vec![closed_ring(ring)])
          .collect(),
      },
    }
  }
}

fn closed_ring(ring: &geom::Ring) -> Vec<(f64, f64)> {
  let mut positions: Vec<(f64, f64)> =
    ring.coords.iter().map(|coord| (coord.x, coord.y)).collect();
  if !ring.is_closed() {
    if let Some(first) = positions.first().copied() {
      positions.push(first);
    }
  }
  positions
}
