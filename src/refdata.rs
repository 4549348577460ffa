//! Reference data the dashboard loads once at startup: boundary layers,
//! centroids, the county list and the year range.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::geojson::{Feature, FeatureCollection};
use crate::geom::Coord;
use crate::store::{Centroid, DroughtStore, RegionLevel, ShapeRecord, ShapeStore, StoreError};

#[derive(Debug, Clone, Serialize)]
pub struct ReferenceData {
  pub province_shapes: FeatureCollection,
  pub county_shapes: FeatureCollection,
  pub province_centroids: Vec<Centroid>,
  pub county_centroids: Vec<Centroid>,
  pub counties_by_province: BTreeMap<String, Vec<String>>,
  pub province_centers: BTreeMap<String, Coord>,
  pub years: Vec<i64>,
}

impl ReferenceData {
  pub fn load(drought: &DroughtStore, shapes: &ShapeStore) -> Result<ReferenceData, StoreError> {
    let province_records = shapes.shape_records(RegionLevel::Province)?;
    let county_records = shapes.shape_records(RegionLevel::County)?;
    let province_centroids = shapes.centroids(RegionLevel::Province)?;
    let county_centroids = shapes.centroids(RegionLevel::County)?;
    let province_centers = province_centroids
      .iter()
      .map(|c| (c.name.clone(), Coord { x: c.x, y: c.y }))
      .collect();
    let counties_by_province = shapes.counties_by_province()?;
    let years = drought.years()?;
    debug!(
      "reference data ready: {} provinces, {} counties, {} years",
      province_records.len(),
      county_records.len(),
      years.len()
    );
    Ok(ReferenceData {
      province_shapes: boundary_collection(&province_records),
      county_shapes: boundary_collection(&county_records),
      province_centroids,
      county_centroids,
      counties_by_province,
      province_centers,
      years,
    })
  }

  pub fn province_center(&self, name: &str) -> Option<Coord> {
    self.province_centers.get(name).copied()
  }

  /// Counties of a province, empty for unknown names.
  pub fn counties_of(&self, province: &str) -> &[String] {
    self
      .counties_by_province
      .get(province)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Province names for selection lists, in centroid table order.
  pub fn province_names(&self) -> Vec<&str> {
    self
      .province_centroids
      .iter()
      .map(|c| c.name.as_str())
      .collect()
  }

  pub fn latest_year(&self) -> Option<i64> {
    self.years.last().copied()
  }
}

fn boundary_collection(records: &[ShapeRecord]) -> FeatureCollection {
  FeatureCollection::new(
    records
      .iter()
      .map(|record| Feature::new(record.id.to_string(), &record.geometry))
      .collect(),
  )
}
