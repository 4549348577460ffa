//! Writes the boundary rows of one region level as a GeoJSON feature
//! collection, optionally gzip-compressed when the output path ends in
//! `.gz`.

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use flate2::{write::GzEncoder, Compression};
use log::debug;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::geojson::{Feature, FeatureCollection};
use crate::store::{RegionLevel, ShapeStore, StoreError};

#[derive(Debug, Error)]
pub enum ExportError {
  #[error(transparent)]
  Store(#[from] StoreError),
  #[error("cannot serialize the feature collection: {0}")]
  Json(#[from] serde_json::Error),
  #[error("cannot write the output file: {0}")]
  Io(#[from] std::io::Error),
}

/// Exports one level's boundaries to `output` and returns the number of
/// features written. Every feature carries `name` and `province`
/// properties.
pub fn export_shapes(
  store: &ShapeStore,
  level: RegionLevel,
  output: &Path,
) -> Result<usize, ExportError> {
  let records = store.shape_records(level)?;
  let features: Vec<Feature> = records
    .iter()
    .map(|record| {
      let mut properties = Map::new();
      properties.insert("name".to_string(), Value::from(record.name.as_str()));
      properties.insert("province".to_string(), Value::from(record.province.as_str()));
      Feature::with_properties(record.id.to_string(), &record.geometry, properties)
    })
    .collect();
  let collection = FeatureCollection::new(features);
  let json = serde_json::to_vec_pretty(&collection)?;

  if output.extension().map_or(false, |ext| ext == "gz") {
    let mut gz = GzEncoder::new(File::create(output)?, Compression::default());
    gz.write_all(&json)?;
    gz.finish()?;
  } else {
    std::fs::write(output, &json)?;
  }
  debug!(
    "wrote {} {} features to {}",
    collection.len(),
    level.label(),
    output.display()
  );
  Ok(collection.len())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil;
  use flate2::read::GzDecoder;
  use std::fs;
  use std::io::Read;

  fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("drought_map_tool_{}_{}", std::process::id(), name))
  }

  #[test]
  fn exports_provinces_as_geojson() {
    let store = testutil::shapes_store();
    let path = temp_path("provinces.json");
    let count = export_shapes(&store, RegionLevel::Province, &path).unwrap();
    assert_eq!(count, 2);

    let collection: FeatureCollection =
      serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(collection.r#type, "FeatureCollection");
    assert_eq!(collection.len(), 2);
    let tehran = &collection.features[0];
    assert_eq!(tehran.id, "1");
    assert_eq!(tehran.properties["name"], "Tehran");
    assert_eq!(tehran.properties["province"], "Tehran");
    fs::remove_file(&path).unwrap();
  }

  #[test]
  fn county_features_name_their_province() {
    let store = testutil::shapes_store();
    let path = temp_path("counties.json");
    export_shapes(&store, RegionLevel::County, &path).unwrap();
    let collection: FeatureCollection =
      serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(collection.len(), 3);
    assert_eq!(collection.features[2].properties["name"], "Karaj");
    assert_eq!(collection.features[2].properties["province"], "Alborz");
    fs::remove_file(&path).unwrap();
  }

  #[test]
  fn gz_paths_are_compressed() {
    let store = testutil::shapes_store();
    let path = temp_path("provinces.json.gz");
    export_shapes(&store, RegionLevel::Province, &path).unwrap();

    let raw = fs::read(&path).unwrap();
    assert_eq!(&raw[0..2], &[0x1f, 0x8b]);
    let mut decoded = Vec::new();
    GzDecoder::new(&raw[..]).read_to_end(&mut decoded).unwrap();
    let collection: FeatureCollection = serde_json::from_slice(&decoded).unwrap();
    assert_eq!(collection.len(), 2);
    fs::remove_file(&path).unwrap();
  }
}
