//! Read-only access to the two SQLite databases behind the dashboard: the
//! drought database (gridded index values plus per-region aggregates) and
//! the shapes database (province and county boundary rows).

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::category::DroughtCategory;
use crate::coord_text::{self, DecodeError, GeometryKind};
use crate::geom::{Coord, Geometry};

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("database error: {0}")]
  Sqlite(#[from] sqlite::Error),
  #[error("unknown drought category `{0}`")]
  UnknownCategory(String),
  #[error("shape row {id} ({name}): {source}")]
  BadShapeRow {
    id: i64,
    name: String,
    #[source]
    source: DecodeError,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLevel {
  Province,
  County,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown region level `{0}`, expected `province` or `county`")]
pub struct UnknownLevel(pub String);

impl RegionLevel {
  pub fn label(self) -> &'static str {
    match self {
      RegionLevel::Province => "province",
      RegionLevel::County => "county",
    }
  }
}

impl FromStr for RegionLevel {
  type Err = UnknownLevel;

  fn from_str(label: &str) -> Result<RegionLevel, UnknownLevel> {
    match label {
      "province" => Ok(RegionLevel::Province),
      "county" => Ok(RegionLevel::County),
      _ => Err(UnknownLevel(label.to_string())),
    }
  }
}

/// One gridded drought index sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexValue {
  pub x: f64,
  pub y: f64,
  pub year: i64,
  pub value: f64,
}

/// Share of a region's surface in one category for one year, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentageRow {
  pub region: String,
  pub year: i64,
  pub category: DroughtCategory,
  pub percentage: f64,
}

/// Absolute surface of a region in one category for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRow {
  pub region: String,
  pub year: i64,
  pub category: DroughtCategory,
  pub area: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Centroid {
  pub name: String,
  pub x: f64,
  pub y: f64,
}

/// A boundary row as stored, geometry still in the flat-text encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RawShapeRow {
  pub id: i64,
  pub name: String,
  pub province: String,
  pub center: Coord,
  pub polygon_type: String,
  pub coordinates: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
  pub id: i64,
  pub name: String,
  pub province: String,
  pub center: Coord,
  pub geometry: Geometry,
}

impl RawShapeRow {
  pub fn decode(&self) -> Result<Geometry, DecodeError> {
    let kind = self.polygon_type.parse::<GeometryKind>()?;
    coord_text::decode(&self.coordinates, kind)
  }
}

pub struct DroughtStore {
  connection: sqlite::Connection,
}

impl DroughtStore {
  pub fn open(path: impl AsRef<Path>) -> Result<DroughtStore, StoreError> {
    let connection = sqlite::open(path)?;
    connection.execute("PRAGMA query_only = true;")?;
    Ok(DroughtStore { connection })
  }

  /// Wraps a caller-prepared connection, used by tests with in-memory
  /// databases.
  pub fn new(connection: sqlite::Connection) -> DroughtStore {
    DroughtStore { connection }
  }

  /// Distinct years with index data, ascending.
  pub fn years(&self) -> Result<Vec<i64>, StoreError> {
    debug!("querying distinct drought years");
    let mut stmt = self
      .connection
      .prepare("SELECT DISTINCT year FROM spei ORDER BY year")?;
    let mut years = Vec::new();
    while let sqlite::State::Row = stmt.next()? {
      years.push(stmt.read::<i64>(0)?);
    }
    Ok(years)
  }

  pub fn index_values(&self, year: i64) -> Result<Vec<IndexValue>, StoreError> {
    debug!("querying index values for {}", year);
    let mut stmt = self
      .connection
      .prepare("SELECT x, y, year, value FROM spei WHERE year = ?")?;
    stmt.bind(1, year)?;
    let mut values = Vec::new();
    while let sqlite::State::Row = stmt.next()? {
      values.push(IndexValue {
        x: stmt.read::<f64>(0)?,
        y: stmt.read::<f64>(1)?,
        year: stmt.read::<i64>(2)?,
        value: stmt.read::<f64>(3)?,
      });
    }
    Ok(values)
  }

  /// Full category history for one province, ascending by year.
  pub fn province_percentages(&self, province: &str) -> Result<Vec<PercentageRow>, StoreError> {
    debug!("querying category history for {}", province);
    let mut stmt = self.connection.prepare(
      "SELECT province, year, category, percentage
       FROM drought_percentage_per_province
       WHERE province LIKE ?
       ORDER BY year",
    )?;
    stmt.bind(1, province)?;
    collect_percentages(&mut stmt)
  }

  /// Per-province shares for one year, provinces in descending name order.
  pub fn province_percentages_for_year(&self, year: i64) -> Result<Vec<PercentageRow>, StoreError> {
    debug!("querying province percentages for {}", year);
    let mut stmt = self.connection.prepare(
      "SELECT province, year, category, percentage
       FROM drought_percentage_per_province
       WHERE year = ?
       ORDER BY province DESC",
    )?;
    stmt.bind(1, year)?;
    collect_percentages(&mut stmt)
  }

  /// Per-county shares within one province for one year, counties in
  /// descending name order.
  pub fn county_percentages_for_year(
    &self,
    year: i64,
    province: &str,
  ) -> Result<Vec<PercentageRow>, StoreError> {
    debug!("querying county percentages for {} in {}", year, province);
    let mut stmt = self.connection.prepare(
      "SELECT county, year, category, percentage
       FROM drought_percentage_per_county
       WHERE year = ? AND province LIKE ?
       ORDER BY county DESC",
    )?;
    stmt.bind(1, year)?;
    stmt.bind(2, province)?;
    collect_percentages(&mut stmt)
  }

  /// Every per-province area row, all years.
  pub fn province_areas(&self) -> Result<Vec<AreaRow>, StoreError> {
    debug!("querying province areas for all years");
    let mut stmt = self.connection.prepare(
      "SELECT province, year, category, area FROM drought_area_per_province",
    )?;
    collect_areas(&mut stmt)
  }

  pub fn province_areas_for_year(&self, year: i64) -> Result<Vec<AreaRow>, StoreError> {
    debug!("querying province areas for {}", year);
    let mut stmt = self.connection.prepare(
      "SELECT province, year, category, area
       FROM drought_area_per_province
       WHERE year = ?",
    )?;
    stmt.bind(1, year)?;
    collect_areas(&mut stmt)
  }

  pub fn province_areas_for_year_and_province(
    &self,
    year: i64,
    province: &str,
  ) -> Result<Vec<AreaRow>, StoreError> {
    debug!("querying areas for {} in {}", year, province);
    let mut stmt = self.connection.prepare(
      "SELECT province, year, category, area
       FROM drought_area_per_province
       WHERE year = ? AND province LIKE ?",
    )?;
    stmt.bind(1, year)?;
    stmt.bind(2, province)?;
    collect_areas(&mut stmt)
  }

  pub fn county_areas_for_year(
    &self,
    year: i64,
    county: &str,
  ) -> Result<Vec<AreaRow>, StoreError> {
    debug!("querying areas for {} in county {}", year, county);
    let mut stmt = self.connection.prepare(
      "SELECT county, year, category, area
       FROM drought_area_per_county
       WHERE year = ? AND county LIKE ?",
    )?;
    stmt.bind(1, year)?;
    stmt.bind(2, county)?;
    collect_areas(&mut stmt)
  }
}

const PROVINCE_SHAPES_QUERY: &str = "
  SELECT id, province_name, longitude, latitude, province_name AS province,
         polygon_type, coordinates
  FROM province";

const COUNTY_SHAPES_QUERY: &str = "
  SELECT id, county_name, longitude, latitude, province_name AS province,
         polygon_type, coordinates
  FROM county";

const PROVINCE_CENTROIDS_QUERY: &str =
  "SELECT province_name, longitude, latitude FROM province";

const COUNTY_CENTROIDS_QUERY: &str =
  "SELECT county_name, longitude, latitude FROM county";

pub struct ShapeStore {
  connection: sqlite::Connection,
}

impl ShapeStore {
  pub fn open(path: impl AsRef<Path>) -> Result<ShapeStore, StoreError> {
    let connection = sqlite::open(path)?;
    connection.execute("PRAGMA query_only = true;")?;
    Ok(ShapeStore { connection })
  }

  /// Wraps a caller-prepared connection, used by tests with in-memory
  /// databases.
  pub fn new(connection: sqlite::Connection) -> ShapeStore {
    ShapeStore { connection }
  }

  /// Boundary rows with the geometry text left undecoded.
  pub fn raw_shape_rows(&self, level: RegionLevel) -> Result<Vec<RawShapeRow>, StoreError> {
    debug!("querying {} shapes", level.label());
    let query = match level {
      RegionLevel::Province => PROVINCE_SHAPES_QUERY,
      RegionLevel::County => COUNTY_SHAPES_QUERY,
    };
    let mut stmt = self.connection.prepare(query)?;
    let mut rows = Vec::new();
    while let sqlite::State::Row = stmt.next()? {
      rows.push(RawShapeRow {
        id: stmt.read::<i64>(0)?,
        name: stmt.read::<String>(1)?,
        center: Coord {
          x: stmt.read::<f64>(2)?,
          y: stmt.read::<f64>(3)?,
        },
        province: stmt.read::<String>(4)?,
        polygon_type: stmt.read::<String>(5)?,
        coordinates: stmt.read::<String>(6)?,
      });
    }
    Ok(rows)
  }

  /// Boundary rows with the geometry decoded. The first undecodable row
  /// fails the whole read; use [`crate::audit::audit_shapes`] to survey
  /// faults instead.
  pub fn shape_records(&self, level: RegionLevel) -> Result<Vec<ShapeRecord>, StoreError> {
    self
      .raw_shape_rows(level)?
      .into_iter()
      .map(|row| {
        let geometry = row.decode().map_err(|source| StoreError::BadShapeRow {
          id: row.id,
          name: row.name.clone(),
          source,
        })?;
        Ok(ShapeRecord {
          id: row.id,
          name: row.name,
          province: row.province,
          center: row.center,
          geometry,
        })
      })
      .collect()
  }

  /// One centroid per region, in table order.
  pub fn centroids(&self, level: RegionLevel) -> Result<Vec<Centroid>, StoreError> {
    debug!("querying {} centroids", level.label());
    let query = match level {
      RegionLevel::Province => PROVINCE_CENTROIDS_QUERY,
      RegionLevel::County => COUNTY_CENTROIDS_QUERY,
    };
    let mut stmt = self.connection.prepare(query)?;
    let mut centroids = Vec::new();
    while let sqlite::State::Row = stmt.next()? {
      centroids.push(Centroid {
        name: stmt.read::<String>(0)?,
        x: stmt.read::<f64>(1)?,
        y: stmt.read::<f64>(2)?,
      });
    }
    Ok(centroids)
  }

  /// County names grouped by province, provinces sorted, counties in table
  /// order.
  pub fn counties_by_province(&self) -> Result<BTreeMap<String, Vec<String>>, StoreError> {
    debug!("querying county list");
    let mut stmt = self
      .connection
      .prepare("SELECT province_name, county_name FROM county")?;
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    while let sqlite::State::Row = stmt.next()? {
      let province = stmt.read::<String>(0)?;
      let county = stmt.read::<String>(1)?;
      map.entry(province).or_default().push(county);
    }
    Ok(map)
  }
}

fn collect_percentages(
  stmt: &mut sqlite::Statement<'_>,
) -> Result<Vec<PercentageRow>, StoreError> {
  let mut rows = Vec::new();
  while let sqlite::State::Row = stmt.next()? {
    rows.push(PercentageRow {
      region: stmt.read::<String>(0)?,
      year: stmt.read::<i64>(1)?,
      category: parse_category(stmt.read::<String>(2)?)?,
      percentage: stmt.read::<f64>(3)?,
    });
  }
  Ok(rows)
}

fn collect_areas(stmt: &mut sqlite::Statement<'_>) -> Result<Vec<AreaRow>, StoreError> {
  let mut rows = Vec::new();
  while let sqlite::State::Row = stmt.next()? {
    rows.push(AreaRow {
      region: stmt.read::<String>(0)?,
      year: stmt.read::<i64>(1)?,
      category: parse_category(stmt.read::<String>(2)?)?,
      area: stmt.read::<f64>(3)?,
    });
  }
  Ok(rows)
}

fn parse_category(label: String) -> Result<DroughtCategory, StoreError> {
  label
    .parse::<DroughtCategory>()
    .map_err(|_| StoreError::UnknownCategory(label))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testutil;

  #[test]
  fn years_are_distinct_and_ascending() {
    let store = testutil::drought_store();
    assert_eq!(store.years().unwrap(), vec![1999, 2001, 2010, 2020, 2021]);
  }

  #[test]
  fn index_values_are_filtered_by_year() {
    let store = testutil::drought_store();
    let values = store.index_values(2021).unwrap();
    assert_eq!(values.len(), 3);
    assert!(values.iter().all(|v| v.year == 2021));
    assert_eq!(values[0], IndexValue { x: 51.0, y: 35.5, year: 2021, value: -2.1 });
  }

  #[test]
  fn index_values_for_a_missing_year_are_empty() {
    let store = testutil::drought_store();
    assert!(store.index_values(1900).unwrap().is_empty());
  }

  #[test]
  fn province_history_is_scoped_and_sorted() {
    let store = testutil::drought_store();
    let rows = store.province_percentages("Tehran").unwrap();
    assert!(rows.iter().all(|r| r.region == "Tehran"));
    let years: Vec<i64> = rows.iter().map(|r| r.year).collect();
    let mut sorted = years.clone();
    sorted.sort();
    assert_eq!(years, sorted);
    assert_eq!(rows[0].category, DroughtCategory::Normal);
    assert_eq!(rows[0].percentage, 60.0);
  }

  #[test]
  fn yearly_province_percentages_come_back_in_descending_name_order() {
    let store = testutil::drought_store();
    let rows = store.province_percentages_for_year(2021).unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r.region.as_str()).collect();
    assert_eq!(names, vec!["Tehran", "Tehran", "Alborz", "Alborz"]);
  }

  #[test]
  fn county_percentages_are_scoped_to_the_province() {
    let store = testutil::drought_store();
    let rows = store.county_percentages_for_year(2021, "Tehran").unwrap();
    assert_eq!(rows.len(), 4);
    // descending name order puts Shemiranat before Rey
    assert_eq!(rows[0].region, "Shemiranat");
    assert_eq!(rows[3].region, "Rey");
    assert!(store
      .county_percentages_for_year(2021, "Alborz")
      .unwrap()
      .is_empty());
  }

  #[test]
  fn area_queries_filter_by_year_and_region() {
    let store = testutil::drought_store();
    assert_eq!(store.province_areas().unwrap().len(), 8);
    let rows = store.province_areas_for_year(2020).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.year == 2020));
    let rows = store
      .province_areas_for_year_and_province(2021, "Alborz")
      .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.region == "Alborz"));
    let rows = store.county_areas_for_year(2021, "Rey").unwrap();
    assert_eq!(rows.len(), 2);
  }

  #[test]
  fn unknown_category_labels_fail_the_read() {
    let connection = testutil::drought_connection();
    connection
      .execute(
        "INSERT INTO drought_area_per_province VALUES ('Tehran', 2021, 'Bone dry', 1.0);",
      )
      .unwrap();
    let store = DroughtStore::new(connection);
    match store.province_areas() {
      Err(StoreError::UnknownCategory(label)) => assert_eq!(label, "Bone dry"),
      other => panic!("expected an unknown category error, got {:?}", other),
    }
  }

  #[test]
  fn shape_rows_carry_the_raw_encoding() {
    let store = testutil::shapes_store();
    let rows = store.raw_shape_rows(RegionLevel::Province).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Tehran");
    assert_eq!(rows[0].province, "Tehran");
    assert_eq!(rows[0].polygon_type, "Polygon");
    assert!(rows[0].coordinates.contains(','));
  }

  #[test]
  fn shape_records_decode_geometry() {
    let store = testutil::shapes_store();
    let records = store.shape_records(RegionLevel::Province).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].geometry.polygon_count(), 1);
    // Alborz is stored as a two-ring multipolygon
    assert_eq!(records[1].name, "Alborz");
    assert_eq!(records[1].geometry.polygon_count(), 2);

    let counties = store.shape_records(RegionLevel::County).unwrap();
    assert_eq!(counties.len(), 3);
    assert_eq!(counties[0].province, "Tehran");
  }

  #[test]
  fn a_corrupt_row_fails_shape_records_with_context() {
    let connection = testutil::shapes_connection();
    connection
      .execute(
        "INSERT INTO province VALUES (9, 'Ghost', 50.0, 30.0, 'Polygon', '1 2,boom 4,5 6');",
      )
      .unwrap();
    let store = ShapeStore::new(connection);
    match store.shape_records(RegionLevel::Province) {
      Err(StoreError::BadShapeRow { id, name, source }) => {
        assert_eq!(id, 9);
        assert_eq!(name, "Ghost");
        assert_eq!(source, DecodeError::InvalidCoordinate("boom".to_string()));
      }
      other => panic!("expected a bad shape row error, got {:?}", other),
    }
  }

  #[test]
  fn centroids_come_from_their_own_table() {
    let store = testutil::shapes_store();
    let provinces = store.centroids(RegionLevel::Province).unwrap();
    assert_eq!(provinces.len(), 2);
    assert_eq!(provinces[0].name, "Tehran");
    assert_eq!(provinces[0].x, 51.389);
    let counties = store.centroids(RegionLevel::County).unwrap();
    assert_eq!(counties.len(), 3);
  }

  #[test]
  fn counties_group_by_province() {
    let store = testutil::shapes_store();
    let map = store.counties_by_province().unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map["Tehran"], vec!["Rey", "Shemiranat"]);
    assert_eq!(map["Alborz"], vec!["Karaj"]);
  }

  #[test]
  fn region_levels_parse_from_labels() {
    assert_eq!("province".parse::<RegionLevel>(), Ok(RegionLevel::Province));
    assert_eq!("county".parse::<RegionLevel>(), Ok(RegionLevel::County));
    assert!("district".parse::<RegionLevel>().is_err());
  }
}
