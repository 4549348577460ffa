//! Builders for the dashboard figures. Each builder pulls the rows it
//! needs from the drought store, applies the selection logic and returns
//! plain serializable data for the chart layer to render.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::category::DroughtCategory;
use crate::geojson::FeatureCollection;
use crate::geom::Coord;
use crate::refdata::ReferenceData;
use crate::store::{Centroid, DroughtStore, IndexValue, RegionLevel, StoreError};

pub const COUNTRY_CENTER: Coord = Coord { x: 53.6880, y: 32.7089 };
pub const COUNTRY_ZOOM: f64 = 5.0;
pub const PROVINCE_ZOOM: f64 = 6.2;

/// Fixed color scale for the drought index, diverging around zero.
pub const INDEX_COLOR_RANGE: (f64, f64) = (-3.0, 3.0);
pub const INDEX_COLOR_MIDPOINT: f64 = 0.0;

/// History charts show the latest year and the twenty before it.
const HISTORY_WINDOW_YEARS: i64 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapFocus {
  Country,
  Province(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOverlay {
  None,
  Province,
  County,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PieScope {
  Country,
  Province(String),
  County(String),
}

#[derive(Debug, Error)]
pub enum FigureError {
  #[error(transparent)]
  Store(#[from] StoreError),
  #[error("no center recorded for province `{0}`")]
  UnknownProvince(String),
}

/// Everything the index map needs for one year and selection.
#[derive(Debug, Serialize)]
pub struct MapFigure<'a> {
  pub year: i64,
  pub points: Vec<IndexValue>,
  pub center: Coord,
  pub zoom: f64,
  pub color_range: (f64, f64),
  pub color_midpoint: f64,
  pub boundaries: Vec<BoundaryLayer<'a>>,
  pub markers: &'a [Centroid],
}

#[derive(Debug, Serialize)]
pub struct BoundaryLayer<'a> {
  pub level: RegionLevel,
  pub features: &'a FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
  pub year: i64,
  pub category: DroughtCategory,
  pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionShare {
  pub region: String,
  pub category: DroughtCategory,
  pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryArea {
  pub category: DroughtCategory,
  pub area: f64,
}

pub fn map_figure<'a>(
  drought: &DroughtStore,
  refdata: &'a ReferenceData,
  focus: &MapFocus,
  year: i64,
  overlay: BoundaryOverlay,
) -> Result<MapFigure<'a>, FigureError> {
  let points = drought.index_values(year)?;
  let (center, zoom) = match focus {
    MapFocus::Country => (COUNTRY_CENTER, COUNTRY_ZOOM),
    MapFocus::Province(name) => {
      let center = refdata
        .province_center(name)
        .ok_or_else(|| FigureError::UnknownProvince(name.clone()))?;
      (center, PROVINCE_ZOOM)
    }
  };
  let (boundaries, markers): (Vec<BoundaryLayer>, &[Centroid]) = match overlay {
    BoundaryOverlay::None => (Vec::new(), &[]),
    BoundaryOverlay::Province => (
      vec![BoundaryLayer {
        level: RegionLevel::Province,
        features: &refdata.province_shapes,
      }],
      &refdata.province_centroids,
    ),
    // county boundaries are drawn with the province outlines on top
    BoundaryOverlay::County => (
      vec![
        BoundaryLayer {
          level: RegionLevel::County,
          features: &refdata.county_shapes,
        },
        BoundaryLayer {
          level: RegionLevel::Province,
          features: &refdata.province_shapes,
        },
      ],
      &refdata.county_centroids,
    ),
  };
  Ok(MapFigure {
    year,
    points,
    center,
    zoom,
    color_range: INDEX_COLOR_RANGE,
    color_midpoint: INDEX_COLOR_MIDPOINT,
    boundaries,
    markers,
  })
}

/// Category shares over the trailing window of years, for the whole country
/// or one province.
pub fn category_history(
  drought: &DroughtStore,
  focus: &MapFocus,
) -> Result<Vec<CategoryShare>, FigureError> {
  let mut shares = match focus {
    MapFocus::Province(name) => drought
      .province_percentages(name)?
      .into_iter()
      .map(|row| CategoryShare {
        year: row.year,
        category: row.category,
        percentage: row.percentage,
      })
      .collect::<Vec<_>>(),
    MapFocus::Country => country_category_history(drought)?,
  };
  if let Some(max_year) = shares.iter().map(|share| share.year).max() {
    shares.retain(|share| share.year >= max_year - HISTORY_WINDOW_YEARS);
  }
  Ok(shares)
}

/// Country-wide shares are not stored; they are derived by summing the
/// per-province areas and dividing by each year's total.
fn country_category_history(drought: &DroughtStore) -> Result<Vec<CategoryShare>, FigureError> {
  let rows = drought.province_areas()?;
  let mut totals: BTreeMap<i64, f64> = BTreeMap::new();
  let mut sums: BTreeMap<(i64, DroughtCategory), f64> = BTreeMap::new();
  for row in &rows {
    *totals.entry(row.year).or_insert(0.0) += row.area;
    *sums.entry((row.year, row.category)).or_insert(0.0) += row.area;
  }
  Ok(
    sums
      .into_iter()
      .map(|((year, category), area)| {
        let total = totals.get(&year).copied().unwrap_or(0.0);
        let percentage = if total > 0.0 { 100.0 * area / total } else { 0.0 };
        CategoryShare {
          year,
          category,
          percentage,
        }
      })
      .collect(),
  )
}

/// Per-region shares for one year: provinces for the country view, counties
/// for a province view. Regions come back in descending name order.
pub fn region_breakdown(
  drought: &DroughtStore,
  year: i64,
  focus: &MapFocus,
) -> Result<Vec<RegionShare>, FigureError> {
  let rows = match focus {
    MapFocus::Country => drought.province_percentages_for_year(year)?,
    MapFocus::Province(name) => drought.county_percentages_for_year(year, name)?,
  };
  Ok(
    rows
      .into_iter()
      .map(|row| RegionShare {
        region: row.region,
        category: row.category,
        percentage: row.percentage,
      })
      .collect(),
  )
}

/// Surface per category for one year and scope, in canonical category order.
pub fn pie_figure(
  drought: &DroughtStore,
  year: i64,
  scope: &PieScope,
) -> Result<Vec<CategoryArea>, FigureError> {
  let rows = match scope {
    PieScope::Country => drought.province_areas_for_year(year)?,
    PieScope::Province(name) => drought.province_areas_for_year_and_province(year, name)?,
    PieScope::County(name) => drought.county_areas_for_year(year, name)?,
  };
  let mut sums: BTreeMap<DroughtCategory, f64> = BTreeMap::new();
  for row in rows {
    *sums.entry(row.category).or_insert(0.0) += row.area;
  }
  Ok(
    sums
      .into_iter()
      .map(|(category, area)| CategoryArea { category, area })
      .collect(),
  )
}

/// The pie narrows with the selection: a chosen county wins over its
/// province, a province focus wins over the country.
pub fn pie_scope(focus: &MapFocus, county: Option<&str>) -> PieScope {
  match (focus, county) {
    (MapFocus::Country, _) => PieScope::Country,
    (MapFocus::Province(name), None) => PieScope::Province(name.clone()),
    (MapFocus::Province(_), Some(county)) => PieScope::County(county.to_string()),
  }
}

/// Counties offered for the county dropdown; the country view offers none.
pub fn counties_for<'a>(refdata: &'a ReferenceData, focus: &MapFocus) -> &'a [String] {
  match focus {
    MapFocus::Country => &[],
    MapFocus::Province(name) => refdata.counties_of(name),
  }
}

/// Slider labels are drawn at multiples of five.
pub fn slider_marks(years: &[i64]) -> Vec<i64> {
  years.iter().copied().filter(|year| year % 5 == 0).collect()
}
