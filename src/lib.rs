//! Backend for a drought severity dashboard: decoding of flat-text
//! boundary geometry, read-only access to the drought and shapes
//! databases, and the data behind each dashboard figure.

pub mod audit;
pub mod category;
pub mod config;
pub mod coord_text;
pub mod export;
pub mod figures;
pub mod geojson;
pub mod geom;
pub mod refdata;
pub mod store;

#[cfg(test)]
mod testutil;

pub use category::DroughtCategory;
pub use coord_text::{decode, encode, DecodeError, GeometryKind};
pub use geom::{Coord, Geometry, MultiPolygon, Polygon, Ring};
