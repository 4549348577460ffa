//! In-memory database fixtures shared by the store, figure and audit tests.

use crate::store::{DroughtStore, ShapeStore};

pub fn drought_connection() -> sqlite::Connection {
  let connection = sqlite::open(":memory:").unwrap();
  connection
    .execute(
      "
      CREATE TABLE spei (x REAL, y REAL, year INTEGER, value REAL);
      INSERT INTO spei VALUES (51.0, 35.5, 1999, 0.5);
      INSERT INTO spei VALUES (51.0, 35.5, 2001, -0.5);
      INSERT INTO spei VALUES (51.0, 35.5, 2010, 1.0);
      INSERT INTO spei VALUES (51.0, 35.5, 2020, -1.25);
      INSERT INTO spei VALUES (51.5, 35.0, 2020, 0.75);
      INSERT INTO spei VALUES (51.0, 35.5, 2021, -2.1);
      INSERT INTO spei VALUES (52.0, 36.0, 2021, 1.4);
      INSERT INTO spei VALUES (53.0, 33.0, 2021, 0.0);

      CREATE TABLE drought_percentage_per_province (
        province TEXT, year INTEGER, category TEXT, percentage REAL);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 1999, 'Normal', 60.0);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 1999, 'Sever dry', 40.0);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 2001, 'Normal', 55.0);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 2001, 'Sever dry', 45.0);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 2010, 'Normal', 70.0);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 2010, 'Moderate dry', 30.0);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 2021, 'Normal', 50.0);
      INSERT INTO drought_percentage_per_province VALUES ('Tehran', 2021, 'Extremly dry', 50.0);
      INSERT INTO drought_percentage_per_province VALUES ('Alborz', 2021, 'Normal', 80.0);
      INSERT INTO drought_percentage_per_province VALUES ('Alborz', 2021, 'Slight wet', 20.0);

      CREATE TABLE drought_percentage_per_county (
        county TEXT, province TEXT, year INTEGER, category TEXT, percentage REAL);
      INSERT INTO drought_percentage_per_county VALUES ('Rey', 'Tehran', 2021, 'Normal', 45.0);
      INSERT INTO drought_percentage_per_county VALUES ('Rey', 'Tehran', 2021, 'Sever dry', 55.0);
      INSERT INTO drought_percentage_per_county VALUES ('Shemiranat', 'Tehran', 2021, 'Normal', 90.0);
      INSERT INTO drought_percentage_per_county VALUES ('Shemiranat', 'Tehran', 2021, 'Slight dry', 10.0);

      CREATE TABLE drought_area_per_province (
        province TEXT, year INTEGER, category TEXT, area REAL);
      INSERT INTO drought_area_per_province VALUES ('Tehran', 2020, 'Normal', 600.0);
      INSERT INTO drought_area_per_province VALUES ('Tehran', 2020, 'Sever dry', 400.0);
      INSERT INTO drought_area_per_province VALUES ('Alborz', 2020, 'Normal', 300.0);
      INSERT INTO drought_area_per_province VALUES ('Alborz', 2020, 'Sever dry', 200.0);
      INSERT INTO drought_area_per_province VALUES ('Tehran', 2021, 'Normal', 500.0);
      INSERT INTO drought_area_per_province VALUES ('Tehran', 2021, 'Extremly dry', 500.0);
      INSERT INTO drought_area_per_province VALUES ('Alborz', 2021, 'Normal', 400.0);
      INSERT INTO drought_area_per_province VALUES ('Alborz', 2021, 'Extremly dry', 100.0);

      CREATE TABLE drought_area_per_county (
        county TEXT, year INTEGER, category TEXT, area REAL);
      INSERT INTO drought_area_per_county VALUES ('Rey', 2021, 'Normal', 120.0);
      INSERT INTO drought_area_per_county VALUES ('Rey', 2021, 'Sever dry', 80.0);
      ",
    )
    .unwrap();
  connection
}

pub fn shapes_connection() -> sqlite::Connection {
  let connection = sqlite::open(":memory:").unwrap();
  connection
    .execute(
      "
      CREATE TABLE province (
        id INTEGER, province_name TEXT, longitude REAL, latitude REAL,
        polygon_type TEXT, coordinates TEXT);
      INSERT INTO province VALUES
        (1, 'Tehran', 51.389, 35.689, 'Polygon', '51 35,52 35,52 36,51 36');
      INSERT INTO province VALUES
        (2, 'Alborz', 50.9, 35.8, 'MultiPolygon',
         '50 35,51 35,51 36|50.2 35.2,50.4 35.2,50.3 35.4');

      CREATE TABLE county (
        id INTEGER, county_name TEXT, province_id INTEGER, province_name TEXT,
        longitude REAL, latitude REAL, polygon_type TEXT, coordinates TEXT);
      INSERT INTO county VALUES
        (1, 'Rey', 1, 'Tehran', 51.43, 35.59, 'Polygon',
         '51.3 35.5,51.6 35.5,51.45 35.7');
      INSERT INTO county VALUES
        (2, 'Shemiranat', 1, 'Tehran', 51.6, 35.95, 'Polygon',
         '51.4 35.8,51.8 35.8,51.6 36.1');
      INSERT INTO county VALUES
        (3, 'Karaj', 2, 'Alborz', 50.99, 35.84, 'Polygon',
         '50.8 35.7,51.1 35.7,50.95 35.95');
      ",
    )
    .unwrap();
  connection
}

pub fn drought_store() -> DroughtStore {
  DroughtStore::new(drought_connection())
}

pub fn shapes_store() -> ShapeStore {
  ShapeStore::new(shapes_connection())
}
