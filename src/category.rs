//! The nine-level drought severity scale used by the aggregate tables.
//!
//! The string labels match the database contents byte for byte, historic
//! misspellings included (`Extremly`, `Sever`). Variant order runs dry to
//! wet and is the canonical stacking order for charts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DroughtCategory {
  #[serde(rename = "Extremly dry")]
  ExtremelyDry,
  #[serde(rename = "Sever dry")]
  SevereDry,
  #[serde(rename = "Moderate dry")]
  ModerateDry,
  #[serde(rename = "Slight dry")]
  SlightDry,
  #[serde(rename = "Normal")]
  Normal,
  #[serde(rename = "Slight wet")]
  SlightWet,
  #[serde(rename = "Moderate wet")]
  ModerateWet,
  #[serde(rename = "Sever wet")]
  SevereWet,
  #[serde(rename = "Extremly wet")]
  ExtremelyWet,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown drought category `{0}`")]
pub struct UnknownCategory(pub String);

impl DroughtCategory {
  pub const ALL: [DroughtCategory; 9] = [
    DroughtCategory::ExtremelyDry,
    DroughtCategory::SevereDry,
    DroughtCategory::ModerateDry,
    DroughtCategory::SlightDry,
    DroughtCategory::Normal,
    DroughtCategory::SlightWet,
    DroughtCategory::ModerateWet,
    DroughtCategory::SevereWet,
    DroughtCategory::ExtremelyWet,
  ];

  /// The label as stored in the drought tables.
  pub fn as_str(self) -> &'static str {
    match self {
      DroughtCategory::ExtremelyDry => "Extremly dry",
      DroughtCategory::SevereDry => "Sever dry",
      DroughtCategory::ModerateDry => "Moderate dry",
      DroughtCategory::SlightDry => "Slight dry",
      DroughtCategory::Normal => "Normal",
      DroughtCategory::SlightWet => "Slight wet",
      DroughtCategory::ModerateWet => "Moderate wet",
      DroughtCategory::SevereWet => "Sever wet",
      DroughtCategory::ExtremelyWet => "Extremly wet",
    }
  }
}

impl fmt::Display for DroughtCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DroughtCategory {
  type Err = UnknownCategory;

  fn from_str(label: &str) -> Result<DroughtCategory, UnknownCategory> {
    DroughtCategory::ALL
      .into_iter()
      .find(|category| category.as_str() == label)
      .ok_or_else(|| UnknownCategory(label.to_string()))
  }
}
