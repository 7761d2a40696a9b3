use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::geometry::DistanceMethod;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Nearest-first walk over an R-tree of the candidates
    #[default]
    Indexed,
    /// Rescan every candidate for every target feature
    Scan,
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Indexed => f.write_str("indexed"),
            SearchStrategy::Scan => f.write_str("scan"),
        }
    }
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "indexed" | "index" => Ok(SearchStrategy::Indexed),
            "scan" => Ok(SearchStrategy::Scan),
            _ => Err(format!("Unknown search strategy {s}")),
        }
    }
}

/// What to do when `NEAR_FID` or `NEAR_DIST` already exist on the target features.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExistingFieldPolicy {
    /// Reuse fields of the expected type and overwrite their values
    #[default]
    Overwrite,
    Fail,
}

impl FromStr for ExistingFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(ExistingFieldPolicy::Overwrite),
            "fail" => Ok(ExistingFieldPolicy::Fail),
            _ => Err(format!("Unknown existing field policy {s}")),
        }
    }
}

impl FromStr for DistanceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planar" | "euclidean" => Ok(DistanceMethod::Planar),
            "geodesic" | "haversine" => Ok(DistanceMethod::Geodesic),
            _ => Err(format!("Unknown distance method {s}")),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct NearParams {
    pub method: DistanceMethod,

    /// Candidates farther away than this are ignored
    pub search_radius: Option<f64>,
    pub strategy: SearchStrategy,
    pub existing_fields: ExistingFieldPolicy,
}
