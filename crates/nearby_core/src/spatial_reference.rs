use std::fmt;

use serde::{Deserialize, Serialize};

/// EPSG factory code of a feature class' coordinate system.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpatialReference(u32);

impl SpatialReference {
    /// WGS 84, the implied reference of RFC 7946 GeoJSON.
    pub const WGS84: SpatialReference = SpatialReference(4326);
    pub const WEB_MERCATOR: SpatialReference = SpatialReference(3857);

    pub const fn from_epsg(code: u32) -> Self {
        Self(code)
    }

    pub const fn factory_code(&self) -> u32 {
        self.0
    }

    pub fn is_geographic(&self) -> bool {
        // Only the common geographic codes, anything else is treated as projected
        matches!(self.0, 4326 | 4258 | 4269 | 4283 | 4617 | 4979)
    }
}

impl fmt::Display for SpatialReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::WGS84
    }
}

impl From<u32> for SpatialReference {
    fn from(code: u32) -> Self {
        Self(code)
    }
}
