use nearby_core::spatial_reference::SpatialReference;
use serde_json::Value;

use crate::error::GeoJsonError;

pub const CRS_MEMBER: &str = "crs";

/// Reads the spatial reference from a legacy (2008) GeoJSON `crs` member.
///
/// Only named crs objects are understood. Without a member, RFC 7946 coordinates are WGS 84.
pub fn spatial_reference_from_crs(crs: Option<&Value>) -> Result<SpatialReference, GeoJsonError> {
    let crs = match crs {
        None | Some(Value::Null) => return Ok(SpatialReference::WGS84),
        Some(crs) => crs,
    };

    let name = crs
        .get("properties")
        .and_then(|properties| properties.get("name"))
        .and_then(Value::as_str)
        .filter(|_| crs.get("type").and_then(Value::as_str) == Some("name"))
        .ok_or_else(|| GeoJsonError::UnsupportedCrs(crs.to_string()))?;

    parse_crs_name(name).ok_or_else(|| GeoJsonError::UnsupportedCrs(name.to_string()))
}

/// `EPSG:3857`, `urn:ogc:def:crs:EPSG::3857` or the OGC CRS84 urns.
fn parse_crs_name(name: &str) -> Option<SpatialReference> {
    let upper = name.to_ascii_uppercase();

    if upper.ends_with(":CRS84") {
        return Some(SpatialReference::WGS84);
    }

    if !upper.contains("EPSG") {
        return None;
    }

    let (_, code) = upper.rsplit_once(':')?;
    code.parse::<u32>().ok().map(SpatialReference::from_epsg)
}
