use geo::{BoundingRect, CoordsIter, Distance, Euclidean, Geometry, Haversine, Polygon, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feature::{Feature, FeatureId};

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Feature {0} has no geometry")]
    MissingGeometry(FeatureId),

    #[error("Feature {0} has an empty geometry")]
    EmptyGeometry(FeatureId),

    #[error("Feature {0} has a non-finite coordinate")]
    NonFiniteCoordinate(FeatureId),

    #[error("Geodesic distance is only supported between points, got {from} and {to}")]
    UnsupportedGeodesic {
        from: &'static str,
        to: &'static str,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMethod {
    /// Euclidean distance in the units of the spatial reference
    #[default]
    Planar,
    /// Haversine distance in meters, coordinates are lon/lat degrees
    Geodesic,
}

impl DistanceMethod {
    pub fn distance(&self, from: &Geometry<f64>, to: &Geometry<f64>) -> Result<f64, GeometryError> {
        match self {
            DistanceMethod::Planar => Ok(Euclidean.distance(from, to)),
            DistanceMethod::Geodesic => match (from, to) {
                (Geometry::Point(from), Geometry::Point(to)) => Ok(Haversine.distance(*from, *to)),
                _ => Err(GeometryError::UnsupportedGeodesic {
                    from: geometry_type_name(from),
                    to: geometry_type_name(to),
                }),
            },
        }
    }
}

/// Returns the geometry of `feature` if it can take part in a distance computation.
pub fn validate_geometry(feature: &Feature) -> Result<&Geometry<f64>, GeometryError> {
    let geometry = feature
        .geometry()
        .ok_or(GeometryError::MissingGeometry(feature.id()))?;

    if has_empty_part(geometry) {
        return Err(GeometryError::EmptyGeometry(feature.id()));
    }

    if !geometry.coords_iter().all(|coord| coord.x.is_finite() && coord.y.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate(feature.id()));
    }

    Ok(geometry)
}

/// True when the geometry or any of its parts has no coordinates.
fn has_empty_part(geometry: &Geometry<f64>) -> bool {
    match geometry {
        Geometry::Point(_) | Geometry::Line(_) | Geometry::Rect(_) | Geometry::Triangle(_) => false,
        Geometry::LineString(line_string) => line_string.0.is_empty(),
        Geometry::Polygon(polygon) => polygon_has_empty_ring(polygon),
        Geometry::MultiPoint(multi_point) => multi_point.0.is_empty(),
        Geometry::MultiLineString(multi_line_string) => {
            multi_line_string.0.is_empty()
                || multi_line_string
                    .0
                    .iter()
                    .any(|line_string| line_string.0.is_empty())
        }
        Geometry::MultiPolygon(multi_polygon) => {
            multi_polygon.0.is_empty() || multi_polygon.0.iter().any(polygon_has_empty_ring)
        }
        Geometry::GeometryCollection(collection) => {
            collection.0.is_empty() || collection.0.iter().any(has_empty_part)
        }
    }
}

fn polygon_has_empty_ring(polygon: &Polygon<f64>) -> bool {
    polygon.exterior().0.is_empty() || polygon.interiors().iter().any(|ring| ring.0.is_empty())
}

/// Bounding rectangle of a validated geometry.
pub(crate) fn envelope(geometry: &Geometry<f64>) -> Option<Rect<f64>> {
    geometry.bounding_rect()
}

pub fn geometry_type_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
