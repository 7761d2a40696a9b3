use nearby_core::feature_class::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a FeatureCollection, got a {0}")]
    NotAFeatureCollection(&'static str),

    #[error("Unsupported crs member: {0}")]
    UnsupportedCrs(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
