pub mod crs;
pub mod error;
pub mod geojson_feature_class;
mod schema_inference;
