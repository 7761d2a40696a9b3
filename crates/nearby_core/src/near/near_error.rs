use thiserror::Error;

use crate::{
    feature_class::SchemaError, field::FieldType, geometry::GeometryError,
    spatial_reference::SpatialReference,
};

#[derive(Debug, Error, PartialEq)]
pub enum NearError {
    #[error(
        "The spatial references do not match ({target} and {candidate}). Please project the data and try again."
    )]
    SpatialReferenceMismatch {
        target: SpatialReference,
        candidate: SpatialReference,
    },

    #[error("Field {0} already exists on the input features")]
    FieldAlreadyExists(String),

    #[error("Field {field} already exists as {found}, expected {expected}")]
    FieldTypeConflict {
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    #[error("Invalid search radius {0}")]
    InvalidSearchRadius(f64),

    #[error("{found} results were computed for {expected} target features")]
    RowCountMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
