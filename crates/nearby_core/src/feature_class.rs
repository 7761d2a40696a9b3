use thiserror::Error;
use tracing::debug;

use crate::{
    feature::Feature,
    field::{FieldDefinition, FieldType, FieldValue, Schema},
    spatial_reference::SpatialReference,
};

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Field {0} already exists")]
    DuplicateField(String),

    #[error("Unknown field {0}")]
    UnknownField(String),

    #[error("Field {field} expects a {expected} value")]
    TypeMismatch { field: String, expected: FieldType },

    #[error("Row {0} is out of range")]
    RowOutOfRange(usize),

    #[error("Row has {found} values but the schema has {expected} fields")]
    RowLength { expected: usize, found: usize },
}

/// Data access layer for a set of features sharing a schema and a spatial reference.
///
/// `features` is the read cursor, `update_features` the update cursor. Both walk the
/// features in storage order.
pub trait FeatureClass {
    fn name(&self) -> &str;

    fn spatial_reference(&self) -> SpatialReference;

    fn schema(&self) -> &Schema;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn features(&self) -> impl Iterator<Item = &Feature>;

    /// Appends a field to the schema, every existing row gets a `Null` value.
    fn add_field(&mut self, field: FieldDefinition) -> Result<(), SchemaError>;

    fn update_features<F>(&mut self, update: F) -> Result<(), SchemaError>
    where
        F: FnMut(usize, RowUpdate<'_>) -> Result<(), SchemaError>;
}

/// A single row handed out by an update cursor.
pub struct RowUpdate<'a> {
    schema: &'a Schema,
    feature: &'a mut Feature,
}

impl<'a> RowUpdate<'a> {
    pub fn new(schema: &'a Schema, feature: &'a mut Feature) -> Self {
        Self { schema, feature }
    }

    pub fn feature(&self) -> &Feature {
        &*self.feature
    }

    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError> {
        let position = self
            .schema
            .position(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        let field = &self.schema.fields()[position];

        let accepted = match (&value, field.field_type()) {
            (FieldValue::Null, _) | (_, FieldType::Json) => true,
            (FieldValue::Long(_), FieldType::Long)
            | (FieldValue::Double(_), FieldType::Double)
            | (FieldValue::Text(_), FieldType::Text) => true,
            _ => false,
        };

        if !accepted {
            return Err(SchemaError::TypeMismatch {
                field: field.name().to_string(),
                expected: field.field_type(),
            });
        }

        self.feature.set_value(position, value);
        Ok(())
    }
}

/// Feature class held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryFeatureClass {
    name: String,
    spatial_reference: SpatialReference,
    schema: Schema,
    features: Vec<Feature>,
}

impl MemoryFeatureClass {
    pub fn new(name: impl Into<String>, spatial_reference: SpatialReference, schema: Schema) -> Self {
        Self {
            name: name.into(),
            spatial_reference,
            schema,
            features: Vec::new(),
        }
    }

    pub fn push_feature(&mut self, feature: Feature) -> Result<(), SchemaError> {
        if feature.values().len() != self.schema.len() {
            return Err(SchemaError::RowLength {
                expected: self.schema.len(),
                found: feature.values().len(),
            });
        }

        self.features.push(feature);
        Ok(())
    }

    pub fn feature(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Value of `name` for the feature at `index`.
    pub fn value(&self, index: usize, name: &str) -> Option<&FieldValue> {
        let position = self.schema.position(name)?;
        self.features.get(index)?.value(position)
    }
}

impl FeatureClass for MemoryFeatureClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn spatial_reference(&self) -> SpatialReference {
        self.spatial_reference
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn len(&self) -> usize {
        self.features.len()
    }

    fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    fn add_field(&mut self, field: FieldDefinition) -> Result<(), SchemaError> {
        if self.schema.field(field.name()).is_some() {
            return Err(SchemaError::DuplicateField(field.name().to_string()));
        }

        debug!(
            "Adding field {} ({}) to {}",
            field.name(),
            field.field_type(),
            self.name
        );

        self.schema.push(field);
        for feature in self.features.iter_mut() {
            feature.push_value(FieldValue::Null);
        }

        Ok(())
    }

    fn update_features<F>(&mut self, mut update: F) -> Result<(), SchemaError>
    where
        F: FnMut(usize, RowUpdate<'_>) -> Result<(), SchemaError>,
    {
        let schema = &self.schema;
        for (index, feature) in self.features.iter_mut().enumerate() {
            update(index, RowUpdate::new(schema, feature))?;
        }

        Ok(())
    }
}
