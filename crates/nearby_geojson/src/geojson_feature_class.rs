use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use geojson::{FeatureCollection, GeoJson, JsonObject, feature::Id};
use nearby_core::{
    feature::{Feature, FeatureId},
    feature_class::{FeatureClass, MemoryFeatureClass, RowUpdate, SchemaError},
    field::{FieldDefinition, Schema},
    spatial_reference::SpatialReference,
};
use tracing::{debug, info};

use crate::{
    crs::{CRS_MEMBER, spatial_reference_from_crs},
    error::GeoJsonError,
    schema_inference::{infer_schema, to_field_value, to_properties},
};

/// A GeoJSON `FeatureCollection` exposed as a feature class.
///
/// Source features are kept without their properties, writing the collection back
/// only rebuilds `properties` from the schema.
pub struct GeoJsonFeatureClass {
    features: MemoryFeatureClass,
    sources: Vec<geojson::Feature>,
    bbox: Option<geojson::Bbox>,
    foreign_members: Option<JsonObject>,
}

impl GeoJsonFeatureClass {
    pub fn from_path(path: &Path) -> Result<Self, GeoJsonError> {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!("Reading {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(name, BufReader::new(file))
    }

    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self, GeoJsonError> {
        let geojson = GeoJson::from_reader(reader)?;
        Self::from_geojson(name, geojson)
    }

    pub fn from_geojson(name: impl Into<String>, geojson: GeoJson) -> Result<Self, GeoJsonError> {
        let collection = match geojson {
            GeoJson::FeatureCollection(collection) => collection,
            GeoJson::Feature(_) => return Err(GeoJsonError::NotAFeatureCollection("Feature")),
            GeoJson::Geometry(_) => return Err(GeoJsonError::NotAFeatureCollection("Geometry")),
        };

        let spatial_reference = spatial_reference_from_crs(
            collection
                .foreign_members
                .as_ref()
                .and_then(|members| members.get(CRS_MEMBER)),
        )?;

        let schema = infer_schema(
            collection
                .features
                .iter()
                .map(|feature| feature.properties.as_ref()),
        );

        let name = name.into();
        let mut features = MemoryFeatureClass::new(name.clone(), spatial_reference, schema.clone());
        let mut sources = Vec::with_capacity(collection.features.len());

        for (position, mut source) in collection.features.into_iter().enumerate() {
            let id = feature_id(source.id.as_ref(), position);

            let geometry = source
                .geometry
                .as_ref()
                .map(|geometry| geo_types::Geometry::<f64>::try_from(&geometry.value))
                .transpose()?;

            let properties = source.properties.take();
            let values = schema
                .fields()
                .iter()
                .map(|field| {
                    to_field_value(
                        properties
                            .as_ref()
                            .and_then(|properties| properties.get(field.name())),
                        field.field_type(),
                    )
                })
                .collect();

            features.push_feature(Feature::new(id, geometry, values))?;
            sources.push(source);
        }

        debug!(
            "Loaded {} features from {} ({}, {} fields)",
            sources.len(),
            name,
            spatial_reference,
            schema.len()
        );

        Ok(GeoJsonFeatureClass {
            features,
            sources,
            bbox: collection.bbox,
            foreign_members: collection.foreign_members,
        })
    }

    pub fn as_memory(&self) -> &MemoryFeatureClass {
        &self.features
    }

    pub fn to_geojson(&self) -> GeoJson {
        let schema = self.features.schema();

        let features = self
            .sources
            .iter()
            .zip(self.features.features())
            .map(|(source, feature)| geojson::Feature {
                properties: Some(to_properties(schema, feature.values())),
                ..source.clone()
            })
            .collect();

        GeoJson::FeatureCollection(FeatureCollection {
            bbox: self.bbox.clone(),
            features,
            foreign_members: self.foreign_members.clone(),
        })
    }

    /// Writes the collection to a sibling temporary file, then renames it over `path`.
    pub fn write_to_path(&self, path: &Path) -> Result<(), GeoJsonError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("output.geojson"));
        let temporary_path = path.with_file_name(format!(".{file_name}.tmp"));

        let written = self
            .write_json(&temporary_path)
            .and_then(|()| std::fs::rename(&temporary_path, path).map_err(GeoJsonError::from));
        if let Err(err) = written {
            if let Err(remove_err) = std::fs::remove_file(&temporary_path) {
                debug!(
                    "Could not remove {}: {remove_err}",
                    temporary_path.display()
                );
            }
            return Err(err);
        }

        info!("Wrote {} features to {}", self.sources.len(), path.display());

        Ok(())
    }

    fn write_json(&self, path: &Path) -> Result<(), GeoJsonError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, &self.to_geojson())?;
        writer.flush()?;

        Ok(())
    }
}

/// Integer ids are object ids, anything else falls back to the 1-based position.
fn feature_id(id: Option<&Id>, position: usize) -> FeatureId {
    match id {
        Some(Id::Number(number)) if number.is_i64() => {
            FeatureId::new(number.as_i64().unwrap_or_default())
        }
        _ => FeatureId::new(position as i64 + 1),
    }
}

impl FromStr for GeoJsonFeatureClass {
    type Err = GeoJsonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_geojson("geojson", s.parse::<GeoJson>()?)
    }
}

impl FeatureClass for GeoJsonFeatureClass {
    fn name(&self) -> &str {
        self.features.name()
    }

    fn spatial_reference(&self) -> SpatialReference {
        self.features.spatial_reference()
    }

    fn schema(&self) -> &Schema {
        self.features.schema()
    }

    fn len(&self) -> usize {
        self.features.len()
    }

    fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.features()
    }

    fn add_field(&mut self, field: FieldDefinition) -> Result<(), SchemaError> {
        self.features.add_field(field)
    }

    fn update_features<F>(&mut self, update: F) -> Result<(), SchemaError>
    where
        F: FnMut(usize, RowUpdate<'_>) -> Result<(), SchemaError>,
    {
        self.features.update_features(update)
    }
}
