use geojson::JsonObject;
use nearby_core::field::{FieldDefinition, FieldType, FieldValue, Schema};
use serde_json::Value;

/// Column type seen so far, `None` while only nulls were encountered.
fn merge(current: Option<FieldType>, value: &Value) -> Option<FieldType> {
    let seen = match value {
        Value::Null => return current,
        Value::Number(number) if number.is_i64() => FieldType::Long,
        Value::Number(_) => FieldType::Double,
        Value::String(_) => FieldType::Text,
        _ => FieldType::Json,
    };

    Some(match (current, seen) {
        (None, seen) => seen,
        (Some(current), seen) if current == seen => current,
        (Some(FieldType::Long), FieldType::Double) | (Some(FieldType::Double), FieldType::Long) => {
            FieldType::Double
        }
        _ => FieldType::Json,
    })
}

/// Builds a schema from the properties of every feature, fields in first-seen order.
pub(crate) fn infer_schema<'a, I>(properties: I) -> Schema
where
    I: IntoIterator<Item = Option<&'a JsonObject>>,
{
    let mut columns: Vec<(String, Option<FieldType>)> = Vec::new();

    for object in properties.into_iter().flatten() {
        for (name, value) in object {
            match columns.iter_mut().find(|(column, _)| column == name) {
                Some((_, field_type)) => *field_type = merge(*field_type, value),
                None => columns.push((name.clone(), merge(None, value))),
            }
        }
    }

    Schema::new(
        columns
            .into_iter()
            .map(|(name, field_type)| {
                FieldDefinition::new(name, field_type.unwrap_or(FieldType::Json))
            })
            .collect(),
    )
}

pub(crate) fn to_field_value(value: Option<&Value>, field_type: FieldType) -> FieldValue {
    let Some(value) = value.filter(|value| !value.is_null()) else {
        return FieldValue::Null;
    };

    let converted = match field_type {
        FieldType::Long => value.as_i64().map(FieldValue::Long),
        FieldType::Double => value.as_f64().map(FieldValue::Double),
        FieldType::Text => value.as_str().map(|text| FieldValue::Text(text.to_string())),
        FieldType::Json => None,
    };

    converted.unwrap_or_else(|| FieldValue::Json(value.clone()))
}

pub(crate) fn to_properties(schema: &Schema, values: &[FieldValue]) -> JsonObject {
    schema
        .fields()
        .iter()
        .zip(values)
        .map(|(field, value)| (field.name().to_string(), Value::from(value)))
        .collect()
}
