use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 64-bit signed integer
    Long,
    Double,
    Text,
    /// Untyped value, used for attributes that don't fit a scalar column
    Json,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Long => "LONG",
            FieldType::Double => "DOUBLE",
            FieldType::Text => "TEXT",
            FieldType::Json => "JSON",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Long(i64),
    Double(f64),
    Text(String),
    Json(serde_json::Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            FieldValue::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            FieldValue::Double(value) => Some(*value),
            FieldValue::Long(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&FieldValue> for serde_json::Value {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Null => serde_json::Value::Null,
            FieldValue::Long(value) => serde_json::Value::from(*value),
            // Non-finite doubles have no JSON representation and become null
            FieldValue::Double(value) => serde_json::Number::from_f64(*value)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Text(value) => serde_json::Value::String(value.clone()),
            FieldValue::Json(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    name: String,
    field_type: FieldType,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Field names compare case-insensitively, `Near_FID` and `NEAR_FID` are the same column.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Ordered column definitions shared by every row of a feature class.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Vec<FieldDefinition>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.is_named(name))
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.is_named(name))
    }

    pub(crate) fn push(&mut self, field: FieldDefinition) -> usize {
        self.fields.push(field);
        self.fields.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lookup_ignores_case() {
        let schema = Schema::new(vec![
            FieldDefinition::new("NAME", FieldType::Text),
            FieldDefinition::new("NEAR_FID", FieldType::Long),
        ]);

        assert_eq!(schema.position("Near_FID"), Some(1));
        assert_eq!(schema.field("name").unwrap().field_type(), FieldType::Text);
        assert_eq!(schema.position("NEAR_DIST"), None);
    }

    #[test]
    fn test_field_value_to_json() {
        assert_eq!(
            serde_json::Value::from(&FieldValue::Long(-1)),
            serde_json::json!(-1)
        );
        assert_eq!(
            serde_json::Value::from(&FieldValue::Double(-1.0)),
            serde_json::json!(-1.0)
        );
        assert_eq!(
            serde_json::Value::from(&FieldValue::Double(f64::NAN)),
            serde_json::Value::Null
        );
        assert_eq!(serde_json::Value::from(&FieldValue::Null), serde_json::Value::Null);
    }
}
