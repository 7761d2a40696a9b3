use std::fmt;

use geo::Geometry;
use serde::{Deserialize, Serialize};

use crate::field::FieldValue;

/// Object identifier of a feature within its feature class.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId(i64);

impl FeatureId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for FeatureId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    geometry: Option<Geometry<f64>>,
    values: Vec<FieldValue>,
}

impl Feature {
    pub fn new(id: FeatureId, geometry: Option<Geometry<f64>>, values: Vec<FieldValue>) -> Self {
        Self {
            id,
            geometry,
            values,
        }
    }

    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }

    /// Attribute values, aligned with the owning feature class' schema.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn value(&self, position: usize) -> Option<&FieldValue> {
        self.values.get(position)
    }

    pub fn set_value(&mut self, position: usize, value: FieldValue) -> Option<FieldValue> {
        self.values
            .get_mut(position)
            .map(|slot| std::mem::replace(slot, value))
    }

    pub(crate) fn push_value(&mut self, value: FieldValue) {
        self.values.push(value);
    }
}
