use geo::Point;

use crate::{
    feature::{Feature, FeatureId},
    feature_class::{FeatureClass, MemoryFeatureClass},
    field::{FieldValue, Schema},
    near::{NEAR_DIST_FIELD, NEAR_FID_FIELD},
    spatial_reference::SpatialReference,
};

/// Point features without attributes, ids start at 1 like object ids do.
pub fn point_features(points: &[(f64, f64)]) -> Vec<Feature> {
    points
        .iter()
        .enumerate()
        .map(|(index, &(x, y))| {
            Feature::new(
                FeatureId::new(index as i64 + 1),
                Some(Point::new(x, y).into()),
                vec![],
            )
        })
        .collect()
}

pub fn create_feature_class(
    name: &str,
    spatial_reference: SpatialReference,
    features: Vec<Feature>,
) -> MemoryFeatureClass {
    let mut feature_class = MemoryFeatureClass::new(name, spatial_reference, Schema::default());
    for feature in features {
        feature_class.push_feature(feature).unwrap();
    }

    feature_class
}

pub fn create_point_feature_class(name: &str, points: &[(f64, f64)]) -> MemoryFeatureClass {
    create_feature_class(name, SpatialReference::WGS84, point_features(points))
}

/// `(NEAR_FID, NEAR_DIST)` of every feature, in storage order.
pub fn near_values(feature_class: &MemoryFeatureClass) -> Vec<(i64, f64)> {
    (0..feature_class.len())
        .map(|index| {
            let near_fid = feature_class
                .value(index, NEAR_FID_FIELD)
                .and_then(FieldValue::as_long)
                .unwrap();
            let near_dist = feature_class
                .value(index, NEAR_DIST_FIELD)
                .and_then(FieldValue::as_double)
                .unwrap();

            (near_fid, near_dist)
        })
        .collect()
}
