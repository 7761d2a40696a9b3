pub mod candidate_index;
pub mod feature;
pub mod feature_class;
pub mod field;
pub mod geometry;
pub mod near;
pub mod spatial_reference;

#[cfg(test)]
pub(crate) mod test_utils;
