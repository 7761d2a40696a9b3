pub mod annotator;
pub mod near_error;
pub mod near_params;
pub mod near_summary;
pub mod nearest_result;

pub const NEAR_FID_FIELD: &str = "NEAR_FID";
pub const NEAR_DIST_FIELD: &str = "NEAR_DIST";
