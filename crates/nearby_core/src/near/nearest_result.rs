use crate::{candidate_index::Nearest, feature::FeatureId};

/// Values written to `NEAR_FID` and `NEAR_DIST` for one target feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestResult {
    pub near_fid: i64,
    pub near_dist: f64,
}

impl NearestResult {
    pub const NOT_FOUND: NearestResult = NearestResult {
        near_fid: -1,
        near_dist: -1.0,
    };

    pub fn new(id: FeatureId, distance: f64) -> Self {
        Self {
            near_fid: id.get(),
            near_dist: distance,
        }
    }

    /// Distances are never negative, so only the sentinel has one.
    pub fn is_found(&self) -> bool {
        self.near_dist >= 0.0
    }
}

impl From<Option<Nearest>> for NearestResult {
    fn from(nearest: Option<Nearest>) -> Self {
        nearest.map_or(Self::NOT_FOUND, |nearest| {
            Self::new(nearest.id, nearest.distance)
        })
    }
}
