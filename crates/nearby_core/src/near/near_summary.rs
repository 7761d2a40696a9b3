use serde::Serialize;

use super::{near_params::SearchStrategy, nearest_result::NearestResult};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct NearSummary {
    pub targets: usize,
    pub candidates: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub max_distance: Option<f64>,
    pub strategy: SearchStrategy,
}

impl NearSummary {
    pub fn from_results(
        results: &[NearestResult],
        candidates: usize,
        strategy: SearchStrategy,
    ) -> Self {
        let matched = results.iter().filter(|result| result.is_found()).count();
        let max_distance = results
            .iter()
            .filter(|result| result.is_found())
            .map(|result| result.near_dist)
            .max_by(f64::total_cmp);

        NearSummary {
            targets: results.len(),
            candidates,
            matched,
            unmatched: results.len() - matched,
            max_distance,
            strategy,
        }
    }
}
