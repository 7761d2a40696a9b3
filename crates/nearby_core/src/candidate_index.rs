use geo::Geometry;
use rstar::RTree;
use rstar::primitives::{GeomWithData, Rectangle};
use tracing::debug;

use crate::{
    feature::FeatureId,
    geometry::{DistanceMethod, GeometryError, envelope},
};

/// Lower bounds and exact distances are computed differently, a bound can overshoot by
/// a few ulps. Pruning keeps this much slack so exact ties are never cut off.
const PRUNE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: FeatureId,
    pub geometry: &'a Geometry<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Position of the candidate in storage order
    pub order: usize,
    pub id: FeatureId,
    pub distance: f64,
}

/// Full scan over `candidates` in storage order.
///
/// The first candidate within the radius is taken as is, later candidates replace it only
/// when strictly closer, so ties go to whichever comes first.
pub fn scan_nearest(
    candidates: &[Candidate<'_>],
    target: &Geometry<f64>,
    method: DistanceMethod,
    search_radius: Option<f64>,
) -> Result<Option<Nearest>, GeometryError> {
    let mut nearest: Option<Nearest> = None;

    for (order, candidate) in candidates.iter().enumerate() {
        let distance = method.distance(target, candidate.geometry)?;

        if search_radius.is_some_and(|radius| distance > radius) {
            continue;
        }

        match nearest {
            None => {
                nearest = Some(Nearest {
                    order,
                    id: candidate.id,
                    distance,
                })
            }
            Some(current) if distance < current.distance => {
                nearest = Some(Nearest {
                    order,
                    id: candidate.id,
                    distance,
                })
            }
            Some(_) => {}
        }
    }

    Ok(nearest)
}

fn with_tolerance(distance: f64) -> f64 {
    distance + PRUNE_TOLERANCE * distance.max(1.0)
}

type IndexedEnvelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// R-tree over the bounding rectangles of the candidates, planar distances only.
pub struct CandidateIndex<'a> {
    candidates: Vec<Candidate<'a>>,
    tree: RTree<IndexedEnvelope>,
}

impl<'a> CandidateIndex<'a> {
    pub fn build(candidates: Vec<Candidate<'a>>) -> Self {
        debug!("Building candidate index over {} features", candidates.len());

        let tree = RTree::bulk_load(
            candidates
                .iter()
                .enumerate()
                .filter_map(|(order, candidate)| {
                    envelope(candidate.geometry).map(|rect| {
                        IndexedEnvelope::new(
                            Rectangle::from_corners(
                                [rect.min().x, rect.min().y],
                                [rect.max().x, rect.max().y],
                            ),
                            order,
                        )
                    })
                })
                .collect(),
        );

        CandidateIndex { candidates, tree }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate<'a>] {
        &self.candidates
    }

    /// Same answer as [`scan_nearest`] with [`DistanceMethod::Planar`].
    ///
    /// Envelopes are visited nearest-first from the centre of the target's envelope. The
    /// distance to an envelope minus the target's half diagonal bounds the distance to every
    /// candidate not visited yet, the walk stops once that bound passes the best match.
    pub fn nearest(
        &self,
        target: &Geometry<f64>,
        search_radius: Option<f64>,
    ) -> Result<Option<Nearest>, GeometryError> {
        let Some(target_envelope) = envelope(target) else {
            return Ok(None);
        };

        let center = target_envelope.center();
        let half_diagonal = target_envelope.width().hypot(target_envelope.height()) / 2.0;

        let mut nearest: Option<Nearest> = None;

        for (indexed, distance_2) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[center.x, center.y])
        {
            let lower_bound = (distance_2.sqrt() - half_diagonal).max(0.0);

            if search_radius.is_some_and(|radius| lower_bound > with_tolerance(radius))
                || nearest.is_some_and(|current| lower_bound > with_tolerance(current.distance))
            {
                break;
            }

            let order = indexed.data;
            let candidate = &self.candidates[order];
            let distance = DistanceMethod::Planar.distance(target, candidate.geometry)?;

            if search_radius.is_some_and(|radius| distance > radius) {
                continue;
            }

            let is_better = match nearest {
                None => true,
                Some(current) => {
                    distance < current.distance
                        || (distance == current.distance && order < current.order)
                }
            };

            if is_better {
                nearest = Some(Nearest {
                    order,
                    id: candidate.id,
                    distance,
                });
            }
        }

        Ok(nearest)
    }
}

#[cfg(test)]
mod tests {
    use geo::{Point, line_string, polygon};
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    use super::*;

    fn candidates(geometries: &[Geometry<f64>]) -> Vec<Candidate<'_>> {
        geometries
            .iter()
            .enumerate()
            .map(|(index, geometry)| Candidate {
                id: FeatureId::new(index as i64 + 1),
                geometry,
            })
            .collect()
    }

    #[test]
    fn test_scan_nearest() {
        let geometries: Vec<Geometry<f64>> = vec![
            Point::new(10.0, 0.0).into(),
            Point::new(3.0, 0.0).into(),
            Point::new(3.0, 1.0).into(),
        ];
        let candidates = candidates(&geometries);

        let nearest = scan_nearest(
            &candidates,
            &Point::new(0.0, 0.0).into(),
            DistanceMethod::Planar,
            None,
        )
        .unwrap()
        .unwrap();

        assert_eq!(nearest.id, FeatureId::new(2));
        assert_eq!(nearest.order, 1);
        assert_eq!(nearest.distance, 3.0);
    }

    #[test]
    fn test_scan_first_tie_wins() {
        let geometries: Vec<Geometry<f64>> = vec![
            Point::new(0.0, 5.0).into(),
            Point::new(5.0, 0.0).into(),
            Point::new(-5.0, 0.0).into(),
        ];
        let candidates = candidates(&geometries);

        let nearest = scan_nearest(
            &candidates,
            &Point::new(0.0, 0.0).into(),
            DistanceMethod::Planar,
            None,
        )
        .unwrap()
        .unwrap();

        assert_eq!(nearest.id, FeatureId::new(1));
    }

    #[test]
    fn test_scan_with_radius() {
        let geometries: Vec<Geometry<f64>> = vec![
            Point::new(10.0, 0.0).into(),
            Point::new(3.0, 0.0).into(),
        ];
        let candidates = candidates(&geometries);
        let target: Geometry<f64> = Point::new(0.0, 0.0).into();

        let in_range = scan_nearest(&candidates, &target, DistanceMethod::Planar, Some(3.0))
            .unwrap()
            .unwrap();
        assert_eq!(in_range.id, FeatureId::new(2));

        let out_of_range =
            scan_nearest(&candidates, &target, DistanceMethod::Planar, Some(2.5)).unwrap();
        assert_eq!(out_of_range, None);
    }

    #[test]
    fn test_index_empty() {
        let index = CandidateIndex::build(vec![]);

        assert!(index.is_empty());
        assert_eq!(index.nearest(&Point::new(0.0, 0.0).into(), None).unwrap(), None);
    }

    #[test]
    fn test_index_with_lines_and_polygons() {
        let geometries: Vec<Geometry<f64>> = vec![
            line_string![(x: 10.0, y: -50.0), (x: 10.0, y: 50.0)].into(),
            polygon![
                (x: -20.0, y: -20.0),
                (x: -6.0, y: -20.0),
                (x: -6.0, y: 20.0),
                (x: -20.0, y: 20.0),
            ]
            .into(),
            Point::new(0.0, 30.0).into(),
        ];
        let candidates = candidates(&geometries);
        let index = CandidateIndex::build(candidates.clone());

        let target: Geometry<f64> = line_string![(x: 0.0, y: -1.0), (x: 0.0, y: 1.0)].into();
        let nearest = index.nearest(&target, None).unwrap().unwrap();

        assert_eq!(nearest.id, FeatureId::new(2));
        assert!((nearest.distance - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_index_matches_scan() {
        let mut rng = SmallRng::seed_from_u64(42);

        // Integer coordinates on a small grid produce plenty of exact ties
        let mut random_point =
            || Point::new(rng.random_range(0..20) as f64, rng.random_range(0..20) as f64);

        let geometries: Vec<Geometry<f64>> = (0..300)
            .map(|i| {
                if i % 5 == 0 {
                    let start = random_point();
                    let end = random_point();
                    line_string![start.0, end.0].into()
                } else {
                    random_point().into()
                }
            })
            .collect();
        let targets: Vec<Geometry<f64>> = (0..200).map(|_| random_point().into()).collect();

        let candidates = candidates(&geometries);
        let index = CandidateIndex::build(candidates.clone());

        for radius in [None, Some(1.5), Some(0.0)] {
            for target in &targets {
                let scanned =
                    scan_nearest(&candidates, target, DistanceMethod::Planar, radius).unwrap();
                let indexed = index.nearest(target, radius).unwrap();

                assert_eq!(scanned, indexed, "target {target:?}, radius {radius:?}");
            }
        }
    }
}
