use tracing::{debug, error, info, warn};

use crate::{
    candidate_index::{Candidate, CandidateIndex, scan_nearest},
    feature_class::{FeatureClass, SchemaError},
    field::{FieldDefinition, FieldType, FieldValue, Schema},
    geometry::{DistanceMethod, validate_geometry},
};

use super::{
    NEAR_DIST_FIELD, NEAR_FID_FIELD,
    near_error::NearError,
    near_params::{ExistingFieldPolicy, NearParams, SearchStrategy},
    near_summary::NearSummary,
    nearest_result::NearestResult,
};

/// Writes the identifier and distance of the nearest candidate to `NEAR_FID` and
/// `NEAR_DIST` on every target feature.
///
/// Everything is validated and computed before the target is touched: on error the
/// target's schema and rows are left as they were.
pub fn annotate<T, C>(
    target: &mut T,
    candidates: &C,
    params: &NearParams,
) -> Result<NearSummary, NearError>
where
    T: FeatureClass,
    C: FeatureClass,
{
    annotate_with_progress(target, candidates, params, |_, _| {})
}

/// Same as [`annotate`], `progress` is called with `(done, total)` after each target feature.
pub fn annotate_with_progress<T, C, P>(
    target: &mut T,
    candidates: &C,
    params: &NearParams,
    mut progress: P,
) -> Result<NearSummary, NearError>
where
    T: FeatureClass,
    C: FeatureClass,
    P: FnMut(usize, usize),
{
    check_spatial_references(target, candidates)?;

    if let Some(radius) = params
        .search_radius
        .filter(|radius| !(radius.is_finite() && *radius >= 0.0))
    {
        return Err(NearError::InvalidSearchRadius(radius));
    }

    if params.method == DistanceMethod::Geodesic && !target.spatial_reference().is_geographic() {
        warn!(
            "Geodesic distances on {} assume lon/lat coordinates",
            target.spatial_reference()
        );
    }

    let missing_fields = resolve_output_fields(target.schema(), params.existing_fields)?;

    let (results, strategy) = find_nearest(target, candidates, params, &mut progress)?;
    if results.len() != target.len() {
        return Err(NearError::RowCountMismatch {
            expected: target.len(),
            found: results.len(),
        });
    }

    for field in missing_fields {
        target.add_field(field)?;
    }

    target.update_features(|index, mut row| {
        let result = results
            .get(index)
            .ok_or(SchemaError::RowOutOfRange(index))?;

        row.set(NEAR_FID_FIELD, FieldValue::Long(result.near_fid))?;
        row.set(NEAR_DIST_FIELD, FieldValue::Double(result.near_dist))
    })?;

    let summary = NearSummary::from_results(&results, candidates.len(), strategy);
    info!(
        "Annotated {}: matched = {}, unmatched = {}",
        target.name(),
        summary.matched,
        summary.unmatched
    );

    Ok(summary)
}

fn check_spatial_references<T, C>(target: &T, candidates: &C) -> Result<(), NearError>
where
    T: FeatureClass,
    C: FeatureClass,
{
    let target_reference = target.spatial_reference();
    let candidate_reference = candidates.spatial_reference();

    if target_reference != candidate_reference {
        info!("{}", target_reference.factory_code());
        info!("{}", candidate_reference.factory_code());
        error!("The spatial references do not match. Please project the data and try again.");

        return Err(NearError::SpatialReferenceMismatch {
            target: target_reference,
            candidate: candidate_reference,
        });
    }

    Ok(())
}

/// Output fields that still have to be added to `schema`.
fn resolve_output_fields(
    schema: &Schema,
    policy: ExistingFieldPolicy,
) -> Result<Vec<FieldDefinition>, NearError> {
    let mut missing = Vec::with_capacity(2);

    for (name, field_type) in [
        (NEAR_FID_FIELD, FieldType::Long),
        (NEAR_DIST_FIELD, FieldType::Double),
    ] {
        match schema.field(name) {
            None => missing.push(FieldDefinition::new(name, field_type)),
            Some(existing) if existing.field_type() != field_type => {
                return Err(NearError::FieldTypeConflict {
                    field: existing.name().to_string(),
                    expected: field_type,
                    found: existing.field_type(),
                });
            }
            Some(existing) => match policy {
                ExistingFieldPolicy::Overwrite => {
                    debug!("Overwriting existing field {}", existing.name());
                }
                ExistingFieldPolicy::Fail => {
                    return Err(NearError::FieldAlreadyExists(existing.name().to_string()));
                }
            },
        }
    }

    Ok(missing)
}

fn find_nearest<T, C, P>(
    target: &T,
    candidates: &C,
    params: &NearParams,
    progress: &mut P,
) -> Result<(Vec<NearestResult>, SearchStrategy), NearError>
where
    T: FeatureClass,
    C: FeatureClass,
    P: FnMut(usize, usize),
{
    let candidate_list = candidates
        .features()
        .map(|feature| {
            validate_geometry(feature).map(|geometry| Candidate {
                id: feature.id(),
                geometry,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let strategy = match (params.strategy, params.method) {
        (SearchStrategy::Indexed, DistanceMethod::Geodesic) => {
            debug!("Geodesic distances are not indexed, scanning candidates");
            SearchStrategy::Scan
        }
        (strategy, _) => strategy,
    };

    info!(
        "Finding nearest features for {} targets among {} candidates ({})",
        target.len(),
        candidate_list.len(),
        strategy
    );

    let index = match strategy {
        SearchStrategy::Indexed => Some(CandidateIndex::build(candidate_list.clone())),
        SearchStrategy::Scan => None,
    };

    let total = target.len();
    let mut results = Vec::with_capacity(total);

    for feature in target.features() {
        let geometry = validate_geometry(feature)?;

        let nearest = match &index {
            Some(index) => index.nearest(geometry, params.search_radius)?,
            None => scan_nearest(
                &candidate_list,
                geometry,
                params.method,
                params.search_radius,
            )?,
        };

        results.push(NearestResult::from(nearest));
        progress(results.len(), total);
    }

    Ok((results, strategy))
}
