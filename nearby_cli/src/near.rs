use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use nearby_core::{
    feature_class::FeatureClass,
    geometry::DistanceMethod,
    near::{
        annotator::annotate_with_progress,
        near_params::{ExistingFieldPolicy, NearParams, SearchStrategy},
    },
};
use nearby_geojson::geojson_feature_class::GeoJsonFeatureClass;
use tracing::info;

use crate::{parsers, summary::summary_table};

#[derive(Args)]
pub struct NearArgs {
    /// GeoJSON features that receive the NEAR_FID and NEAR_DIST fields
    input: PathBuf,

    /// GeoJSON features searched for the nearest one
    near: PathBuf,

    /// Write the annotated features here instead of rewriting the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// planar or geodesic (points only)
    #[arg(long, env = "NEARBY_METHOD", default_value = "planar")]
    method: DistanceMethod,

    /// Ignore features farther away than this distance
    #[arg(long, env = "NEARBY_SEARCH_RADIUS", value_parser = parsers::parse_search_radius)]
    search_radius: Option<f64>,

    /// indexed or scan
    #[arg(long, env = "NEARBY_STRATEGY", default_value = "indexed")]
    strategy: SearchStrategy,

    /// overwrite or fail when NEAR_FID or NEAR_DIST already exist
    #[arg(long, env = "NEARBY_EXISTING_FIELDS", default_value = "overwrite")]
    existing_fields: ExistingFieldPolicy,

    /// Print a summary table once done
    #[arg(short, long)]
    summary: bool,
}

impl NearArgs {
    pub fn params(&self) -> NearParams {
        NearParams {
            method: self.method,
            search_radius: self.search_radius,
            strategy: self.strategy,
            existing_fields: self.existing_fields,
        }
    }
}

pub fn run(args: NearArgs) -> Result<(), anyhow::Error> {
    info!(
        "Finding features of {:?} nearest to the features of {:?}",
        args.near, args.input
    );

    let mut input = GeoJsonFeatureClass::from_path(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let near = GeoJsonFeatureClass::from_path(&args.near)
        .with_context(|| format!("Failed to read {}", args.near.display()))?;

    let bar = ProgressBar::new(input.len() as u64);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} ({elapsed})")?);

    let result = annotate_with_progress(&mut input, &near, &args.params(), |done, _| {
        bar.set_position(done as u64)
    });
    bar.finish_and_clear();
    let summary = result?;

    let output = args.output.as_ref().unwrap_or(&args.input);
    input
        .write_to_path(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if args.summary {
        println!("{}", summary_table(&summary));
    }

    Ok(())
}
