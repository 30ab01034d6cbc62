//! Shapefile to GeoJSON conversion.

pub mod error;
pub mod reader;
pub mod utm;
pub mod writer;

use std::time::Instant;

use crate::config::ConvertConfig;
use error::Error;
use reader::{Projection, ShapeFeature};

/// Converts a shapefile to a GeoJSON FeatureCollection.
///
/// # Parameters
/// - `config`: Input shapefile, output path and source coordinate system.
///
/// # Returns
/// The features that were read, in file order.
pub fn convert_shp_to_geojson(config: &ConvertConfig) -> Result<Vec<ShapeFeature>, Error> {
    let start = Instant::now();
    let projection = Projection::resolve(&config.input, config.source_crs)?;

    log::debug!("Reading shapefile {}", config.input.display());
    let features = reader::read_features(&config.input, &projection)?;
    log::debug!(
        "Read {} features in {}ms",
        features.len(),
        start.elapsed().as_millis()
    );

    let geojson = writer::convert_to_geojson(&writer::get_features(&features));
    writer::write_geojson(&config.output, &geojson)?;

    log::info!(
        "Conversion complete. GeoJSON file saved as {}",
        config.output.display()
    );
    Ok(features)
}
