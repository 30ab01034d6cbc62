//! Station map with isochrone overlays.

pub mod error;
pub mod isochrone;
pub mod render;
pub mod station;
pub mod style;

use std::path::PathBuf;
use std::time::Instant;

use crate::config::MapConfig;
use error::Error;
use isochrone::{IsochroneOutcome, IsochroneSource};
use render::{CircleMarker, MapDocument, Overlay};
use station::Station;

/// Counts of what happened while building a map.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MapSummary {
    pub stations: usize,
    pub overlays: usize,
    pub empty: usize,
    pub rejected: usize,
    pub malformed: usize,
    pub unreachable: usize,
    pub output: PathBuf,
}

impl MapSummary {
    fn record(&mut self, outcome: &IsochroneOutcome) {
        self.stations += 1;
        match outcome {
            IsochroneOutcome::Ready(_) => self.overlays += 1,
            IsochroneOutcome::Empty => self.empty += 1,
            IsochroneOutcome::Rejected { .. } => self.rejected += 1,
            IsochroneOutcome::Malformed(_) => self.malformed += 1,
            IsochroneOutcome::Unreachable(_) => self.unreachable += 1,
        }
    }

    pub fn print_stats(&self) {
        log::info!("Map: {}", self.output.display());
        log::info!("  Stations: {}", self.stations);
        log::info!("  Isochrones drawn: {}", self.overlays);
        log::info!("  Empty responses: {}", self.empty);
        log::info!("  Rejected requests: {}", self.rejected);
        log::info!("  Unreadable responses: {}", self.malformed);
        log::info!("  Unreachable API: {}", self.unreachable);
    }
}

/// Draws a marker for every station and the isochrone of every station the
/// source can answer for. Requests are made one at a time, with
/// `config.station_delay` between consecutive stations.
pub async fn assemble<S: IsochroneSource>(
    stations: &[Station],
    config: &MapConfig,
    source: &S,
) -> (MapDocument, MapSummary) {
    let mut document = MapDocument::new(config.center, config.zoom);
    let mut summary = MapSummary {
        output: config.output.clone(),
        ..MapSummary::default()
    };

    for (index, station) in stations.iter().enumerate() {
        if index > 0 && !config.station_delay.is_zero() {
            actix_rt::time::sleep(config.station_delay).await;
        }

        log::debug!(
            "Station {}/{}: {}",
            index + 1,
            stations.len(),
            station.name.as_deref().unwrap_or("<unnamed>")
        );
        document.add_marker(CircleMarker::for_station(station));

        let outcome = source
            .isochrone(station.location, config.isochrone.minutes)
            .await;
        summary.record(&outcome);
        match outcome {
            IsochroneOutcome::Ready(isochrone) => document.add_overlay(Overlay::isochrone(isochrone)),
            IsochroneOutcome::Empty => log::warn!(
                "No isochrone available for station {}",
                station.name.as_deref().unwrap_or("<unnamed>")
            ),
            _ => log::debug!("Skipping isochrone overlay for station {}", index + 1),
        }
    }

    (document, summary)
}

/// Loads the stations, assembles the map and writes it as HTML.
///
/// # Parameters
/// - `config`: Input GeoJSON, output HTML path and map settings.
/// - `source`: Where isochrones come from.
///
/// # Returns
/// A summary of the run. Isochrone failures are counted, not raised.
pub async fn build_map<S: IsochroneSource>(config: &MapConfig, source: &S) -> Result<MapSummary, Error> {
    let start = Instant::now();
    let stations = station::load_stations(&config.input, &config.fields)?;
    log::info!(
        "Loaded {} stations from {}",
        stations.len(),
        config.input.display()
    );

    let (document, summary) = assemble(&stations, config, source).await;
    render::write_html(&config.output, &document)?;

    log::info!(
        "Map has been generated and saved as {} in {}ms",
        config.output.display(),
        start.elapsed().as_millis()
    );
    Ok(summary)
}
