use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use metro_isochrones::config::{
    FieldMapping, IsochroneConfig, MapCenter, MapConfig, TravelProfile, DEFAULT_GEOJSON, DEFAULT_MAP,
    ORS_ISOCHRONES_URL,
};
use metro_isochrones::map::{self, error::Error, isochrone::OpenRouteService};

/// Draw metro stations and their isochrones on an HTML map.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// GeoJSON file produced by shp2geojson
    #[arg(long, default_value = DEFAULT_GEOJSON)]
    input: PathBuf,

    /// HTML file to write
    #[arg(long, default_value = DEFAULT_MAP)]
    output: PathBuf,

    /// OpenRouteService API key
    #[arg(long, env = "ORS_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Isochrone time budget in minutes, at most one day
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(1..=1440))]
    minutes: u32,

    /// Pause between two stations, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    #[arg(long, default_value_t = 19.4326, allow_negative_numbers = true)]
    center_lat: f64,

    #[arg(long, default_value_t = -99.1332, allow_negative_numbers = true)]
    center_lon: f64,

    #[arg(long, default_value_t = 11)]
    zoom: u8,

    #[arg(long, value_enum, default_value_t = TravelProfile::FootWalking)]
    profile: TravelProfile,

    /// Base URL of the isochrone service, the profile is appended to it
    #[arg(long, default_value = ORS_ISOCHRONES_URL)]
    api_url: String,
}

impl Args {
    fn into_config(self) -> MapConfig {
        MapConfig {
            input: self.input,
            output: self.output,
            center: MapCenter {
                lat: self.center_lat,
                lon: self.center_lon,
            },
            zoom: self.zoom,
            station_delay: Duration::from_millis(self.delay_ms),
            isochrone: IsochroneConfig {
                base_url: self.api_url,
                profile: self.profile,
                api_key: self.api_key,
                minutes: self.minutes,
                ..IsochroneConfig::default()
            },
            fields: FieldMapping::default(),
        }
    }
}

#[actix_rt::main]
async fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config();
    if config.isochrone.api_key.is_empty() {
        log::warn!("No API key given, isochrone requests will most likely be rejected");
    }

    let source = OpenRouteService::new(&config.isochrone)?;
    let summary = map::build_map(&config, &source).await?;
    summary.print_stats();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_are_bounded_to_one_day() {
        let args = Args::try_parse_from(["metro-map", "--minutes", "30"]).unwrap();
        assert_eq!(args.into_config().isochrone.minutes, 30);

        assert!(Args::try_parse_from(["metro-map", "--minutes", "1441"]).is_err());
        assert!(Args::try_parse_from(["metro-map", "--minutes", "71582789"]).is_err());
        assert!(Args::try_parse_from(["metro-map", "--minutes", "0"]).is_err());
    }
}
