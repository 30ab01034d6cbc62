use std::path::PathBuf;

use clap::Parser;

use metro_isochrones::config::{ConvertConfig, SourceCrs, DEFAULT_GEOJSON, DEFAULT_SHAPEFILE};
use metro_isochrones::convert::{self, error::Error};

/// Convert a shapefile of stations to GeoJSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = DEFAULT_SHAPEFILE)]
    input: PathBuf,

    #[arg(long, default_value = DEFAULT_GEOJSON)]
    output: PathBuf,

    /// Source UTM zone; detected from the .prj file when omitted
    #[arg(long, conflicts_with = "wgs84")]
    utm_zone: Option<u8>,

    /// The UTM zone is in the southern hemisphere
    #[arg(long, requires = "utm_zone")]
    south: bool,

    /// Coordinates are already longitude/latitude, skip detection
    #[arg(long)]
    wgs84: bool,
}

impl Args {
    fn source_crs(&self) -> SourceCrs {
        match (self.wgs84, self.utm_zone) {
            (true, _) => SourceCrs::Wgs84,
            (false, Some(zone)) => SourceCrs::Utm {
                zone,
                north: !self.south,
            },
            (false, None) => SourceCrs::Detect,
        }
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ConvertConfig {
        source_crs: args.source_crs(),
        input: args.input,
        output: args.output,
    };

    log::info!("Reading shapefile from path: {}", config.input.display());
    let features = convert::convert_shp_to_geojson(&config)?;
    log::info!("Converted {} features", features.len());
    Ok(())
}
