use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use url::Url;

pub const DEFAULT_SHAPEFILE: &str = "STC_Metro_estaciones_utm14n.shp";
pub const DEFAULT_GEOJSON: &str = "mexico_city_subway_stations.geojson";
pub const DEFAULT_MAP: &str = "mexico_city_metro_map.html";
pub const ORS_ISOCHRONES_URL: &str = "https://api.openrouteservice.org/v2/isochrones/";

/// Coordinate system of the input shapefile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SourceCrs {
    /// Read the `.prj` sidecar and reproject if it names a UTM zone.
    #[default]
    Detect,
    /// Coordinates are already WGS84 longitude/latitude.
    Wgs84,
    /// Universal Transverse Mercator on the WGS84 ellipsoid.
    Utm { zone: u8, north: bool },
}

/// Settings for the shapefile to GeoJSON conversion.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub source_crs: SourceCrs,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        ConvertConfig {
            input: PathBuf::from(DEFAULT_SHAPEFILE),
            output: PathBuf::from(DEFAULT_GEOJSON),
            source_crs: SourceCrs::Detect,
        }
    }
}

/// OpenRouteService travel profile used for isochrones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TravelProfile {
    #[default]
    FootWalking,
    FootHiking,
    CyclingRegular,
    DrivingCar,
    Wheelchair,
}

impl TravelProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelProfile::FootWalking => "foot-walking",
            TravelProfile::FootHiking => "foot-hiking",
            TravelProfile::CyclingRegular => "cycling-regular",
            TravelProfile::DrivingCar => "driving-car",
            TravelProfile::Wheelchair => "wheelchair",
        }
    }
}

/// Settings for the isochrone API.
#[derive(Debug, Clone)]
pub struct IsochroneConfig {
    /// Base URL the profile name is appended to.
    pub base_url: String,
    pub profile: TravelProfile,
    pub api_key: String,
    /// Time budget in minutes.
    pub minutes: u32,
    pub attributes: Vec<String>,
    pub units: String,
}

impl IsochroneConfig {
    /// Full endpoint, e.g. `.../v2/isochrones/foot-walking`.
    pub fn endpoint(&self) -> Result<Url, url::ParseError> {
        let mut base = self.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)?.join(self.profile.as_str())
    }
}

impl Default for IsochroneConfig {
    fn default() -> Self {
        IsochroneConfig {
            base_url: ORS_ISOCHRONES_URL.to_string(),
            profile: TravelProfile::FootWalking,
            api_key: String::new(),
            minutes: 15,
            attributes: vec!["area".to_string()],
            units: "km".to_string(),
        }
    }
}

/// Names of the GeoJSON properties holding station attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub name: String,
    pub line: String,
    pub station_type: String,
    pub borough: String,
    pub year: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        FieldMapping {
            name: "NOMBRE".to_string(),
            line: "LINEA".to_string(),
            station_type: "TIPO".to_string(),
            borough: "ALCALDIAS".to_string(),
            year: "AÑO".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Settings for building the HTML map.
#[derive(Debug, Clone)]
pub struct MapConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub center: MapCenter,
    pub zoom: u8,
    /// Pause between two consecutive stations.
    pub station_delay: Duration,
    pub isochrone: IsochroneConfig,
    pub fields: FieldMapping,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            input: PathBuf::from(DEFAULT_GEOJSON),
            output: PathBuf::from(DEFAULT_MAP),
            center: MapCenter {
                lat: 19.4326,
                lon: -99.1332,
            },
            zoom: 11,
            station_delay: Duration::from_secs(1),
            isochrone: IsochroneConfig::default(),
            fields: FieldMapping::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_profile() {
        let config = IsochroneConfig::default();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://api.openrouteservice.org/v2/isochrones/foot-walking"
        );

        let config = IsochroneConfig {
            base_url: "http://127.0.0.1:8080/v2/isochrones".to_string(),
            profile: TravelProfile::CyclingRegular,
            ..IsochroneConfig::default()
        };
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:8080/v2/isochrones/cycling-regular"
        );
    }
}
