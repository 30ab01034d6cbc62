use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot access file")]
    IO(#[from] std::io::Error),
    #[error(transparent)]
    GeoJson(#[from] geojson::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error("Station file is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("Feature {index} has no point geometry")]
    NotAPoint { index: usize },
    #[error("Invalid isochrone endpoint")]
    Url(#[from] url::ParseError),
}
