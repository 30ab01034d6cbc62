use thiserror::Error;

/// An error that can occur while converting a shapefile to GeoJSON.
#[derive(Error, Debug)]
pub enum Error {
    /// Generic Input/Output error while reading or writing a file
    #[error("impossible to access file")]
    IO(#[from] std::io::Error),
    /// The shapefile bundle could not be read
    #[error(transparent)]
    Shapefile(#[from] shapefile::Error),
    /// The `.dbf` attribute table could not be opened
    #[error(transparent)]
    Table(#[from] shapefile::dbase::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    /// A record holds a geometry with no GeoJSON point counterpart
    #[error("record {index} has unsupported shape type {shape_type}")]
    UnsupportedShape { index: usize, shape_type: String },
    #[error("invalid UTM zone {0}, expected 1 to 60")]
    InvalidUtmZone(u8),
}
