use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::{Map, Number, Value};
use shapefile::dbase::encoding::DynEncoding;
use shapefile::dbase::{self, FieldValue, Record};
use shapefile::{Shape, ShapeReader};

use super::error::Error;
use super::utm::{detect_utm_zone, Utm};
use crate::config::SourceCrs;

/// Geometry of a converted record, in WGS84 longitude/latitude.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point([f64; 2]),
    MultiPoint(Vec<[f64; 2]>),
    Null,
}

/// One shapefile record: its geometry and its attribute table row.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeFeature {
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
}

/// Maps source coordinates to WGS84 longitude/latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Identity,
    Utm(Utm),
}

impl Projection {
    /// Resolves the projection for a shapefile, reading its `.prj` sidecar
    /// when the source CRS is left to detection.
    pub fn resolve(shp_path: &Path, source_crs: SourceCrs) -> Result<Projection, Error> {
        match source_crs {
            SourceCrs::Wgs84 => Ok(Projection::Identity),
            SourceCrs::Utm { zone, north } => Ok(Projection::Utm(Utm::new(zone, north)?)),
            SourceCrs::Detect => {
                let prj_path = shp_path.with_extension("prj");
                if !prj_path.exists() {
                    log::debug!("No projection file at {}", prj_path.display());
                    return Ok(Projection::Identity);
                }
                let wkt = std::fs::read_to_string(&prj_path)?;
                match detect_utm_zone(&wkt) {
                    Some((zone, north)) => {
                        log::info!(
                            "Reprojecting from UTM zone {}{} to WGS84",
                            zone,
                            if north { "N" } else { "S" }
                        );
                        Ok(Projection::Utm(Utm::new(zone, north)?))
                    }
                    None => Ok(Projection::Identity),
                }
            }
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> [f64; 2] {
        match self {
            Projection::Identity => [x, y],
            Projection::Utm(utm) => utm.to_wgs84(x, y),
        }
    }
}

/// Reads every record of a shapefile bundle, in file order.
pub fn read_features(path: &Path, projection: &Projection) -> Result<Vec<ShapeFeature>, Error> {
    let shape_reader = ShapeReader::from_path(path)?;
    let table = open_table(path)?;
    let columns: Vec<String> = table.fields().iter().map(|f| f.name().to_string()).collect();

    let mut reader = shapefile::Reader::new(shape_reader, table);
    let mut features = Vec::new();
    for (index, shape_record) in reader.iter_shapes_and_records().enumerate() {
        let (shape, record) = shape_record?;
        features.push(ShapeFeature {
            geometry: convert_shape(index, shape, projection)?,
            properties: convert_record(&columns, record),
        });
    }

    Ok(features)
}

/// Opens the `.dbf` table of a bundle. A `.cpg` sidecar naming a known
/// encoding wins over the language driver byte in the table header.
fn open_table(shp_path: &Path) -> Result<dbase::Reader<BufReader<File>>, Error> {
    let dbf_path = shp_path.with_extension("dbf");
    if !dbf_path.exists() {
        return Err(Error::Shapefile(shapefile::Error::MissingDbf));
    }

    let builder = match read_code_page(shp_path)? {
        Some(encoding) => dbase::ReaderBuilder::new().with_encoding(encoding),
        None => dbase::ReaderBuilder::new(),
    };
    Ok(builder.open(dbf_path)?)
}

fn read_code_page(shp_path: &Path) -> Result<Option<DynEncoding>, Error> {
    let cpg_path = shp_path.with_extension("cpg");
    if !cpg_path.exists() {
        return Ok(None);
    }

    let mut label = String::new();
    File::open(&cpg_path)?.take(1024).read_to_string(&mut label)?;
    let label = label.trim().trim_start_matches('\u{feff}');
    let encoding = DynEncoding::from_name(label);
    if encoding.is_none() {
        log::warn!(
            "Unknown code page {:?} in {}, using the table header",
            label,
            cpg_path.display()
        );
    }
    Ok(encoding)
}

fn convert_shape(index: usize, shape: Shape, projection: &Projection) -> Result<Geometry, Error> {
    let geometry = match shape {
        Shape::NullShape => Geometry::Null,
        Shape::Point(p) => Geometry::Point(projection.apply(p.x, p.y)),
        Shape::PointM(p) => Geometry::Point(projection.apply(p.x, p.y)),
        Shape::PointZ(p) => Geometry::Point(projection.apply(p.x, p.y)),
        Shape::Multipoint(mp) => Geometry::MultiPoint(
            mp.points().iter().map(|p| projection.apply(p.x, p.y)).collect(),
        ),
        Shape::MultipointM(mp) => Geometry::MultiPoint(
            mp.points().iter().map(|p| projection.apply(p.x, p.y)).collect(),
        ),
        Shape::MultipointZ(mp) => Geometry::MultiPoint(
            mp.points().iter().map(|p| projection.apply(p.x, p.y)).collect(),
        ),
        other => {
            return Err(Error::UnsupportedShape {
                index,
                shape_type: format!("{:?}", other.shapetype()),
            })
        }
    };
    Ok(geometry)
}

// Properties follow the column order of the table.
fn convert_record(columns: &[String], mut record: Record) -> Map<String, Value> {
    columns
        .iter()
        .filter_map(|name| {
            let value = record.remove(name)?;
            Some((name.clone(), field_to_json(value)))
        })
        .collect()
}

/// Converts a dBase field value to its JSON counterpart.
pub fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(Some(s)) => Value::String(s),
        FieldValue::Character(None) => Value::Null,
        FieldValue::Memo(s) => Value::String(s),
        FieldValue::Numeric(Some(n)) => number(n),
        FieldValue::Numeric(None) => Value::Null,
        FieldValue::Float(Some(n)) => number(n as f64),
        FieldValue::Float(None) => Value::Null,
        FieldValue::Double(n) => number(n),
        FieldValue::Currency(n) => number(n),
        FieldValue::Integer(n) => Value::from(n),
        FieldValue::Logical(Some(b)) => Value::Bool(b),
        FieldValue::Logical(None) => Value::Null,
        FieldValue::Date(Some(date)) => Value::String(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        FieldValue::Date(None) => Value::Null,
        other => Value::String(format!("{:?}", other)),
    }
}

// Whole numbers are written as integers, as GIS tools do for zero-decimal columns.
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
