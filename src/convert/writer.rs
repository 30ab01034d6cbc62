use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::error::Error;
use super::reader::{Geometry, ShapeFeature};

pub fn convert_to_geojson(features: &[Value]) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

// Build one GeoJSON feature per shapefile record, keeping record order
pub fn get_features(shapes: &[ShapeFeature]) -> Vec<Value> {
    shapes
        .iter()
        .map(|shape| {
            json!({
                "type": "Feature",
                "geometry": geometry_to_json(&shape.geometry),
                "properties": &shape.properties,
            })
        })
        .collect::<Vec<Value>>()
}

fn geometry_to_json(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(coords) => json!({
            "type": "Point",
            "coordinates": coords,
        }),
        Geometry::MultiPoint(points) => json!({
            "type": "MultiPoint",
            "coordinates": points,
        }),
        Geometry::Null => Value::Null,
    }
}

pub fn write_geojson(path: &Path, geojson: &Value) -> Result<(), Error> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, geojson)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn features_are_points_in_lon_lat_order() {
        let mut properties = Map::new();
        properties.insert("NOMBRE".to_string(), Value::from("Zócalo"));
        let shapes = vec![
            ShapeFeature {
                geometry: Geometry::Point([-99.1332, 19.4326]),
                properties,
            },
            ShapeFeature {
                geometry: Geometry::Null,
                properties: Map::new(),
            },
        ];

        let geojson = convert_to_geojson(&get_features(&shapes));
        assert_eq!(geojson["type"], "FeatureCollection");
        assert_eq!(geojson["features"].as_array().unwrap().len(), 2);
        assert_eq!(geojson["features"][0]["geometry"]["type"], "Point");
        assert_eq!(
            geojson["features"][0]["geometry"]["coordinates"],
            json!([-99.1332, 19.4326])
        );
        assert_eq!(geojson["features"][0]["properties"]["NOMBRE"], "Zócalo");
        assert!(geojson["features"][1]["geometry"].is_null());
    }
}
