use std::path::Path;

use geo_types::Point;
use geojson::{Feature, GeoJson};
use serde_json::Value;

use super::error::Error;
use super::render::escape_html;
use super::style::{station_color, StationColor};
use crate::config::FieldMapping;

/// A metro station read from the converted GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: Option<String>,
    pub line: Option<String>,
    pub station_type: Option<String>,
    pub borough: Option<String>,
    pub year: Option<String>,
    /// x is longitude, y is latitude.
    pub location: Point<f64>,
}

impl Station {
    pub fn from_feature(index: usize, feature: &Feature, fields: &FieldMapping) -> Result<Station, Error> {
        let location = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::Point(coords)) if coords.len() >= 2 => Point::new(coords[0], coords[1]),
            _ => return Err(Error::NotAPoint { index }),
        };

        Ok(Station {
            name: attribute_text(feature, &fields.name),
            line: attribute_text(feature, &fields.line),
            station_type: attribute_text(feature, &fields.station_type),
            borough: attribute_text(feature, &fields.borough),
            year: attribute_text(feature, &fields.year),
            location,
        })
    }

    pub fn lat(&self) -> f64 {
        self.location.y()
    }

    pub fn lon(&self) -> f64 {
        self.location.x()
    }

    pub fn color(&self) -> StationColor {
        station_color(self.station_type.as_deref())
    }

    /// Popup body listing every attribute of the station.
    pub fn popup_html(&self) -> String {
        format!(
            "<b>{}</b><br>Line: {}<br>Type: {}<br>Borough: {}<br>Year: {}",
            text(&self.name),
            text(&self.line),
            text(&self.station_type),
            text(&self.borough),
            text(&self.year),
        )
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(escape_html).unwrap_or_default()
}

fn attribute_text(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Loads every station of a GeoJSON FeatureCollection, in file order.
pub fn load_stations(path: &Path, fields: &FieldMapping) -> Result<Vec<Station>, Error> {
    let contents = std::fs::read_to_string(path)?;
    let geojson: GeoJson = contents.parse()?;
    let collection = match geojson {
        GeoJson::FeatureCollection(collection) => collection,
        _ => return Err(Error::NotAFeatureCollection),
    };

    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| Station::from_feature(index, feature, fields))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature(value: serde_json::Value) -> Feature {
        Feature::from_json_value(value).unwrap()
    }

    #[test]
    fn reads_attributes_and_lon_lat() {
        let feature = feature(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-99.0729, 19.4153] },
            "properties": {
                "NOMBRE": "Pantitlán",
                "LINEA": "1",
                "TIPO": "Terminal / Transbordo",
                "ALCALDIAS": "Iztacalco",
                "AÑO": 1969
            }
        }));

        let station = Station::from_feature(0, &feature, &FieldMapping::default()).unwrap();
        assert_eq!(station.name.as_deref(), Some("Pantitlán"));
        assert_eq!(station.year.as_deref(), Some("1969"));
        assert_eq!(station.lon(), -99.0729);
        assert_eq!(station.lat(), 19.4153);
        assert_eq!(station.color(), StationColor::Orange);
        assert_eq!(
            station.popup_html(),
            "<b>Pantitlán</b><br>Line: 1<br>Type: Terminal / Transbordo<br>Borough: Iztacalco<br>Year: 1969"
        );
    }

    #[test]
    fn missing_attributes_render_empty() {
        let feature = feature(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [-99.0, 19.0] },
            "properties": { "NOMBRE": "Sin <tipo>", "TIPO": null }
        }));

        let station = Station::from_feature(0, &feature, &FieldMapping::default()).unwrap();
        assert_eq!(station.station_type, None);
        assert_eq!(station.color(), StationColor::Gray);
        assert!(station.popup_html().starts_with("<b>Sin &lt;tipo&gt;</b><br>Line: <br>"));
    }

    #[test]
    fn rejects_non_point_geometry() {
        let feature = feature(json!({
            "type": "Feature",
            "geometry": { "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] },
            "properties": {}
        }));

        assert!(matches!(
            Station::from_feature(4, &feature, &FieldMapping::default()),
            Err(Error::NotAPoint { index: 4 })
        ));
    }
}
