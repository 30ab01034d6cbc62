use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use geojson::FeatureCollection;
use serde::Serialize;

use super::error::Error;
use super::isochrone::Isochrone;
use super::station::Station;
use super::style::{self, StationColor};
use crate::config::MapCenter;

const LEAFLET_VERSION: &str = "1.9.4";

/// Everything drawn on the map, serialised into the HTML page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    /// `[latitude, longitude]`, the order Leaflet expects.
    pub center: [f64; 2],
    pub zoom: u8,
    pub markers: Vec<CircleMarker>,
    pub overlays: Vec<Overlay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    pub location: [f64; 2],
    pub radius: f64,
    pub color: &'static str,
    pub fill_color: StationColor,
    pub fill_opacity: f64,
    pub popup: String,
    pub popup_max_width: u32,
}

impl CircleMarker {
    pub fn for_station(station: &Station) -> CircleMarker {
        CircleMarker {
            location: [station.lat(), station.lon()],
            radius: style::MARKER_RADIUS,
            color: style::MARKER_STROKE,
            fill_color: station.color(),
            fill_opacity: style::MARKER_FILL_OPACITY,
            popup: station.popup_html(),
            popup_max_width: style::POPUP_MAX_WIDTH,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub fill_color: &'static str,
    pub color: &'static str,
    pub weight: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Serialize)]
pub struct Overlay {
    pub geojson: FeatureCollection,
    pub style: OverlayStyle,
}

impl Overlay {
    pub fn isochrone(isochrone: Isochrone) -> Overlay {
        Overlay {
            geojson: isochrone.collection,
            style: OverlayStyle {
                fill_color: style::ISOCHRONE_COLOR,
                color: style::ISOCHRONE_COLOR,
                weight: style::ISOCHRONE_WEIGHT,
                fill_opacity: style::ISOCHRONE_FILL_OPACITY,
            },
        }
    }
}

impl MapDocument {
    pub fn new(center: MapCenter, zoom: u8) -> MapDocument {
        MapDocument {
            center: [center.lat, center.lon],
            zoom,
            markers: Vec::new(),
            overlays: Vec::new(),
        }
    }

    pub fn add_marker(&mut self, marker: CircleMarker) {
        self.markers.push(marker);
    }

    pub fn add_overlay(&mut self, overlay: Overlay) {
        self.overlays.push(overlay);
    }

    /// Renders a standalone HTML page. Leaflet is loaded from a CDN, all map
    /// data is inlined.
    pub fn to_html(&self) -> Result<String, Error> {
        // "</" inside a script element would end it early
        let data = serde_json::to_string(self)?.replace("</", "<\\/");
        Ok(PAGE_TEMPLATE
            .replace("__LEAFLET_VERSION__", LEAFLET_VERSION)
            .replace("__GENERATED__", &Utc::now().to_rfc3339())
            .replace("__MAP_DATA__", &data))
    }
}

pub fn write_html(path: &Path, document: &MapDocument) -> Result<(), Error> {
    let html = document.to_html()?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(html.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// Isochrones are added before markers so the markers stay clickable on top.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <meta name="generated" content="__GENERATED__" />
    <title>Metro stations and isochrones</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@__LEAFLET_VERSION__/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@__LEAFLET_VERSION__/dist/leaflet.js"></script>
    <style>
        html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
        #map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script>
        const data = __MAP_DATA__;
        const map = L.map("map").setView(data.center, data.zoom);
        L.tileLayer("https://tile.openstreetmap.org/{z}/{x}/{y}.png", {
            maxZoom: 19,
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
        }).addTo(map);
        for (const overlay of data.overlays) {
            L.geoJSON(overlay.geojson, { style: () => overlay.style }).addTo(map);
        }
        for (const marker of data.markers) {
            L.circleMarker(marker.location, {
                radius: marker.radius,
                color: marker.color,
                fill: true,
                fillColor: marker.fillColor,
                fillOpacity: marker.fillOpacity
            }).bindPopup(marker.popup, { maxWidth: marker.popupMaxWidth }).addTo(map);
        }
    </script>
</body>
</html>
"#;
