use std::time::Duration;

use awc::Client;
use geo_types::Point;
use geojson::{FeatureCollection, GeoJson};
use serde::Serialize;
use url::Url;

use super::error::Error;
use crate::config::IsochroneConfig;

const ACCEPT: &str = "application/json, application/geo+json, application/gpx+xml, img/png; charset=utf-8";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_RESPONSE_BYTES: usize = 20 * 1024 * 1024;

/// Reachable area around one station.
#[derive(Debug, Clone, PartialEq)]
pub struct Isochrone {
    pub collection: FeatureCollection,
}

impl Isochrone {
    /// Decodes a successful API response body.
    pub fn parse(body: &[u8]) -> IsochroneOutcome {
        match serde_json::from_slice::<GeoJson>(body) {
            Ok(GeoJson::FeatureCollection(collection)) if collection.features.is_empty() => {
                IsochroneOutcome::Empty
            }
            Ok(GeoJson::FeatureCollection(collection)) => {
                IsochroneOutcome::Ready(Isochrone { collection })
            }
            Ok(_) => IsochroneOutcome::Malformed("expected a FeatureCollection".to_string()),
            Err(e) => IsochroneOutcome::Malformed(e.to_string()),
        }
    }
}

/// Result of asking for one isochrone. Only `Ready` is drawn on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum IsochroneOutcome {
    Ready(Isochrone),
    /// The API answered successfully without any polygon.
    Empty,
    /// The API answered with a non-success status.
    Rejected { status: u16, body: String },
    /// The API answered successfully with a body that is not a FeatureCollection.
    Malformed(String),
    /// The request never got an answer.
    Unreachable(String),
}

/// Something that can compute an isochrone around a point.
#[allow(async_fn_in_trait)]
pub trait IsochroneSource {
    async fn isochrone(&self, origin: Point<f64>, minutes: u32) -> IsochroneOutcome;
}

#[derive(Serialize)]
struct IsochroneRequest<'a> {
    locations: [[f64; 2]; 1],
    range: [u32; 1],
    attributes: &'a [String],
    units: &'a str,
}

impl<'a> IsochroneRequest<'a> {
    // The API expects [longitude, latitude] and a range in seconds
    fn new(origin: Point<f64>, minutes: u32, attributes: &'a [String], units: &'a str) -> Self {
        IsochroneRequest {
            locations: [[origin.x(), origin.y()]],
            range: [minutes.saturating_mul(60)],
            attributes,
            units,
        }
    }
}

/// OpenRouteService isochrone client. Sends one request per call, never retries.
pub struct OpenRouteService {
    client: Client,
    endpoint: Url,
    api_key: String,
    attributes: Vec<String>,
    units: String,
}

impl OpenRouteService {
    pub fn new(config: &IsochroneConfig) -> Result<OpenRouteService, Error> {
        let endpoint = config.endpoint()?;
        log::debug!("Isochrone endpoint: {}", endpoint);
        Ok(OpenRouteService {
            client: Client::builder().timeout(REQUEST_TIMEOUT).finish(),
            endpoint,
            api_key: config.api_key.clone(),
            attributes: config.attributes.clone(),
            units: config.units.clone(),
        })
    }
}

impl IsochroneSource for OpenRouteService {
    async fn isochrone(&self, origin: Point<f64>, minutes: u32) -> IsochroneOutcome {
        let request = IsochroneRequest::new(origin, minutes, &self.attributes, &self.units);

        let sent = self
            .client
            .post(self.endpoint.as_str())
            .insert_header(("Accept", ACCEPT))
            .insert_header(("Authorization", self.api_key.as_str()))
            .insert_header(("Content-Type", CONTENT_TYPE))
            .send_json(&request)
            .await;

        let mut response = match sent {
            Ok(response) => response,
            Err(e) => {
                log::error!("Error fetching isochrone: {}", e);
                return IsochroneOutcome::Unreachable(e.to_string());
            }
        };

        let status = response.status();
        let body = match response.body().limit(MAX_RESPONSE_BYTES).await {
            Ok(body) => body,
            Err(e) => {
                log::error!("Error reading isochrone response: {}", e);
                return IsochroneOutcome::Unreachable(e.to_string());
            }
        };

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            log::error!("Error fetching isochrone: {}, {}", status.as_u16(), body);
            return IsochroneOutcome::Rejected {
                status: status.as_u16(),
                body,
            };
        }

        let outcome = Isochrone::parse(&body);
        if let IsochroneOutcome::Malformed(reason) = &outcome {
            log::error!("Unreadable isochrone response: {}", reason);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_collection() {
        let body = br#"{
            "type": "FeatureCollection",
            "bbox": [-99.15, 19.42, -99.12, 19.45],
            "features": [{
                "type": "Feature",
                "properties": { "group_index": 0, "value": 900.0, "area": 2.87 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-99.15, 19.42], [-99.12, 19.42], [-99.12, 19.45], [-99.15, 19.42]]]
                }
            }],
            "metadata": { "service": "isochrones" }
        }"#;

        match Isochrone::parse(body) {
            IsochroneOutcome::Ready(isochrone) => assert_eq!(isochrone.collection.features.len(), 1),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn empty_collection_is_not_ready() {
        let body = br#"{ "type": "FeatureCollection", "features": [] }"#;
        assert_eq!(Isochrone::parse(body), IsochroneOutcome::Empty);
    }

    #[test]
    fn other_bodies_are_malformed() {
        assert!(matches!(
            Isochrone::parse(br#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#),
            IsochroneOutcome::Malformed(_)
        ));
        assert!(matches!(Isochrone::parse(b"<html>"), IsochroneOutcome::Malformed(_)));
    }

    #[test]
    fn request_body_uses_lon_lat_and_seconds() {
        let attributes = vec!["area".to_string()];
        let request = IsochroneRequest::new(Point::new(-99.1332, 19.4326), 15, &attributes, "km");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "locations": [[-99.1332, 19.4326]],
                "range": [900],
                "attributes": ["area"],
                "units": "km"
            })
        );
    }

    #[test]
    fn huge_time_budget_saturates_instead_of_wrapping() {
        let request = IsochroneRequest::new(Point::new(-99.1332, 19.4326), u32::MAX, &[], "km");
        assert_eq!(request.range, [u32::MAX]);

        let request = IsochroneRequest::new(Point::new(-99.1332, 19.4326), 71_582_789, &[], "km");
        assert_eq!(request.range, [u32::MAX]);
    }
}
