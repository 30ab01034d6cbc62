use serde::Serialize;

pub const MARKER_RADIUS: f64 = 8.0;
pub const MARKER_STROKE: &str = "black";
pub const MARKER_FILL_OPACITY: f64 = 0.7;
pub const POPUP_MAX_WIDTH: u32 = 300;

pub const ISOCHRONE_COLOR: &str = "green";
pub const ISOCHRONE_WEIGHT: f64 = 2.0;
pub const ISOCHRONE_FILL_OPACITY: f64 = 0.3;

/// Marker fill colour of a station.
#[derive(Debug, Serialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum StationColor {
    Orange,
    Red,
    Blue,
    Green,
    Gray,
}

/// Colour for a station type label. Unknown or missing labels are gray.
pub fn station_color(station_type: Option<&str>) -> StationColor {
    match station_type {
        Some("Terminal / Transbordo") => StationColor::Orange,
        Some("Terminal") => StationColor::Red,
        Some("Transbordo") => StationColor::Blue,
        Some("Intermedia") => StationColor::Green,
        _ => StationColor::Gray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_have_fixed_colors() {
        assert_eq!(station_color(Some("Terminal / Transbordo")), StationColor::Orange);
        assert_eq!(station_color(Some("Terminal")), StationColor::Red);
        assert_eq!(station_color(Some("Transbordo")), StationColor::Blue);
        assert_eq!(station_color(Some("Intermedia")), StationColor::Green);
    }

    #[test]
    fn unknown_types_are_gray() {
        for label in ["", "terminal", "Terminal ", "Transbordo / Terminal", "Paradero"] {
            assert_eq!(station_color(Some(label)), StationColor::Gray, "{:?}", label);
        }
        assert_eq!(station_color(None), StationColor::Gray);
    }

    #[test]
    fn serializes_as_css_color_name() {
        assert_eq!(serde_json::to_value(StationColor::Orange).unwrap(), "orange");
        assert_eq!(serde_json::to_value(StationColor::Gray).unwrap(), "gray");
    }
}
