use regex::Regex;

use super::error::Error;

const WGS84_A: f64 = 6378137.0;
const WGS84_F: f64 = 1.0 / 298.257223563;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500000.0;
const FALSE_NORTHING_SOUTH: f64 = 10000000.0;

/// A UTM zone on the WGS84 ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Utm {
    zone: u8,
    north: bool,
}

impl Utm {
    pub fn new(zone: u8, north: bool) -> Result<Utm, Error> {
        if !(1..=60).contains(&zone) {
            return Err(Error::InvalidUtmZone(zone));
        }
        Ok(Utm { zone, north })
    }

    fn central_meridian(&self) -> f64 {
        (self.zone as f64 * 6.0 - 183.0).to_radians()
    }

    /// Inverse transverse Mercator projection.
    ///
    /// # Parameters
    /// - `easting`: Easting in meters, including the false easting.
    /// - `northing`: Northing in meters, including the false northing in the southern hemisphere.
    ///
    /// # Returns
    /// `[longitude, latitude]` in WGS84 degrees.
    pub fn to_wgs84(&self, easting: f64, northing: f64) -> [f64; 2] {
        let e2 = WGS84_F * (2.0 - WGS84_F);
        let ep2 = e2 / (1.0 - e2);
        let x = easting - FALSE_EASTING;
        let y = if self.north {
            northing
        } else {
            northing - FALSE_NORTHING_SOUTH
        };

        let m = y / SCALE_FACTOR;
        let mu = m / (WGS84_A * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        // Footpoint latitude
        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let (sin1, cos1) = phi1.sin_cos();
        let tan1 = phi1.tan();
        let c1 = ep2 * cos1.powi(2);
        let t1 = tan1.powi(2);
        let n1 = WGS84_A / (1.0 - e2 * sin1.powi(2)).sqrt();
        let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * sin1.powi(2)).powf(1.5);
        let d = x / (n1 * SCALE_FACTOR);

        let lat = phi1
            - (n1 * tan1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ep2
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);
        let lon = self.central_meridian()
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                    * d.powi(5)
                    / 120.0)
                / cos1;

        [lon.to_degrees(), lat.to_degrees()]
    }
}

/// Finds a UTM zone in the WKT of a `.prj` sidecar, e.g. `WGS_1984_UTM_Zone_14N`
/// or `UTM zone 14N`. A zone without a hemisphere letter is north unless the
/// text mentions the southern hemisphere.
pub fn detect_utm_zone(prj: &str) -> Option<(u8, bool)> {
    let pattern = Regex::new(r"(?i)utm[ _]zone[ _](\d{1,2})\s*([ns])?\b").ok()?;
    let captures = pattern.captures(prj)?;
    let zone = captures.get(1)?.as_str().parse::<u8>().ok()?;
    let north = match captures.get(2) {
        Some(hemisphere) => hemisphere.as_str().eq_ignore_ascii_case("n"),
        None => !prj.to_ascii_lowercase().contains("southern"),
    };
    Some((zone, north))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: [f64; 2], expected: [f64; 2]) {
        assert!(
            (actual[0] - expected[0]).abs() < 1e-6 && (actual[1] - expected[1]).abs() < 1e-6,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn inverts_northern_hemisphere() {
        let utm = Utm::new(14, true).unwrap();
        // Zocalo, Mexico City
        assert_close(utm.to_wgs84(486017.3309197883, 2148700.2198420437), [-99.1332, 19.4326]);
        assert_close(utm.to_wgs84(500000.0, 2148694.8123972854), [-99.0, 19.4326]);
    }

    #[test]
    fn inverts_southern_hemisphere() {
        let utm = Utm::new(56, false).unwrap();
        // Sydney
        assert_close(utm.to_wgs84(334368.633646655, 6250948.345329112), [151.2093, -33.8688]);
    }

    #[test]
    fn rejects_zone_out_of_range() {
        assert!(matches!(Utm::new(0, true), Err(Error::InvalidUtmZone(0))));
        assert!(matches!(Utm::new(61, true), Err(Error::InvalidUtmZone(61))));
    }

    #[test]
    fn detects_zone_from_prj() {
        let esri = r#"PROJCS["WGS_1984_UTM_Zone_14N",GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]]],PROJECTION["Transverse_Mercator"]]"#;
        assert_eq!(detect_utm_zone(esri), Some((14, true)));
        assert_eq!(detect_utm_zone(r#"PROJCS["WGS 84 / UTM zone 56S"]"#), Some((56, false)));
        assert_eq!(
            detect_utm_zone(r#"PROJCS["UTM Zone 19, Southern Hemisphere"]"#),
            Some((19, false))
        );
        assert_eq!(detect_utm_zone(r#"GEOGCS["GCS_WGS_1984"]"#), None);
    }
}
