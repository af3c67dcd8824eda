//! Great-circle distance and bounding boxes for radius searches.
//!
//! Radius searches first narrow the candidate rows with a cheap latitude /
//! longitude box and then apply the exact haversine distance, so the box must
//! always be a superset of the circle it approximates.

use serde::{Deserialize, Serialize};

use crate::domain::types::{Latitude, Longitude};

/// Mean Earth radius in kilometres (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Rough length of one degree of latitude, used only for box pre-filtering.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Below this `cos(latitude)` a longitude span can no longer be bounded.
const MIN_COS_LATITUDE: f64 = 1e-6;

/// A validated coordinate pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: Latitude,
    pub longitude: Longitude,
}

impl GeoPoint {
    pub fn new(latitude: Latitude, longitude: Longitude) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Haversine distance to `other` in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(self, other)
    }
}

/// Great-circle distance between two points in kilometres.
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.get().to_radians();
    let lat2 = b.latitude.get().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (b.longitude.get() - a.longitude.get()).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Inclusive longitude interval. Boxes crossing the antimeridian are split in two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongitudeRange {
    pub min: f64,
    pub max: f64,
}

impl LongitudeRange {
    const FULL: LongitudeRange = LongitudeRange {
        min: Longitude::MIN,
        max: Longitude::MAX,
    };

    pub fn contains(&self, longitude: f64) -> bool {
        (self.min..=self.max).contains(&longitude)
    }
}

/// Latitude/longitude box enclosing a search circle.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_ranges: Vec<LongitudeRange>,
}

impl BoundingBox {
    /// Box around `center` covering every point within `radius_km`.
    ///
    /// Uses 1° of latitude ≈ 111 km and 1° of longitude ≈ 111 km · cos(lat).
    /// The cosine is taken at the box edge closest to a pole, where the circle
    /// is widest in degrees of longitude.
    pub fn around(center: &GeoPoint, radius_km: f64) -> Self {
        let lat = center.latitude.get();
        let lon = center.longitude.get();
        let d_lat = radius_km / KM_PER_DEGREE;

        let lat_min = (lat - d_lat).max(Latitude::MIN);
        let lat_max = (lat + d_lat).min(Latitude::MAX);

        let widest_lat = lat_min.abs().max(lat_max.abs());
        let cos_lat = widest_lat.to_radians().cos().abs();

        let lon_ranges = if cos_lat < MIN_COS_LATITUDE {
            vec![LongitudeRange::FULL]
        } else {
            let d_lon = radius_km / (KM_PER_DEGREE * cos_lat);
            longitude_ranges(lon, d_lon)
        };

        Self {
            lat_min,
            lat_max,
            lon_ranges,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        let lat = point.latitude.get();
        let lon = point.longitude.get();
        (self.lat_min..=self.lat_max).contains(&lat)
            && self.lon_ranges.iter().any(|range| range.contains(lon))
    }
}

fn longitude_ranges(lon: f64, d_lon: f64) -> Vec<LongitudeRange> {
    if d_lon >= 180.0 {
        return vec![LongitudeRange::FULL];
    }

    let min = lon - d_lon;
    let max = lon + d_lon;

    if min < Longitude::MIN {
        vec![
            LongitudeRange {
                min: Longitude::MIN,
                max,
            },
            LongitudeRange {
                min: min + 360.0,
                max: Longitude::MAX,
            },
        ]
    } else if max > Longitude::MAX {
        vec![
            LongitudeRange {
                min,
                max: Longitude::MAX,
            },
            LongitudeRange {
                min: Longitude::MIN,
                max: max - 360.0,
            },
        ]
    } else {
        vec![LongitudeRange { min, max }]
    }
}
