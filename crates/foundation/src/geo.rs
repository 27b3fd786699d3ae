use serde::{Deserialize, Serialize};

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// Mean Earth radius used for great-circle distances (meters).
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Geographic position in degrees.
///
/// Serializes as `[lng, lat]`, the GeoJSON / map-widget coordinate order.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Finite and inside the valid longitude/latitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lng.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lng)
            && (-90.0..=90.0).contains(&self.lat)
    }

    pub fn offset(self, d_lng: f64, d_lat: f64) -> Self {
        Self::new(self.lng + d_lng, self.lat + d_lat)
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Great-circle (haversine) distance in meters.
    pub fn distance_m(self, other: LngLat) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);
        2.0 * MEAN_EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        p.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::LngLat;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn validity_rejects_out_of_range_and_nan() {
        assert!(LngLat::new(115.2126, -8.6705).is_valid());
        assert!(!LngLat::new(181.0, 0.0).is_valid());
        assert!(!LngLat::new(0.0, -90.5).is_valid());
        assert!(!LngLat::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn serializes_as_lng_lat_array() {
        let p = LngLat::new(115.21, -8.65);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[115.21,-8.65]");
        let back: LngLat = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn distance_of_a_thousandth_degree_at_bali_latitude() {
        let a = LngLat::new(115.212136, -8.644669);
        let b = a.offset(0.001, 0.0);
        // ~110 m east-west at 8.6 degrees south.
        assert_close(a.distance_m(b), 110.0, 1.0);
        assert_close(a.distance_m(a), 0.0, 1e-9);
    }
}
