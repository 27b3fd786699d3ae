use crate::geo::LngLat;

/// Axis-aligned lon/lat bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLatBounds {
    pub min: LngLat,
    pub max: LngLat,
}

impl LngLatBounds {
    pub fn new(min: LngLat, max: LngLat) -> Self {
        LngLatBounds { min, max }
    }

    pub fn from_point(p: LngLat) -> Self {
        Self::new(p, p)
    }

    pub fn extend(&mut self, p: LngLat) {
        self.min.lng = self.min.lng.min(p.lng);
        self.min.lat = self.min.lat.min(p.lat);
        self.max.lng = self.max.lng.max(p.lng);
        self.max.lat = self.max.lat.max(p.lat);
    }

    pub fn union(mut self, other: LngLatBounds) -> Self {
        self.extend(other.min);
        self.extend(other.max);
        self
    }

    pub fn contains(&self, p: LngLat) -> bool {
        (self.min.lng..=self.max.lng).contains(&p.lng)
            && (self.min.lat..=self.max.lat).contains(&p.lat)
    }

    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.min.lng + self.max.lng) * 0.5,
            (self.min.lat + self.max.lat) * 0.5,
        )
    }

    /// `[min_lng, min_lat, max_lng, max_lat]`, the GeoJSON `bbox` layout.
    pub fn to_bbox(&self) -> [f64; 4] {
        [self.min.lng, self.min.lat, self.max.lng, self.max.lat]
    }

    /// Rough extent of Bali's southern regencies, where the story takes place.
    pub fn south_bali() -> Self {
        Self::new(LngLat::new(114.9, -8.9), LngLat::new(115.5, -8.4))
    }
}

#[cfg(test)]
mod tests {
    use super::LngLatBounds;
    use crate::geo::LngLat;

    #[test]
    fn extend_grows_to_cover_points() {
        let mut b = LngLatBounds::from_point(LngLat::new(115.2, -8.6));
        b.extend(LngLat::new(115.1, -8.7));
        b.extend(LngLat::new(115.3, -8.65));
        assert_eq!(b.to_bbox(), [115.1, -8.7, 115.3, -8.6]);
        assert!(b.contains(LngLat::new(115.25, -8.65)));
        assert!(!b.contains(LngLat::new(115.35, -8.65)));
    }

    #[test]
    fn story_locations_fall_inside_south_bali() {
        let bali = LngLatBounds::south_bali();
        assert!(bali.contains(LngLat::new(115.2126, -8.6705)));
        assert!(bali.contains(LngLat::new(115.138772, -8.653265)));
        assert!(!bali.contains(LngLat::new(106.8, -6.2)));
    }
}
