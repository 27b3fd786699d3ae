use serde::{Deserialize, Serialize};

/// Property holding the flood depth category on flood points and impact polygons.
pub const DEPTH_PROPERTY: &str = "Ketinggian";

/// Property holding the kelurahan population count.
pub const POPULATION_PROPERTY: &str = "Export_D_3";

/// Property holding the buffer distance (meters) on river buffers.
pub const DISTANCE_PROPERTY: &str = "distance";

/// Property holding the regency name on flood points.
pub const REGION_PROPERTY: &str = "field_3";

/// The static GeoJSON resources the story loads.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetId {
    FloodPoints,
    FloodImpact,
    Rivers,
    AdminBoundaries,
    FloodRadius,
    RiverBuffers,
    Population,
    KelurahanBoundaries,
}

impl DatasetId {
    pub const ALL: [DatasetId; 8] = [
        DatasetId::FloodPoints,
        DatasetId::FloodImpact,
        DatasetId::Rivers,
        DatasetId::AdminBoundaries,
        DatasetId::FloodRadius,
        DatasetId::RiverBuffers,
        DatasetId::Population,
        DatasetId::KelurahanBoundaries,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DatasetId::FloodPoints => "flood_points",
            DatasetId::FloodImpact => "flood_impact",
            DatasetId::Rivers => "rivers",
            DatasetId::AdminBoundaries => "admin_boundaries",
            DatasetId::FloodRadius => "flood_radius",
            DatasetId::RiverBuffers => "river_buffers",
            DatasetId::Population => "population",
            DatasetId::KelurahanBoundaries => "kelurahan_boundaries",
        }
    }

    /// File name under the data root; served at `/data/<file_name>`.
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetId::FloodPoints => "flood_points.geojson",
            DatasetId::FloodImpact => "flood_impact.geojson",
            DatasetId::Rivers => "rivers.geojson",
            DatasetId::AdminBoundaries => "admin_boundaries.geojson",
            DatasetId::FloodRadius => "radius.geojson",
            DatasetId::RiverBuffers => "river_buffers.geojson",
            DatasetId::Population => "population.geojson",
            DatasetId::KelurahanBoundaries => "Data Populasi Kota Denpasar 2020.geojson",
        }
    }

    /// URL path, percent-encoding the spaces in the kelurahan file name.
    pub fn url_path(self) -> String {
        format!("/data/{}", self.file_name().replace(' ', "%20"))
    }

    pub fn from_name(name: &str) -> Option<DatasetId> {
        DatasetId::ALL.into_iter().find(|d| d.name() == name)
    }
}

/// Flood depth category as recorded in the survey data.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FloodDepth {
    /// More than 2 m.
    High,
    /// 1 to 2 m.
    Medium,
    /// Below 1 m.
    Low,
}

impl FloodDepth {
    pub const ALL: [FloodDepth; 3] = [FloodDepth::High, FloodDepth::Medium, FloodDepth::Low];

    /// Value stored in the `Ketinggian` property.
    pub fn as_str(self) -> &'static str {
        match self {
            FloodDepth::High => "tinggi",
            FloodDepth::Medium => "sedang",
            FloodDepth::Low => "rendah",
        }
    }

    pub fn parse(s: &str) -> Option<FloodDepth> {
        FloodDepth::ALL.into_iter().find(|d| d.as_str() == s.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetId, FloodDepth};

    #[test]
    fn names_round_trip() {
        for id in DatasetId::ALL {
            assert_eq!(DatasetId::from_name(id.name()), Some(id));
        }
        assert_eq!(DatasetId::from_name("nope"), None);
    }

    #[test]
    fn url_paths_are_fixed_and_encoded() {
        assert_eq!(DatasetId::FloodRadius.url_path(), "/data/radius.geojson");
        assert_eq!(
            DatasetId::KelurahanBoundaries.url_path(),
            "/data/Data%20Populasi%20Kota%20Denpasar%202020.geojson"
        );
    }

    #[test]
    fn depth_parses_survey_values() {
        assert_eq!(FloodDepth::parse("tinggi"), Some(FloodDepth::High));
        assert_eq!(FloodDepth::parse(" sedang "), Some(FloodDepth::Medium));
        assert_eq!(FloodDepth::parse("rendah"), Some(FloodDepth::Low));
        assert_eq!(FloodDepth::parse("ekstrem"), None);
    }
}
