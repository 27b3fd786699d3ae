use formats::DatasetId;
use serde::{Deserialize, Serialize};

/// Every overlay a map state can toggle.
///
/// Declaration order is the draw order, back to front. `Ord` follows it, so
/// iterating a `BTreeMap<LayerKind, _>` walks layers in paint order.
/// Flood points are last so they stay above every area and line layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    /// DEM-driven 3D terrain; not a drawn layer.
    Terrain,
    Hillshade,
    AdminBoundaries,
    PopulationChoropleth,
    /// Soft halo drawn under the river line.
    RiverBuffer,
    Rivers,
    FloodImpact,
    FloodRadius,
    FloodHeatmap,
    Buildings,
    #[serde(rename = "buildings3D")]
    Buildings3D,
    /// 10/50/100 m distance bands around rivers.
    RiverBuffers,
    #[serde(rename = "population3D")]
    Population3D,
    /// BNPB InaRISK flood risk raster.
    #[serde(rename = "inariskLayer")]
    InariskRisk,
    FloodPoints,
}

/// Geometry family a layer paints, used for stacking checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LayerClass {
    Terrain,
    Area,
    Line,
    Density,
    Extrusion,
    Raster,
    Point,
}

impl LayerKind {
    pub const ALL: [LayerKind; 15] = [
        LayerKind::Terrain,
        LayerKind::Hillshade,
        LayerKind::AdminBoundaries,
        LayerKind::PopulationChoropleth,
        LayerKind::RiverBuffer,
        LayerKind::Rivers,
        LayerKind::FloodImpact,
        LayerKind::FloodRadius,
        LayerKind::FloodHeatmap,
        LayerKind::Buildings,
        LayerKind::Buildings3D,
        LayerKind::RiverBuffers,
        LayerKind::Population3D,
        LayerKind::InariskRisk,
        LayerKind::FloodPoints,
    ];

    /// Toggle name used in map-state tables and the JS shim.
    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Terrain => "terrain",
            LayerKind::Hillshade => "hillshade",
            LayerKind::AdminBoundaries => "adminBoundaries",
            LayerKind::PopulationChoropleth => "populationChoropleth",
            LayerKind::RiverBuffer => "riverBuffer",
            LayerKind::Rivers => "rivers",
            LayerKind::FloodImpact => "floodImpact",
            LayerKind::FloodRadius => "floodRadius",
            LayerKind::FloodHeatmap => "floodHeatmap",
            LayerKind::Buildings => "buildings",
            LayerKind::Buildings3D => "buildings3D",
            LayerKind::RiverBuffers => "riverBuffers",
            LayerKind::Population3D => "population3D",
            LayerKind::InariskRisk => "inariskLayer",
            LayerKind::FloodPoints => "floodPoints",
        }
    }

    pub fn from_name(name: &str) -> Option<LayerKind> {
        LayerKind::ALL.into_iter().find(|k| k.name() == name)
    }

    /// GeoJSON dataset the layer draws from; `None` for tile-backed layers.
    pub fn dataset(self) -> Option<DatasetId> {
        match self {
            LayerKind::AdminBoundaries => Some(DatasetId::AdminBoundaries),
            LayerKind::PopulationChoropleth | LayerKind::Population3D => {
                Some(DatasetId::KelurahanBoundaries)
            }
            LayerKind::RiverBuffer | LayerKind::Rivers => Some(DatasetId::Rivers),
            LayerKind::FloodImpact => Some(DatasetId::FloodImpact),
            LayerKind::FloodRadius => Some(DatasetId::FloodRadius),
            LayerKind::FloodHeatmap | LayerKind::FloodPoints => Some(DatasetId::FloodPoints),
            LayerKind::RiverBuffers => Some(DatasetId::RiverBuffers),
            LayerKind::Terrain
            | LayerKind::Hillshade
            | LayerKind::Buildings
            | LayerKind::Buildings3D
            | LayerKind::InariskRisk => None,
        }
    }

    /// Whether the layer is on when a state does not mention it.
    pub fn default_enabled(self) -> bool {
        matches!(self, LayerKind::AdminBoundaries | LayerKind::FloodPoints)
    }

    /// Whether enabling the layer requires a style entry. Terrain falls back
    /// to its default exaggeration and the river halo has no overridable paint.
    pub fn requires_style(self) -> bool {
        !matches!(self, LayerKind::Terrain | LayerKind::RiverBuffer)
    }

    pub fn class(self) -> LayerClass {
        match self {
            LayerKind::Terrain => LayerClass::Terrain,
            LayerKind::Hillshade | LayerKind::InariskRisk => LayerClass::Raster,
            LayerKind::AdminBoundaries
            | LayerKind::PopulationChoropleth
            | LayerKind::FloodImpact
            | LayerKind::FloodRadius
            | LayerKind::Buildings
            | LayerKind::RiverBuffers => LayerClass::Area,
            LayerKind::RiverBuffer | LayerKind::Rivers => LayerClass::Line,
            LayerKind::FloodHeatmap => LayerClass::Density,
            LayerKind::Buildings3D | LayerKind::Population3D => LayerClass::Extrusion,
            LayerKind::FloodPoints => LayerClass::Point,
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
