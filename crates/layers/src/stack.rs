//! Ordered layer stack handed to the map widget.
//!
//! `LayerStack::build` is pure: it reads toggles, styles and dataset
//! availability and returns a fresh stack in fixed draw order.

use std::collections::BTreeMap;

use formats::DatasetId;
use foundation::LngLat;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::datasets::DatasetAvailability;
use crate::layer::LayerKind;
use crate::paint;
use crate::symbology::LayerStyle;

pub const TERRAIN_SOURCE_ID: &str = "mapbox-terrain";
const STREETS_SOURCE_ID: &str = "composite";
const INARISK_SOURCE_ID: &str = "inarisk";

/// Per-state on/off switches. Kinds not mentioned use `LayerKind::default_enabled`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerToggles(BTreeMap<LayerKind, bool>);

impl LayerToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: LayerKind, on: bool) -> Self {
        self.set(kind, on);
        self
    }

    pub fn set(&mut self, kind: LayerKind, on: bool) {
        self.0.insert(kind, on);
    }

    pub fn explicit(&self, kind: LayerKind) -> Option<bool> {
        self.0.get(&kind).copied()
    }

    /// Toggle value with defaults applied.
    pub fn is_enabled(&self, kind: LayerKind) -> bool {
        self.explicit(kind).unwrap_or_else(|| kind.default_enabled())
    }

    /// Whether the layer is drawn once stacking rules apply: 3D buildings
    /// replace the flat footprint, and the river halo only shows under rivers.
    pub fn is_drawn(&self, kind: LayerKind) -> bool {
        match kind {
            LayerKind::Buildings => {
                self.is_enabled(kind) && !self.is_enabled(LayerKind::Buildings3D)
            }
            LayerKind::RiverBuffer => {
                self.is_enabled(kind) && self.is_enabled(LayerKind::Rivers)
            }
            _ => self.is_enabled(kind),
        }
    }

    pub fn enabled(&self) -> impl Iterator<Item = LayerKind> + '_ {
        LayerKind::ALL.into_iter().filter(|k| self.is_enabled(*k))
    }
}

/// Per-state paint overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerStyles(BTreeMap<LayerKind, LayerStyle>);

impl LayerStyles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: LayerKind, style: LayerStyle) -> Self {
        self.0.insert(kind, style);
        self
    }

    pub fn get(&self, kind: LayerKind) -> Option<&LayerStyle> {
        self.0.get(&kind)
    }

    pub fn contains(&self, kind: LayerKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coordinates: LngLat,
    pub title: String,
    pub description: String,
}

impl Marker {
    pub fn new(coordinates: LngLat, title: &str, description: &str) -> Self {
        Self {
            coordinates,
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Source a rendered layer reads from. GeoJSON sources are referenced by
/// dataset; the widget resolves them to the data already fetched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SourceSpec {
    Geojson {
        dataset: DatasetId,
    },
    Vector {
        url: &'static str,
    },
    Raster {
        tiles: Vec<&'static str>,
        #[serde(rename = "tileSize")]
        tile_size: u32,
    },
    RasterDem {
        url: &'static str,
        #[serde(rename = "tileSize")]
        tile_size: u32,
    },
}

impl SourceSpec {
    fn for_kind(kind: LayerKind) -> Option<(String, SourceSpec)> {
        if let Some(dataset) = kind.dataset() {
            return Some((dataset.name().to_string(), SourceSpec::Geojson { dataset }));
        }
        match kind {
            LayerKind::Hillshade => Some((
                TERRAIN_SOURCE_ID.to_string(),
                SourceSpec::RasterDem {
                    url: paint::TERRAIN_DEM_URL,
                    tile_size: 512,
                },
            )),
            LayerKind::Buildings | LayerKind::Buildings3D => Some((
                STREETS_SOURCE_ID.to_string(),
                SourceSpec::Vector {
                    url: paint::STREETS_VECTOR_URL,
                },
            )),
            LayerKind::InariskRisk => Some((
                INARISK_SOURCE_ID.to_string(),
                SourceSpec::Raster {
                    tiles: vec![paint::INARISK_TILES_URL],
                    tile_size: 256,
                },
            )),
            _ => None,
        }
    }
}

/// One Mapbox style layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLayer {
    pub id: String,
    pub kind: LayerKind,
    pub source_id: String,
    pub source: SourceSpec,
    #[serde(rename = "type")]
    pub layer_type: &'static str,
    #[serde(rename = "source-layer", skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    pub paint: Value,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct TerrainSpec {
    pub source: &'static str,
    pub exaggeration: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LayerStack {
    pub layers: Vec<RenderedLayer>,
    pub terrain: Option<TerrainSpec>,
    pub marker: Option<Marker>,
}

impl LayerStack {
    pub fn build(
        toggles: &LayerToggles,
        styles: &LayerStyles,
        marker: Option<&Marker>,
        datasets: &impl DatasetAvailability,
    ) -> LayerStack {
        let mut stack = LayerStack {
            marker: marker.cloned(),
            ..LayerStack::default()
        };

        for kind in LayerKind::ALL {
            if !toggles.is_drawn(kind) {
                continue;
            }
            if let Some(dataset) = kind.dataset() {
                if !datasets.is_loaded(dataset) {
                    continue;
                }
            }
            let style = styles.get(kind);
            if style.is_none() && kind.requires_style() {
                warn!(layer = %kind, "no style for enabled layer; using built-in paint");
            }
            if kind == LayerKind::Terrain {
                stack.terrain = Some(TerrainSpec {
                    source: TERRAIN_SOURCE_ID,
                    exaggeration: paint::terrain_exaggeration(style),
                });
                continue;
            }
            push_layers(&mut stack.layers, kind, style);
        }
        stack
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn contains(&self, kind: LayerKind) -> bool {
        self.layers.iter().any(|l| l.kind == kind)
    }

    /// Index of the first style layer drawn for `kind`.
    pub fn position(&self, kind: LayerKind) -> Option<usize> {
        self.layers.iter().position(|l| l.kind == kind)
    }
}

fn push_layers(out: &mut Vec<RenderedLayer>, kind: LayerKind, style: Option<&LayerStyle>) {
    let Some((source_id, source)) = SourceSpec::for_kind(kind) else {
        return;
    };
    let mut push = |suffix: &str, layer_type: &'static str, filter: Option<Value>, paint: Value| {
        let id = if suffix.is_empty() {
            kind.name().to_string()
        } else {
            format!("{}-{suffix}", kind.name())
        };
        let source_layer = matches!(kind, LayerKind::Buildings | LayerKind::Buildings3D)
            .then_some("building");
        out.push(RenderedLayer {
            id,
            kind,
            source_id: source_id.clone(),
            source: source.clone(),
            layer_type,
            source_layer,
            filter,
            paint,
        });
    };

    match kind {
        LayerKind::Terrain => {}
        LayerKind::Hillshade => push("", "hillshade", None, paint::hillshade(style)),
        LayerKind::AdminBoundaries => {
            push("fill", "fill", None, paint::admin_fill());
            push("line", "line", None, paint::admin_line(style));
        }
        LayerKind::PopulationChoropleth => {
            push("fill", "fill", None, paint::population_choropleth_fill(style));
            push("outline", "line", None, paint::population_choropleth_outline());
        }
        LayerKind::RiverBuffer => push("", "line", None, paint::river_halo()),
        LayerKind::Rivers => push("", "line", None, paint::rivers(style)),
        LayerKind::FloodImpact => push("", "fill", None, paint::flood_impact(style)),
        LayerKind::FloodRadius => {
            push("fill", "fill", None, paint::flood_radius_fill(style));
            push("line", "line", None, paint::flood_radius_line());
        }
        LayerKind::FloodHeatmap => {
            let (heat, filter) = paint::flood_heatmap(style);
            push("", "heatmap", filter, heat);
        }
        LayerKind::Buildings => push("", "fill", None, paint::buildings(style)),
        LayerKind::Buildings3D => push("", "fill-extrusion", None, paint::buildings_3d(style)),
        LayerKind::RiverBuffers => {
            push("fill", "fill", None, paint::river_buffers_fill(style));
            push("line", "line", None, paint::river_buffers_line());
        }
        LayerKind::Population3D => push("", "fill-extrusion", None, paint::population_3d(style)),
        LayerKind::InariskRisk => push("", "raster", None, paint::inarisk(style)),
        LayerKind::FloodPoints => push("", "circle", None, paint::flood_points(style)),
    }
}

#[cfg(test)]
mod tests {
    use super::{LayerStack, LayerStyles, LayerToggles, Marker};
    use crate::datasets::{AllLoaded, Datasets};
    use crate::layer::{LayerClass, LayerKind};
    use crate::symbology::LayerStyle;
    use formats::{DatasetId, FeatureCollection};
    use foundation::LngLat;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn everything_on() -> LayerToggles {
        LayerKind::ALL
            .into_iter()
            .fold(LayerToggles::new(), |t, k| t.with(k, true))
    }

    #[test]
    fn defaults_draw_admin_boundaries_and_points() {
        let stack = LayerStack::build(&LayerToggles::new(), &LayerStyles::new(), None, &AllLoaded);
        assert_eq!(
            stack.layer_ids(),
            vec!["adminBoundaries-fill", "adminBoundaries-line", "floodPoints"]
        );
        assert!(stack.terrain.is_none());
    }

    #[test]
    fn flood_points_sit_above_every_area_and_line_layer() {
        let stack = LayerStack::build(&everything_on(), &LayerStyles::new(), None, &AllLoaded);
        let points = stack.position(LayerKind::FloodPoints).unwrap();
        assert_eq!(points, stack.layers.len() - 1);
        for (i, layer) in stack.layers.iter().enumerate() {
            if matches!(layer.kind.class(), LayerClass::Area | LayerClass::Line) {
                assert!(i < points, "{} drawn above flood points", layer.id);
            }
        }
    }

    #[test]
    fn three_d_buildings_replace_flat_footprints() {
        let stack = LayerStack::build(&everything_on(), &LayerStyles::new(), None, &AllLoaded);
        assert!(stack.contains(LayerKind::Buildings3D));
        assert!(!stack.contains(LayerKind::Buildings));

        let flat = LayerToggles::new().with(LayerKind::Buildings, true);
        let stack = LayerStack::build(&flat, &LayerStyles::new(), None, &AllLoaded);
        assert!(stack.contains(LayerKind::Buildings));
    }

    #[test]
    fn river_halo_needs_rivers() {
        let halo_only = LayerToggles::new().with(LayerKind::RiverBuffer, true);
        let stack = LayerStack::build(&halo_only, &LayerStyles::new(), None, &AllLoaded);
        assert!(!stack.contains(LayerKind::RiverBuffer));

        let both = halo_only.with(LayerKind::Rivers, true);
        let stack = LayerStack::build(&both, &LayerStyles::new(), None, &AllLoaded);
        assert!(stack.position(LayerKind::RiverBuffer) < stack.position(LayerKind::Rivers));
    }

    #[test]
    fn layers_without_data_are_omitted() {
        let mut datasets = Datasets::new();
        datasets.insert(DatasetId::Rivers, FeatureCollection::default());
        let toggles = LayerToggles::new()
            .with(LayerKind::Rivers, true)
            .with(LayerKind::FloodImpact, true)
            .with(LayerKind::InariskRisk, true);
        let stack = LayerStack::build(&toggles, &LayerStyles::new(), None, &datasets);
        assert_eq!(stack.layer_ids(), vec!["rivers", "inariskLayer"]);
    }

    #[test]
    fn terrain_is_carried_rather_than_drawn() {
        let toggles = LayerToggles::new()
            .with(LayerKind::Terrain, true)
            .with(LayerKind::FloodPoints, false)
            .with(LayerKind::AdminBoundaries, false);
        let stack = LayerStack::build(&toggles, &LayerStyles::new(), None, &AllLoaded);
        assert!(stack.layers.is_empty());
        assert_eq!(stack.terrain.map(|t| t.exaggeration), Some(1.5));

        let styles = LayerStyles::new().with(LayerKind::Terrain, LayerStyle::new().exaggeration(2.0));
        let stack = LayerStack::build(&toggles, &styles, None, &AllLoaded);
        assert_eq!(stack.terrain.map(|t| t.exaggeration), Some(2.0));
    }

    #[test]
    fn build_is_repeatable_and_leaves_inputs_alone() {
        let toggles = everything_on();
        let styles = LayerStyles::new().with(LayerKind::Rivers, LayerStyle::line("#2563eb", 8.0, 0.8));
        let marker = Marker::new(LngLat::new(115.2185, -8.6588), "Pasar Badung", "Flooded market");
        let before = (toggles.clone(), styles.clone());

        let a = LayerStack::build(&toggles, &styles, Some(&marker), &AllLoaded);
        let b = LayerStack::build(&toggles, &styles, Some(&marker), &AllLoaded);
        assert_eq!(a, b);
        assert_eq!((toggles, styles), before);
        assert_eq!(a.marker.as_ref().map(|m| m.title.as_str()), Some("Pasar Badung"));
    }

    #[test]
    fn serializes_for_the_widget() {
        let toggles = LayerToggles::new()
            .with(LayerKind::AdminBoundaries, false)
            .with(LayerKind::InariskRisk, true);
        let styles = LayerStyles::new().with(LayerKind::InariskRisk, LayerStyle::new().opacity(0.6));
        let stack = LayerStack::build(&toggles, &styles, None, &AllLoaded);
        let json = serde_json::to_value(&stack).unwrap();
        assert_eq!(json["layers"][0]["type"], json!("raster"));
        assert_eq!(json["layers"][0]["source"]["type"], json!("raster"));
        assert_eq!(json["layers"][0]["source"]["tileSize"], json!(256));
        assert_eq!(json["layers"][1]["source"]["type"], json!("geojson"));
        assert_eq!(json["layers"][1]["source"]["dataset"], json!("flood_points"));
    }

    #[test]
    fn toggles_deserialize_from_layer_names() {
        let toggles: LayerToggles =
            serde_json::from_value(json!({"rivers": true, "floodPoints": false})).unwrap();
        assert!(toggles.is_enabled(LayerKind::Rivers));
        assert!(!toggles.is_enabled(LayerKind::FloodPoints));
        assert!(toggles.is_enabled(LayerKind::AdminBoundaries));
    }
}
