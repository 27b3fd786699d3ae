//! Declarative map state for one scroll step.

use foundation::{CameraError, CameraPose, LngLat};
use layers::{LayerKind, LayerStyle, LayerStyles, LayerToggles, Marker};
use serde::Serialize;

pub const SATELLITE_STREETS_STYLE: &str = "mapbox://styles/mapbox/satellite-streets-v12";
pub const LIGHT_STYLE: &str = "mapbox://styles/mapbox/light-v11";

#[derive(Debug, Clone, PartialEq)]
pub enum MapStateError {
    /// An enabled layer has no paint entry.
    MissingLayerStyle { layer: LayerKind },
    InvalidCenter(LngLat),
    InvalidCamera(CameraError),
}

impl std::fmt::Display for MapStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapStateError::MissingLayerStyle { layer } => {
                write!(f, "layer {layer} is enabled but has no style")
            }
            MapStateError::InvalidCenter(c) => {
                write!(f, "map center [{}, {}] is out of range", c.lng, c.lat)
            }
            MapStateError::InvalidCamera(e) => write!(f, "invalid camera: {e}"),
        }
    }
}

impl std::error::Error for MapStateError {}

impl From<CameraError> for MapStateError {
    fn from(e: CameraError) -> Self {
        match e {
            CameraError::InvalidCenter(c) => MapStateError::InvalidCenter(c),
            other => MapStateError::InvalidCamera(other),
        }
    }
}

/// Camera, base style, layers and paint for one step. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapState {
    #[serde(flatten)]
    pose: CameraPose,
    map_style: String,
    interactive: bool,
    layers: LayerToggles,
    layer_styles: LayerStyles,
    marker: Option<Marker>,
}

impl MapState {
    pub fn builder(center: LngLat, zoom: f64) -> MapStateBuilder {
        MapStateBuilder::new(center, zoom)
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn center(&self) -> LngLat {
        self.pose.center
    }

    pub fn map_style(&self) -> &str {
        &self.map_style
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn layers(&self) -> &LayerToggles {
        &self.layers
    }

    pub fn layer_styles(&self) -> &LayerStyles {
        &self.layer_styles
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct MapStateBuilder {
    pose: CameraPose,
    map_style: String,
    interactive: bool,
    layers: LayerToggles,
    layer_styles: LayerStyles,
    marker: Option<Marker>,
}

impl MapStateBuilder {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self {
            pose: CameraPose::flat(center, zoom),
            map_style: SATELLITE_STREETS_STYLE.to_string(),
            interactive: true,
            layers: LayerToggles::new(),
            layer_styles: LayerStyles::new(),
            marker: None,
        }
    }

    pub fn pitch(mut self, pitch: f64) -> Self {
        self.pose.pitch = pitch;
        self
    }

    pub fn bearing(mut self, bearing: f64) -> Self {
        self.pose.bearing = bearing;
        self
    }

    pub fn map_style(mut self, style: &str) -> Self {
        self.map_style = style.to_string();
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn layer(mut self, kind: LayerKind, on: bool) -> Self {
        self.layers.set(kind, on);
        self
    }

    /// Turn `kind` on with the given paint.
    pub fn show(self, kind: LayerKind, style: LayerStyle) -> Self {
        self.layer(kind, true).style(kind, style)
    }

    /// Paint for `kind` without changing its toggle.
    pub fn style(mut self, kind: LayerKind, style: LayerStyle) -> Self {
        self.layer_styles = self.layer_styles.with(kind, style);
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Validates camera ranges, then that every enabled layer that takes
    /// paint has a style entry. Default-on layers count as enabled.
    pub fn build(self) -> Result<MapState, MapStateError> {
        self.pose.validate()?;
        if let Some(layer) = self
            .layers
            .enabled()
            .find(|k| k.requires_style() && !self.layer_styles.contains(*k))
        {
            return Err(MapStateError::MissingLayerStyle { layer });
        }
        Ok(MapState {
            pose: self.pose,
            map_style: self.map_style,
            interactive: self.interactive,
            layers: self.layers,
            layer_styles: self.layer_styles,
            marker: self.marker,
        })
    }
}
