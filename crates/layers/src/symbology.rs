use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-layer paint overrides authored in a map state.
///
/// Every field is optional; the renderer falls back to the layer's built-in
/// paint for anything left unset. Which fields a layer reads depends on its
/// kind (rivers read `color`/`width`/`opacity`, flood points read
/// `color`/`size`/`opacity`, terrain reads `exaggeration`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exaggeration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_colors: Option<DepthColors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_colors: Option<DistanceColors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population_ramp: Option<ColorRamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heatmap: Option<HeatmapStyle>,
}

impl LayerStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(color: &str, width: f64, opacity: f64) -> Self {
        Self::new().color(color).width(width).opacity(opacity)
    }

    pub fn circle(color: &str, size: f64, opacity: f64) -> Self {
        Self::new().color(color).size(size).opacity(opacity)
    }

    pub fn fill(color: &str, opacity: f64) -> Self {
        Self::new().color(color).opacity(opacity)
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn outline(mut self, color: &str) -> Self {
        self.outline_color = Some(color.to_string());
        self
    }

    pub fn exaggeration(mut self, exaggeration: f64) -> Self {
        self.exaggeration = Some(exaggeration);
        self
    }

    pub fn height_multiplier(mut self, multiplier: f64) -> Self {
        self.height_multiplier = Some(multiplier);
        self
    }

    /// Colour impact polygons by their depth category instead of one colour.
    pub fn by_depth(mut self, colors: DepthColors) -> Self {
        self.depth_colors = Some(colors);
        self
    }

    pub fn by_distance(mut self, colors: DistanceColors) -> Self {
        self.distance_colors = Some(colors);
        self
    }

    pub fn population_ramp(mut self, ramp: ColorRamp) -> Self {
        self.population_ramp = Some(ramp);
        self
    }

    pub fn heatmap(mut self, heatmap: HeatmapStyle) -> Self {
        self.heatmap = Some(heatmap);
        self
    }
}

/// Colours keyed by flood depth category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthColors {
    pub high: String,
    pub medium: String,
    pub low: String,
}

impl DepthColors {
    pub fn new(high: &str, medium: &str, low: &str) -> Self {
        Self {
            high: high.to_string(),
            medium: medium.to_string(),
            low: low.to_string(),
        }
    }

    /// Red / orange / yellow for >2 m, 1-2 m and <1 m.
    pub fn severity() -> Self {
        Self::new("#dc2626", "#f97316", "#eab308")
    }
}

/// Colours for the 10 m, 50 m and 100 m river buffer bands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceColors {
    pub m10: String,
    pub m50: String,
    pub m100: String,
}

impl DistanceColors {
    pub fn new(m10: &str, m50: &str, m100: &str) -> Self {
        Self {
            m10: m10.to_string(),
            m50: m50.to_string(),
            m100: m100.to_string(),
        }
    }

    pub fn uniform(color: &str) -> Self {
        Self::new(color, color, color)
    }
}

impl Default for DistanceColors {
    fn default() -> Self {
        Self::new("#93c5fd", "#60a5fa", "#3b82f6")
    }
}

/// Linear colour ramp over a numeric property, stops in ascending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub stops: Vec<(f64, String)>,
}

impl ColorRamp {
    pub fn new(stops: &[(f64, &str)]) -> Self {
        Self {
            stops: stops.iter().map(|(v, c)| (*v, c.to_string())).collect(),
        }
    }

    /// Blues used for the 2D population choropleth.
    pub fn population_blues() -> Self {
        Self::new(&[
            (5000.0, "#dbeafe"),
            (10000.0, "#bfdbfe"),
            (15000.0, "#93c5fd"),
            (20000.0, "#60a5fa"),
            (25000.0, "#3b82f6"),
            (30000.0, "#2563eb"),
            (35000.0, "#1e40af"),
        ])
    }

    /// Purples used for the 3D population extrusion.
    pub fn population_purples() -> Self {
        Self::new(&[
            (5000.0, "#e9d5ff"),
            (10000.0, "#d8b4fe"),
            (15000.0, "#c084fc"),
            (20000.0, "#a855f7"),
            (25000.0, "#9333ea"),
            (30000.0, "#7e22ce"),
            (35000.0, "#6b21a8"),
        ])
    }
}

/// Heatmap paint. Numeric fields accept either a constant or a map-style
/// expression (e.g. zoom-interpolated radius), so they are kept as JSON.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}
