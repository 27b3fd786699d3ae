//! Built-in paint for every layer kind, with per-state overrides applied.
//!
//! Output is Mapbox GL style-spec JSON, handed to the widget as-is.

use formats::{DEPTH_PROPERTY, DISTANCE_PROPERTY, FloodDepth, POPULATION_PROPERTY};
use serde_json::{Value, json};

use crate::symbology::{ColorRamp, DepthColors, DistanceColors, LayerStyle};

pub const TERRAIN_DEM_URL: &str = "mapbox://mapbox.mapbox-terrain-dem-v1";
pub const STREETS_VECTOR_URL: &str = "mapbox://mapbox.mapbox-streets-v8";
pub const INARISK_TILES_URL: &str = "https://gis.bnpb.go.id/server/rest/services/inarisk/layer_risiko_banjir/ImageServer/exportImage?bbox={bbox-epsg-3857}&bboxSR=3857&size=256,256&imageSR=3857&format=png&transparent=true&f=image";

pub const DEFAULT_TERRAIN_EXAGGERATION: f64 = 1.5;
const DEFAULT_HILLSHADE_EXAGGERATION: f64 = 0.5;

fn color(style: Option<&LayerStyle>, default: &str) -> Value {
    json!(style.and_then(|s| s.color.as_deref()).unwrap_or(default))
}

fn number(style: Option<&LayerStyle>, field: fn(&LayerStyle) -> Option<f64>, default: f64) -> Value {
    json!(style.and_then(field).unwrap_or(default))
}

fn opacity(style: Option<&LayerStyle>, default: f64) -> Value {
    number(style, |s| s.opacity, default)
}

/// `match` on the depth property; unknown categories take the `low` colour.
pub fn depth_match(colors: &DepthColors) -> Value {
    json!([
        "match",
        ["get", DEPTH_PROPERTY],
        FloodDepth::High.as_str(), colors.high,
        FloodDepth::Medium.as_str(), colors.medium,
        FloodDepth::Low.as_str(), colors.low,
        colors.low
    ])
}

/// Linear interpolation of `ramp` over a numeric (or numeric-string) property.
pub fn ramp_interpolate(ramp: &ColorRamp, property: &str) -> Value {
    let mut expr = vec![
        json!("interpolate"),
        json!(["linear"]),
        json!(["to-number", ["get", property]]),
    ];
    for (stop, c) in &ramp.stops {
        expr.push(json!(stop));
        expr.push(json!(c));
    }
    Value::Array(expr)
}

pub fn terrain_exaggeration(style: Option<&LayerStyle>) -> f64 {
    style
        .and_then(|s| s.exaggeration)
        .unwrap_or(DEFAULT_TERRAIN_EXAGGERATION)
}

pub fn hillshade(style: Option<&LayerStyle>) -> Value {
    json!({
        "hillshade-illumination-direction": 315,
        "hillshade-exaggeration": number(style, |s| s.exaggeration, DEFAULT_HILLSHADE_EXAGGERATION),
    })
}

pub fn admin_fill() -> Value {
    json!({ "fill-color": "#ffffff", "fill-opacity": 0.1 })
}

pub fn admin_line(style: Option<&LayerStyle>) -> Value {
    json!({
        "line-color": color(style, "#000000"),
        "line-width": number(style, |s| s.width, 2.0),
        "line-opacity": opacity(style, 0.5),
    })
}

pub fn population_choropleth_fill(style: Option<&LayerStyle>) -> Value {
    let ramp = style
        .and_then(|s| s.population_ramp.clone())
        .unwrap_or_else(ColorRamp::population_blues);
    json!({
        "fill-color": ramp_interpolate(&ramp, POPULATION_PROPERTY),
        "fill-opacity": opacity(style, 0.5),
    })
}

pub fn population_choropleth_outline() -> Value {
    json!({ "line-color": "#ffffff", "line-width": 1, "line-opacity": 0.5 })
}

pub fn river_halo() -> Value {
    json!({
        "line-color": "#3b82f6",
        "line-width": 12,
        "line-opacity": 0.3,
        "line-blur": 2,
    })
}

pub fn rivers(style: Option<&LayerStyle>) -> Value {
    json!({
        "line-color": color(style, "#1d4ed8"),
        "line-width": number(style, |s| s.width, 10.0),
        "line-opacity": opacity(style, 0.9),
    })
}

pub fn flood_impact(style: Option<&LayerStyle>) -> Value {
    let fill = match style.and_then(|s| s.depth_colors.as_ref()) {
        Some(colors) => depth_match(colors),
        None => color(style, "#CC9900"),
    };
    json!({
        "fill-color": fill,
        "fill-opacity": opacity(style, 0.2),
        "fill-outline-color": "#ffffff",
    })
}

pub fn flood_radius_fill(style: Option<&LayerStyle>) -> Value {
    json!({
        "fill-color": color(style, "#f59e0b"),
        "fill-opacity": opacity(style, 0.3),
        "fill-outline-color": "#f59e0b",
    })
}

pub fn flood_radius_line() -> Value {
    json!({ "line-color": "#f59e0b", "line-width": 1, "line-opacity": 0.5 })
}

fn default_heatmap_color() -> Value {
    json!([
        "interpolate",
        ["linear"],
        ["heatmap-density"],
        0, "rgba(33,102,172,0)",
        0.2, "rgb(103,169,207)",
        0.4, "rgb(209,229,240)",
        0.6, "rgb(253,219,199)",
        0.8, "rgb(239,138,98)",
        1, "rgb(178,24,43)"
    ])
}

/// Heatmap paint plus its optional feature filter.
pub fn flood_heatmap(style: Option<&LayerStyle>) -> (Value, Option<Value>) {
    let heat = style.and_then(|s| s.heatmap.as_ref());
    let pick = |field: Option<&Value>, default: Value| field.cloned().unwrap_or(default);
    let paint = json!({
        "heatmap-weight": pick(heat.and_then(|h| h.weight.as_ref()), json!(1)),
        "heatmap-intensity": pick(heat.and_then(|h| h.intensity.as_ref()), json!(1)),
        "heatmap-color": pick(heat.and_then(|h| h.color.as_ref()), default_heatmap_color()),
        "heatmap-radius": pick(heat.and_then(|h| h.radius.as_ref()), json!(20)),
        "heatmap-opacity": heat.and_then(|h| h.opacity).or(style.and_then(|s| s.opacity)).unwrap_or(0.8),
    });
    (paint, heat.and_then(|h| h.filter.clone()))
}

pub fn buildings(style: Option<&LayerStyle>) -> Value {
    json!({
        "fill-color": color(style, "#d1d5db"),
        "fill-opacity": opacity(style, 0.7),
        "fill-outline-color": style
            .and_then(|s| s.outline_color.as_deref())
            .unwrap_or("#9ca3af"),
    })
}

pub fn buildings_3d(style: Option<&LayerStyle>) -> Value {
    let fill = match style.and_then(|s| s.color.as_deref()) {
        Some(c) => json!(c),
        None => json!(["case", ["has", "height"], "#aaa", "#ddd"]),
    };
    json!({
        "fill-extrusion-color": fill,
        "fill-extrusion-height": ["case", ["has", "height"], ["get", "height"], ["*", ["get", "levels"], 3]],
        "fill-extrusion-base": 0,
        "fill-extrusion-opacity": opacity(style, 0.8),
    })
}

pub fn river_buffers_fill(style: Option<&LayerStyle>) -> Value {
    let colors = style
        .and_then(|s| s.distance_colors.clone())
        .unwrap_or_default();
    json!({
        "fill-color": [
            "match",
            ["get", DISTANCE_PROPERTY],
            10, colors.m10,
            50, colors.m50,
            100, colors.m100,
            DistanceColors::default().m10
        ],
        "fill-opacity": opacity(style, 0.3),
    })
}

pub fn river_buffers_line() -> Value {
    json!({ "line-color": "#2563eb", "line-width": 1, "line-opacity": 0.4 })
}

pub fn population_3d(style: Option<&LayerStyle>) -> Value {
    json!({
        "fill-extrusion-color": ramp_interpolate(&ColorRamp::population_purples(), POPULATION_PROPERTY),
        "fill-extrusion-height": [
            "*",
            ["to-number", ["get", POPULATION_PROPERTY]],
            number(style, |s| s.height_multiplier, 2.0)
        ],
        "fill-extrusion-base": 0,
        "fill-extrusion-opacity": opacity(style, 0.7),
    })
}

pub fn inarisk(style: Option<&LayerStyle>) -> Value {
    json!({
        "raster-opacity": opacity(style, 0.6),
        "raster-fade-duration": 300,
    })
}

/// Flood points default to severity-matched radius and colour.
pub fn flood_points(style: Option<&LayerStyle>) -> Value {
    let radius = match style.and_then(|s| s.size) {
        Some(size) => json!(size),
        None => json!([
            "match", ["get", DEPTH_PROPERTY],
            FloodDepth::High.as_str(), 8,
            FloodDepth::Medium.as_str(), 6,
            FloodDepth::Low.as_str(), 4,
            5
        ]),
    };
    let fill = match style.and_then(|s| s.color.as_deref()) {
        Some(c) => json!(c),
        None => json!([
            "match", ["get", DEPTH_PROPERTY],
            FloodDepth::High.as_str(), "#dc2626",
            FloodDepth::Medium.as_str(), "#ea580c",
            FloodDepth::Low.as_str(), "#65a30d",
            "#6b7280"
        ]),
    };
    json!({
        "circle-radius": radius,
        "circle-color": fill,
        "circle-stroke-color": "#ffffff",
        "circle-stroke-width": 2,
        "circle-opacity": opacity(style, 0.8),
    })
}
