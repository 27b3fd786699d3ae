//! Binding to the Mapbox GL widget through a small JS shim.
//!
//! The shim keeps one map per container id, owns the sources and layers it
//! added, and re-applies them after a base style swap (a style change drops
//! every custom layer). It is also exposed as `window.banjirMap` for
//! debugging from the console.

use foundation::CameraPose;
use layers::paint::TERRAIN_DEM_URL;
use layers::{LayerStack, Marker, TerrainSpec};
use serde::Serialize;
use story::{MapCamera, RenderPlan, SectionId};
use tracing::{debug, error};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = "
const maps = new Map();
const datasets = new Map();
const HANDLERS = ['scrollZoom', 'boxZoom', 'dragRotate', 'dragPan', 'keyboard', 'doubleClickZoom', 'touchZoomRotate'];

function entryFor(id) {
    const entry = maps.get(id);
    if (!entry) throw new Error('no map mounted in #' + id);
    return entry;
}

function camera(pose) {
    return { center: pose.center, zoom: pose.zoom, pitch: pose.pitch, bearing: pose.bearing };
}

function clearOwned(entry) {
    const map = entry.map;
    for (const id of entry.layerIds) {
        if (map.getLayer(id)) map.removeLayer(id);
    }
    for (const id of entry.sourceIds) {
        if (map.getSource(id)) map.removeSource(id);
    }
    entry.layerIds = [];
    entry.sourceIds = [];
}

function ensureDem(entry, url) {
    const map = entry.map;
    if (!map.getSource('mapbox-terrain')) {
        map.addSource('mapbox-terrain', { type: 'raster-dem', url, tileSize: 512 });
    }
}

function sourceFor(layer) {
    const src = layer.source;
    switch (src.type) {
        case 'geojson':
            return { type: 'geojson', data: datasets.get(src.dataset) || { type: 'FeatureCollection', features: [] } };
        case 'vector':
            return { type: 'vector', url: src.url };
        case 'raster':
            return { type: 'raster', tiles: src.tiles, tileSize: src.tileSize };
        case 'raster-dem':
            return { type: 'raster-dem', url: src.url, tileSize: src.tileSize };
        default:
            throw new Error('unknown source type ' + src.type);
    }
}

function applyLayers(entry) {
    const map = entry.map;
    if (!map.isStyleLoaded()) return;
    map.setTerrain(null);
    clearOwned(entry);
    for (const layer of entry.layers) {
        if (!map.getSource(layer.source_id)) {
            map.addSource(layer.source_id, sourceFor(layer));
            entry.sourceIds.push(layer.source_id);
        }
        const def = { id: layer.id, type: layer.type, source: layer.source_id, paint: layer.paint };
        if (layer['source-layer']) def['source-layer'] = layer['source-layer'];
        if (layer.filter) def.filter = layer.filter;
        map.addLayer(def);
        entry.layerIds.push(layer.id);
    }
    applyTerrain(entry);
}

function applyTerrain(entry) {
    const map = entry.map;
    if (!map.isStyleLoaded()) return;
    if (!entry.terrain) {
        map.setTerrain(null);
        return;
    }
    ensureDem(entry, entry.demUrl);
    map.setTerrain({ source: entry.terrain.source, exaggeration: entry.terrain.exaggeration });
}

export function banjir_map_create(id, token, style, pose, limits, interactive) {
    if (maps.has(id)) return;
    if (typeof mapboxgl === 'undefined') throw new Error('mapboxgl is not loaded');
    mapboxgl.accessToken = token;
    const map = new mapboxgl.Map({
        container: id,
        style,
        ...camera(pose),
        maxPitch: limits.max_pitch,
        maxZoom: limits.max_zoom,
        interactive,
        attributionControl: false,
    });
    const entry = { map, style, layers: [], layerIds: [], sourceIds: [], terrain: null, demUrl: null, marker: null };
    map.on('style.load', () => {
        entry.layerIds = [];
        entry.sourceIds = [];
        applyLayers(entry);
    });
    maps.set(id, entry);
}

export function banjir_map_register_data(name, geojson) {
    datasets.set(name, geojson);
    for (const entry of maps.values()) {
        const source = entry.map.getSource(name);
        if (source && typeof source.setData === 'function') source.setData(geojson);
    }
}

export function banjir_map_jump_to(id, pose) {
    entryFor(id).map.jumpTo(camera(pose));
}

export function banjir_map_fly_to(id, pose, duration) {
    entryFor(id).map.flyTo({ ...camera(pose), duration, essential: true });
}

export function banjir_map_set_style(id, style) {
    const entry = entryFor(id);
    if (entry.style === style) return;
    entry.style = style;
    entry.map.setStyle(style);
}

export function banjir_map_set_interactive(id, interactive) {
    const map = entryFor(id).map;
    for (const name of HANDLERS) {
        const handler = map[name];
        if (!handler) continue;
        if (interactive) handler.enable(); else handler.disable();
    }
}

export function banjir_map_set_layer_stack(id, layers) {
    const entry = entryFor(id);
    entry.layers = layers;
    applyLayers(entry);
}

export function banjir_map_set_terrain(id, terrain, demUrl) {
    const entry = entryFor(id);
    entry.terrain = terrain;
    entry.demUrl = demUrl;
    applyTerrain(entry);
}

export function banjir_map_set_marker(id, marker) {
    const entry = entryFor(id);
    if (entry.marker) {
        entry.marker.remove();
        entry.marker = null;
    }
    if (!marker) return;
    const popup = new mapboxgl.Popup({ offset: 25 }).setHTML(
        '<h3>' + marker.title + '</h3><p>' + marker.description + '</p>'
    );
    entry.marker = new mapboxgl.Marker({ color: '#dc2626' })
        .setLngLat(marker.coordinates)
        .setPopup(popup)
        .addTo(entry.map);
}

export function banjir_map_on_context_lost(id, callback) {
    entryFor(id).map.getCanvas().addEventListener('webglcontextlost', callback);
}

export function banjir_map_remove(id) {
    const entry = maps.get(id);
    if (!entry) return;
    if (entry.marker) entry.marker.remove();
    entry.map.remove();
    maps.delete(id);
}

globalThis.banjirMap = {
    create: banjir_map_create,
    registerData: banjir_map_register_data,
    jumpTo: banjir_map_jump_to,
    flyTo: banjir_map_fly_to,
    setStyle: banjir_map_set_style,
    setInteractive: banjir_map_set_interactive,
    setLayerStack: banjir_map_set_layer_stack,
    setTerrain: banjir_map_set_terrain,
    setMarker: banjir_map_set_marker,
    remove: banjir_map_remove,
};
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn banjir_map_create(
        id: &str,
        token: &str,
        style: &str,
        pose: JsValue,
        limits: JsValue,
        interactive: bool,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_register_data(name: &str, geojson: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_jump_to(id: &str, pose: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_fly_to(id: &str, pose: JsValue, duration: u32) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_set_style(id: &str, style: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_set_interactive(id: &str, interactive: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_set_layer_stack(id: &str, layers: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_set_terrain(id: &str, terrain: JsValue, dem_url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_set_marker(id: &str, marker: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_on_context_lost(id: &str, callback: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn banjir_map_remove(id: &str) -> Result<(), JsValue>;
}

/// Plain JS objects rather than `Map`s, so the shim can hand paint
/// expressions straight to Mapbox.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub fn container_id(section: SectionId) -> String {
    format!("map-{}", section.name().replace('_', "-"))
}

/// A mounted map widget, addressed by its container element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapWidget {
    container: String,
}

impl MapWidget {
    pub fn create(section: SectionId, token: &str, plan: &RenderPlan, pose: &CameraPose) -> Result<Self, JsValue> {
        let container = container_id(section);
        banjir_map_create(
            &container,
            token,
            &plan.map_style,
            to_js(pose)?,
            to_js(&plan.limits)?,
            plan.interactive,
        )?;
        debug!(%section, container = %container, "map widget created");
        Ok(Self { container })
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn apply_plan(&self, plan: &RenderPlan) -> Result<(), JsValue> {
        banjir_map_set_style(&self.container, &plan.map_style)?;
        banjir_map_set_interactive(&self.container, plan.interactive)?;
        self.set_layers(&plan.stack)?;
        self.set_terrain(plan.stack.terrain.as_ref())?;
        self.set_marker(plan.stack.marker.as_ref())
    }

    fn set_layers(&self, stack: &LayerStack) -> Result<(), JsValue> {
        banjir_map_set_layer_stack(&self.container, to_js(&stack.layers)?)
    }

    fn set_terrain(&self, terrain: Option<&TerrainSpec>) -> Result<(), JsValue> {
        banjir_map_set_terrain(&self.container, to_js(&terrain)?, TERRAIN_DEM_URL)
    }

    fn set_marker(&self, marker: Option<&Marker>) -> Result<(), JsValue> {
        banjir_map_set_marker(&self.container, to_js(&marker)?)
    }

    pub fn on_context_lost(&self, callback: &js_sys::Function) -> Result<(), JsValue> {
        banjir_map_on_context_lost(&self.container, callback)
    }

    pub fn remove(&self) -> Result<(), JsValue> {
        banjir_map_remove(&self.container)
    }
}

pub fn register_dataset(name: &str, geojson: &serde_json::Value) -> Result<(), JsValue> {
    banjir_map_register_data(name, to_js(geojson)?)
}

/// Camera commands for one section's widget. Failures are logged; a missing
/// widget must not stop the scroll story.
#[derive(Debug, Clone)]
pub struct JsMapCamera {
    widget: Option<MapWidget>,
}

impl JsMapCamera {
    pub fn new(widget: Option<MapWidget>) -> Self {
        Self { widget }
    }

    pub fn widget(&self) -> Option<&MapWidget> {
        self.widget.as_ref()
    }

    fn send(&self, command: &str, f: impl FnOnce(&str, JsValue) -> Result<(), JsValue>, pose: &CameraPose) {
        let Some(widget) = &self.widget else {
            return;
        };
        if let Err(err) = to_js(pose).and_then(|pose| f(&widget.container, pose)) {
            error!(container = %widget.container, command, ?err, "camera command failed");
        }
    }
}

impl MapCamera for JsMapCamera {
    fn jump_to(&mut self, pose: &CameraPose) {
        self.send("jumpTo", |id, pose| banjir_map_jump_to(id, pose), pose);
    }

    fn fly_to(&mut self, pose: &CameraPose, duration_ms: u32) {
        self.send("flyTo", |id, pose| banjir_map_fly_to(id, pose, duration_ms), pose);
    }
}
