//! Denpasar: five street-level flood sites, then a city-wide heatmap.

use foundation::LngLat;
use layers::{HeatmapStyle, LayerKind, LayerStyle, Marker};
use serde_json::json;

use super::{building_styles, street_level_style};
use crate::map_state::{
    LIGHT_STYLE, MapState, MapStateBuilder, MapStateError, SATELLITE_STREETS_STYLE,
};
use crate::step_map::SectionStepMap;
use crate::viewport::ViewportProfile;

struct Site {
    lng: f64,
    lat: f64,
    zoom: (f64, f64),
    pitch: f64,
    bearing: f64,
    title: &'static str,
    description: &'static str,
}

impl Site {
    fn marker(&self) -> Marker {
        Marker::new(LngLat::new(self.lng, self.lat), self.title, self.description)
    }
}

const KAMPUNG_JAWA: Site = Site {
    lng: 115.212136,
    lat: -8.644669,
    zoom: (18.8, 15.0),
    pitch: 60.0,
    bearing: -30.0,
    title: "Kampung Jawa",
    description: "Flooded houses below bridge level",
};

const PASAR_BADUNG: Site = Site {
    lng: 115.21242,
    lat: -8.65669,
    zoom: (18.2, 14.5),
    pitch: 62.5,
    bearing: -24.0,
    title: "Pasar Badung",
    description: "Traditional market affected by flooding",
};

const JALAN_HASANUDIN: Site = Site {
    lng: 115.21319,
    lat: -8.658618,
    zoom: (18.0, 14.5),
    pitch: 50.0,
    bearing: -20.0,
    title: "Jalan Hasanudin",
    description: "Building collapse - 2 people missing",
};

const SOPUTAN: Site = Site {
    lng: 115.186899,
    lat: -8.687336,
    zoom: (17.0, 14.0),
    pitch: 45.0,
    bearing: -10.0,
    title: "Jalan Soputan",
    description: "Road flooding - 1m average depth",
};

const PURA_DEMAK: Site = Site {
    lng: 115.193307,
    lat: -8.661699,
    zoom: (17.5, 14.5),
    pitch: 45.0,
    bearing: -15.0,
    title: "Pura Demak",
    description: "30m radius flooding, 1-2m depth",
};

fn site_state(
    site: &Site,
    profile: ViewportProfile,
    points: Option<LayerStyle>,
    impact: LayerStyle,
    rivers: LayerStyle,
) -> MapStateBuilder {
    let center = profile.adjust_center(site.lng, site.lat);
    let builder = MapState::builder(center, profile.pick(site.zoom.0, site.zoom.1))
        .pitch(profile.pick(site.pitch, 0.0))
        .bearing(profile.pick(site.bearing, 0.0))
        .layer(LayerKind::AdminBoundaries, false)
        .show(LayerKind::FloodImpact, impact)
        .show(LayerKind::Rivers, rivers)
        .marker(site.marker())
        .interactive(false)
        .map_style(street_level_style(profile));
    let builder = match points {
        Some(style) => builder.show(LayerKind::FloodPoints, style),
        None => builder.layer(LayerKind::FloodPoints, false),
    };
    building_styles(builder)
}

fn heatmap_conclusion() -> Result<MapState, MapStateError> {
    let heat = HeatmapStyle {
        filter: Some(json!(["==", ["get", "field_3"], "Denpasar"])),
        weight: Some(json!(1)),
        intensity: Some(json!(["interpolate", ["linear"], ["zoom"], 10, 1, 13, 2, 15, 3])),
        color: Some(json!([
            "interpolate",
            ["linear"],
            ["heatmap-density"],
            0, "rgba(33,102,172,0)",
            0.2, "rgb(103,169,207)",
            0.4, "rgb(209,229,240)",
            0.6, "rgb(253,219,199)",
            0.8, "rgb(239,138,98)",
            1, "rgb(178,24,43)"
        ])),
        radius: Some(json!(["interpolate", ["linear"], ["zoom"], 10, 10, 13, 25, 15, 40])),
        opacity: Some(0.9),
    };
    MapState::builder(LngLat::new(115.2126, -8.6705), 13.0)
        .layer(LayerKind::FloodPoints, false)
        .layer(LayerKind::FloodImpact, false)
        .layer(LayerKind::Buildings, false)
        .show(LayerKind::FloodHeatmap, LayerStyle::new().heatmap(heat))
        .show(LayerKind::Rivers, LayerStyle::line("#0ea5e9", 3.0, 0.7))
        .show(LayerKind::AdminBoundaries, LayerStyle::line("#1f2937", 2.0, 0.6))
        .interactive(true)
        .map_style(LIGHT_STYLE)
        .build()
}

pub fn states(profile: ViewportProfile) -> Result<Vec<MapState>, MapStateError> {
    let kampung_jawa = site_state(
        &KAMPUNG_JAWA,
        profile,
        None,
        LayerStyle::fill("#CC9900", 0.6),
        LayerStyle::line("#1d4ed8", 12.0, 0.9),
    )
    .layer(LayerKind::RiverBuffer, false)
    .layer(LayerKind::Terrain, false)
    .layer(LayerKind::Hillshade, false)
    .style(LayerKind::Terrain, LayerStyle::new().exaggeration(2.0))
    .style(LayerKind::Hillshade, LayerStyle::new().exaggeration(0.8))
    .build()?;

    let pasar_badung = site_state(
        &PASAR_BADUNG,
        profile,
        Some(LayerStyle::circle("#dc2626", 8.0, 0.8)),
        LayerStyle::fill("#f59e0b", 0.7),
        LayerStyle::line("#2563eb", 12.0, 0.8),
    )
    .build()?;

    let hasanudin = site_state(
        &JALAN_HASANUDIN,
        profile,
        Some(LayerStyle::circle("#dc2626", 10.0, 0.9)),
        LayerStyle::fill("#ef4444", 0.7),
        LayerStyle::line("#2563eb", 15.0, 0.8),
    )
    .build()?;

    let soputan = site_state(
        &SOPUTAN,
        profile,
        Some(LayerStyle::circle("#ea580c", 8.0, 0.8)),
        LayerStyle::fill("#f59e0b", 0.7),
        LayerStyle::line("#2563eb", 10.0, 0.8),
    )
    .build()?;

    // Satellite base on both profiles.
    let pura_demak = site_state(
        &PURA_DEMAK,
        profile,
        Some(LayerStyle::circle("#dc2626", 9.0, 0.85)),
        LayerStyle::fill("#f59e0b", 0.7),
        LayerStyle::line("#2563eb", 12.0, 0.8),
    )
    .map_style(SATELLITE_STREETS_STYLE)
    .build()?;

    Ok(vec![
        kampung_jawa,
        pasar_badung,
        hasanudin,
        soputan,
        pura_demak,
        heatmap_conclusion()?,
    ])
}

pub fn step_map(profile: ViewportProfile) -> Result<SectionStepMap, MapStateError> {
    Ok(SectionStepMap::paired(states(profile)?))
}

#[cfg(test)]
mod tests {
    use super::{states, step_map};
    use crate::map_state::{LIGHT_STYLE, SATELLITE_STREETS_STYLE};
    use crate::viewport::ViewportProfile;
    use layers::{AllLoaded, LayerKind, LayerStack};

    #[test]
    fn desktop_tilts_and_shifts_street_views() {
        let desktop = states(ViewportProfile::Desktop).unwrap();
        let mobile = states(ViewportProfile::Mobile).unwrap();
        assert_eq!(desktop.len(), 6);

        let d = desktop[0].pose();
        let m = mobile[0].pose();
        assert_eq!((d.zoom, d.pitch, d.bearing), (18.8, 60.0, -30.0));
        assert_eq!((m.zoom, m.pitch, m.bearing), (15.0, 0.0, 0.0));
        assert!((d.center.lng - m.center.lng - 0.001).abs() < 1e-9);
        assert_eq!(desktop[0].map_style(), SATELLITE_STREETS_STYLE);
        assert_eq!(mobile[0].map_style(), LIGHT_STYLE);
        assert_eq!(mobile[4].map_style(), SATELLITE_STREETS_STYLE);
    }

    #[test]
    fn markers_sit_on_the_unshifted_site() {
        let desktop = states(ViewportProfile::Desktop).unwrap();
        let marker = desktop[1].marker().unwrap();
        assert_eq!(marker.title, "Pasar Badung");
        assert_eq!(marker.coordinates.lng, 115.21242);
    }

    #[test]
    fn conclusion_is_a_filtered_heatmap() {
        let conclusion = &states(ViewportProfile::Mobile).unwrap()[5];
        assert!(conclusion.interactive());
        let stack = LayerStack::build(conclusion.layers(), conclusion.layer_styles(), None, &AllLoaded);
        assert!(stack.contains(LayerKind::FloodHeatmap));
        assert!(!stack.contains(LayerKind::FloodPoints));
        let heat = &stack.layers[stack.position(LayerKind::FloodHeatmap).unwrap()];
        assert!(heat.filter.is_some());
    }

    #[test]
    fn thirteen_steps_with_spacers() {
        let map = step_map(ViewportProfile::Desktop).unwrap();
        assert_eq!(map.step_count(), 13);
        let states = states(ViewportProfile::Desktop).unwrap();
        assert_eq!(map.lookup(0), Some(&states[0]));
        assert_eq!(map.lookup(9), Some(&states[4]));
        assert_eq!(map.lookup(11), Some(&states[5]));
        assert_eq!(map.lookup(12), Some(&states[5]));
    }
}
