//! Badung: three flooded spots south and west of Denpasar.

use foundation::LngLat;
use layers::{LayerKind, LayerStyle, Marker};

use super::{building_styles, street_level_style};
use crate::map_state::{MapState, MapStateBuilder, MapStateError, SATELLITE_STREETS_STYLE};
use crate::step_map::SectionStepMap;
use crate::viewport::ViewportProfile;

fn spot(
    profile: ViewportProfile,
    (lng, lat): (f64, f64),
    (desktop_zoom, mobile_zoom): (f64, f64),
    pitch: f64,
    bearing: f64,
    title: &str,
    description: &str,
) -> MapStateBuilder {
    let builder = MapState::builder(
        profile.adjust_center(lng, lat),
        profile.pick(desktop_zoom, mobile_zoom),
    )
    .pitch(profile.pick(pitch, 0.0))
    .bearing(profile.pick(bearing, 0.0))
    .layer(LayerKind::AdminBoundaries, false)
    .marker(Marker::new(LngLat::new(lng, lat), title, description))
    .interactive(false)
    .map_style(street_level_style(profile));
    building_styles(builder)
}

pub fn states(profile: ViewportProfile) -> Result<Vec<MapState>, MapStateError> {
    let canggu = spot(
        profile,
        (115.138772, -8.653265),
        (17.0, 14.0),
        45.0,
        -15.0,
        "Shortcut Canggu",
        "Waist-deep flooding",
    )
    .show(LayerKind::FloodPoints, LayerStyle::circle("#ea580c", 8.0, 0.85))
    .show(LayerKind::FloodImpact, LayerStyle::fill("#f59e0b", 0.6))
    .show(LayerKind::Rivers, LayerStyle::line("#2563eb", 12.0, 0.8))
    .build()?;

    let dewa_ruci = spot(
        profile,
        (115.182456, -8.72169),
        (17.5, 14.5),
        50.0,
        -20.0,
        "Underpass Dewa Ruci",
        "Car-level flooding",
    )
    .show(LayerKind::FloodPoints, LayerStyle::circle("#dc2626", 10.0, 0.9))
    .show(LayerKind::FloodImpact, LayerStyle::fill("#ef4444", 0.7))
    .layer(LayerKind::Rivers, false)
    .build()?;

    let kuta = spot(
        profile,
        (115.173691, -8.704711),
        (16.5, 13.5),
        40.0,
        -10.0,
        "Kuta",
        "Thigh-deep flooding along roads",
    )
    .show(LayerKind::FloodPoints, LayerStyle::circle("#f59e0b", 7.0, 0.8))
    .show(LayerKind::FloodImpact, LayerStyle::fill("#fbbf24", 0.6))
    .show(LayerKind::Rivers, LayerStyle::line("#2563eb", 10.0, 0.8))
    .map_style(SATELLITE_STREETS_STYLE)
    .build()?;

    Ok(vec![canggu, dewa_ruci, kuta])
}

pub fn step_map(profile: ViewportProfile) -> Result<SectionStepMap, MapStateError> {
    Ok(SectionStepMap::paired(states(profile)?))
}
