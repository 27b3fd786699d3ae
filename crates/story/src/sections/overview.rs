//! City-wide overview: one fixed state for the whole section.

use foundation::LngLat;
use layers::{LayerKind, LayerStyle};

use crate::map_state::{MapState, MapStateError};
use crate::step_map::SectionStepMap;

pub const STEP_COUNT: usize = 3;

/// Empty styles keep the built-in paint, including severity-matched points.
pub fn state() -> Result<MapState, MapStateError> {
    MapState::builder(LngLat::new(115.2126, -8.6705), 12.0)
        .show(LayerKind::FloodPoints, LayerStyle::new())
        .show(LayerKind::FloodImpact, LayerStyle::new())
        .show(LayerKind::Rivers, LayerStyle::new())
        .show(LayerKind::AdminBoundaries, LayerStyle::new())
        .build()
}

pub fn step_map() -> Result<SectionStepMap, MapStateError> {
    Ok(SectionStepMap::single(state()?, STEP_COUNT))
}
