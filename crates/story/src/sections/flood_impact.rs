//! Flood impact analysis over the whole city, layer by layer.

use foundation::LngLat;
use layers::{DepthColors, DistanceColors, LayerKind, LayerStyle};

use crate::map_state::{LIGHT_STYLE, MapState, MapStateBuilder, MapStateError};
use crate::step_map::SectionStepMap;

const CITY_CENTER: LngLat = LngLat::new(115.2167, -8.65);

fn city(zoom: f64) -> MapStateBuilder {
    MapState::builder(CITY_CENTER, zoom)
        .map_style(LIGHT_STYLE)
        .interactive(false)
}

/// Admin boundaries are on unless a state turns them off.
fn default_admin() -> LayerStyle {
    LayerStyle::line("#000000", 2.0, 0.5)
}

pub fn states() -> Result<Vec<MapState>, MapStateError> {
    let overview = city(11.0)
        .show(LayerKind::FloodPoints, LayerStyle::circle("#dc2626", 8.0, 0.9))
        .show(LayerKind::FloodImpact, LayerStyle::fill("#ef4444", 0.5))
        .show(LayerKind::Rivers, LayerStyle::line("#2563eb", 4.0, 0.7))
        .show(LayerKind::AdminBoundaries, LayerStyle::line("#374151", 2.0, 0.6))
        .layer(LayerKind::Buildings, false)
        .show(LayerKind::InariskRisk, LayerStyle::new().opacity(0.6))
        .build()?;

    let flood_radius = city(12.0)
        .show(LayerKind::FloodPoints, LayerStyle::circle("#dc2626", 6.0, 0.8))
        .show(LayerKind::FloodRadius, LayerStyle::fill("#f59e0b", 0.3))
        .show(LayerKind::Rivers, LayerStyle::line("#2563eb", 5.0, 0.8))
        .show(LayerKind::AdminBoundaries, LayerStyle::line("#374151", 1.0, 0.5))
        .show(LayerKind::Buildings, LayerStyle::fill("#9ca3af", 0.6))
        .interactive(true)
        .build()?;

    let depth_categories = city(12.0)
        .layer(LayerKind::FloodPoints, false)
        .show(
            LayerKind::FloodImpact,
            LayerStyle::new().by_depth(DepthColors::severity()).opacity(0.7),
        )
        .show(LayerKind::Rivers, LayerStyle::line("#2563eb", 4.0, 0.3))
        .show(LayerKind::Buildings, LayerStyle::fill("#d1d5db", 0.7))
        .style(LayerKind::AdminBoundaries, default_admin())
        .build()?;

    let river_buffers = city(12.0)
        .show(LayerKind::FloodPoints, LayerStyle::circle("#dc2626", 7.0, 0.85))
        .show(LayerKind::Rivers, LayerStyle::line("#1e40af", 6.0, 0.9))
        .show(
            LayerKind::RiverBuffers,
            LayerStyle::new()
                .by_distance(DistanceColors::uniform("#ef4444"))
                .opacity(0.5),
        )
        .show(LayerKind::Buildings, LayerStyle::fill("#9ca3af", 0.6))
        .style(LayerKind::AdminBoundaries, default_admin())
        .build()?;

    let comprehensive = city(12.0)
        .show(LayerKind::InariskRisk, LayerStyle::new().opacity(0.35))
        .show(LayerKind::PopulationChoropleth, LayerStyle::new().opacity(0.7))
        .show(
            LayerKind::FloodImpact,
            LayerStyle::new().by_depth(DepthColors::severity()).opacity(0.4),
        )
        .show(LayerKind::Rivers, LayerStyle::line("#2563eb", 3.0, 0.6))
        .show(LayerKind::FloodPoints, LayerStyle::circle("#dc2626", 8.0, 1.0))
        .layer(LayerKind::Buildings, false)
        .style(LayerKind::AdminBoundaries, default_admin())
        .build()?;

    Ok(vec![
        overview,
        flood_radius,
        depth_categories,
        river_buffers,
        comprehensive,
    ])
}

pub fn step_map() -> Result<SectionStepMap, MapStateError> {
    Ok(SectionStepMap::paired(states()?))
}

#[cfg(test)]
mod tests {
    use super::states;
    use layers::{AllLoaded, LayerKind, LayerStack};
    use serde_json::json;

    #[test]
    fn comprehensive_view_stacks_raster_under_points() {
        let states = states().unwrap();
        let last = &states[4];
        let stack = LayerStack::build(last.layers(), last.layer_styles(), None, &AllLoaded);
        let ids = stack.layer_ids();
        assert_eq!(ids.first(), Some(&"adminBoundaries-fill"));
        assert!(stack.position(LayerKind::InariskRisk) < stack.position(LayerKind::FloodPoints));
        assert_eq!(ids.last(), Some(&"floodPoints"));
    }

    #[test]
    fn depth_view_colours_by_category() {
        let states = states().unwrap();
        let stack = LayerStack::build(states[2].layers(), states[2].layer_styles(), None, &AllLoaded);
        let impact = &stack.layers[stack.position(LayerKind::FloodImpact).unwrap()];
        assert_eq!(impact.paint["fill-color"][0], json!("match"));
        assert_eq!(impact.paint["fill-opacity"], json!(0.7));
        assert!(!stack.contains(LayerKind::FloodPoints));
    }

    #[test]
    fn all_views_share_the_city_center() {
        let states = states().unwrap();
        assert_eq!(states.len(), 5);
        assert!(states.iter().all(|s| s.center() == states[0].center()));
        assert_eq!(states[0].pose().zoom, 11.0);
        assert!(states[1].interactive());
    }
}
