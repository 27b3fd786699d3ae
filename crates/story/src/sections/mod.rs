//! Map tables and step counts for each story section.

pub mod badung;
pub mod collage;
pub mod denpasar;
pub mod flood_impact;
pub mod overview;

use layers::{LayerKind, LayerStyle};

use crate::map_state::{LIGHT_STYLE, MapStateBuilder, MapStateError, SATELLITE_STREETS_STYLE};
use crate::registry::SectionId;
use crate::step_map::SectionStepMap;
use crate::viewport::ViewportProfile;

/// Sections in document order with their step counts.
pub const STORY_LAYOUT: [(SectionId, usize); 5] = [
    (SectionId::Collage, collage::STEP_COUNT),
    (SectionId::Denpasar, 13),
    (SectionId::Badung, 7),
    (SectionId::FloodImpact, 11),
    (SectionId::Overview, overview::STEP_COUNT),
];

/// Step table for a map-driven section; `None` for the collage.
pub fn step_map(
    section: SectionId,
    profile: ViewportProfile,
) -> Option<Result<SectionStepMap, MapStateError>> {
    match section {
        SectionId::Collage => None,
        SectionId::Denpasar => Some(denpasar::step_map(profile)),
        SectionId::Badung => Some(badung::step_map(profile)),
        SectionId::FloodImpact => Some(flood_impact::step_map()),
        SectionId::Overview => Some(overview::step_map()),
    }
}

/// Phones get the light base map; some close-ups keep satellite everywhere.
fn street_level_style(profile: ViewportProfile) -> &'static str {
    profile.pick(SATELLITE_STREETS_STYLE, LIGHT_STYLE)
}

/// Street-level states carry building paint even while buildings are off.
fn building_styles(builder: MapStateBuilder) -> MapStateBuilder {
    builder
        .layer(LayerKind::Buildings, false)
        .layer(LayerKind::Buildings3D, false)
        .style(
            LayerKind::Buildings,
            LayerStyle::fill("#d1d5db", 0.8).outline("#9ca3af"),
        )
        .style(LayerKind::Buildings3D, LayerStyle::fill("#e5e7eb", 0.9))
}

#[cfg(test)]
mod tests {
    use super::{STORY_LAYOUT, step_map};
    use crate::registry::SectionId;
    use crate::viewport::ViewportProfile;

    #[test]
    fn tables_build_for_both_profiles() {
        for profile in [ViewportProfile::Desktop, ViewportProfile::Mobile] {
            for (section, count) in STORY_LAYOUT {
                match step_map(section, profile) {
                    None => assert_eq!(section, SectionId::Collage),
                    Some(map) => {
                        let map = map.unwrap_or_else(|e| panic!("{section}: {e}"));
                        assert_eq!(map.step_count(), count, "{section}");
                        assert!(map.initial().is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn layout_totals_thirty_nine_steps() {
        let total: usize = STORY_LAYOUT.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 39);
    }
}
