//! Offline checks and dumps behind the `storyboard` binary.

use std::fs;
use std::path::Path;

use formats::{
    DEPTH_PROPERTY, DataManifest, DatasetEntry, DatasetId, FeatureCollection, FloodDepth,
};
use layers::{AllLoaded, LayerKind, LayerStack};
use serde::Serialize;
use story::sections::{self, STORY_LAYOUT};
use story::{MapState, SectionId, StepRange, StepRangeRegistry, ViewportProfile};

/// A marker further than this from its state's center is probably a typo.
pub const MARKER_RADIUS_M: f64 = 2_000.0;

#[derive(Debug, Clone, Serialize)]
pub struct StepPlan {
    pub local: usize,
    pub global: usize,
    /// `None` for steps outside a map section.
    pub state: Option<MapState>,
    pub layer_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionPlan {
    pub section: SectionId,
    pub range: StepRange,
    pub steps: Vec<StepPlan>,
}

/// Every section's table laid out on the global step index.
pub fn plan(profile: ViewportProfile) -> Result<Vec<SectionPlan>, String> {
    let mut registry = StepRangeRegistry::new();
    let mut out = Vec::new();
    for (section, count) in STORY_LAYOUT {
        let range = registry
            .register(section, count)
            .map_err(|e| e.to_string())?;
        let steps = match sections::step_map(section, profile) {
            None => (0..count)
                .map(|local| StepPlan {
                    local,
                    global: range.start + local,
                    state: None,
                    layer_ids: Vec::new(),
                })
                .collect(),
            Some(table) => {
                let table = table.map_err(|e| format!("{section}: {e}"))?;
                (0..table.step_count())
                    .map(|local| {
                        let state = table.lookup(local).cloned();
                        let layer_ids = state
                            .as_ref()
                            .map(|s| stack_for(s).layer_ids().into_iter().map(str::to_string).collect())
                            .unwrap_or_default();
                        StepPlan {
                            local,
                            global: range.start + local,
                            state,
                            layer_ids,
                        }
                    })
                    .collect()
            }
        };
        out.push(SectionPlan {
            section,
            range,
            steps,
        });
    }
    Ok(out)
}

fn stack_for(state: &MapState) -> LayerStack {
    LayerStack::build(state.layers(), state.layer_styles(), state.marker(), &AllLoaded)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub scope: String,
    pub message: String,
}

impl Issue {
    fn new(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.scope, self.message)
    }
}

/// Table checks for one profile: every table builds, step counts match the
/// layout, markers sit near their camera and flood points draw last.
pub fn check_tables(profile: ViewportProfile) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (section, count) in STORY_LAYOUT {
        let scope = format!("{profile:?}/{section}");
        let Some(table) = sections::step_map(section, profile) else {
            continue;
        };
        let table = match table {
            Ok(t) => t,
            Err(e) => {
                issues.push(Issue::new(scope, e.to_string()));
                continue;
            }
        };
        if table.step_count() != count {
            issues.push(Issue::new(
                &scope,
                format!("table has {} steps, layout expects {count}", table.step_count()),
            ));
        }
        if table.initial().is_none() {
            issues.push(Issue::new(&scope, "no step defines a map state"));
        }
        for (local, state) in table.states() {
            issues.extend(check_state(&format!("{scope}#{local}"), state));
        }
    }
    issues
}

pub fn check_state(scope: &str, state: &MapState) -> Vec<Issue> {
    let mut issues = Vec::new();
    if let Some(marker) = state.marker() {
        let d = marker.coordinates.distance_m(state.center());
        if d > MARKER_RADIUS_M {
            issues.push(Issue::new(
                scope,
                format!("marker '{}' is {d:.0} m from the camera center", marker.title),
            ));
        }
    }
    let stack = stack_for(state);
    if let Some(pos) = stack.position(LayerKind::FloodPoints) {
        if pos + 1 != stack.layers.len() {
            issues.push(Issue::new(scope, "flood points are not the top layer"));
        }
    }
    issues
}

/// Flood point features must carry a known depth category.
pub fn check_flood_points(points: &FeatureCollection) -> Vec<Issue> {
    points
        .features
        .iter()
        .enumerate()
        .filter_map(|(i, f)| match f.property_str(DEPTH_PROPERTY) {
            Some(v) if FloodDepth::parse(v).is_some() => None,
            Some(v) => Some(Issue::new(
                format!("flood_points#{i}"),
                format!("unknown {DEPTH_PROPERTY} value '{v}'"),
            )),
            None => Some(Issue::new(
                format!("flood_points#{i}"),
                format!("missing {DEPTH_PROPERTY}"),
            )),
        })
        .collect()
}

/// Every dataset under `data_dir` parses; flood points are validated further.
pub fn check_data(data_dir: &Path) -> Vec<Issue> {
    let mut issues = Vec::new();
    for id in DatasetId::ALL {
        let path = data_dir.join(id.file_name());
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                issues.push(Issue::new(id.name(), format!("read {path:?}: {e}")));
                continue;
            }
        };
        match FeatureCollection::from_geojson_str(&text) {
            Ok(fc) if id == DatasetId::FloodPoints => issues.extend(check_flood_points(&fc)),
            Ok(_) => {}
            Err(e) => issues.push(Issue::new(id.name(), e.to_string())),
        }
    }
    issues
}

/// Manifest of the datasets present in `data_dir`. Missing files are skipped;
/// unparsable ones are errors.
pub fn build_manifest(data_dir: &Path) -> Result<DataManifest, String> {
    let mut manifest = DataManifest::new();
    for id in DatasetId::ALL {
        let path = data_dir.join(id.file_name());
        if !path.exists() {
            continue;
        }
        let bytes = fs::read(&path).map_err(|e| format!("read {path:?}: {e}"))?;
        let entry = DatasetEntry::from_bytes(id, &bytes).map_err(|e| format!("{path:?}: {e}"))?;
        manifest.upsert(entry);
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::{build_manifest, check_flood_points, check_tables, plan};
    use formats::{DatasetId, FeatureCollection};
    use pretty_assertions::assert_eq;
    use story::{SectionId, ViewportProfile};

    #[test]
    fn shipped_tables_pass_for_both_profiles() {
        assert_eq!(check_tables(ViewportProfile::Desktop), vec![]);
        assert_eq!(check_tables(ViewportProfile::Mobile), vec![]);
    }

    #[test]
    fn plan_covers_every_step_once() {
        let sections = plan(ViewportProfile::Desktop).unwrap();
        let globals: Vec<usize> = sections
            .iter()
            .flat_map(|s| s.steps.iter().map(|st| st.global))
            .collect();
        assert_eq!(globals, (0..39).collect::<Vec<_>>());
        let denpasar = sections.iter().find(|s| s.section == SectionId::Denpasar).unwrap();
        assert!(denpasar.steps[0].state.is_some());
        assert_eq!(denpasar.steps[2].state, denpasar.steps[1].state);
        assert!(sections[0].steps.iter().all(|st| st.state.is_none()));
        assert_eq!(denpasar.steps[3].layer_ids.last().map(String::as_str), Some("floodPoints"));
    }

    #[test]
    fn flags_unknown_depths() {
        let fc = FeatureCollection::from_geojson_str(
            r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"Ketinggian":"tinggi"},"geometry":{"type":"Point","coordinates":[115.2,-8.6]}},
            {"type":"Feature","properties":{"Ketinggian":"banjir"},"geometry":{"type":"Point","coordinates":[115.2,-8.6]}},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[115.2,-8.6]}}]}"#,
        )
        .unwrap();
        let issues = check_flood_points(&fc);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].scope, "flood_points#1");
        assert_eq!(issues[1].message, "missing Ketinggian");
    }

    #[test]
    fn manifest_skips_missing_files() {
        let dir = std::env::temp_dir().join(format!("storyboard-manifest-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("rivers.geojson"),
            r#"{"type":"FeatureCollection","features":[]}"#,
        )
        .unwrap();
        let manifest = build_manifest(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(manifest.datasets.len(), 1);
        assert_eq!(manifest.datasets[0].id, DatasetId::Rivers);
        assert_eq!(manifest.datasets[0].feature_count, 0);
    }
}
