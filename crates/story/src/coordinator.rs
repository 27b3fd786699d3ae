//! Routes global step events to the section that owns them.

use std::collections::BTreeMap;

use runtime::{EventBus, EventKind, Frame};
use serde::Serialize;
use tracing::{debug, warn};

use crate::collage::{CollageRevealer, step_progress};
use crate::controller::{MapCamera, MapStateController, StepOutcome};
use crate::map_state::MapStateError;
use crate::registry::{RegistryError, SectionId, StepRange, StepRangeRegistry};
use crate::sections::{self, STORY_LAYOUT};
use crate::step::StepEvent;
use crate::step_map::SectionStepMap;
use crate::viewport::ViewportProfile;

#[derive(Debug)]
pub enum SectionDriver<C> {
    Map(MapStateController<C>),
    Collage(CollageRevealer),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum StepRoute {
    Map {
        section: SectionId,
        local: usize,
        outcome: StepOutcome,
    },
    Collage {
        section: SectionId,
        local: usize,
        /// Indices into the revealer's images, in reveal order.
        newly_revealed: Vec<usize>,
    },
    /// No registered section owns the index.
    Unowned { global: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoryError {
    Registry(RegistryError),
    MapState {
        section: SectionId,
        source: MapStateError,
    },
}

impl std::fmt::Display for StoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoryError::Registry(e) => write!(f, "{e}"),
            StoryError::MapState { section, source } => {
                write!(f, "{section} map table: {source}")
            }
        }
    }
}

impl std::error::Error for StoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoryError::Registry(e) => Some(e),
            StoryError::MapState { source, .. } => Some(source),
        }
    }
}

impl From<RegistryError> for StoryError {
    fn from(e: RegistryError) -> Self {
        StoryError::Registry(e)
    }
}

#[derive(Debug)]
pub struct StoryCoordinator<C> {
    registry: StepRangeRegistry,
    drivers: BTreeMap<SectionId, SectionDriver<C>>,
    bus: EventBus,
    frame: Frame,
}

impl<C: MapCamera> Default for StoryCoordinator<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MapCamera> StoryCoordinator<C> {
    pub fn new() -> Self {
        Self {
            registry: StepRangeRegistry::new(),
            drivers: BTreeMap::new(),
            bus: EventBus::new(),
            frame: Frame::first(0.0),
        }
    }

    /// The full story: every section of `STORY_LAYOUT` in document order.
    /// `camera_for` supplies the map widget of each map section.
    pub fn for_story(
        profile: ViewportProfile,
        collage_urls: Vec<String>,
        seed: u64,
        mut camera_for: impl FnMut(SectionId) -> C,
    ) -> Result<Self, StoryError> {
        let mut story = Self::new();
        let mut collage_urls = Some(collage_urls);
        for (section, count) in STORY_LAYOUT {
            match sections::step_map(section, profile) {
                None => {
                    let urls = collage_urls.take().unwrap_or_default();
                    let revealer = CollageRevealer::with_profile(urls, seed, profile);
                    story.add_collage_section(section, count, revealer)?;
                }
                Some(steps) => {
                    let steps =
                        steps.map_err(|source| StoryError::MapState { section, source })?;
                    story.add_map_section(section, steps, camera_for(section))?;
                }
            }
        }
        Ok(story)
    }

    /// Register a map section after those already added and mount its first state.
    pub fn add_map_section(
        &mut self,
        section: SectionId,
        steps: SectionStepMap,
        camera: C,
    ) -> Result<StepRange, RegistryError> {
        let range = self.registry.register(section, steps.step_count())?;
        let mut controller = MapStateController::new(camera, steps);
        controller.mount_initial();
        if controller.current().is_some() {
            self.bus
                .emit(self.frame, EventKind::CameraJump, section.name(), "mount");
        }
        self.drivers.insert(section, SectionDriver::Map(controller));
        Ok(range)
    }

    pub fn add_collage_section(
        &mut self,
        section: SectionId,
        step_count: usize,
        revealer: CollageRevealer,
    ) -> Result<StepRange, RegistryError> {
        let range = self.registry.register(section, step_count)?;
        self.drivers.insert(section, SectionDriver::Collage(revealer));
        Ok(range)
    }

    /// Frame stamped on events recorded from now on.
    pub fn begin_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    /// Exit events are only traced; enter events are routed.
    pub fn on_step_event(&mut self, event: StepEvent) -> Option<StepRoute> {
        match event {
            StepEvent::Enter { index, .. } => Some(self.on_step_enter(index)),
            StepEvent::Exit { index, direction } => {
                let scope = self.scope_of(index);
                self.bus.emit(
                    self.frame,
                    EventKind::StepExit,
                    scope,
                    format!("step {index} {direction:?}"),
                );
                None
            }
        }
    }

    pub fn on_step_enter(&mut self, global: usize) -> StepRoute {
        let Some((section, local)) = self.registry.resolve(global) else {
            warn!(step = global, "step outside every registered section");
            return StepRoute::Unowned { global };
        };
        debug!(step = global, %section, local, "resolved step");
        self.bus.emit(
            self.frame,
            EventKind::StepEnter,
            section.name(),
            format!("step {global} (local {local})"),
        );

        let count = self.registry.range(section).map_or(0, |r| r.count);
        match self.drivers.get_mut(&section) {
            Some(SectionDriver::Map(controller)) => {
                let outcome = controller.on_step_enter(local);
                let kind = match outcome {
                    StepOutcome::Jumped => EventKind::CameraJump,
                    StepOutcome::Flew => EventKind::CameraFly,
                    StepOutcome::Held => EventKind::StateHeld,
                };
                self.bus
                    .emit(self.frame, kind, section.name(), format!("local {local}"));
                StepRoute::Map {
                    section,
                    local,
                    outcome,
                }
            }
            Some(SectionDriver::Collage(revealer)) => {
                let before = revealer.revealed_count();
                revealer.set_progress(step_progress(local, count));
                let after = revealer.revealed_count();
                let newly_revealed = revealer.revealed_between(before, after);
                if !newly_revealed.is_empty() {
                    self.bus.emit(
                        self.frame,
                        EventKind::CollageReveal,
                        section.name(),
                        format!("{after} of {}", revealer.len()),
                    );
                }
                StepRoute::Collage {
                    section,
                    local,
                    newly_revealed,
                }
            }
            None => StepRoute::Unowned { global },
        }
    }

    fn scope_of(&self, global: usize) -> &'static str {
        self.registry
            .resolve(global)
            .map_or("unowned", |(s, _)| s.name())
    }

    pub fn registry(&self) -> &StepRangeRegistry {
        &self.registry
    }

    pub fn controller(&self, section: SectionId) -> Option<&MapStateController<C>> {
        match self.drivers.get(&section) {
            Some(SectionDriver::Map(c)) => Some(c),
            _ => None,
        }
    }

    pub fn controller_mut(&mut self, section: SectionId) -> Option<&mut MapStateController<C>> {
        match self.drivers.get_mut(&section) {
            Some(SectionDriver::Map(c)) => Some(c),
            _ => None,
        }
    }

    pub fn collage(&self, section: SectionId) -> Option<&CollageRevealer> {
        match self.drivers.get(&section) {
            Some(SectionDriver::Collage(r)) => Some(r),
            _ => None,
        }
    }

    pub fn map_sections(&self) -> impl Iterator<Item = (SectionId, &MapStateController<C>)> + '_ {
        self.drivers.iter().filter_map(|(s, d)| match d {
            SectionDriver::Map(c) => Some((*s, c)),
            SectionDriver::Collage(_) => None,
        })
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Record an event at the current frame.
    pub fn record(&mut self, kind: EventKind, scope: impl Into<String>, message: impl Into<String>) {
        self.bus.emit(self.frame, kind, scope, message);
    }
}

#[cfg(test)]
mod tests {
    use super::{StepRoute, StoryCoordinator};
    use crate::collage::CollageRevealer;
    use crate::controller::{MapCamera, StepOutcome};
    use crate::registry::SectionId;
    use crate::step::{Direction, StepEvent};
    use crate::step_map::SectionStepMap;
    use crate::map_state::MapState;
    use foundation::{CameraPose, LngLat};
    use layers::LayerKind;
    use runtime::EventKind;

    #[derive(Debug, Default)]
    struct CountingCamera {
        jumps: usize,
        flights: usize,
    }

    impl MapCamera for CountingCamera {
        fn jump_to(&mut self, _pose: &CameraPose) {
            self.jumps += 1;
        }

        fn fly_to(&mut self, _pose: &CameraPose, _duration_ms: u32) {
            self.flights += 1;
        }
    }

    fn plain(lng: f64) -> MapState {
        MapState::builder(LngLat::new(lng, -8.65), 12.0)
            .layer(LayerKind::AdminBoundaries, false)
            .layer(LayerKind::FloodPoints, false)
            .build()
            .unwrap()
    }

    fn small_story() -> StoryCoordinator<CountingCamera> {
        let mut story = StoryCoordinator::new();
        let urls = (0..10).map(|i| format!("{i}.png")).collect();
        story
            .add_collage_section(SectionId::Collage, 5, CollageRevealer::new(urls, 1))
            .unwrap();
        story
            .add_map_section(
                SectionId::Denpasar,
                SectionStepMap::paired(vec![plain(115.21), plain(115.19)]),
                CountingCamera::default(),
            )
            .unwrap();
        story
    }

    #[test]
    fn map_sections_mount_with_a_jump() {
        let story = small_story();
        let controller = story.controller(SectionId::Denpasar).unwrap();
        assert_eq!(controller.camera().jumps, 1);
        assert_eq!(story.events().of_kind(EventKind::CameraJump).count(), 1);
    }

    #[test]
    fn routes_by_global_index() {
        let mut story = small_story();
        match story.on_step_enter(1) {
            StepRoute::Collage { local, newly_revealed, .. } => {
                assert_eq!(local, 1);
                assert_eq!(newly_revealed.len(), 4);
            }
            other => panic!("unexpected route {other:?}"),
        }
        assert_eq!(
            story.on_step_enter(8),
            StepRoute::Map { section: SectionId::Denpasar, local: 3, outcome: StepOutcome::Flew }
        );
        assert_eq!(
            story.on_step_enter(7),
            StepRoute::Map { section: SectionId::Denpasar, local: 2, outcome: StepOutcome::Flew }
        );
        assert_eq!(story.on_step_enter(99), StepRoute::Unowned { global: 99 });
        let denpasar = story.controller(SectionId::Denpasar).unwrap();
        assert_eq!(denpasar.camera().flights, 2);
        assert_eq!(denpasar.current().map(|s| s.center().lng), Some(115.21));
    }

    #[test]
    fn scrolling_back_up_keeps_collage_revealed() {
        let mut story = small_story();
        story.on_step_enter(4);
        story.on_step_enter(0);
        assert_eq!(story.collage(SectionId::Collage).unwrap().revealed_count(), 10);
    }

    #[test]
    fn exit_events_are_traced_only() {
        let mut story = small_story();
        let route = story.on_step_event(StepEvent::Exit { index: 5, direction: Direction::Down });
        assert!(route.is_none());
        let exit = story.events().of_kind(EventKind::StepExit).next().unwrap();
        assert_eq!(exit.scope, "denpasar");
    }
}
