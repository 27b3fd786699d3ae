//! Applies a section's step table to the map camera.

use foundation::CameraPose;
use serde::Serialize;
use tracing::{debug, info};

use crate::map_state::MapState;
use crate::step_map::SectionStepMap;

/// Duration of the animated transition between two held states.
pub const FLY_DURATION_MS: u32 = 2000;

/// Camera side of the map widget.
pub trait MapCamera {
    /// Move without animation.
    fn jump_to(&mut self, pose: &CameraPose);
    /// Animated flight; a new call supersedes one in progress.
    fn fly_to(&mut self, pose: &CameraPose, duration_ms: u32);
}

impl<C: MapCamera + ?Sized> MapCamera for &mut C {
    fn jump_to(&mut self, pose: &CameraPose) {
        (**self).jump_to(pose);
    }

    fn fly_to(&mut self, pose: &CameraPose, duration_ms: u32) {
        (**self).fly_to(pose, duration_ms);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// First state applied, no animation.
    Jumped,
    /// Animated from the previously held state.
    Flew,
    /// Blank or unknown step; camera and held state untouched.
    Held,
}

#[derive(Debug)]
pub struct MapStateController<C> {
    camera: C,
    steps: SectionStepMap,
    current: Option<MapState>,
}

impl<C: MapCamera> MapStateController<C> {
    pub fn new(camera: C, steps: SectionStepMap) -> Self {
        Self {
            camera,
            steps,
            current: None,
        }
    }

    /// Apply `initial` without animation and hold it. `None` leaves the
    /// widget at its own default view.
    pub fn mount(&mut self, initial: Option<MapState>) {
        if let Some(state) = initial {
            info!(zoom = state.pose().zoom, "mounting initial map state");
            self.camera.jump_to(&state.pose());
            self.current = Some(state);
        }
    }

    /// Mount with the table's first defined state.
    pub fn mount_initial(&mut self) {
        let initial = self.steps.initial().cloned();
        self.mount(initial);
    }

    pub fn on_step_enter(&mut self, local_step: usize) -> StepOutcome {
        let Some(target) = self.steps.lookup(local_step) else {
            debug!(step = local_step, "blank step, holding map state");
            return StepOutcome::Held;
        };
        let pose = target.pose();
        let outcome = if self.current.is_some() {
            self.camera.fly_to(&pose, FLY_DURATION_MS);
            StepOutcome::Flew
        } else {
            self.camera.jump_to(&pose);
            StepOutcome::Jumped
        };
        debug!(step = local_step, ?outcome, "applied map state");
        self.current = Some(target.clone());
        outcome
    }

    pub fn current(&self) -> Option<&MapState> {
        self.current.as_ref()
    }

    pub fn steps(&self) -> &SectionStepMap {
        &self.steps
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::{FLY_DURATION_MS, MapCamera, MapStateController, StepOutcome};
    use crate::map_state::MapState;
    use crate::step_map::SectionStepMap;
    use foundation::{CameraPose, LngLat};
    use layers::LayerKind;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Jump(CameraPose),
        Fly(CameraPose, u32),
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl MapCamera for Recorder {
        fn jump_to(&mut self, pose: &CameraPose) {
            self.0.push(Call::Jump(*pose));
        }

        fn fly_to(&mut self, pose: &CameraPose, duration_ms: u32) {
            self.0.push(Call::Fly(*pose, duration_ms));
        }
    }

    fn state(lng: f64, lat: f64, zoom: f64) -> MapState {
        MapState::builder(LngLat::new(lng, lat), zoom)
            .layer(LayerKind::AdminBoundaries, false)
            .layer(LayerKind::FloodPoints, false)
            .build()
            .unwrap()
    }

    fn table() -> (MapState, MapState, SectionStepMap) {
        let a = state(115.21, -8.65, 12.0);
        let b = state(115.18, -8.72, 14.0);
        let map = SectionStepMap::builder(3)
            .state(0, a.clone())
            .blank(1)
            .state(2, b.clone())
            .build()
            .unwrap();
        (a, b, map)
    }

    #[test]
    fn first_state_jumps_then_blank_holds_then_flies() {
        let (a, b, map) = table();
        let mut controller = MapStateController::new(Recorder::default(), map);

        assert_eq!(controller.on_step_enter(0), StepOutcome::Jumped);
        assert_eq!(controller.on_step_enter(1), StepOutcome::Held);
        assert_eq!(controller.current(), Some(&a));
        assert_eq!(controller.on_step_enter(2), StepOutcome::Flew);
        assert_eq!(controller.current(), Some(&b));

        assert_eq!(
            controller.camera().0,
            vec![Call::Jump(a.pose()), Call::Fly(b.pose(), FLY_DURATION_MS)]
        );
    }

    #[test]
    fn mount_jumps_and_later_steps_fly() {
        let (a, _, map) = table();
        let mut controller = MapStateController::new(Recorder::default(), map);
        controller.mount_initial();
        assert_eq!(controller.current(), Some(&a));
        assert_eq!(controller.on_step_enter(0), StepOutcome::Flew);
        assert_eq!(
            controller.camera().0,
            vec![Call::Jump(a.pose()), Call::Fly(a.pose(), FLY_DURATION_MS)]
        );
    }

    #[test]
    fn mount_without_state_leaves_camera_alone() {
        let (_, _, map) = table();
        let mut controller = MapStateController::new(Recorder::default(), map);
        controller.mount(None);
        assert!(controller.current().is_none());
        assert!(controller.camera().0.is_empty());
    }

    #[test]
    fn unknown_step_is_held() {
        let (_, _, map) = table();
        let mut controller = MapStateController::new(Recorder::default(), map);
        assert_eq!(controller.on_step_enter(42), StepOutcome::Held);
        assert!(controller.camera().0.is_empty());
    }

    #[test]
    fn borrowed_camera_works_too() {
        let (a, _, map) = table();
        let mut recorder = Recorder::default();
        {
            let mut controller = MapStateController::new(&mut recorder, map);
            controller.on_step_enter(0);
        }
        assert_eq!(recorder.0, vec![Call::Jump(a.pose())]);
    }
}
