//! Binds a held map state to what the widget should draw.

use foundation::CameraLimits;
use layers::{DatasetAvailability, LayerStack};
use serde::Serialize;
use tracing::{error, info};

use crate::map_state::MapState;
use crate::viewport::ViewportProfile;

/// Delay before reloading after the WebGL context is lost.
pub const CONTEXT_RECOVERY_DELAY_MS: u32 = 2000;
pub const RECOVERING_MESSAGE: &str = "Recovering map...";

/// Everything the widget needs besides the camera.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub map_style: String,
    pub interactive: bool,
    pub limits: CameraLimits,
    pub stack: LayerStack,
}

impl RenderPlan {
    pub fn build(
        state: &MapState,
        profile: ViewportProfile,
        datasets: &impl DatasetAvailability,
    ) -> RenderPlan {
        RenderPlan {
            map_style: state.map_style().to_string(),
            interactive: state.interactive(),
            limits: profile.limits(),
            stack: LayerStack::build(state.layers(), state.layer_styles(), state.marker(), datasets),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererStatus {
    Ready,
    /// Context lost; nothing is drawn until the page reloads.
    Recovering,
}

/// Keeps the last plan sent so identical states are not re-sent.
#[derive(Debug)]
pub struct MapRenderer {
    profile: ViewportProfile,
    last: Option<RenderPlan>,
    status: RendererStatus,
}

impl MapRenderer {
    pub fn new(profile: ViewportProfile) -> Self {
        Self {
            profile,
            last: None,
            status: RendererStatus::Ready,
        }
    }

    pub fn profile(&self) -> ViewportProfile {
        self.profile
    }

    /// New plan for `state`, or `None` when it matches what was last sent or
    /// the renderer is recovering.
    pub fn render(
        &mut self,
        state: &MapState,
        datasets: &impl DatasetAvailability,
    ) -> Option<&RenderPlan> {
        if self.status == RendererStatus::Recovering {
            return None;
        }
        let plan = RenderPlan::build(state, self.profile, datasets);
        if self.last.as_ref() == Some(&plan) {
            return None;
        }
        info!(
            layers = plan.stack.layers.len(),
            terrain = plan.stack.terrain.is_some(),
            style = %plan.map_style,
            "layer stack changed"
        );
        self.last = Some(plan);
        self.last.as_ref()
    }

    pub fn last_plan(&self) -> Option<&RenderPlan> {
        self.last.as_ref()
    }

    /// Forget the last plan so the next render is sent even if unchanged.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Returns the reload delay.
    pub fn on_context_lost(&mut self) -> u32 {
        error!("WebGL context lost, reloading in {CONTEXT_RECOVERY_DELAY_MS} ms");
        self.status = RendererStatus::Recovering;
        self.last = None;
        CONTEXT_RECOVERY_DELAY_MS
    }

    pub fn status(&self) -> RendererStatus {
        self.status
    }
}
