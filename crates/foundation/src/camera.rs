use serde::{Deserialize, Serialize};

use crate::geo::LngLat;

/// Highest zoom level accepted by the map widget.
pub const MAX_ZOOM: f64 = 24.0;

/// Steepest pitch the widget can render (degrees).
pub const MAX_PITCH: f64 = 85.0;

/// Camera placement for a web-mercator map widget.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub center: LngLat,
    pub zoom: f64,
    /// Tilt away from nadir, degrees.
    pub pitch: f64,
    /// Rotation clockwise from north, degrees.
    pub bearing: f64,
}

impl CameraPose {
    pub const fn new(center: LngLat, zoom: f64, pitch: f64, bearing: f64) -> Self {
        Self {
            center,
            zoom,
            pitch,
            bearing,
        }
    }

    /// Top-down view, no rotation.
    pub const fn flat(center: LngLat, zoom: f64) -> Self {
        Self::new(center, zoom, 0.0, 0.0)
    }

    pub fn validate(&self) -> Result<(), CameraError> {
        if !self.center.is_valid() {
            return Err(CameraError::InvalidCenter(self.center));
        }
        if !self.zoom.is_finite() || !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(CameraError::ZoomOutOfRange(self.zoom));
        }
        if !self.pitch.is_finite() || !(0.0..=MAX_PITCH).contains(&self.pitch) {
            return Err(CameraError::PitchOutOfRange(self.pitch));
        }
        if !self.bearing.is_finite() {
            return Err(CameraError::BearingNotFinite);
        }
        Ok(())
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        // Central Denpasar, the widget's view before any step fires.
        Self::flat(LngLat::new(115.2126, -8.6705), 12.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraError {
    InvalidCenter(LngLat),
    ZoomOutOfRange(f64),
    PitchOutOfRange(f64),
    BearingNotFinite,
}

impl std::fmt::Display for CameraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraError::InvalidCenter(c) => {
                write!(f, "center [{}, {}] is not a valid lng/lat", c.lng, c.lat)
            }
            CameraError::ZoomOutOfRange(z) => write!(f, "zoom {z} outside 0..={MAX_ZOOM}"),
            CameraError::PitchOutOfRange(p) => write!(f, "pitch {p} outside 0..={MAX_PITCH}"),
            CameraError::BearingNotFinite => write!(f, "bearing must be finite"),
        }
    }
}

impl std::error::Error for CameraError {}

/// Interaction caps applied to the widget.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraLimits {
    pub max_pitch: f64,
    pub max_zoom: f64,
}

impl CameraLimits {
    pub const DESKTOP: CameraLimits = CameraLimits {
        max_pitch: MAX_PITCH,
        max_zoom: 22.0,
    };

    /// Small screens get a flatter, closer-capped map to keep WebGL load down.
    pub const MOBILE: CameraLimits = CameraLimits {
        max_pitch: 30.0,
        max_zoom: 16.0,
    };

    pub fn clamp(&self, pose: CameraPose) -> CameraPose {
        CameraPose {
            zoom: pose.zoom.min(self.max_zoom),
            pitch: pose.pitch.min(self.max_pitch),
            ..pose
        }
    }
}
