use foundation::{CameraLimits, LngLat};
use serde::Serialize;

/// Widths below this are treated as phones.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Desktop centers shift east so the sticky map clears the text column.
pub const DESKTOP_CENTER_SHIFT_DEG: f64 = 0.001;

const MOBILE_AGENTS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportProfile {
    #[default]
    Desktop,
    Mobile,
}

impl ViewportProfile {
    pub fn detect(inner_width: f64, user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if inner_width < MOBILE_BREAKPOINT_PX || MOBILE_AGENTS.iter().any(|a| ua.contains(a)) {
            ViewportProfile::Mobile
        } else {
            ViewportProfile::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == ViewportProfile::Mobile
    }

    pub fn limits(self) -> CameraLimits {
        match self {
            ViewportProfile::Desktop => CameraLimits::DESKTOP,
            ViewportProfile::Mobile => CameraLimits::MOBILE,
        }
    }

    pub fn adjust_center(self, lng: f64, lat: f64) -> LngLat {
        match self {
            ViewportProfile::Desktop => LngLat::new(lng + DESKTOP_CENTER_SHIFT_DEG, lat),
            ViewportProfile::Mobile => LngLat::new(lng, lat),
        }
    }

    /// Pick the desktop or mobile variant of a table value.
    pub fn pick<T>(self, desktop: T, mobile: T) -> T {
        match self {
            ViewportProfile::Desktop => desktop,
            ViewportProfile::Mobile => mobile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewportProfile;
    use foundation::CameraLimits;

    #[test]
    fn narrow_or_handheld_is_mobile() {
        assert_eq!(ViewportProfile::detect(1280.0, "Mozilla/5.0 (X11; Linux)"), ViewportProfile::Desktop);
        assert_eq!(ViewportProfile::detect(500.0, "Mozilla/5.0 (X11; Linux)"), ViewportProfile::Mobile);
        assert_eq!(
            ViewportProfile::detect(1024.0, "Mozilla/5.0 (iPad; CPU OS 17_0)"),
            ViewportProfile::Mobile
        );
    }

    #[test]
    fn desktop_shifts_centers_east() {
        let c = ViewportProfile::Desktop.adjust_center(115.212136, -8.644669);
        assert!((c.lng - 115.213136).abs() < 1e-9);
        assert_eq!(c.lat, -8.644669);
        let m = ViewportProfile::Mobile.adjust_center(115.212136, -8.644669);
        assert_eq!(m.lng, 115.212136);
    }

    #[test]
    fn limits_follow_profile() {
        assert_eq!(ViewportProfile::Mobile.limits(), CameraLimits::MOBILE);
        assert_eq!(ViewportProfile::Desktop.limits().max_pitch, 85.0);
    }
}
