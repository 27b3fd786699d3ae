//! Build-time site configuration.

use tracing::warn;

pub const TRANSLATIONS_PATH: &str = "/locales/translations.json";
pub const DEFAULT_UMAMI_SRC: &str = "https://cloud.umami.is/script.js";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SiteConfig {
    pub mapbox_token: Option<String>,
    pub umami_website_id: Option<String>,
    pub umami_src: Option<String>,
    /// Fixed collage layout; a fresh seed per page load when absent.
    pub collage_seed: Option<u64>,
}

fn non_empty(v: Option<&str>) -> Option<String> {
    v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

impl SiteConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("BANJIR_MAPBOX_TOKEN"),
            option_env!("BANJIR_UMAMI_WEBSITE_ID"),
            option_env!("BANJIR_UMAMI_SRC"),
            option_env!("BANJIR_COLLAGE_SEED"),
        )
    }

    pub fn from_values(
        mapbox_token: Option<&str>,
        umami_website_id: Option<&str>,
        umami_src: Option<&str>,
        collage_seed: Option<&str>,
    ) -> Self {
        let collage_seed = non_empty(collage_seed).and_then(|s| match s.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!(value = %s, "ignoring non-numeric BANJIR_COLLAGE_SEED");
                None
            }
        });
        Self {
            mapbox_token: non_empty(mapbox_token),
            umami_website_id: non_empty(umami_website_id),
            umami_src: non_empty(umami_src),
            collage_seed,
        }
    }

    /// Website id and script source, when analytics is configured.
    pub fn analytics(&self) -> Option<(&str, &str)> {
        let id = self.umami_website_id.as_deref()?;
        let src = self.umami_src.as_deref().unwrap_or(DEFAULT_UMAMI_SRC);
        Some((id, src))
    }
}

#[cfg(test)]
mod tests {
    use super::SiteConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_values_count_as_missing() {
        let cfg = SiteConfig::from_values(Some("  "), Some(""), None, Some("x"));
        assert_eq!(cfg, SiteConfig::default());
        assert!(cfg.analytics().is_none());
    }

    #[test]
    fn analytics_falls_back_to_cloud_script() {
        let cfg = SiteConfig::from_values(Some("pk.abc"), Some("site-1"), None, Some("42"));
        assert_eq!(cfg.analytics(), Some(("site-1", "https://cloud.umami.is/script.js")));
        assert_eq!(cfg.collage_seed, Some(42));
        assert_eq!(cfg.mapbox_token.as_deref(), Some("pk.abc"));
    }
}
