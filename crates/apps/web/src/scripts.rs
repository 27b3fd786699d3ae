//! One-shot loading of third-party scripts.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};
use wasm_bindgen::JsValue;

use crate::config::SiteConfig;

/// Injects a script at most once per page. The flag is set on the first
/// attempt and never reset, so a failed injection is not retried.
#[derive(Debug)]
pub struct ScriptLoader {
    name: &'static str,
    loaded: AtomicBool,
}

pub static ANALYTICS: ScriptLoader = ScriptLoader::new("umami");

impl ScriptLoader {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            loaded: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Runs `inject` on the first call only. Returns whether it ran.
    pub fn ensure_loaded<E>(&self, inject: impl FnOnce() -> Result<(), E>) -> Result<bool, E> {
        if self.loaded.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }
        inject()?;
        info!(script = self.name, "script injected");
        Ok(true)
    }
}

/// Adds the analytics tag to `<head>` if configured.
pub fn ensure_analytics(config: &SiteConfig) -> bool {
    let Some((website_id, src)) = config.analytics() else {
        warn!("analytics not configured (BANJIR_UMAMI_WEBSITE_ID unset), skipping");
        return false;
    };
    match ANALYTICS.ensure_loaded(|| inject_script(src, &[("data-website-id", website_id)])) {
        Ok(injected) => injected,
        Err(err) => {
            error!(script = ANALYTICS.name(), ?err, "failed to inject script");
            false
        }
    }
}

fn inject_script(src: &str, attrs: &[(&str, &str)]) -> Result<(), JsValue> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let script = document
        .create_element("script")?
        .dyn_into::<web_sys::HtmlScriptElement>()?;
    script.set_src(src);
    script.set_defer(true);
    for (name, value) in attrs {
        script.set_attribute(name, value)?;
    }
    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("no <head>"))?;
    head.append_child(&script)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ScriptLoader;
    use std::cell::Cell;

    #[test]
    fn injects_once() {
        let loader = ScriptLoader::new("test");
        let calls = Cell::new(0);
        let inject = || -> Result<(), ()> {
            calls.set(calls.get() + 1);
            Ok(())
        };
        assert_eq!(loader.ensure_loaded(inject), Ok(true));
        assert_eq!(loader.ensure_loaded(inject), Ok(false));
        assert_eq!(calls.get(), 1);
        assert!(loader.is_loaded());
    }

    #[test]
    fn failure_is_not_retried() {
        let loader = ScriptLoader::new("test");
        assert_eq!(loader.ensure_loaded(|| Err("blocked")), Err("blocked"));
        assert!(loader.is_loaded());
        assert_eq!(loader.ensure_loaded(|| Err("blocked")), Ok(false));
    }
}
