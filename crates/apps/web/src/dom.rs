//! DOM helpers: step measurement and event wiring.

use story::StepRect;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

pub const STEP_SELECTOR: &str = ".scroll-step";

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width())
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

pub fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height())
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Document scroll offset; drives the observer's scroll direction.
pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y()).unwrap_or(0.0)
}

pub fn user_agent() -> String {
    window()
        .and_then(|w| w.navigator().user_agent())
        .unwrap_or_default()
}

pub fn query_all(selector: &str) -> Result<Vec<Element>, JsValue> {
    let nodes = document()?.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect())
}

/// Viewport-relative rects of every step, in document order. Steps of all
/// sections share one global index space.
pub fn measure_steps() -> Result<Vec<StepRect>, JsValue> {
    Ok(query_all(STEP_SELECTOR)?
        .iter()
        .map(|el| {
            let rect = el.get_bounding_client_rect();
            StepRect::new(rect.top(), rect.height())
        })
        .collect())
}

/// Listener that lives for the rest of the page.
pub fn listen(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

pub fn request_animation_frame(f: impl FnOnce(f64) + 'static) -> Result<i32, JsValue> {
    let callback = Closure::once_into_js(f);
    window()?.request_animation_frame(callback.unchecked_ref())
}

pub fn set_timeout(f: impl FnOnce() + 'static, delay_ms: u32) -> Result<i32, JsValue> {
    let callback = Closure::once_into_js(f);
    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    window()?.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
}
