//! WebGL context loss: placeholder, then a full reload.

use std::sync::atomic::{AtomicBool, Ordering};

use story::RECOVERING_MESSAGE;
use tracing::error;
use wasm_bindgen::JsValue;

use crate::dom;

static RELOAD_SCHEDULED: AtomicBool = AtomicBool::new(false);

/// Covers each lost map with the recovering notice and reloads after
/// `delay_ms`. Several canvases losing context schedule one reload.
pub fn recover(containers: &[String], delay_ms: u32) {
    for id in containers {
        if let Err(err) = show_placeholder(id) {
            error!(container = %id, ?err, "could not show recovery placeholder");
        }
    }
    if RELOAD_SCHEDULED.swap(true, Ordering::SeqCst) {
        return;
    }
    let scheduled = dom::set_timeout(
        || {
            if let Err(err) = dom::window().and_then(|w| w.location().reload()) {
                error!(?err, "page reload failed");
            }
        },
        delay_ms,
    );
    if let Err(err) = scheduled {
        error!(?err, "could not schedule reload");
    }
}

fn show_placeholder(container_id: &str) -> Result<(), JsValue> {
    let document = dom::document()?;
    let Some(container) = document.get_element_by_id(container_id) else {
        return Ok(());
    };
    let notice = document.create_element("div")?;
    notice.set_class_name("map-recovering");
    notice.set_text_content(Some(RECOVERING_MESSAGE));
    container.append_child(&notice)?;
    Ok(())
}
