use std::cell::RefCell;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use formats::DatasetId;
use i18n::{Lang, Translations};
use story::ViewportProfile;
use tracing::{error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub mod app;
pub mod collage_view;
pub mod config;
pub mod data;
pub mod dom;
pub mod i18n_view;
pub mod map_widget;
pub mod recovery;
pub mod scripts;

use app::App;
use config::{SiteConfig, TRANSLATIONS_PATH};

// Guard to prevent double-initialization of global state (relevant during hot reload).
static INITIALIZED: AtomicBool = AtomicBool::new(false);
static MOUNTED: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_SET: OnceLock<()> = OnceLock::new();

thread_local! {
    static STATE: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Safe TLS access helper that returns a default on teardown or before the
/// story is mounted, instead of panicking.
fn with_state<F, R>(f: F) -> R
where
    F: FnOnce(&mut App) -> R,
    R: Default,
{
    STATE
        .try_with(|cell| cell.borrow_mut().as_mut().map(f))
        .ok()
        .flatten()
        .unwrap_or_default()
}

fn init_panic_hook() {
    PANIC_HOOK_SET.get_or_init(|| {
        console_error_panic_hook::set_once();
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Avoid double-initialization (can happen during hot-reload edge cases).
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    init_panic_hook();
    tracing_wasm::set_as_global_default();
    Ok(())
}

/// Mounts the scroll story. Call once the DOM and `mapboxgl` are ready.
#[wasm_bindgen]
pub fn mount_story() -> Result<(), JsValue> {
    if MOUNTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    let config = SiteConfig::from_build_env();
    let profile = ViewportProfile::detect(dom::viewport_width(), &dom::user_agent());
    let seed = config
        .collage_seed
        .unwrap_or_else(|| (js_sys::Math::random() * f64::from(u32::MAX)) as u64);

    let app = App::new(&config, profile, seed).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let widgets = app.widgets();
    STATE.with(|cell| *cell.borrow_mut() = Some(app));

    for widget in widgets {
        let lost = Closure::<dyn FnMut(web_sys::Event)>::new(on_context_lost);
        if let Err(err) = widget.on_context_lost(lost.as_ref().unchecked_ref()) {
            error!(container = widget.container(), ?err, "context-loss listener not installed");
        }
        lost.forget();
    }

    let window = dom::window()?;
    dom::listen(&window, "scroll", |_| schedule_update())?;
    dom::listen(&window, "resize", |_| schedule_update())?;
    dom::listen(&window, "pagehide", |_| with_state(|app| app.detach()))?;
    schedule_update();

    load_datasets();
    load_translations();
    scripts::ensure_analytics(&config);
    Ok(())
}

#[wasm_bindgen]
pub fn set_language(code: &str) {
    let Some(lang) = Lang::parse(code) else {
        warn!(code, "unsupported language");
        return;
    };
    with_state(|app| app.set_language(lang));
}

#[wasm_bindgen]
pub fn current_language() -> String {
    with_state(|app| app.language().code().to_string())
}

fn schedule_update() {
    if !with_state(|app| app.request_update()) {
        return;
    }
    if let Err(err) = dom::request_animation_frame(|ts| with_state(|app| app.on_frame(ts))) {
        error!(?err, "requestAnimationFrame failed");
        with_state(|app| app.cancel_update());
    }
}

fn on_context_lost(event: web_sys::Event) {
    event.prevent_default();
    let (delay, containers) = with_state(|app| app.on_context_lost());
    let delay = if delay == 0 {
        story::CONTEXT_RECOVERY_DELAY_MS
    } else {
        delay
    };
    recovery::recover(&containers, delay);
}

/// One independent fetch per dataset; a failure only drops its own layers.
fn load_datasets() {
    for id in DatasetId::ALL {
        spawn_local(async move {
            match data::fetch_dataset(id).await {
                Ok(loaded) => with_state(|app| app.on_dataset_loaded(loaded)),
                Err(err) => with_state(|app| app.on_dataset_failed(id, &err.to_string())),
            }
        });
    }
}

fn load_translations() {
    spawn_local(async move {
        let parsed = data::fetch_text(TRANSLATIONS_PATH)
            .await
            .map_err(|e| e.to_string())
            .and_then(|text| Translations::from_json_str(&text).map_err(|e| e.to_string()));
        match parsed {
            Ok(translations) => {
                info!(languages = translations.languages().count(), "translations loaded");
                with_state(|app| app.set_translations(translations));
            }
            Err(err) => error!(url = TRANSLATIONS_PATH, %err, "translations failed to load"),
        }
    });
}
