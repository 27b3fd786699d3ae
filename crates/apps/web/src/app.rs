//! Page-wide story state and the handlers that drive it.

use std::collections::BTreeMap;

use formats::DatasetId;
use i18n::{Lang, Translations};
use layers::Datasets;
use runtime::{EventKind, FrameThrottle};
use story::sections::collage as collage_section;
use story::{
    MapRenderer, RenderPlan, SectionId, StepObserver, StepRoute, StoryCoordinator, StoryError,
    ViewportProfile, DEFAULT_OFFSET,
};
use tracing::{error, info, warn};

use crate::collage_view;
use crate::config::SiteConfig;
use crate::data::LoadedDataset;
use crate::dom;
use crate::i18n_view;
use crate::map_widget::{self, JsMapCamera, MapWidget};

pub struct App {
    profile: ViewportProfile,
    story: StoryCoordinator<JsMapCamera>,
    renderers: BTreeMap<SectionId, MapRenderer>,
    datasets: Datasets,
    observer: StepObserver,
    throttle: FrameThrottle,
    translations: Translations,
    lang: Lang,
}

impl App {
    pub fn new(config: &SiteConfig, profile: ViewportProfile, seed: u64) -> Result<Self, StoryError> {
        let urls = collage_section::image_urls()
            .into_iter()
            .map(|url| match profile {
                ViewportProfile::Desktop => url,
                ViewportProfile::Mobile => collage_section::mobile_variant(&url),
            })
            .collect();
        let story = StoryCoordinator::for_story(profile, urls, seed, |_| JsMapCamera::new(None))?;

        let mut app = Self {
            profile,
            story,
            renderers: BTreeMap::new(),
            datasets: Datasets::new(),
            observer: StepObserver::new(DEFAULT_OFFSET),
            throttle: FrameThrottle::new(),
            translations: Translations::new(),
            lang: i18n_view::detect_language(),
        };
        match config.mapbox_token.as_deref() {
            Some(token) => app.create_widgets(token),
            None => warn!("BANJIR_MAPBOX_TOKEN unset; maps are not rendered"),
        }
        info!(
            profile = ?profile,
            steps = app.story.registry().total_steps(),
            seed,
            "story mounted"
        );
        Ok(app)
    }

    /// Widgets open at the pose each section mounted with.
    fn create_widgets(&mut self, token: &str) {
        let sections: Vec<SectionId> = self.story.map_sections().map(|(s, _)| s).collect();
        for section in sections {
            let Some(controller) = self.story.controller_mut(section) else {
                continue;
            };
            let Some(state) = controller.current().cloned() else {
                continue;
            };
            let plan = RenderPlan::build(&state, self.profile, &self.datasets);
            match MapWidget::create(section, token, &plan, &state.pose()) {
                Ok(widget) => {
                    *controller.camera_mut() = JsMapCamera::new(Some(widget));
                    self.renderers.insert(section, MapRenderer::new(self.profile));
                    self.sync_section(section);
                }
                Err(err) => error!(%section, ?err, "map widget creation failed"),
            }
        }
    }

    pub fn widgets(&self) -> Vec<MapWidget> {
        self.story
            .map_sections()
            .filter_map(|(_, c)| c.camera().widget().cloned())
            .collect()
    }

    /// Send the held state's plan when it differs from what the widget has.
    fn sync_section(&mut self, section: SectionId) {
        let Some(controller) = self.story.controller(section) else {
            return;
        };
        let (Some(state), Some(widget)) = (controller.current(), controller.camera().widget()) else {
            return;
        };
        let Some(renderer) = self.renderers.get_mut(&section) else {
            return;
        };
        if let Some(plan) = renderer.render(state, &self.datasets) {
            if let Err(err) = widget.apply_plan(plan) {
                error!(%section, ?err, "applying layer stack failed");
                renderer.invalidate();
            }
        }
    }

    fn sync_all(&mut self) {
        let sections: Vec<SectionId> = self.renderers.keys().copied().collect();
        for section in sections {
            self.sync_section(section);
        }
    }

    fn apply_route(&mut self, route: StepRoute) {
        match route {
            StepRoute::Map { section, .. } => self.sync_section(section),
            StepRoute::Collage {
                section,
                newly_revealed,
                ..
            } => {
                let Some(revealer) = self.story.collage(section) else {
                    return;
                };
                if let Err(err) = collage_view::reveal(revealer, &newly_revealed, self.profile) {
                    error!(%section, ?err, "collage reveal failed");
                }
            }
            StepRoute::Unowned { .. } => {}
        }
    }

    /// Returns whether a frame should be requested.
    pub fn request_update(&mut self) -> bool {
        self.throttle.request()
    }

    pub fn cancel_update(&mut self) {
        self.throttle.cancel();
    }

    pub fn on_frame(&mut self, timestamp_ms: f64) {
        let frame = self.throttle.on_frame(timestamp_ms);
        self.story.begin_frame(frame);
        match dom::measure_steps() {
            Ok(rects) => self.observer.set_steps(rects),
            Err(err) => {
                error!(?err, "measuring scroll steps failed");
                return;
            }
        }
        for event in self.observer.update(dom::viewport_height(), dom::scroll_y()) {
            if let Some(route) = self.story.on_step_event(event) {
                self.apply_route(route);
            }
        }
    }

    pub fn on_dataset_loaded(&mut self, loaded: LoadedDataset) {
        let LoadedDataset { id, collection, raw } = loaded;
        if let Err(err) = map_widget::register_dataset(id.name(), &raw) {
            error!(dataset = id.name(), ?err, "registering dataset with the map failed");
        }
        info!(dataset = id.name(), features = collection.len(), "dataset loaded");
        self.datasets.insert(id, collection);
        self.story.record(EventKind::DatasetLoaded, id.name(), "loaded");
        self.sync_all();
    }

    pub fn on_dataset_failed(&mut self, id: DatasetId, reason: &str) {
        error!(dataset = id.name(), url = %id.url_path(), reason, "dataset failed to load");
        self.story.record(EventKind::DatasetFailed, id.name(), reason);
    }

    pub fn set_translations(&mut self, translations: Translations) {
        self.translations = translations;
        self.render_text();
    }

    pub fn set_language(&mut self, lang: Lang) {
        self.lang = lang;
        i18n_view::remember_language(lang);
        self.render_text();
    }

    pub fn language(&self) -> Lang {
        self.lang
    }

    fn render_text(&self) {
        if let Err(err) = i18n_view::apply(&self.translations, self.lang) {
            error!(?err, "applying translations failed");
        }
    }

    /// Stops every renderer; returns the reload delay and the lost containers.
    pub fn on_context_lost(&mut self) -> (u32, Vec<String>) {
        let mut delay = story::CONTEXT_RECOVERY_DELAY_MS;
        for renderer in self.renderers.values_mut() {
            delay = renderer.on_context_lost();
        }
        self.story.record(EventKind::ContextLost, "map", "webglcontextlost");
        let containers = self
            .widgets()
            .iter()
            .map(|w| w.container().to_string())
            .collect();
        (delay, containers)
    }

    pub fn detach(&mut self) {
        self.observer.detach();
    }
}
