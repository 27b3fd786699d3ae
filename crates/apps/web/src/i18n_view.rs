//! Fills translated text into `[data-i18n]` elements.

use i18n::{Lang, Translations};
use tracing::warn;
use wasm_bindgen::JsValue;

use crate::dom;

const STORAGE_KEY: &str = "banjir.lang";
const TEXT_ATTR: &str = "data-i18n";
const LIST_ATTR: &str = "data-i18n-list";

/// Saved choice first, then the browser language.
pub fn detect_language() -> Lang {
    let window = match dom::window() {
        Ok(w) => w,
        Err(_) => return Lang::default(),
    };
    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
    if let Some(lang) = stored.as_deref().and_then(Lang::parse) {
        return lang;
    }
    window
        .navigator()
        .language()
        .map(|tag| Lang::from_tag(&tag))
        .unwrap_or_default()
}

pub fn remember_language(lang: Lang) {
    let storage = dom::window().ok().and_then(|w| w.local_storage().ok().flatten());
    match storage {
        Some(s) => {
            if s.set_item(STORAGE_KEY, lang.code()).is_err() {
                warn!(lang = %lang, "could not persist language choice");
            }
        }
        None => warn!("localStorage unavailable, language choice not persisted"),
    }
}

pub fn apply(translations: &Translations, lang: Lang) -> Result<(), JsValue> {
    let document = dom::document()?;
    if let Some(root) = document.document_element() {
        root.set_attribute("lang", lang.code())?;
    }

    for el in dom::query_all(&format!("[{TEXT_ATTR}]"))? {
        if let Some(key) = el.get_attribute(TEXT_ATTR) {
            el.set_text_content(Some(&*translations.t(lang, &key)));
        }
    }

    for el in dom::query_all(&format!("[{LIST_ATTR}]"))? {
        let Some(key) = el.get_attribute(LIST_ATTR) else {
            continue;
        };
        el.set_inner_html("");
        for item in translations.t_list(lang, &key) {
            let li = document.create_element("li")?;
            li.set_text_content(Some(item.as_str()));
            el.append_child(&li)?;
        }
    }
    Ok(())
}
