use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Id,
    En,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::Id, Lang::En];

    pub fn code(self) -> &'static str {
        match self {
            Lang::Id => "id",
            Lang::En => "en",
        }
    }

    /// Exact `"id"` / `"en"`.
    pub fn parse(code: &str) -> Option<Lang> {
        Lang::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Browser language tag such as `id-ID` or `en-US`; anything not
    /// Indonesian reads as English.
    pub fn from_tag(tag: &str) -> Lang {
        if tag.to_ascii_lowercase().starts_with("id") {
            Lang::Id
        } else {
            Lang::En
        }
    }

    pub fn other(self) -> Lang {
        match self {
            Lang::Id => Lang::En,
            Lang::En => Lang::Id,
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    Json(String),
    NotAnObject,
    UnknownLanguage(String),
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslationError::Json(msg) => write!(f, "translation table is not valid JSON: {msg}"),
            TranslationError::NotAnObject => write!(f, "translation table must be a JSON object"),
            TranslationError::UnknownLanguage(code) => write!(f, "unknown language {code:?}"),
        }
    }
}

impl std::error::Error for TranslationError {}

/// Nested key tree per language, looked up by dotted path (`intro.title`).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Translations {
    tables: BTreeMap<Lang, Value>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `{ "id": {...}, "en": {...} }`. A language's tree may also be
    /// wrapped in a `translation` object.
    pub fn from_json_str(s: &str) -> Result<Self, TranslationError> {
        let root: Value = serde_json::from_str(s).map_err(|e| TranslationError::Json(e.to_string()))?;
        let Value::Object(langs) = root else {
            return Err(TranslationError::NotAnObject);
        };
        let mut out = Translations::new();
        for (code, mut tree) in langs {
            let lang = Lang::parse(&code).ok_or(TranslationError::UnknownLanguage(code))?;
            if let Some(inner) = tree.get_mut("translation").map(Value::take) {
                tree = inner;
            }
            if !tree.is_object() {
                return Err(TranslationError::NotAnObject);
            }
            out.tables.insert(lang, tree);
        }
        Ok(out)
    }

    pub fn insert(&mut self, lang: Lang, tree: Value) {
        self.tables.insert(lang, tree);
    }

    pub fn languages(&self) -> impl Iterator<Item = Lang> + '_ {
        self.tables.keys().copied()
    }

    fn lookup(&self, lang: Lang, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(self.tables.get(&lang)?, |node, part| node.get(part))
    }

    /// Falls back to the other language, then to the key itself.
    pub fn t<'a>(&'a self, lang: Lang, key: &'a str) -> Cow<'a, str> {
        for l in [lang, lang.other()] {
            if let Some(Value::String(s)) = self.lookup(l, key) {
                return Cow::Borrowed(s.as_str());
            }
        }
        warn!(%lang, key, "missing translation");
        Cow::Borrowed(key)
    }

    /// Array-valued entries, with the same language fallback as `t`.
    /// Non-string items are skipped.
    pub fn t_list(&self, lang: Lang, key: &str) -> Vec<String> {
        for l in [lang, lang.other()] {
            if let Some(Value::Array(items)) = self.lookup(l, key) {
                return items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect();
            }
        }
        warn!(%lang, key, "missing translation list");
        Vec::new()
    }

    pub fn has(&self, lang: Lang, key: &str) -> bool {
        self.lookup(lang, key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{Lang, TranslationError, Translations};
    use pretty_assertions::assert_eq;

    const TABLE: &str = r#"{
        "id": { "translation": {
            "hero": { "title": "Siapkah Kita Menghadapi Banjir?" },
            "denpasar": { "soputanImpact": ["Jalan tergenang", "Kendaraan terjebak"] }
        }},
        "en": { "translation": {
            "hero": { "title": "Are We Ready to Face Floods?", "scrollDown": "Scroll to explore the story" }
        }}
    }"#;

    #[test]
    fn lang_codes_and_tags() {
        assert_eq!(Lang::default(), Lang::Id);
        assert_eq!(Lang::parse("en"), Some(Lang::En));
        assert_eq!(Lang::parse("fr"), None);
        assert_eq!(Lang::from_tag("id-ID"), Lang::Id);
        assert_eq!(Lang::from_tag("en-GB"), Lang::En);
    }

    #[test]
    fn looks_up_dotted_keys() {
        let t = Translations::from_json_str(TABLE).unwrap();
        assert_eq!(t.t(Lang::Id, "hero.title"), "Siapkah Kita Menghadapi Banjir?");
        assert_eq!(t.t(Lang::En, "hero.title"), "Are We Ready to Face Floods?");
    }

    #[test]
    fn falls_back_to_other_language_then_key() {
        let t = Translations::from_json_str(TABLE).unwrap();
        assert_eq!(t.t(Lang::Id, "hero.scrollDown"), "Scroll to explore the story");
        assert_eq!(t.t(Lang::En, "hero.missing"), "hero.missing");
        // An object is not a string.
        assert_eq!(t.t(Lang::En, "hero"), "hero");
    }

    #[test]
    fn lists_use_the_same_fallback() {
        let t = Translations::from_json_str(TABLE).unwrap();
        assert_eq!(
            t.t_list(Lang::En, "denpasar.soputanImpact"),
            vec!["Jalan tergenang".to_string(), "Kendaraan terjebak".to_string()]
        );
        assert!(t.t_list(Lang::En, "hero.title").is_empty());
    }

    #[test]
    fn rejects_bad_tables() {
        assert_eq!(Translations::from_json_str("[]"), Err(TranslationError::NotAnObject));
        assert_eq!(
            Translations::from_json_str(r#"{"fr": {}}"#),
            Err(TranslationError::UnknownLanguage("fr".into()))
        );
        assert!(matches!(Translations::from_json_str("{"), Err(TranslationError::Json(_))));
    }
}
