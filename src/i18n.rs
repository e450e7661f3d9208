//! Static localization settings for the translation loader.
//!
//! Pure data: which languages exist, which one is the default, and where the
//! translation files live. Loading and rendering translations happens in the UI.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizationConfig {
    pub default_lang: String,
    pub fallback_lang: Vec<String>,
    pub available_langs: Vec<String>,
    /// Directory holding `<lang>.json` files; always ends in `/`.
    pub root_translations_path: String,
    pub failed_retries: u32,
    pub prod_mode: bool,
    pub re_render_on_lang_change: bool,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_lang: "en".into(),
            fallback_lang: vec!["en".into(), "tr".into()],
            available_langs: vec!["en".into(), "tr".into()],
            root_translations_path: "src/assets/i18n/".into(),
            failed_retries: 2,
            prod_mode: true,
            re_render_on_lang_change: true,
        }
    }
}

impl LocalizationConfig {
    /// Parse a JSON settings document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Pick the language to load for a requested tag such as `tr-TR`:
    /// an exact match, then its primary subtag, then the default.
    #[must_use]
    pub fn resolve(&self, requested: &str) -> &str {
        let requested = requested.trim();
        let primary = requested.split(['-', '_']).next().unwrap_or(requested);
        self.available_langs
            .iter()
            .find(|lang| lang.eq_ignore_ascii_case(requested))
            .or_else(|| self.available_langs.iter().find(|lang| lang.eq_ignore_ascii_case(primary)))
            .map_or(self.default_lang.as_str(), String::as_str)
    }

    /// Path of the translation file for `lang`.
    #[must_use]
    pub fn translation_path(&self, lang: &str) -> String {
        format!("{}/{}.json", self.root_translations_path.trim_end_matches('/'), lang)
    }
}

#[cfg(test)]
#[path = "i18n_test.rs"]
mod tests;
