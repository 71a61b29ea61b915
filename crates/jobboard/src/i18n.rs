use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_LANG: &str = "en";

/// Translations keyed by language, then by source text.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `<lang>.json` file (a flat `{source: translation}` object) in `dir`.
    pub fn load_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut catalog = Self::new();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to read translations dir {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let messages: HashMap<String, String> = serde_json::from_str(&raw)
                .with_context(|| format!("invalid translation file {}", path.display()))?;
            tracing::debug!(lang, count = messages.len(), "loaded translations");
            catalog
                .messages
                .entry(lang.to_lowercase())
                .or_default()
                .extend(messages);
        }

        Ok(catalog)
    }

    pub fn insert(&mut self, lang: &str, source: &str, translated: &str) {
        self.messages
            .entry(lang.to_lowercase())
            .or_default()
            .insert(source.to_string(), translated.to_string());
    }

    /// Falls back from `pt-br` to `pt`, then to the source text itself.
    pub fn translate<'a>(&'a self, lang: &str, source: &'a str) -> &'a str {
        let lang = lang.to_lowercase();
        let base = lang.split(['-', '_']).next().unwrap_or(&lang);
        [lang.as_str(), base]
            .iter()
            .find_map(|l| self.messages.get(*l).and_then(|m| m.get(source)))
            .map(String::as_str)
            .unwrap_or(source)
    }
}

/// First language of an `Accept-Language` header, else the site's, else `en`.
pub fn resolve_lang(accept_language: Option<&str>, site_lang: Option<&str>) -> String {
    let from_header = accept_language
        .and_then(|h| h.split(',').next())
        .and_then(|tag| tag.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*");

    from_header
        .or_else(|| site_lang.map(str::trim).filter(|l| !l.is_empty()))
        .unwrap_or(DEFAULT_LANG)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_falls_back_to_base_language() {
        let mut catalog = Catalog::new();
        catalog.insert("de", "Active", "Aktiv");
        assert_eq!(catalog.translate("de", "Active"), "Aktiv");
        assert_eq!(catalog.translate("de-AT", "Active"), "Aktiv");
        assert_eq!(catalog.translate("fr", "Active"), "Active");
        assert_eq!(catalog.translate("de", "Inactive"), "Inactive");
    }

    #[test]
    fn lang_resolution_order() {
        assert_eq!(resolve_lang(Some("pt-BR,pt;q=0.9"), Some("de")), "pt-BR");
        assert_eq!(resolve_lang(Some("fr;q=0.8"), None), "fr");
        assert_eq!(resolve_lang(Some("*"), Some("de")), "de");
        assert_eq!(resolve_lang(None, Some(" ")), "en");
    }

    #[test]
    fn loads_json_files() {
        let dir = std::env::temp_dir().join(format!("jobboard-i18n-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("es.json"), r#"{"Active": "Activo"}"#).unwrap();
        std::fs::write(dir.join("README.txt"), "ignored").unwrap();

        let catalog = Catalog::load_dir(&dir).unwrap();
        assert_eq!(catalog.translate("es", "Active"), "Activo");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
