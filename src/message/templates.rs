//! Template store and locale selection
//!
//! Message templates live in per-locale [`Catalog`]s inside a
//! [`TemplateStore`]. A process-wide store and an active locale are kept
//! behind narrow accessors; the engine reads the locale once per evaluation
//! and never mutates either as a side effect of matching. Locale *file*
//! handling is out of scope — catalogs are registered in memory, from any
//! serde-compatible source.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// A locale code such as `en` or `pt-BR`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// The locale code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale("en".to_string())
    }
}

impl From<&str> for Locale {
    fn from(code: &str) -> Self {
        Locale(code.to_string())
    }
}

impl From<String> for Locale {
    fn from(code: String) -> Self {
        Locale(code)
    }
}

/// A flat mapping from dotted template keys to template strings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    templates: HashMap<String, String>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one template under a dotted key
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    /// Insert one template, consuming and returning the catalog
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    /// Look up a template by exact key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Build a catalog from a JSON document
    ///
    /// Nested objects are flattened into dotted keys, so both
    /// `{"enumerable.contain.description": "..."}` and
    /// `{"enumerable": {"contain": {"description": "..."}}}` work.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        let value: JsonValue = serde_json::from_str(source)?;
        let mut catalog = Catalog::new();
        flatten_into(&mut catalog, None, &value);
        Ok(catalog)
    }

    /// Merge another catalog into this one; its entries win on conflict
    pub fn merge(&mut self, other: Catalog) {
        self.templates.extend(other.templates);
    }
}

fn flatten_into(catalog: &mut Catalog, prefix: Option<&str>, value: &JsonValue) {
    match value {
        JsonValue::Object(entries) => {
            for (key, nested) in entries {
                let joined = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.clone(),
                };
                flatten_into(catalog, Some(&joined), nested);
            }
        }
        JsonValue::String(template) => {
            if let Some(key) = prefix {
                catalog.insert(key, template.clone());
            }
        }
        _ => {}
    }
}

/// Per-locale template catalogs with layered resolution
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    catalogs: HashMap<Locale, Catalog>,
}

impl TemplateStore {
    /// Create a store seeded with the built-in English framing templates
    pub fn with_defaults() -> Self {
        let mut store = Self::default();
        store.register(
            Locale::default(),
            Catalog::new()
                .with("failure", "Expected %{subject} to %{expectation}")
                .with("negative_failure", "Expected %{subject} not to %{expectation}"),
        );
        store
    }

    /// Merge a catalog into the given locale
    pub fn register(&mut self, locale: Locale, catalog: Catalog) {
        self.catalogs.entry(locale).or_default().merge(catalog);
    }

    /// Resolve the first key that has a template, in the given locale
    ///
    /// Key precedence outranks locale: each key is tried in the requested
    /// locale and then in the default locale before the next key is
    /// considered. Returns `None` when no key resolves anywhere; callers
    /// fall through to generated sentences, never to an error.
    pub fn resolve(&self, locale: &Locale, keys: &[String]) -> Option<String> {
        let fallback = Locale::default();
        for key in keys {
            if let Some(template) = self.catalogs.get(locale).and_then(|c| c.get(key)) {
                return Some(template.to_string());
            }
            if *locale != fallback {
                if let Some(template) = self.catalogs.get(&fallback).and_then(|c| c.get(key)) {
                    return Some(template.to_string());
                }
            }
        }
        None
    }
}

static STORE: Lazy<RwLock<TemplateStore>> = Lazy::new(|| RwLock::new(TemplateStore::with_defaults()));

static ACTIVE_LOCALE: Lazy<RwLock<Locale>> = Lazy::new(|| RwLock::new(Locale::default()));

/// Merge a catalog into the process-wide store under the given locale
pub fn register_catalog(locale: impl Into<Locale>, catalog: Catalog) {
    STORE.write().register(locale.into(), catalog);
}

/// Read from the process-wide store
pub(crate) fn with_store<R>(f: impl FnOnce(&TemplateStore) -> R) -> R {
    f(&STORE.read())
}

/// The currently active locale
pub fn active_locale() -> Locale {
    ACTIVE_LOCALE.read().clone()
}

/// Switch the active locale for subsequent evaluations
///
/// Evaluations snapshot the locale once at `matches` time, so a switch
/// mid-run never mixes locales within one composed message.
pub fn set_active_locale(locale: impl Into<Locale>) {
    *ACTIVE_LOCALE.write() = locale.into();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_framing_keys() {
        let store = TemplateStore::with_defaults();
        let template = store
            .resolve(&Locale::default(), &["failure".to_string()])
            .unwrap();
        assert!(template.contains("%{subject}"));
    }

    #[test]
    fn test_resolution_tries_keys_in_order() {
        let mut store = TemplateStore::with_defaults();
        store.register(
            Locale::default(),
            Catalog::new()
                .with("expectations.is_included", "global")
                .with("contain.expectations.is_included", "scoped"),
        );

        let keys = vec![
            "contain.expectations.is_included".to_string(),
            "expectations.is_included".to_string(),
        ];
        assert_eq!(store.resolve(&Locale::default(), &keys).unwrap(), "scoped");

        let keys = vec![
            "absent.expectations.is_included".to_string(),
            "expectations.is_included".to_string(),
        ];
        assert_eq!(store.resolve(&Locale::default(), &keys).unwrap(), "global");
    }

    #[test]
    fn test_locale_falls_back_to_default() {
        let mut store = TemplateStore::with_defaults();
        store.register(
            Locale::from("pt-BR"),
            Catalog::new().with("failure", "Esperava que %{subject} %{expectation}"),
        );

        let resolved = store
            .resolve(&Locale::from("pt-BR"), &["failure".to_string()])
            .unwrap();
        assert!(resolved.starts_with("Esperava"));

        // A key missing from pt-BR resolves through the default catalog.
        let resolved = store
            .resolve(&Locale::from("pt-BR"), &["negative_failure".to_string()])
            .unwrap();
        assert!(resolved.starts_with("Expected"));
    }

    #[test]
    fn test_catalog_from_nested_json() {
        let catalog = Catalog::from_json(
            r#"{
                "enumerable": {
                    "contain": {
                        "description": "contain %{values}",
                        "expectations": {"is_included": "include %{value}"}
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            catalog.get("enumerable.contain.description"),
            Some("contain %{values}")
        );
        assert_eq!(
            catalog.get("enumerable.contain.expectations.is_included"),
            Some("include %{value}")
        );
    }
}
