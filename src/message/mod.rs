//! Message composition
//!
//! The [`Composer`] turns a matcher instance and its last run's context into
//! the three strings of the public protocol: `description`,
//! `failure_message` and `negative_failure_message`. Templates resolve
//! through a layered chain — matcher-scoped key, global key, the failing
//! assertion's inline default, generated sentence — and composition is
//! total: it always produces some string, however sparse the catalogs.

use crate::matcher::MatcherInstance;
use crate::value::Value;
use std::collections::BTreeMap;

pub(crate) mod interpolate;
pub mod templates;

use interpolate::{humanize, interpolate, to_sentence};
use templates::Locale;

/// Builds description and failure strings for one matcher instance
pub(crate) struct Composer<'a, S> {
    instance: &'a MatcherInstance<S>,
    locale: Locale,
}

impl<'a, S> Composer<'a, S> {
    pub(crate) fn new(instance: &'a MatcherInstance<S>) -> Self {
        // A completed run carries its locale snapshot; before any run the
        // active locale is read once per composed message.
        let locale = instance
            .run
            .locale
            .clone()
            .unwrap_or_else(templates::active_locale);
        Self { instance, locale }
    }

    /// What this matcher checks, with clauses for each set optional
    pub(crate) fn description(&self) -> String {
        let definition = &self.instance.definition;
        let scope = definition.scope_key();
        let context = self.base_context();

        let base = self
            .resolve(&[format!("{}.description", scope)])
            .map(|template| interpolate(&template, &context))
            .unwrap_or_else(|| {
                let mut text = humanize(definition.name());
                if definition.arguments().collection().is_some()
                    && !self.instance.collection.is_empty()
                {
                    text.push(' ');
                    text.push_str(&self.collection_sentence());
                }
                text
            });

        let clauses = self.optional_clauses(&scope, &context);
        if clauses.is_empty() {
            base
        } else {
            format!("{} {}", base, to_sentence(&clauses))
        }
    }

    /// Failure framed with positive intent, whatever polarity actually ran
    pub(crate) fn failure_message(&self) -> String {
        self.framed_message("failure", "Expected %{subject} to %{expectation}")
    }

    /// Failure framed with negated intent, whatever polarity actually ran
    pub(crate) fn negative_failure_message(&self) -> String {
        self.framed_message("negative_failure", "Expected %{subject} not to %{expectation}")
    }

    fn framed_message(&self, key: &str, fallback: &str) -> String {
        let scope = self.instance.definition.scope_key();
        let template = self
            .resolve(&[format!("{}.{}", scope, key), key.to_string()])
            .unwrap_or_else(|| fallback.to_string());

        let mut context = self.base_context();
        context.insert("expectation".to_string(), self.expectation());
        interpolate(&template, &context)
    }

    /// The sentence for the recorded failing assertion, or the description
    /// when no run has failed yet
    fn expectation(&self) -> String {
        let Some(failure) = &self.instance.run.failure else {
            return self.description();
        };

        let scope = self.instance.definition.scope_key();
        let context = self.base_context();
        let keys = [
            format!("{}.expectations.{}", scope, failure.assertion),
            format!("expectations.{}", failure.assertion),
        ];
        if let Some(template) = self.resolve(&keys) {
            return interpolate(&template, &context);
        }
        if let Some(template) = failure.context.default_template() {
            return interpolate(template, &context);
        }
        humanize(&failure.assertion)
    }

    /// Interpolation context: arguments and options under their own names,
    /// the collection as a joined sentence, the failing element under the
    /// singular name, the subject description, and assertion overrides last
    fn base_context(&self) -> BTreeMap<String, String> {
        let instance = self.instance;
        let definition = &instance.definition;
        let mut context = BTreeMap::new();

        for (name, value) in instance.arguments.iter() {
            context.insert(name.clone(), value.inspect());
        }
        for (name, value) in instance.options.iter() {
            context.insert(name.clone(), value.inspect());
        }

        if let Some(collection) = definition.arguments().collection() {
            context.insert(collection.name.clone(), self.collection_sentence());
            if let (Some(singular), Some(failure)) =
                (&collection.singular, &instance.run.failure)
            {
                if let Some(element) = &failure.element {
                    context.insert(singular.clone(), element.inspect());
                }
            }
        }

        context.insert(
            "subject".to_string(),
            instance
                .run
                .subject_desc
                .clone()
                .unwrap_or_else(|| "the subject".to_string()),
        );

        if let Some(failure) = &instance.run.failure {
            for (name, value) in &failure.context.values {
                context.insert(name.clone(), context_string(value));
            }
        }

        context
    }

    fn collection_sentence(&self) -> String {
        let items: Vec<String> = self
            .instance
            .collection
            .iter()
            .map(Value::inspect)
            .collect();
        to_sentence(&items)
    }

    /// One clause per declared optional, in declaration order; optionals
    /// with no matching template variant are omitted
    fn optional_clauses(
        &self,
        scope: &str,
        context: &BTreeMap<String, String>,
    ) -> Vec<String> {
        let mut clauses = Vec::new();
        for spec in self.instance.definition.optionals() {
            let value = self.instance.options.get(spec.name());
            let variant = match value {
                Some(Value::Bool(true)) => "positive",
                Some(Value::Bool(false)) => "negative",
                Some(_) => "given",
                None => "not_given",
            };

            let keys = [
                format!("{}.optionals.{}.{}", scope, spec.name(), variant),
                format!("optionals.{}.{}", spec.name(), variant),
            ];
            if let Some(template) = self.resolve(&keys) {
                let mut clause_context = context.clone();
                if let Some(value) = value {
                    clause_context.insert("value".to_string(), value.inspect());
                }
                clauses.push(interpolate(&template, &clause_context));
            }
        }
        clauses
    }

    fn resolve(&self, keys: &[String]) -> Option<String> {
        templates::with_store(|store| store.resolve(&self.locale, keys))
    }
}

/// Render a context override: prose strings stay raw, everything else is
/// rendered in its literal form
fn context_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.inspect(),
    }
}
