//! Matcher instances
//!
//! A [`MatcherInstance`] is one configured check: the bound arguments,
//! collection and options of a single constructing call, plus the polarity
//! flag and the subject bound at evaluation time. Instances are built from a
//! [`MatcherDefinition`](crate::definition::MatcherDefinition) and expose the
//! engine's entire public protocol: fluent option configuration,
//! [`negative`](MatcherInstance::negative), `matches`, and the three message
//! accessors.

use crate::definition::{BlockFn, MatcherDefinition, MessageContext};
use crate::error::{Error, Result};
use crate::message::templates::Locale;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;

pub(crate) mod builder;
pub(crate) mod runner;

/// Fixed-argument bindings of a constructed instance
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    /// Look up a bound argument by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Iterate over bound name/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }
}

/// Merged option values of a constructed instance
///
/// Defaults resolved at construction time sit under any explicitly supplied
/// values; fluent setter calls overwrite both.
#[derive(Debug, Clone, Default)]
pub struct Options {
    values: BTreeMap<String, Value>,
}

impl Options {
    /// Look up an option value by canonical name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether an option has been set at all
    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Whether an option is set to a truthy value
    pub fn is_truthy(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(Value::is_truthy)
    }

    /// Iterate over set name/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }
}

/// Context recorded for the first assertion that disagreed with polarity
#[derive(Debug, Clone)]
pub(crate) struct FailureReport {
    pub(crate) assertion: String,
    pub(crate) element: Option<Value>,
    pub(crate) context: MessageContext,
}

/// Transient per-run state produced by `matches` and consumed by messages
#[derive(Debug, Clone, Default)]
pub(crate) struct RunState {
    pub(crate) evaluated: bool,
    pub(crate) locale: Option<Locale>,
    pub(crate) subject_desc: Option<String>,
    pub(crate) failure: Option<FailureReport>,
}

/// One configured matcher, eventually bound to a subject
pub struct MatcherInstance<S> {
    pub(crate) definition: MatcherDefinition<S>,
    pub(crate) arguments: Bindings,
    pub(crate) collection: Vec<Value>,
    pub(crate) block: Option<BlockFn<S>>,
    pub(crate) options: Options,
    pub(crate) negated: bool,
    pub(crate) subject: Option<S>,
    pub(crate) run: RunState,
}

impl<S> fmt::Debug for MatcherInstance<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherInstance")
            .field("matcher", &self.definition.name())
            .field("arguments", &self.arguments)
            .field("collection", &self.collection)
            .field("options", &self.options)
            .field("negated", &self.negated)
            .finish()
    }
}

impl<S> MatcherInstance<S> {
    /// The definition this instance was constructed from
    pub fn definition(&self) -> &MatcherDefinition<S> {
        &self.definition
    }

    /// Look up a bound fixed argument
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// The bound collection elements, in given order
    pub fn collection(&self) -> &[Value] {
        &self.collection
    }

    /// The merged options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Look up an option value by canonical name
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// The construction block, when one was declared and supplied
    pub fn block(&self) -> Option<&BlockFn<S>> {
        self.block.as_ref()
    }

    /// The currently bound subject, if `matches` has bound one
    pub fn subject(&self) -> Option<&S> {
        self.subject.as_ref()
    }

    /// Replace the bound subject; the before-assert extension point
    pub fn set_subject(&mut self, subject: S) {
        self.subject = Some(subject);
    }

    /// Whether this instance is evaluated under negated polarity
    pub fn negated(&self) -> bool {
        self.negated
    }

    /// Mark this instance negated and return it, for `should_not`-style use
    pub fn negative(mut self) -> Self {
        self.negated = true;
        self
    }

    /// Mark this instance negated in place
    pub fn negate(&mut self) {
        self.negated = true;
    }

    /// Set an optional modifier and return the instance, for chaining
    ///
    /// Accepts the canonical name or a declared alias; both write the same
    /// `options` slot. Undeclared names are an error.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.store_option(name, value.into())?;
        Ok(self)
    }

    /// Set an optional modifier in place
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.store_option(name, value.into())?;
        Ok(self)
    }

    /// Set an optional modifier flag-style, storing its declared default
    ///
    /// With no declared default the stored value is `true`.
    pub fn enable(mut self, name: &str) -> Result<Self> {
        let spec = crate::definition::optionals::resolve_optional(
            self.definition.optionals(),
            name,
        )
        .ok_or_else(|| Error::unknown_option(self.definition.name(), name))?;
        let value = spec.default().cloned().unwrap_or(Value::Bool(true));
        let canonical = spec.name().to_string();
        self.options.insert(canonical, value);
        Ok(self)
    }

    /// The single storage operation behind every setter form
    fn store_option(&mut self, name: &str, value: Value) -> Result<()> {
        let spec = crate::definition::optionals::resolve_optional(
            self.definition.optionals(),
            name,
        )
        .ok_or_else(|| Error::unknown_option(self.definition.name(), name))?;
        let canonical = spec.name().to_string();
        self.options.insert(canonical, value);
        Ok(())
    }

    /// Human-readable description of what this matcher checks
    pub fn description(&self) -> String {
        crate::message::Composer::new(self).description()
    }

    /// Failure message, framed with positive intent
    pub fn failure_message(&self) -> String {
        crate::message::Composer::new(self).failure_message()
    }

    /// Failure message, framed with negated intent
    pub fn negative_failure_message(&self) -> String {
        crate::message::Composer::new(self).negative_failure_message()
    }
}

/// View of a bound instance handed to assertion bodies
///
/// Grants mutable access to the subject (assertions may intentionally probe
/// it) and read access to the bindings, collection, options and — during the
/// collection phase — the current element under the singular name.
pub struct Evaluation<'e, S> {
    subject: &'e mut S,
    arguments: &'e Bindings,
    collection: &'e [Value],
    current: Option<&'e Value>,
    options: &'e Options,
    block: Option<&'e BlockFn<S>>,
}

impl<'e, S> Evaluation<'e, S> {
    pub(crate) fn new(
        subject: &'e mut S,
        arguments: &'e Bindings,
        collection: &'e [Value],
        current: Option<&'e Value>,
        options: &'e Options,
        block: Option<&'e BlockFn<S>>,
    ) -> Self {
        Self {
            subject,
            arguments,
            collection,
            current,
            options,
            block,
        }
    }

    /// The subject under test
    pub fn subject(&self) -> &S {
        self.subject
    }

    /// Mutable access to the subject, for probing assertions
    pub fn subject_mut(&mut self) -> &mut S {
        self.subject
    }

    /// A bound fixed argument
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }

    /// The full collection, in given order
    pub fn collection(&self) -> &[Value] {
        self.collection
    }

    /// The element bound to the singular name, during the collection phase
    pub fn current(&self) -> Option<&Value> {
        self.current
    }

    /// An option value
    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    /// Whether an option is set to a truthy value
    pub fn option_is(&self, name: &str) -> bool {
        self.options.is_truthy(name)
    }

    /// The construction block, when present
    pub fn block(&self) -> Option<&BlockFn<S>> {
        self.block
    }
}
