//! Assertion and hook function types
//!
//! Assertions are the boolean checks a matcher type declares. Each body
//! receives an [`Evaluation`](crate::matcher::Evaluation) view of the bound
//! instance and returns an [`AssertionOutcome`]: a bare boolean, optionally
//! enriched with message context consumed by the composer when this
//! assertion is the first to disagree with the current polarity.

use crate::matcher::{Evaluation, MatcherInstance};
use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Boxed assertion body installed in a matcher type's method table
pub type AssertionFn<S> = Arc<
    dyn for<'e> Fn(&mut Evaluation<'e, S>) -> anyhow::Result<AssertionOutcome> + Send + Sync,
>;

/// Boxed hook body run after construction or before assertion
pub type HookFn<S> = Arc<dyn Fn(&mut MatcherInstance<S>) -> anyhow::Result<()> + Send + Sync>;

/// Boxed construction block stored under a declared block parameter name
pub type BlockFn<S> = Arc<dyn Fn(&mut S) -> Value + Send + Sync>;

/// Outcome of a single assertion invocation
///
/// `holds` is compared against the current polarity; the attached context
/// feeds message interpolation when this outcome stops the run.
#[derive(Debug, Clone, Default)]
pub struct AssertionOutcome {
    holds: bool,
    context: MessageContext,
}

impl AssertionOutcome {
    /// Outcome for an assertion that holds
    pub fn pass() -> Self {
        Self {
            holds: true,
            context: MessageContext::default(),
        }
    }

    /// Outcome for an assertion that does not hold
    pub fn fail() -> Self {
        Self {
            holds: false,
            context: MessageContext::default(),
        }
    }

    /// Outcome from a computed boolean
    pub fn of(holds: bool) -> Self {
        Self {
            holds,
            context: MessageContext::default(),
        }
    }

    /// Attach an interpolation value to the outcome's message context
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.values.insert(key.into(), value.into());
        self
    }

    /// Attach an inline fallback template used when no catalog key resolves
    pub fn with_default(mut self, template: impl Into<String>) -> Self {
        self.context.default_template = Some(template.into());
        self
    }

    /// Whether the assertion held in the affirmative sense
    pub fn holds(&self) -> bool {
        self.holds
    }

    /// Borrow the attached message context
    pub fn context(&self) -> &MessageContext {
        &self.context
    }

    /// Consume the outcome into its message context
    pub fn into_context(self) -> MessageContext {
        self.context
    }
}

impl From<bool> for AssertionOutcome {
    fn from(holds: bool) -> Self {
        AssertionOutcome::of(holds)
    }
}

impl From<(bool, MessageContext)> for AssertionOutcome {
    fn from((holds, context): (bool, MessageContext)) -> Self {
        Self { holds, context }
    }
}

/// Extra interpolation values and overrides supplied by an assertion
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    pub(crate) values: BTreeMap<String, Value>,
    pub(crate) default_template: Option<String>,
}

impl MessageContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an interpolation value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up an interpolation value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// The inline fallback template, if the assertion supplied one
    pub fn default_template(&self) -> Option<&str> {
        self.default_template.as_deref()
    }
}
