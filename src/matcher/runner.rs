//! The `matches` protocol
//!
//! One evaluation binds the subject, runs the before-assert hooks, then the
//! single assertions in declared order, then the collection assertions once
//! per element in given order. The first assertion whose boolean disagrees
//! with the current polarity stops the run and its context is kept for
//! message composition. Assertion and hook errors propagate; they are never
//! converted into a plain non-match.

use crate::definition::{AssertionOutcome, MatcherDefinition};
use crate::error::{Error, Result};
use crate::matcher::{Evaluation, FailureReport, MatcherInstance, RunState};
use crate::message::templates;
use crate::value::Value;
use std::fmt;
use tracing::{debug, trace};

impl<S: fmt::Debug> MatcherInstance<S> {
    /// Evaluate this matcher against a subject
    ///
    /// Returns `Ok(true)` when the matcher's claim holds under the current
    /// polarity: positively when every assertion holds, negatively when no
    /// assertion does. A negated run stops at the first sign the positive
    /// condition holds.
    ///
    /// Re-invoking with a different subject resets the transient run state
    /// and leaves the static configuration untouched.
    pub fn matches(&mut self, subject: S) -> Result<bool> {
        self.subject = Some(subject);
        self.run = RunState::default();

        let definition = self.definition.clone();
        for hook in definition.before_assert_hooks() {
            let body = definition.hook_body(hook)?;
            body(self).map_err(|source| {
                Error::hook_body(definition.name(), &hook.name, source)
            })?;
        }

        // Locale and subject rendering are snapshotted once per evaluation
        // so message composition stays deterministic within this run.
        self.run.locale = Some(templates::active_locale());
        self.run.subject_desc = Some(format!(
            "{:?}",
            self.subject.as_ref().ok_or_else(|| Error::SubjectNotBound {
                matcher: definition.name().to_string(),
            })?
        ));
        self.run.evaluated = true;

        let positive = !self.negated;

        for name in definition.single_assertions() {
            let outcome = self.run_assertion(&definition, name, None)?;
            if outcome.holds() != positive {
                debug!(
                    matcher = definition.name(),
                    assertion = name.as_str(),
                    positive,
                    "assertion disagreed with polarity"
                );
                self.run.failure = Some(FailureReport {
                    assertion: name.clone(),
                    element: None,
                    context: outcome.into_context(),
                });
                return Ok(false);
            }
        }

        if definition.arguments().collection().is_some() {
            for index in 0..self.collection.len() {
                let element = self.collection[index].clone();
                for name in definition.collection_assertions() {
                    let outcome = self.run_assertion(&definition, name, Some(&element))?;
                    if outcome.holds() != positive {
                        debug!(
                            matcher = definition.name(),
                            assertion = name.as_str(),
                            element = %element,
                            positive,
                            "collection assertion disagreed with polarity"
                        );
                        self.run.failure = Some(FailureReport {
                            assertion: name.clone(),
                            element: Some(element),
                            context: outcome.into_context(),
                        });
                        return Ok(false);
                    }
                }
            }
        }

        trace!(matcher = definition.name(), positive, "matcher held");
        Ok(true)
    }

    fn run_assertion(
        &mut self,
        definition: &MatcherDefinition<S>,
        name: &str,
        current: Option<&Value>,
    ) -> Result<AssertionOutcome> {
        let body = definition.assertion_body(name)?;
        let subject = self.subject.as_mut().ok_or_else(|| Error::SubjectNotBound {
            matcher: definition.name().to_string(),
        })?;
        let mut eval = Evaluation::new(
            subject,
            &self.arguments,
            &self.collection,
            current,
            &self.options,
            self.block.as_ref(),
        );
        body(&mut eval).map_err(|source| Error::assertion_body(definition.name(), name, source))
    }
}
